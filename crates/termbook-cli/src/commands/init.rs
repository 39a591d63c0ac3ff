//! The `termbook init` command.

use anyhow::Result;

use termbook_core::config::SAMPLE_CONFIG;

pub fn execute() -> Result<()> {
    if std::path::Path::new("termbook.toml").exists() {
        println!("termbook.toml already exists, skipping.");
    } else {
        std::fs::write("termbook.toml", SAMPLE_CONFIG)?;
        println!("Created termbook.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit termbook.toml to choose your snapshot file");
    println!("  2. Run: termbook shell");
    println!("  3. Export: termbook export --format grouped --output students.csv");

    Ok(())
}
