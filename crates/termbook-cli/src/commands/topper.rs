//! The `termbook topper` command.

use std::path::PathBuf;

use anyhow::Result;

use termbook_core::statistics::topper_for_term;

pub fn execute(input: Option<PathBuf>, term: String, config_path: Option<PathBuf>) -> Result<()> {
    let config = super::config(config_path)?;
    let registry = super::load_registry(input, &config)?;

    match topper_for_term(&registry, &term) {
        Some(top) => println!(
            "Topper for {term}: {} with average {}",
            top.student_id, top.average
        ),
        None => println!("No topper found for this term."),
    }

    Ok(())
}
