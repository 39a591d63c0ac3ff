//! The `termbook rank` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use termbook_core::statistics::{attendance_percentage, rank_by_batch};

pub fn execute(input: Option<PathBuf>, batch: String, config_path: Option<PathBuf>) -> Result<()> {
    let config = super::config(config_path)?;
    let registry = super::load_registry(input, &config)?;

    let ranked = rank_by_batch(&registry, &batch);
    if ranked.is_empty() {
        println!("No students in batch {batch}.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Rank", "Student ID", "Name", "Average", "Attendance %"]);

    for (i, entry) in ranked.iter().enumerate() {
        let name = registry
            .get(&entry.student_id)
            .map(|s| s.name.as_str())
            .unwrap_or_default();
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&entry.student_id),
            Cell::new(name),
            Cell::new(format!("{:.2}", entry.average)),
            Cell::new(format!(
                "{:.2}%",
                attendance_percentage(&registry, &entry.student_id)
            )),
        ]);
    }

    println!("Rankings for batch {batch}:\n{table}");

    Ok(())
}
