//! The `termbook report` command.

use std::path::PathBuf;

use anyhow::Result;

use termbook_report::text::{final_report, student_report};

pub fn execute(
    input: Option<PathBuf>,
    student: String,
    final_report_requested: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = super::config(config_path)?;
    let registry = super::load_registry(input, &config)?;

    let report = if final_report_requested {
        final_report(&registry, &student)?
    } else {
        student_report(&registry, &student)?
    };
    print!("{report}");

    Ok(())
}
