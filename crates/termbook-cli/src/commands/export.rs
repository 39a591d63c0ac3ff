//! The `termbook export` command.

use std::path::PathBuf;

use anyhow::Result;

use termbook_core::snapshot::export_snapshot;
use termbook_report::csv::{write_csv, CsvLayout};

use crate::ExportFormat;

pub fn execute(
    input: Option<PathBuf>,
    format: ExportFormat,
    output: PathBuf,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = super::config(config_path)?;
    let registry = super::load_registry(input, &config)?;

    match format {
        ExportFormat::Json => {
            export_snapshot(&registry, &output, config.json_indent)?;
            println!(
                "Exported {} student(s) to {}",
                registry.len(),
                output.display()
            );
        }
        ExportFormat::Csv | ExportFormat::Grouped => {
            let layout = if format == ExportFormat::Csv {
                CsvLayout::Flat
            } else {
                CsvLayout::Grouped
            };
            let rows = layout.rows(&registry);
            write_csv(&rows, &output)?;
            println!("Exported {} row(s) to {}", rows.len(), output.display());
        }
    }

    Ok(())
}
