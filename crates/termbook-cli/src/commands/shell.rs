//! The `termbook shell` command.

use std::io;
use std::path::PathBuf;

use anyhow::Result;

use termbook_core::registry::Registry;
use termbook_core::snapshot::import_snapshot;

use crate::shell::Shell;

pub fn execute(load: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<()> {
    let config = super::config(config_path)?;

    let registry = match load {
        Some(path) => super::load_registry(Some(path), &config)?,
        None if config.autoload => match import_snapshot(&config.snapshot_path) {
            Ok(registry) => registry,
            Err(e) if e.is_recoverable() => {
                tracing::warn!("autoload skipped: {e}");
                Registry::new()
            }
            Err(e) => return Err(e.into()),
        },
        None => Registry::new(),
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut shell = Shell::new(stdin.lock(), stdout.lock(), registry, &config);
    shell.run()
}
