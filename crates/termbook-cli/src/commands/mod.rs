pub mod export;
pub mod init;
pub mod rank;
pub mod report;
pub mod shell;
pub mod topper;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use termbook_core::config::{load_config_from, TermbookConfig};
use termbook_core::registry::Registry;
use termbook_core::snapshot::import_snapshot;

/// Load the configuration, honouring an explicit `--config` path.
pub fn config(path: Option<PathBuf>) -> Result<TermbookConfig> {
    load_config_from(path.as_deref())
}

/// Read the snapshot named by `input`, or the configured one.
///
/// Unlike the interactive import, a missing file is an error here.
pub fn load_registry(input: Option<PathBuf>, config: &TermbookConfig) -> Result<Registry> {
    let path = input.unwrap_or_else(|| config.snapshot_path.clone());
    read_snapshot(&path)
}

fn read_snapshot(path: &Path) -> Result<Registry> {
    import_snapshot(path).with_context(|| format!("failed to load snapshot {}", path.display()))
}
