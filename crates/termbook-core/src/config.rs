//! termbook configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::snapshot::DEFAULT_INDENT;

/// Top-level termbook configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermbookConfig {
    /// Snapshot file used by autoload and as the default import/export target.
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: PathBuf,
    /// Directory that relative CSV export names are resolved against.
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,
    /// Spaces per indent level in exported snapshots.
    #[serde(default = "default_json_indent")]
    pub json_indent: usize,
    /// Load `snapshot_path` when the interactive shell starts.
    #[serde(default)]
    pub autoload: bool,
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from("students.json")
}
fn default_export_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_json_indent() -> usize {
    DEFAULT_INDENT
}

impl Default for TermbookConfig {
    fn default() -> Self {
        Self {
            snapshot_path: default_snapshot_path(),
            export_dir: default_export_dir(),
            json_indent: default_json_indent(),
            autoload: false,
        }
    }
}

impl TermbookConfig {
    /// Resolve a user-supplied export name against `export_dir`.
    pub fn export_path(&self, name: impl AsRef<Path>) -> PathBuf {
        let path = name.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.export_dir.join(path)
        }
    }
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `termbook.toml` in the current directory
/// 2. `~/.config/termbook/config.toml`
///
/// Environment variable override: `TERMBOOK_SNAPSHOT`.
pub fn load_config_from(path: Option<&Path>) -> Result<TermbookConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("termbook.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            config
        }
        None => TermbookConfig::default(),
    };

    if let Ok(snapshot) = std::env::var("TERMBOOK_SNAPSHOT") {
        if !snapshot.is_empty() {
            config.snapshot_path = PathBuf::from(snapshot);
        }
    }

    Ok(config)
}

/// Parse configuration from TOML text.
pub fn parse_config(content: &str) -> Result<TermbookConfig> {
    let config: TermbookConfig = toml::from_str(content)?;
    anyhow::ensure!(
        config.json_indent <= 16,
        "json_indent must be at most 16, got {}",
        config.json_indent
    );
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("termbook"))
}

/// Sample configuration written by `termbook init`.
pub const SAMPLE_CONFIG: &str = r#"# termbook configuration

# Snapshot used by autoload and offered as the default import/export file.
snapshot_path = "students.json"

# Relative CSV export names are written under this directory.
export_dir = "."

# Spaces per indent level in exported JSON snapshots.
json_indent = 4

# Load snapshot_path when the interactive shell starts.
autoload = false
"#;
