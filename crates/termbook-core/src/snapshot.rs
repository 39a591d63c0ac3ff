//! JSON snapshot codec for the whole registry.
//!
//! A snapshot is one object keyed by student id. Export pretty-prints with a
//! configurable indent; import replaces nothing by itself, the caller decides
//! what to do with the parsed registry.

use std::io::ErrorKind;
use std::path::Path;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::error::SnapshotError;
use crate::registry::Registry;

/// Indent used when none is configured.
pub const DEFAULT_INDENT: usize = 4;

/// Serialize the registry as pretty JSON with `indent` spaces per level.
pub fn to_json_string(registry: &Registry, indent: usize) -> Result<String, serde_json::Error> {
    let indent = " ".repeat(indent);
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(indent.as_bytes());
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    registry.serialize(&mut ser)?;
    // serde_json only emits valid UTF-8.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Parse a registry from JSON text.
pub fn from_json_str(content: &str) -> Result<Registry, serde_json::Error> {
    serde_json::from_str(content)
}

/// Write the registry to `path`, creating parent directories as needed.
pub fn export_snapshot(registry: &Registry, path: &Path, indent: usize) -> Result<(), SnapshotError> {
    let io_err = |source: std::io::Error| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    };
    let json = to_json_string(registry, indent).map_err(|e| io_err(e.into()))?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    std::fs::write(path, json).map_err(io_err)?;
    tracing::info!(
        "exported {} student(s) to {}",
        registry.len(),
        path.display()
    );
    Ok(())
}

/// Read a registry from `path`.
///
/// A missing file is [`SnapshotError::NotFound`]; unparsable content is
/// [`SnapshotError::Malformed`].
pub fn import_snapshot(path: &Path) -> Result<Registry, SnapshotError> {
    let content = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            SnapshotError::NotFound(path.to_path_buf())
        } else {
            SnapshotError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    let registry = from_json_str(&content).map_err(|source| SnapshotError::Malformed {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(
        "imported {} student(s) from {}",
        registry.len(),
        path.display()
    );
    Ok(registry)
}
