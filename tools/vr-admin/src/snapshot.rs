//! Snapshot file handling.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use tracing::debug;

/// Read a snapshot. A missing file is an empty database.
pub fn load(path: &Path) -> Result<Value> {
    if !path.exists() {
        debug!("snapshot {} not found, starting empty", path.display());
        return Ok(Value::Object(Map::new()));
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading snapshot {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing snapshot {}", path.display()))
}

/// Replace the snapshot atomically: write a sibling temp file, then rename.
pub fn save(path: &Path, snapshot: &Value) -> Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut file = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("creating temp file in {}", dir.display()))?;
    serde_json::to_writer_pretty(&mut file, snapshot).context("encoding snapshot")?;
    file.write_all(b"\n")?;
    file.persist(path)
        .with_context(|| format!("replacing snapshot {}", path.display()))?;
    debug!("snapshot written to {}", path.display());
    Ok(())
}
