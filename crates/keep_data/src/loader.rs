//! Data loaders. Resolve paths under the workspace `data/` directory.

use crate::door_record::DoorRecord;
use crate::position::KeepTemplate;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

fn data_root() -> PathBuf {
    // Prefer top-level workspace `data/` so tests and tools can run from any crate.
    let here = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    let ws = here.join("../../data");
    if ws.is_dir() { ws } else { here.join("data") }
}

/// Read a raw JSON file under `data/` and return its string.
pub fn read_json(rel: impl AsRef<Path>) -> Result<String> {
    let path = data_root().join(rel);
    let s = fs::read_to_string(&path).with_context(|| format!("read data: {}", path.display()))?;
    Ok(s)
}

/// Load and deserialize a keep template (from data/keeps/*).
pub fn load_keep_template(rel: impl AsRef<Path>) -> Result<KeepTemplate> {
    let txt = read_json(rel)?;
    let tpl: KeepTemplate = serde_json::from_str(&txt).context("parse keep template json")?;
    Ok(tpl)
}

/// Load a flat list of persisted door records (from data/doors/*).
pub fn load_door_records(rel: impl AsRef<Path>) -> Result<Vec<DoorRecord>> {
    let txt = read_json(rel)?;
    let recs: Vec<DoorRecord> = serde_json::from_str(&txt).context("parse door records json")?;
    Ok(recs)
}
