//! Siege tuning loaded from data/config/siege.toml with sensible defaults
//! and clamping.

use anyhow::{Context, Result};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct SiegeConfigFile {
    /// Recurring door repair interval, game-time milliseconds.
    pub repair_interval_ms: u64,
    /// Percent of max health a repair tick restores.
    pub repair_percent: i32,
    /// Health percent above which an open door swings shut again.
    pub repair_close_pct: u8,
    /// How long after the last enemy hit a keep counts as contested.
    pub combat_window_ms: u64,
    /// Recurring claim bookkeeping interval for a claimed keep.
    pub claim_tick_ms: u64,
    /// Group members required near a keep to claim it (towers need half).
    pub claim_group_needed: u32,
    /// Keeps one guild may hold at once; 0 disables claiming.
    pub guild_claim_limit: u32,
    /// Radius for nearby-observer broadcasts and claim proximity, world units.
    pub broadcast_radius: f32,
}

impl Default for SiegeConfigFile {
    fn default() -> Self {
        Self {
            repair_interval_ms: 30 * 60 * 1000,
            repair_percent: 5,
            repair_close_pct: 15,
            combat_window_ms: 5 * 60 * 1000,
            claim_tick_ms: 60 * 60 * 1000,
            claim_group_needed: 8,
            guild_claim_limit: 1,
            broadcast_radius: 4000.0,
        }
    }
}

fn data_root() -> PathBuf {
    let here = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    let ws = here.join("../../data");
    if ws.is_dir() { ws } else { here.join("data") }
}

fn clamp(mut cfg: SiegeConfigFile) -> SiegeConfigFile {
    if cfg.repair_interval_ms < 1000 {
        cfg.repair_interval_ms = 1000;
    }
    cfg.repair_percent = cfg.repair_percent.clamp(1, 100);
    if cfg.repair_close_pct > 100 {
        cfg.repair_close_pct = 100;
    }
    if cfg.broadcast_radius < 0.0 {
        cfg.broadcast_radius = 0.0;
    }
    cfg
}

/// Load the siege config from the default location, falling back to defaults.
pub fn load_default() -> Result<SiegeConfigFile> {
    let path = data_root().join("config/siege.toml");
    if !path.is_file() {
        return Ok(SiegeConfigFile::default());
    }
    let txt = std::fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let parsed: SiegeConfigFile = toml::from_str(&txt).context("parse TOML")?;
    Ok(clamp(parsed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_or_file_loads() {
        // Succeeds even if file missing (repo ships a sample file).
        let cfg = load_default().expect("load");
        assert!(cfg.repair_percent >= 1);
        assert!(cfg.repair_interval_ms >= 1000);
    }

    #[test]
    fn clamp_bounds_bad_values() {
        let cfg = clamp(SiegeConfigFile {
            repair_interval_ms: 0,
            repair_percent: 0,
            repair_close_pct: 255,
            broadcast_radius: -1.0,
            ..Default::default()
        });
        assert_eq!(cfg.repair_interval_ms, 1000);
        assert_eq!(cfg.repair_percent, 1);
        assert_eq!(cfg.repair_close_pct, 100);
        assert_eq!(cfg.broadcast_radius, 0.0);
    }
}
