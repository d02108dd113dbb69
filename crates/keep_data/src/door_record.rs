//! Persisted flat door record.
//!
//! Legacy standalone doors (not bound to a keep) are reconstructed from this
//! record and registered into the same door lookup as keep doors.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoorRecord {
    pub internal_id: u32,
    pub name: String,
    pub heading: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}
