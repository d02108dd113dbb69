//! keep_data: data schemas and loaders for the siege control plane.
//!
//! Holds the on-disk shapes (keep templates, component positions, persisted
//! door records, tuning config) so the simulation crate can depend on a
//! stable data API.

pub mod door_record;
pub mod loader;
pub mod position;
pub mod configs {
    pub mod siege;
}
