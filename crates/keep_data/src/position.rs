//! Keep templates: components and the positions of the objects bound to them.
//!
//! A template describes one keep or tower: its identity, its building
//! components (walls, gates, the keep proper), and the door/guard/banner
//! positions the simulation instantiates at load.

use serde::{Deserialize, Serialize};

/// Role of a building component. Set at load time so the simulation never
/// has to inspect model/skin numbers to decide placement or attackability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentRole {
    Keep,
    Tower,
    Gate,
    Wall,
    Postern,
}

/// What kind of object a position spawns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionKind {
    Door,
    Guard,
    Banner,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentTemplate {
    pub id: u8,
    pub role: ComponentRole,
    pub dx: f32,
    pub dy: f32,
    pub dz: f32,
    #[serde(default)]
    pub heading: f32,
}

/// One spawn position, offset from the keep origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeepPosition {
    pub template_id: String,
    pub kind: PositionKind,
    /// Owning component id (doors only; which slot within it is `sub_index`).
    #[serde(default)]
    pub component: u8,
    #[serde(default)]
    pub sub_index: u8,
    /// Guard class name (guards only), e.g. "fighter", "lord".
    #[serde(default)]
    pub class: Option<String>,
    /// Banner kind (banners only): "realm" or "guild".
    #[serde(default)]
    pub banner: Option<String>,
    pub dx: f32,
    pub dy: f32,
    pub dz: f32,
    #[serde(default)]
    pub heading: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeepTemplate {
    pub keep_id: u32,
    pub name: String,
    pub realm: String,
    pub base_level: u8,
    /// 0 for a keep proper; 1+ for satellite towers.
    #[serde(default)]
    pub tower_index: u8,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    #[serde(default)]
    pub heading: f32,
    pub components: Vec<ComponentTemplate>,
    pub positions: Vec<KeepPosition>,
}
