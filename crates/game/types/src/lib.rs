//! Canonical serializable types for the defense match.
//!
//! Shared between `bastion_sim` (the simulation + web server) and any viewer
//! rendering the match from the SSE stream.

use serde::{Deserialize, Serialize};

/// A point in field coordinates (1280x768 pixel space).
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

/// An enemy, positioned by the top-left corner of its sprite box.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EnemyView {
    pub x: f32,
    pub y: f32,
    pub hp: i32,
    pub radius: f32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BuildingView {
    pub x: f32,
    pub y: f32,
    pub range: f32,
    pub has_target: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProjectileView {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

/// An explosion sprite; `frame` counts up to `max_frames`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExplosionView {
    pub x: f32,
    pub y: f32,
    pub frame: u8,
    pub max_frames: u8,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TileView {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub occupied: bool,
    pub hovered: bool,
}

/// Full game state observation, everything a renderer needs for one frame.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DefenseObservation {
    pub tick: u64,
    pub ticks_per_second: u32,

    pub field_width: f32,
    pub field_height: f32,
    pub tile_size: f32,

    pub hearts: u32,
    pub coins: u32,
    pub building_cost: u32,

    pub wave: u32,
    pub next_wave_size: u32,

    pub pointer: Option<Position>,

    pub enemies: Vec<EnemyView>,
    pub buildings: Vec<BuildingView>,
    pub projectiles: Vec<ProjectileView>,
    pub explosions: Vec<ExplosionView>,
    pub tiles: Vec<TileView>,
}

/// Match status as seen by viewers.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MatchStatusView {
    Waiting,
    Running,
    Finished { outcome: String },
    Terminated,
}

/// One frame of the SSE stream: status plus the full observation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StatusFrame {
    pub status: MatchStatusView,
    pub observation: DefenseObservation,
}

/// Player input as posted by the viewer.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputCommand {
    /// Absolute pointer position in field coordinates.
    PointerMoved { x: f32, y: f32 },
    /// Build on the tile currently under the pointer.
    PlaceBuilding,
}
