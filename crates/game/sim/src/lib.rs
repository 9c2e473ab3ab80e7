pub mod actions;
pub mod config;
pub mod events;
pub mod game;
pub mod observe;
pub mod path;
pub mod systems;
pub mod world;

pub use actions::DefenseAction;
pub use config::DefenseConfig;
pub use events::DefenseEvent;
pub use game::DefenseGame;
pub use world::{DefenseState, EnemyId, World};
