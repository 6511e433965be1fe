//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Explicit timestep only
//! - Seeded RNG only
//! - FIFO entity queues (no lookup by id)
//! - No rendering, audio or platform dependencies

pub mod behaviors;
pub mod catalog;
pub mod effects;
pub mod level;
pub mod score;
pub mod state;
pub mod tick;

pub use behaviors::{Camera, ObstacleMotion, Player, Pulsate};
pub use catalog::{ObstacleCatalog, ObstacleShape, ObstacleTemplate, Tier};
pub use effects::{CameraShake, ColorLerp, DelayedReveal, Effects};
pub use level::{ColorSwitcher, LevelStream, Obstacle, SpawnedSet, Star};
pub use score::{RunState, ScoreController, ScoreUpdate};
pub use state::{
    ColorTag, Contact, EntityId, GameEvent, GamePhase, GameState, MenuSnapshot,
};
pub use tick::{TickInput, tick};
