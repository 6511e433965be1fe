//! Chroma Climb - An endless color-matching climber
//!
//! Core modules:
//! - `sim`: Deterministic simulation (level stream, scoring, game phases)
//! - `persistence`: Key-value stores for stats and settings
//! - `stats`: High score and lifetime star counters
//! - `platform`: Fixed timestep stepping, headless host, browser bridge
//! - `tuning`: Data-driven game balance
//! - `ui`: Plain-data snapshots for the render/UI layer

pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod stats;
pub mod tuning;
pub mod ui;

pub use persistence::{KeyValueStore, MemoryStore};
pub use settings::Settings;
pub use stats::PersistentStats;
pub use tuning::{Tuning, TuningError};

use glam::Vec4;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Vertical distance between consecutive obstacle spawns
    pub const SPACE_BETWEEN_OBSTACLES: f32 = 17.5;
    /// Live obstacles kept before the oldest is destroyed
    pub const MAX_OBSTACLES: usize = 7;
    /// Obstacles spawned before a run starts
    pub const INITIAL_OBSTACLES: usize = 4;
    /// Chance of a color switcher after each obstacle
    pub const COLOR_SWITCHER_CHANCE: f64 = 0.5;

    /// Score below which only easy obstacles spawn
    pub const EASY_SCORE_LIMIT: u32 = 5;
    /// Score from which only hard obstacles spawn
    pub const HARD_SCORE_LIMIT: u32 = 15;
    /// Catalog indices `[0, EASY_TIER_END)` are the easy tier
    pub const EASY_TIER_END: usize = 5;
    /// Catalog indices `[HARD_TIER_START, len)` are the hard tier
    pub const HARD_TIER_START: usize = 4;

    /// Points per background color step
    pub const SCORE_PER_BACKGROUND: u32 = 5;
    /// Background color transition length (seconds)
    pub const BACKGROUND_LERP_DURATION: f32 = 1.0;
    /// Camera shake length after losing (seconds)
    pub const CAMERA_SHAKE_DURATION: f32 = 0.5;
    /// Delay between a fatal contact and the game over menu (seconds)
    pub const GAME_OVER_DELAY: f32 = 1.0;

    /// Player spawn position
    pub const PLAYER_SPAWN_Y: f32 = -10.0;
    /// Vertical velocity set by a jump
    pub const JUMP_FORCE: f32 = 9.0;
    /// Downward acceleration once the player is active
    pub const GRAVITY: f32 = 25.0;
    /// Camera follow smoothing time (seconds)
    pub const CAMERA_SMOOTH_TIME: f32 = 0.3;
    /// Scale applied to the reset button while pressed
    pub const RESET_BUTTON_PRESSED_SCALE: f32 = 1.1;
}

/// Build an RGBA color from a packed `0xRRGGBB` value
#[inline]
pub fn rgb(hex: u32) -> Vec4 {
    let r = ((hex >> 16) & 0xff) as f32 / 255.0;
    let g = ((hex >> 8) & 0xff) as f32 / 255.0;
    let b = (hex & 0xff) as f32 / 255.0;
    Vec4::new(r, g, b, 1.0)
}

/// Advance a sine phase, wrapping back to zero once it passes a full turn
#[inline]
pub fn advance_phase(phase: f32, delta: f32) -> f32 {
    let next = phase + delta;
    if next > std::f32::consts::TAU { 0.0 } else { next }
}
