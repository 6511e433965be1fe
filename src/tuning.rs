//! Data-driven game balance
//!
//! Every constant the simulation reads lives in [`Tuning`]. Defaults mirror
//! `crate::consts`; a JSON document may override any subset of fields.

use glam::Vec4;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::rgb;
use crate::sim::catalog::ObstacleTemplate;

/// Invalid balance configuration
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("obstacle spacing must be positive, got {0}")]
    NonPositiveSpacing(f32),
    #[error("obstacle window must hold at least one obstacle")]
    EmptyWindow,
    #[error("color switcher chance must be within [0, 1], got {0}")]
    ChanceOutOfRange(f64),
    #[error("easy tier must contain at least one obstacle")]
    EmptyEasyTier,
    #[error("obstacle catalog has {len} entries, tiers need at least {required}")]
    CatalogTooSmall { len: usize, required: usize },
    #[error("easy score limit {easy} must not exceed hard score limit {hard}")]
    ScoreLimitsOutOfOrder { easy: u32, hard: u32 },
    #[error("score per background step must be positive")]
    ZeroScorePerBackground,
    #[error("player palette needs at least two colors, got {0}")]
    TooFewPlayerColors(usize),
    #[error("player palette holds at most {max} colors, got {len}")]
    TooManyPlayerColors { len: usize, max: usize },
    #[error("background palette is empty")]
    NoBackgroundColors,
    #[error("tuning JSON is invalid: {0}")]
    Json(#[from] serde_json::Error),
}

/// Color tags are a single byte
pub const MAX_PLAYER_COLORS: usize = u8::MAX as usize + 1;

/// Balance constants for a game
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Level stream ===
    pub spacing: f32,
    pub max_obstacles: usize,
    pub initial_obstacles: usize,
    pub color_switcher_chance: f64,

    // === Difficulty tiers ===
    pub easy_score_limit: u32,
    pub hard_score_limit: u32,
    pub easy_tier_end: usize,
    pub hard_tier_start: usize,

    // === Scoring / effects ===
    pub score_per_background: u32,
    pub background_lerp_duration: f32,
    pub camera_shake_duration: f32,
    pub game_over_delay: f32,

    // === Player ===
    pub player_spawn_y: f32,
    pub jump_force: f32,
    pub gravity: f32,
    pub camera_smooth_time: f32,

    // === Palettes / catalog ===
    pub player_colors: Vec<Vec4>,
    pub background_colors: Vec<Vec4>,
    pub obstacles: Vec<ObstacleTemplate>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            spacing: SPACE_BETWEEN_OBSTACLES,
            max_obstacles: MAX_OBSTACLES,
            initial_obstacles: INITIAL_OBSTACLES,
            color_switcher_chance: COLOR_SWITCHER_CHANCE,

            easy_score_limit: EASY_SCORE_LIMIT,
            hard_score_limit: HARD_SCORE_LIMIT,
            easy_tier_end: EASY_TIER_END,
            hard_tier_start: HARD_TIER_START,

            score_per_background: SCORE_PER_BACKGROUND,
            background_lerp_duration: BACKGROUND_LERP_DURATION,
            camera_shake_duration: CAMERA_SHAKE_DURATION,
            game_over_delay: GAME_OVER_DELAY,

            player_spawn_y: PLAYER_SPAWN_Y,
            jump_force: JUMP_FORCE,
            gravity: GRAVITY,
            camera_smooth_time: CAMERA_SMOOTH_TIME,

            // Cyan, magenta, yellow, purple
            player_colors: vec![rgb(0x35e2f2), rgb(0xf6217f), rgb(0xfae100), rgb(0x8c13fb)],
            background_colors: vec![
                rgb(0x272727),
                rgb(0x1d2b53),
                rgb(0x4b1d52),
                rgb(0x0f3d3e),
                rgb(0x5a1e1e),
                rgb(0x101010),
            ],
            obstacles: ObstacleTemplate::default_catalog(),
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON tuning document and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Smallest catalog the tier ranges can draw from
    pub fn required_catalog_len(&self) -> usize {
        self.easy_tier_end.max(self.hard_tier_start + 1)
    }

    /// Check the configuration is playable
    pub fn validate(&self) -> Result<(), TuningError> {
        if !(self.spacing > 0.0) {
            return Err(TuningError::NonPositiveSpacing(self.spacing));
        }
        if self.max_obstacles == 0 {
            return Err(TuningError::EmptyWindow);
        }
        if !(0.0..=1.0).contains(&self.color_switcher_chance) {
            return Err(TuningError::ChanceOutOfRange(self.color_switcher_chance));
        }
        if self.easy_tier_end == 0 {
            return Err(TuningError::EmptyEasyTier);
        }
        let required = self.required_catalog_len();
        if self.obstacles.len() < required {
            return Err(TuningError::CatalogTooSmall {
                len: self.obstacles.len(),
                required,
            });
        }
        if self.easy_score_limit > self.hard_score_limit {
            return Err(TuningError::ScoreLimitsOutOfOrder {
                easy: self.easy_score_limit,
                hard: self.hard_score_limit,
            });
        }
        if self.score_per_background == 0 {
            return Err(TuningError::ZeroScorePerBackground);
        }
        if self.player_colors.len() < 2 {
            return Err(TuningError::TooFewPlayerColors(self.player_colors.len()));
        }
        if self.player_colors.len() > MAX_PLAYER_COLORS {
            return Err(TuningError::TooManyPlayerColors {
                len: self.player_colors.len(),
                max: MAX_PLAYER_COLORS,
            });
        }
        if self.background_colors.is_empty() {
            return Err(TuningError::NoBackgroundColors);
        }
        Ok(())
    }
}
