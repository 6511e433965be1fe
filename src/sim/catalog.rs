//! Obstacle catalog and difficulty tiers
//!
//! The catalog is ordered from easiest to hardest. Tiers are index ranges into
//! it: the easy tier is a low-index prefix, the hard tier a high-index suffix,
//! and the middle band of scores may draw from anywhere.

use std::ops::Range;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::tuning::{Tuning, TuningError};

/// Difficulty bucket chosen by score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    Easy,
    Any,
    Hard,
}

/// Shape family, only used by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ObstacleShape {
    #[default]
    Ring,
    Square,
    Cross,
    Bar,
    DoubleRing,
    Triangle,
}

/// Blueprint for one kind of obstacle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleTemplate {
    pub name: String,
    pub shape: ObstacleShape,
    /// Start at a random rotation in [-360, 360) degrees
    pub random_start_rotation: bool,
    /// Spin speed (degrees per second, 0 = static)
    pub spin_speed: f32,
    /// Horizontal sine amplitude (0 = no oscillation)
    pub move_amount: f32,
    /// Sine phase speed (radians per second)
    pub move_speed: f32,
}

impl Default for ObstacleTemplate {
    fn default() -> Self {
        Self {
            name: String::from("ring"),
            shape: ObstacleShape::Ring,
            random_start_rotation: true,
            spin_speed: 1.0,
            move_amount: 0.0,
            move_speed: 0.0,
        }
    }
}

impl ObstacleTemplate {
    fn new(name: &str, shape: ObstacleShape, spin_speed: f32) -> Self {
        Self {
            name: name.to_string(),
            shape,
            spin_speed,
            ..Default::default()
        }
    }

    fn oscillating(mut self, move_amount: f32, move_speed: f32) -> Self {
        self.move_amount = move_amount;
        self.move_speed = move_speed;
        self
    }

    /// Built-in catalog, easiest first
    pub fn default_catalog() -> Vec<ObstacleTemplate> {
        use ObstacleShape::*;
        vec![
            Self::new("slow ring", Ring, 60.0),
            Self::new("slow square", Square, 50.0),
            Self::new("ring", Ring, 90.0),
            Self::new("cross", Cross, 80.0),
            Self::new("sliding bar", Bar, 0.0).oscillating(3.0, 1.5),
            Self::new("fast ring", Ring, 150.0),
            Self::new("double ring", DoubleRing, 110.0),
            Self::new("triangle", Triangle, 130.0),
            Self::new("sliding cross", Cross, 120.0).oscillating(2.5, 2.0),
        ]
    }
}

/// Validated obstacle catalog with tier ranges
#[derive(Debug, Clone)]
pub struct ObstacleCatalog {
    templates: Vec<ObstacleTemplate>,
    easy_score_limit: u32,
    hard_score_limit: u32,
    easy_tier_end: usize,
    hard_tier_start: usize,
}

impl ObstacleCatalog {
    /// Build the catalog from tuning, rejecting catalogs too small for the tiers
    pub fn new(tuning: &Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self {
            templates: tuning.obstacles.clone(),
            easy_score_limit: tuning.easy_score_limit,
            hard_score_limit: tuning.hard_score_limit,
            easy_tier_end: tuning.easy_tier_end,
            hard_tier_start: tuning.hard_tier_start,
        })
    }

    /// Difficulty tier for a run score
    pub fn tier_for_score(&self, score: u32) -> Tier {
        if score < self.easy_score_limit {
            Tier::Easy
        } else if score < self.hard_score_limit {
            Tier::Any
        } else {
            Tier::Hard
        }
    }

    /// Catalog indices a tier may draw from
    pub fn tier_range(&self, tier: Tier) -> Range<usize> {
        match tier {
            Tier::Easy => 0..self.easy_tier_end,
            Tier::Any => 0..self.templates.len(),
            Tier::Hard => self.hard_tier_start..self.templates.len(),
        }
    }

    /// Pick a template for the given score, with its catalog index
    pub fn pick<R: Rng + ?Sized>(&self, score: u32, rng: &mut R) -> (Tier, usize, &ObstacleTemplate) {
        let tier = self.tier_for_score(score);
        let index = rng.random_range(self.tier_range(tier));
        (tier, index, &self.templates[index])
    }
}
