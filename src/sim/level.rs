//! Level stream: the endless column of obstacles, stars and color switchers
//!
//! All three entity kinds are FIFO queues ordered by spawn height. New sets are
//! pushed at the back, contacts are resolved by popping the front. Because the
//! player only ever climbs, the front element is the only one it can touch.
//!
//! Only obstacles are windowed: once more than `max_obstacles` are alive, each
//! spawn destroys the single oldest. Stars and switchers leave the stream only
//! when collected or when the level is cleared.

use std::collections::VecDeque;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::behaviors::{ObstacleMotion, Pulsate};
use super::catalog::{ObstacleCatalog, Tier};
use super::state::{ColorTag, EntityId, EntityIds};
use crate::tuning::{Tuning, TuningError};

/// A colored obstacle the player must pass through
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: EntityId,
    pub height: f32,
    pub color: ColorTag,
    pub tier: Tier,
    /// Index into the obstacle catalog
    pub template: usize,
    pub motion: ObstacleMotion,
}

/// A collectible star in an obstacle's gap
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Star {
    pub id: EntityId,
    pub height: f32,
    pub pulse: Pulsate,
}

/// A pickup that recolors the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorSwitcher {
    pub id: EntityId,
    pub height: f32,
    pub pulse: Pulsate,
}

/// What one `spawn_next` call produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnedSet {
    pub obstacle: EntityId,
    pub star: EntityId,
    pub color_switcher: Option<EntityId>,
    /// Obstacle destroyed by the window, if any
    pub evicted: Option<EntityId>,
}

/// Owns the live stream entities and the spawn cursor
#[derive(Debug, Clone)]
pub struct LevelStream {
    catalog: ObstacleCatalog,
    spacing: f32,
    max_obstacles: usize,
    color_switcher_chance: f64,
    palette_len: usize,
    /// Height of the next spawn
    cursor: f32,
    ids: EntityIds,
    obstacles: VecDeque<Obstacle>,
    stars: VecDeque<Star>,
    color_switchers: VecDeque<ColorSwitcher>,
}

impl LevelStream {
    pub fn new(tuning: &Tuning) -> Result<Self, TuningError> {
        let catalog = ObstacleCatalog::new(tuning)?;
        Ok(Self {
            catalog,
            spacing: tuning.spacing,
            max_obstacles: tuning.max_obstacles,
            color_switcher_chance: tuning.color_switcher_chance,
            palette_len: tuning.player_colors.len(),
            cursor: 0.0,
            ids: EntityIds::default(),
            obstacles: VecDeque::with_capacity(tuning.max_obstacles + 1),
            stars: VecDeque::new(),
            color_switchers: VecDeque::new(),
        })
    }

    /// Clear everything, rewind the cursor and pre-populate `count` sets
    pub fn initialize<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) {
        self.clear();
        self.cursor = 0.0;
        for _ in 0..count {
            self.spawn_next(0, rng);
        }
        log::debug!("Level initialized with {} obstacles", self.obstacles.len());
    }

    /// Spawn one obstacle + star (and maybe a color switcher) at the cursor
    pub fn spawn_next<R: Rng + ?Sized>(&mut self, current_score: u32, rng: &mut R) -> SpawnedSet {
        let height = self.cursor;
        let (tier, template_index, template) = self.catalog.pick(current_score, rng);
        let motion = ObstacleMotion::from_template(template, rng);

        let obstacle = Obstacle {
            id: self.ids.allocate(),
            height,
            color: ColorTag(rng.random_range(0..self.palette_len) as u8),
            tier,
            template: template_index,
            motion,
        };
        let obstacle_id = obstacle.id;
        self.obstacles.push_back(obstacle);

        let star = Star {
            id: self.ids.allocate(),
            height,
            pulse: Pulsate::default(),
        };
        let star_id = star.id;
        self.stars.push_back(star);

        let color_switcher = if rng.random_bool(self.color_switcher_chance) {
            let switcher = ColorSwitcher {
                id: self.ids.allocate(),
                height: height + self.spacing / 2.0,
                pulse: Pulsate::default(),
            };
            let id = switcher.id;
            self.color_switchers.push_back(switcher);
            Some(id)
        } else {
            None
        };

        let evicted = self.evict_stale();
        self.cursor += self.spacing;

        log::debug!(
            "Spawned {:?} obstacle #{} at {:.1} (switcher: {})",
            tier,
            template_index,
            height,
            color_switcher.is_some()
        );

        SpawnedSet {
            obstacle: obstacle_id,
            star: star_id,
            color_switcher,
            evicted,
        }
    }

    /// Destroy the oldest obstacle if the window is over capacity
    pub fn evict_stale(&mut self) -> Option<EntityId> {
        if self.obstacles.len() <= self.max_obstacles {
            return None;
        }
        let oldest = self.obstacles.pop_front()?;
        log::debug!("Evicted obstacle {} at {:.1}", oldest.id.0, oldest.height);
        Some(oldest.id)
    }

    /// Pop the oldest star and extend the stream by one set.
    ///
    /// # Panics
    /// If no star is alive: the physics layer reported a star that the stream
    /// never spawned.
    pub fn collect_star<R: Rng + ?Sized>(&mut self, current_score: u32, rng: &mut R) -> Star {
        let Some(star) = self.stars.pop_front() else {
            panic!("star contact reported with no live stars (stream/physics desync)");
        };
        self.spawn_next(current_score, rng);
        star
    }

    /// Pop the oldest color switcher.
    ///
    /// # Panics
    /// If no switcher is alive.
    pub fn collect_color_switcher(&mut self) -> ColorSwitcher {
        let Some(switcher) = self.color_switchers.pop_front() else {
            panic!("color switcher contact reported with no live switchers (stream/physics desync)");
        };
        switcher
    }

    /// Destroy every entity
    pub fn clear(&mut self) {
        self.obstacles.clear();
        self.stars.clear();
        self.color_switchers.clear();
    }

    /// Advance obstacle motion and pickup pulsation
    pub fn update(&mut self, dt: f32) {
        for obstacle in &mut self.obstacles {
            obstacle.motion.update(dt);
        }
        for star in &mut self.stars {
            star.pulse.update(dt);
        }
        for switcher in &mut self.color_switchers {
            switcher.pulse.update(dt);
        }
    }

    pub fn obstacles(&self) -> &VecDeque<Obstacle> {
        &self.obstacles
    }

    pub fn stars(&self) -> &VecDeque<Star> {
        &self.stars
    }

    pub fn color_switchers(&self) -> &VecDeque<ColorSwitcher> {
        &self.color_switchers
    }

    /// Height the next set will spawn at
    pub fn next_spawn_height(&self) -> f32 {
        self.cursor
    }
}
