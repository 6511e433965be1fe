//! Persistent player statistics
//!
//! High score and lifetime star count, written through to the key-value store
//! on every change.

use crate::persistence::KeyValueStore;

/// Store key for the best run score
pub const HIGH_SCORE_KEY: &str = "HighScore";
/// Store key for the lifetime star count
pub const TOTAL_STARS_KEY: &str = "TotalStars";

/// High score and total stars, backed by a key-value store
pub struct PersistentStats {
    store: Box<dyn KeyValueStore>,
    high_score: u32,
    total_stars: u32,
}

impl std::fmt::Debug for PersistentStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistentStats")
            .field("high_score", &self.high_score)
            .field("total_stars", &self.total_stars)
            .finish_non_exhaustive()
    }
}

impl PersistentStats {
    /// Load stats from `store`. Missing or invalid values read as 0.
    pub fn load(store: Box<dyn KeyValueStore>) -> Self {
        let high_score = read_count(store.as_ref(), HIGH_SCORE_KEY);
        let total_stars = read_count(store.as_ref(), TOTAL_STARS_KEY);
        log::info!(
            "Loaded stats: high score {}, total stars {}",
            high_score,
            total_stars
        );
        Self {
            store,
            high_score,
            total_stars,
        }
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn total_stars(&self) -> u32 {
        self.total_stars
    }

    /// Count one collected star and persist the new total
    pub fn add_star(&mut self) -> u32 {
        self.total_stars = self.total_stars.saturating_add(1);
        self.store
            .set_int(TOTAL_STARS_KEY, i64::from(self.total_stars));
        self.total_stars
    }

    /// Offer a run score; returns true if it set a new high score
    pub fn submit_score(&mut self, score: u32) -> bool {
        if score <= self.high_score {
            return false;
        }
        self.high_score = score;
        self.store.set_int(HIGH_SCORE_KEY, i64::from(score));
        true
    }

    /// Backing store
    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    pub fn store_mut(&mut self) -> &mut dyn KeyValueStore {
        self.store.as_mut()
    }
}

fn read_count(store: &dyn KeyValueStore, key: &str) -> u32 {
    let raw = store.get_int(key, 0);
    u32::try_from(raw).unwrap_or_else(|_| {
        log::warn!("Ignoring out-of-range {} value {}", key, raw);
        0
    })
}
