//! Run scoring, high score and background color progression

use glam::Vec4;
use serde::Serialize;

use crate::stats::PersistentStats;
use crate::tuning::Tuning;

/// Score state visible to the rest of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunState {
    pub current_score: u32,
    pub high_score: u32,
    pub total_stars_collected: u32,
    pub background_color_index: usize,
}

/// Result of one collected star
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreUpdate {
    pub score: u32,
    pub new_high_score: bool,
    /// Background color to transition to, when the score crossed a step
    pub background_target: Option<Vec4>,
}

/// Tracks the current run's score and the persisted stats
#[derive(Debug)]
pub struct ScoreController {
    stats: PersistentStats,
    current_score: u32,
    background_index: usize,
    background_colors: Vec<Vec4>,
    score_per_background: u32,
    spacing: f32,
}

impl ScoreController {
    pub fn new(stats: PersistentStats, tuning: &Tuning) -> Self {
        Self {
            stats,
            current_score: 0,
            background_index: 0,
            background_colors: tuning.background_colors.clone(),
            score_per_background: tuning.score_per_background.max(1),
            spacing: tuning.spacing,
        }
    }

    /// Count a star: bump score and lifetime total, raise the high score, and
    /// step the background every `score_per_background` points.
    pub fn on_star_collected(&mut self) -> ScoreUpdate {
        self.current_score += 1;
        self.stats.add_star();
        let new_high_score = self.stats.submit_score(self.current_score);
        if new_high_score {
            log::debug!("New high score: {}", self.current_score);
        }

        let mut background_target = None;
        if self.current_score % self.score_per_background == 0 {
            let last = self.background_colors.len().saturating_sub(1);
            if self.background_index < last {
                self.background_index += 1;
                background_target = Some(self.background_colors[self.background_index]);
                log::debug!("Background advanced to {}", self.background_index);
            }
        }

        ScoreUpdate {
            score: self.current_score,
            new_high_score,
            background_target,
        }
    }

    /// Start a new run; returns the color the background snaps to
    pub fn reset(&mut self) -> Vec4 {
        self.current_score = 0;
        self.background_index = 0;
        self.background_color()
    }

    /// Height of the star that would beat the high score
    pub fn high_score_marker_height(&self) -> f32 {
        self.stats.high_score() as f32 * self.spacing
    }

    pub fn current_score(&self) -> u32 {
        self.current_score
    }

    pub fn high_score(&self) -> u32 {
        self.stats.high_score()
    }

    pub fn total_stars(&self) -> u32 {
        self.stats.total_stars()
    }

    pub fn background_index(&self) -> usize {
        self.background_index
    }

    /// Palette entry for the current index
    pub fn background_color(&self) -> Vec4 {
        self.background_colors
            .get(self.background_index)
            .copied()
            .unwrap_or(Vec4::ZERO)
    }

    pub fn run_state(&self) -> RunState {
        RunState {
            current_score: self.current_score,
            high_score: self.stats.high_score(),
            total_stars_collected: self.stats.total_stars(),
            background_color_index: self.background_index,
        }
    }

    pub fn stats(&self) -> &PersistentStats {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut PersistentStats {
        &mut self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{KeyValueStore, MemoryStore};
    use crate::stats::{HIGH_SCORE_KEY, TOTAL_STARS_KEY};
    use proptest::prelude::*;

    fn controller(high: i64, total: i64) -> ScoreController {
        let mut store = MemoryStore::new();
        store.set_int(HIGH_SCORE_KEY, high);
        store.set_int(TOTAL_STARS_KEY, total);
        ScoreController::new(PersistentStats::load(Box::new(store)), &Tuning::default())
    }

    #[test]
    fn test_high_score_and_totals_persist() {
        let mut score = controller(3, 10);
        for _ in 0..4 {
            score.on_star_collected();
        }
        assert_eq!(score.current_score(), 4);
        assert_eq!(score.high_score(), 4);
        assert_eq!(score.total_stars(), 14);
        assert_eq!(score.stats().store().get_int(HIGH_SCORE_KEY, 0), 4);
        assert_eq!(score.stats().store().get_int(TOTAL_STARS_KEY, 0), 14);
        assert_eq!(
            score.run_state(),
            RunState {
                current_score: 4,
                high_score: 4,
                total_stars_collected: 14,
                background_color_index: 0,
            }
        );

        score.reset();
        assert_eq!(
            score.run_state(),
            RunState {
                current_score: 0,
                high_score: 4,
                total_stars_collected: 14,
                background_color_index: 0,
            }
        );
    }

    #[test]
    fn test_background_steps_once_at_five() {
        let mut score = controller(0, 0);
        let mut steps = 0;
        for i in 1..=5 {
            let update = score.on_star_collected();
            if update.background_target.is_some() {
                steps += 1;
                assert_eq!(i, 5);
            }
        }
        assert_eq!(steps, 1);
        assert_eq!(score.background_index(), 1);
    }

    #[test]
    fn test_background_index_clamped_to_palette() {
        let mut score = controller(0, 0);
        let palette_len = Tuning::default().background_colors.len();
        for _ in 0..(5 * palette_len + 20) {
            score.on_star_collected();
        }
        assert_eq!(score.background_index(), palette_len - 1);
        assert_eq!(score.background_color(), Tuning::default().background_colors[palette_len - 1]);
    }

    #[test]
    fn test_reset_keeps_totals() {
        let mut score = controller(0, 0);
        for _ in 0..7 {
            score.on_star_collected();
        }
        let snap = score.reset();
        assert_eq!(snap, Tuning::default().background_colors[0]);
        assert_eq!(score.current_score(), 0);
        assert_eq!(score.background_index(), 0);
        assert_eq!(score.high_score(), 7);
        assert_eq!(score.total_stars(), 7);
    }

    #[test]
    fn test_marker_height_uses_spacing() {
        let score = controller(6, 0);
        assert_eq!(score.high_score_marker_height(), 6.0 * 17.5);
    }

    proptest! {
        #[test]
        fn prop_totals_monotonic_and_high_score_is_max(runs in proptest::collection::vec(0u32..25, 0..8), start in 0i64..50) {
            let mut score = controller(0, start);
            let mut collected = 0u32;
            for &stars in &runs {
                score.reset();
                for _ in 0..stars {
                    let before = score.total_stars();
                    score.on_star_collected();
                    prop_assert_eq!(score.total_stars(), before + 1);
                }
                collected += stars;
            }
            prop_assert_eq!(i64::from(score.total_stars()), start + i64::from(collected));
            prop_assert_eq!(score.high_score(), runs.iter().copied().max().unwrap_or(0));
        }
    }
}
