//! Game state and core simulation types
//!
//! `GameState` owns everything a running game needs: the level stream, the
//! score controller, the player, camera, effects and the seeded RNG.

use std::collections::VecDeque;

use glam::{Vec2, Vec3};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::behaviors::{Camera, Player, Pulsate};
use super::effects::Effects;
use super::level::LevelStream;
use super::score::ScoreController;
use crate::settings::Settings;
use crate::stats::PersistentStats;
use crate::tuning::{Tuning, TuningError};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active run (also covers the short gap between death and the menu)
    Playing,
    /// Game over menu is showing
    GameOver,
}

/// Index into the player color palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorTag(pub u8);

impl ColorTag {
    pub fn index(self) -> usize {
        usize::from(self.0)
    }
}

/// Stream entity identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Monotonic id allocator
#[derive(Debug, Clone, Default)]
pub struct EntityIds {
    next: u32,
}

impl EntityIds {
    pub fn allocate(&mut self) -> EntityId {
        self.next += 1;
        EntityId(self.next)
    }
}

/// Something the player touched, as reported by the physics layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Contact {
    Obstacle { color: ColorTag },
    Star,
    ColorSwitcher,
}

/// Cues for the host (sound, particles, UI)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum GameEvent {
    RunStarted { run: u32 },
    Jump,
    StarCollected { height: f32, score: u32 },
    NewHighScore { score: u32 },
    BackgroundAdvanced { index: usize },
    ColorSwitched { color: ColorTag },
    PlayerLost { position: Vec2 },
    GameOverShown,
}

/// Numbers shown on the game over menu, frozen when it appears
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuSnapshot {
    pub score: u32,
    pub high_score: u32,
    pub total_stars: u32,
}

/// Complete game state
#[derive(Debug)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub tuning: Tuning,
    pub settings: Settings,
    /// Current phase
    pub phase: GamePhase,
    pub level: LevelStream,
    pub score: ScoreController,
    /// `None` once the ball has been destroyed
    pub player: Option<Player>,
    pub camera: Camera,
    pub effects: Effects,
    /// Menu numbers (set when the game over menu is revealed)
    pub menu: Option<MenuSnapshot>,
    /// "Tap to jump" hint shown until the first press of a run
    pub hint_visible: bool,
    pub hint_pulse: Pulsate,
    /// Height of the high score line
    pub high_score_marker: f32,
    /// Scale of the restart button (bumped while pressed)
    pub reset_button_scale: f32,
    /// Press started while the menu was showing
    pub(crate) menu_press_armed: bool,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Runs started since construction
    pub runs_started: u32,
    /// Undrained cues, oldest first, capped at `MAX_PENDING_EVENTS`
    events: VecDeque<GameEvent>,
}

impl GameState {
    /// Camera resting position at run start
    pub const CAMERA_START: Vec3 = Vec3::new(0.0, 0.0, -10.0);

    /// Cues kept for a host that does not drain; older ones are dropped
    pub const MAX_PENDING_EVENTS: usize = 1024;

    /// Create a game and start the first run
    pub fn new(
        tuning: Tuning,
        settings: Settings,
        stats: PersistentStats,
        seed: u64,
    ) -> Result<Self, TuningError> {
        let level = LevelStream::new(&tuning)?;
        let score = ScoreController::new(stats, &tuning);
        let camera = Camera::new(Self::CAMERA_START, score.background_color());

        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            settings,
            phase: GamePhase::Playing,
            level,
            score,
            player: None,
            camera,
            effects: Effects::default(),
            menu: None,
            hint_visible: false,
            hint_pulse: Pulsate::default(),
            high_score_marker: 0.0,
            reset_button_scale: 1.0,
            menu_press_armed: false,
            time_ticks: 0,
            runs_started: 0,
            events: VecDeque::new(),
        };

        state.start_new_run();

        Ok(state)
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        if self.events.len() == Self::MAX_PENDING_EVENTS {
            self.events.pop_front();
            log::trace!("Event queue full, dropped oldest cue");
        }
        self.events.push_back(event);
    }

    /// Take all cues raised since the last call.
    ///
    /// Hosts should call this once per frame; cues are not needed by the
    /// simulation itself, so an undrained queue only keeps the newest ones.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain(..).collect()
    }

    pub fn player_alive(&self) -> bool {
        self.player.is_some()
    }
}
