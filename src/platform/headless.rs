//! Headless host: autopilot input plus a crossing-based contact detector
//!
//! Stands in for the engine so the simulation can run without a window. A
//! contact is reported when the ball's center crosses an entity's height
//! between two ticks. Obstacles are treated as rings split into one colored
//! segment per palette entry; the segment facing the ball decides the color.

use serde::Serialize;

use super::FixedTimestep;
use crate::sim::{Contact, ColorTag, GameEvent, GamePhase, GameState, Obstacle, TickInput, tick};

/// Half the vertical thickness of an obstacle ring
pub const OBSTACLE_HALF_HEIGHT: f32 = 3.0;

/// Totals gathered over a headless session
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionSummary {
    pub runs: u32,
    pub ticks: u64,
    pub stars: u32,
    pub best_score: u32,
    pub scores: Vec<u32>,
}

/// Drives a `GameState` with scripted input
#[derive(Debug)]
pub struct HeadlessHost {
    pub state: GameState,
    stepper: FixedTimestep,
    pending: Vec<Contact>,
    last_y: Option<f32>,
    menu_pressed: bool,
    summary: SessionSummary,
}

impl HeadlessHost {
    pub fn new(state: GameState) -> Self {
        Self {
            state,
            stepper: FixedTimestep::default(),
            pending: Vec::new(),
            last_y: None,
            menu_pressed: false,
            summary: SessionSummary::default(),
        }
    }

    /// Play until `runs` runs have ended or `max_seconds` of game time pass
    pub fn play(&mut self, runs: u32, max_seconds: f32) -> SessionSummary {
        let frame = 1.0 / 60.0;
        let mut elapsed = 0.0;
        while self.summary.runs < runs && elapsed < max_seconds {
            self.frame(frame);
            elapsed += frame;
        }
        if self.summary.runs < runs {
            log::info!("Stopped after {:.0}s of game time", elapsed);
        }
        self.summary.clone()
    }

    /// Advance one host frame
    pub fn frame(&mut self, frame_dt: f32) {
        let mut stepper = std::mem::take(&mut self.stepper);
        stepper.advance(frame_dt, |dt| self.step(dt));
        self.stepper = stepper;
    }

    fn step(&mut self, dt: f32) {
        let input = self.next_input();
        tick(&mut self.state, &input, dt);
        self.summary.ticks += 1;

        for event in self.state.drain_events() {
            match event {
                GameEvent::StarCollected { .. } => self.summary.stars += 1,
                GameEvent::GameOverShown => {
                    let score = self.state.menu.map(|m| m.score).unwrap_or(0);
                    self.summary.runs += 1;
                    self.summary.best_score = self.summary.best_score.max(score);
                    self.summary.scores.push(score);
                }
                GameEvent::RunStarted { .. } => self.last_y = None,
                _ => {}
            }
        }

        self.detect_contacts();
    }

    fn next_input(&mut self) -> TickInput {
        let contacts = std::mem::take(&mut self.pending);
        match self.state.phase {
            GamePhase::GameOver => {
                // Alternate press / release to restart
                self.menu_pressed = !self.menu_pressed;
                TickInput {
                    press_down: self.menu_pressed,
                    press_up: !self.menu_pressed,
                    contacts,
                }
            }
            GamePhase::Playing => {
                let press_down = self
                    .state
                    .player
                    .as_ref()
                    .is_some_and(|p| !p.active || p.vel.y <= 0.0);
                TickInput {
                    press_down,
                    press_up: false,
                    contacts,
                }
            }
        }
    }

    fn detect_contacts(&mut self) {
        let Some(player) = self.state.player.as_ref() else {
            self.last_y = None;
            return;
        };
        let y = player.pos.y;
        let Some(prev) = self.last_y.replace(y) else {
            return;
        };
        let crossed = |h: f32| (prev < h && y >= h) || (prev > h && y <= h);

        if let Some(star) = self.state.level.stars().front() {
            if crossed(star.height) {
                self.pending.push(Contact::Star);
            }
        }
        if let Some(switcher) = self.state.level.color_switchers().front() {
            if crossed(switcher.height) {
                self.pending.push(Contact::ColorSwitcher);
            }
        }

        let palette_len = self.state.tuning.player_colors.len();
        for obstacle in self.state.level.obstacles() {
            let lower = obstacle.height - OBSTACLE_HALF_HEIGHT;
            let upper = obstacle.height + OBSTACLE_HALF_HEIGHT;
            if crossed(lower) || crossed(upper) {
                self.pending.push(Contact::Obstacle {
                    color: facing_color(obstacle, palette_len),
                });
            }
        }
    }
}

/// Color of the ring segment currently at the bottom of an obstacle
pub fn facing_color(obstacle: &Obstacle, palette_len: usize) -> ColorTag {
    let palette_len = palette_len.max(1);
    let segment_angle = 360.0 / palette_len as f32;
    let segment = (obstacle.motion.rotation.rem_euclid(360.0) / segment_angle) as usize % palette_len;
    ColorTag(((obstacle.color.index() + segment) % palette_len) as u8)
}
