//! Per-entity motion: the player ball, obstacle spin/slide, pulsation and the
//! follow camera.
//!
//! Each behavior is self-contained and only reads what it is handed. None of
//! them touch the level stream or the score.

use glam::{Vec2, Vec3, Vec4};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::catalog::ObstacleTemplate;
use super::state::ColorTag;
use crate::advance_phase;

/// The player's ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: ColorTag,
    /// Gravity is off until the first jump
    pub active: bool,
}

impl Player {
    /// Spawn a kinematic ball with a random color
    pub fn spawn<R: Rng + ?Sized>(spawn_y: f32, palette_len: usize, rng: &mut R) -> Self {
        let mut player = Self {
            pos: Vec2::new(0.0, spawn_y),
            vel: Vec2::ZERO,
            color: ColorTag(rng.random_range(0..palette_len) as u8),
            active: false,
        };
        player.switch_color(palette_len, rng);
        player
    }

    /// Overwrite vertical velocity with the jump impulse
    pub fn jump(&mut self, jump_force: f32) {
        if !self.active {
            self.active = true;
        }
        self.vel = Vec2::Y * jump_force;
    }

    /// Integrate gravity (no-op while kinematic)
    pub fn update(&mut self, gravity: f32, dt: f32) {
        if !self.active {
            self.vel = Vec2::ZERO;
            return;
        }
        self.vel.y -= gravity * dt;
        self.pos += self.vel * dt;
    }

    /// Pick a palette color different from the current one
    pub fn switch_color<R: Rng + ?Sized>(&mut self, palette_len: usize, rng: &mut R) {
        if palette_len < 2 {
            return;
        }
        // Draw from the other palette entries so no retry loop is needed
        let offset = rng.random_range(1..palette_len);
        let next = (self.color.index() + offset) % palette_len;
        self.color = ColorTag(next as u8);
    }
}

/// Spin and horizontal sine slide for an obstacle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleMotion {
    /// Current rotation (degrees)
    pub rotation: f32,
    pub spin_speed: f32,
    pub base_x: f32,
    pub x: f32,
    pub move_amount: f32,
    pub move_speed: f32,
    pub sine_phase: f32,
}

impl ObstacleMotion {
    pub fn from_template<R: Rng + ?Sized>(template: &ObstacleTemplate, rng: &mut R) -> Self {
        let rotation = if template.random_start_rotation {
            rng.random_range(-360.0..360.0)
        } else {
            0.0
        };
        Self {
            rotation,
            spin_speed: template.spin_speed,
            base_x: 0.0,
            x: 0.0,
            move_amount: template.move_amount,
            move_speed: template.move_speed,
            sine_phase: 0.0,
        }
    }

    pub fn update(&mut self, dt: f32) {
        if self.spin_speed != 0.0 {
            self.rotation = (self.rotation + self.spin_speed * dt) % 360.0;
        }
        if self.move_amount != 0.0 {
            self.sine_phase = advance_phase(self.sine_phase, dt * self.move_speed);
            self.x = self.base_x + self.sine_phase.sin() * self.move_amount;
        }
    }
}

/// Breathing scale effect
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Pulsate {
    pub phase: f32,
    /// Scale swing (fraction of base scale)
    pub amplitude: f32,
    /// Phase speed (radians per second)
    pub speed: f32,
}

impl Default for Pulsate {
    fn default() -> Self {
        Self {
            phase: 0.0,
            amplitude: 0.1,
            speed: 4.0,
        }
    }
}

impl Pulsate {
    pub fn update(&mut self, dt: f32) {
        self.phase = advance_phase(self.phase, dt * self.speed);
    }

    /// Current scale multiplier
    pub fn scale(&self) -> f32 {
        1.0 - self.phase.sin() * self.amplitude
    }
}

/// Camera that only ever moves up to follow the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    pub position: Vec3,
    pub start: Vec3,
    pub background: Vec4,
    velocity: f32,
}

impl Camera {
    pub fn new(start: Vec3, background: Vec4) -> Self {
        Self {
            position: start,
            start,
            background,
            velocity: 0.0,
        }
    }

    /// Snap back to the start position
    pub fn reset(&mut self) {
        self.position = self.start;
        self.velocity = 0.0;
    }

    /// Critically damped follow toward the player, upward only
    pub fn follow(&mut self, target_y: f32, smooth_time: f32, dt: f32) {
        let target = target_y + self.start.y;
        if target <= self.position.y {
            self.velocity = 0.0;
            return;
        }
        let (y, v) = smooth_damp(self.position.y, target, self.velocity, smooth_time, dt);
        self.position.y = y;
        self.velocity = v;
    }
}

/// Spring-damper step toward `target` (returns new value and velocity)
fn smooth_damp(current: f32, target: f32, velocity: f32, smooth_time: f32, dt: f32) -> (f32, f32) {
    let smooth_time = smooth_time.max(0.0001);
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let exp = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);
    let change = current - target;
    let temp = (velocity + omega * change) * dt;
    let new_velocity = (velocity - omega * temp) * exp;
    let mut output = target + (change + temp) * exp;
    // Don't overshoot
    if (target - current > 0.0) == (output > target) {
        output = target;
        return (output, 0.0);
    }
    (output, new_velocity)
}
