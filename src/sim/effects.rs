//! Short-lived timed effects
//!
//! Each effect is a small task with its own clock, advanced once per tick.
//! At most one instance of each kind is alive; triggering a kind again
//! replaces the running instance.

use glam::{Vec3, Vec4};
use rand::Rng;

/// Background color interpolation
#[derive(Debug, Clone, Copy)]
pub struct ColorLerp {
    pub from: Vec4,
    pub to: Vec4,
    pub elapsed: f32,
    pub duration: f32,
}

impl ColorLerp {
    pub fn new(from: Vec4, to: Vec4, duration: f32) -> Self {
        Self {
            from,
            to,
            elapsed: 0.0,
            duration,
        }
    }

    /// Advance and return the current color
    pub fn advance(&mut self, dt: f32) -> Vec4 {
        self.elapsed += dt;
        self.color()
    }

    pub fn color(&self) -> Vec4 {
        if self.finished() || self.duration <= 0.0 {
            return self.to;
        }
        let t = (self.elapsed / self.duration).clamp(0.0, 1.0);
        self.from.lerp(self.to, t)
    }

    pub fn finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Camera jitter that decays linearly to nothing
#[derive(Debug, Clone, Copy)]
pub struct CameraShake {
    /// Camera position when the shake started
    pub origin: Vec3,
    pub remaining: f32,
}

impl CameraShake {
    pub fn new(origin: Vec3, duration: f32) -> Self {
        Self {
            origin,
            remaining: duration,
        }
    }

    /// Advance and return the camera position for this tick
    pub fn advance<R: Rng + ?Sized>(&mut self, dt: f32, rng: &mut R) -> Vec3 {
        self.remaining -= dt;
        if self.finished() {
            return self.origin;
        }
        self.origin + random_in_unit_sphere(rng) * self.remaining
    }

    pub fn finished(&self) -> bool {
        self.remaining <= 0.0
    }
}

/// One-shot countdown
#[derive(Debug, Clone, Copy)]
pub struct DelayedReveal {
    pub remaining: f32,
}

impl DelayedReveal {
    pub fn new(delay: f32) -> Self {
        Self { remaining: delay }
    }

    /// Advance; returns true on the tick the delay runs out
    pub fn advance(&mut self, dt: f32) -> bool {
        self.remaining -= dt;
        self.remaining <= 0.0
    }
}

/// The live effect slots
#[derive(Debug, Clone, Default)]
pub struct Effects {
    pub background: Option<ColorLerp>,
    pub shake: Option<CameraShake>,
    pub reveal: Option<DelayedReveal>,
}

impl Effects {
    pub fn start_background(&mut self, from: Vec4, to: Vec4, duration: f32) {
        if self.background.is_some() {
            log::debug!("Replacing running background transition");
        }
        self.background = Some(ColorLerp::new(from, to, duration));
    }

    pub fn start_shake(&mut self, origin: Vec3, duration: f32) {
        // Keep the original resting position if a shake is already displacing the camera
        let origin = self.shake.map(|s| s.origin).unwrap_or(origin);
        self.shake = Some(CameraShake::new(origin, duration));
    }

    pub fn schedule_reveal(&mut self, delay: f32) {
        self.reveal = Some(DelayedReveal::new(delay));
    }

    /// Drop the cosmetic effects (the reveal is never cancelled)
    pub fn cancel_cosmetic(&mut self) {
        self.background = None;
        self.shake = None;
    }

    pub fn is_idle(&self) -> bool {
        self.background.is_none() && self.shake.is_none() && self.reveal.is_none()
    }
}

fn random_in_unit_sphere<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    loop {
        let p = Vec3::new(
            rng.random_range(-1.0..=1.0),
            rng.random_range(-1.0..=1.0),
            rng.random_range(-1.0..=1.0),
        );
        if p.length_squared() <= 1.0 {
            return p;
        }
    }
}
