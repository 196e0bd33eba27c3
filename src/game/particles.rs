//! Decorative particles and collision explosions.

use super::types::Animation;
use crate::core::constants::{PARTICLE_MIN_SIZE, PARTICLE_SHRINK};
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParticleKind {
    /// Kicked up at the feet while running.
    Dust,
    /// Burst on landing from a dive; falls under its own gravity.
    Splash { gravity: f64 },
    /// Trail behind a roll or dive; wobbles sideways.
    Fire { angle: f64, angular_velocity: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub kind: ParticleKind,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub speed_x: f64,
    pub speed_y: f64,
    pub marked_for_deletion: bool,
}

impl Particle {
    pub fn dust<R: Rng>(rng: &mut R, x: f64, y: f64) -> Self {
        Self {
            kind: ParticleKind::Dust,
            x,
            y,
            size: rng.gen::<f64>() * 10.0 + 10.0,
            speed_x: rng.gen::<f64>(),
            speed_y: rng.gen::<f64>(),
            marked_for_deletion: false,
        }
    }

    pub fn splash<R: Rng>(rng: &mut R, x: f64, y: f64) -> Self {
        let size = rng.gen::<f64>() * 100.0 + 100.0;
        Self {
            kind: ParticleKind::Splash { gravity: 0.0 },
            x: x - size * 0.4,
            y: y - size * 0.5,
            size,
            speed_x: rng.gen::<f64>() * 6.0 - 4.0,
            speed_y: rng.gen::<f64>() * 2.0 + 2.0,
            marked_for_deletion: false,
        }
    }

    pub fn fire<R: Rng>(rng: &mut R, x: f64, y: f64) -> Self {
        Self {
            kind: ParticleKind::Fire {
                angle: 0.0,
                angular_velocity: rng.gen::<f64>() * 0.2 - 0.1,
            },
            x,
            y,
            size: rng.gen::<f64>() * 100.0 + 50.0,
            speed_x: 1.0,
            speed_y: 1.0,
            marked_for_deletion: false,
        }
    }

    pub fn update(&mut self, game_speed: f64) {
        self.x -= self.speed_x + game_speed;
        self.y -= self.speed_y;
        self.size *= PARTICLE_SHRINK;
        if self.size < PARTICLE_MIN_SIZE {
            self.marked_for_deletion = true;
        }

        match &mut self.kind {
            ParticleKind::Dust => {}
            ParticleKind::Splash { gravity } => {
                *gravity += 0.1;
                self.y += *gravity;
            }
            ParticleKind::Fire {
                angle,
                angular_velocity,
            } => {
                *angle += *angular_velocity;
                self.x += (*angle * 5.0).sin();
            }
        }
    }
}

/// Explosion left behind when the player touches an enemy.
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionEffect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub animation: Animation,
    pub marked_for_deletion: bool,
}

impl CollisionEffect {
    const SPRITE_WIDTH: f64 = 100.0;
    const SPRITE_HEIGHT: f64 = 90.0;
    const MAX_FRAME: u32 = 4;

    /// Centered on (`x`, `y`) with a random scale and frame rate.
    pub fn new<R: Rng>(rng: &mut R, x: f64, y: f64) -> Self {
        let size_modifier = rng.gen::<f64>() + 0.5;
        let width = Self::SPRITE_WIDTH * size_modifier;
        let height = Self::SPRITE_HEIGHT * size_modifier;
        let fps = rng.gen::<f64>() * 10.0 + 5.0;
        Self {
            x: x - width * 0.5,
            y: y - height * 0.5,
            width,
            height,
            animation: Animation::new(Self::MAX_FRAME, fps),
            marked_for_deletion: false,
        }
    }

    pub fn update(&mut self, dt_ms: f64, game_speed: f64) {
        self.x -= game_speed;
        if self.animation.advance_once(dt_ms) {
            self.marked_for_deletion = true;
        }
    }
}
