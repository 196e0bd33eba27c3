//! Enemy variants: flying, ground and climbing.

use super::types::Animation;
use crate::core::constants::{GAME_HEIGHT, GAME_WIDTH, GROUND_MARGIN, SPRITE_FPS};
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    /// Bobs along a sine wave in the upper half of the screen.
    Flying,
    /// Rooted to the ground; only moves with the scroll.
    Ground,
    /// Hangs from a web and crawls up and down.
    Climbing,
}

impl EnemyKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Flying => "flying",
            Self::Ground => "ground",
            Self::Climbing => "climbing",
        }
    }

    /// Sprite size in logical pixels.
    pub fn size(&self) -> (f64, f64) {
        match self {
            Self::Flying => (60.0, 44.0),
            Self::Ground => (60.0, 87.0),
            Self::Climbing => (120.0, 144.0),
        }
    }

    fn max_frame(&self) -> u32 {
        match self {
            Self::Flying => 5,
            Self::Ground => 1,
            Self::Climbing => 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Own leftward speed on top of the scroll.
    pub speed_x: f64,
    pub speed_y: f64,
    /// Sine phase, flying enemies only.
    pub angle: f64,
    pub angular_velocity: f64,
    pub animation: Animation,
    pub marked_for_deletion: bool,
}

impl Enemy {
    fn base(kind: EnemyKind, x: f64, y: f64) -> Self {
        let (width, height) = kind.size();
        Self {
            kind,
            x,
            y,
            width,
            height,
            speed_x: 0.0,
            speed_y: 0.0,
            angle: 0.0,
            angular_velocity: 0.0,
            animation: Animation::new(kind.max_frame(), SPRITE_FPS),
            marked_for_deletion: false,
        }
    }

    /// Enters somewhere in the half screen past the right edge, upper half.
    pub fn flying<R: Rng>(rng: &mut R) -> Self {
        let x = GAME_WIDTH + rng.gen::<f64>() * GAME_WIDTH * 0.5;
        let y = rng.gen::<f64>() * GAME_HEIGHT * 0.5;
        let mut enemy = Self::base(EnemyKind::Flying, x, y);
        enemy.speed_x = rng.gen::<f64>() + 1.0;
        enemy.angular_velocity = rng.gen::<f64>() * 0.1 + 0.1;
        enemy
    }

    pub fn ground() -> Self {
        let (_, height) = EnemyKind::Ground.size();
        Self::base(
            EnemyKind::Ground,
            GAME_WIDTH,
            GAME_HEIGHT - height - GROUND_MARGIN,
        )
    }

    pub fn climbing<R: Rng>(rng: &mut R) -> Self {
        let y = rng.gen::<f64>() * GAME_HEIGHT * 0.5;
        let mut enemy = Self::base(EnemyKind::Climbing, GAME_WIDTH, y);
        enemy.speed_y = if rng.gen::<f64>() > 0.5 { 1.0 } else { -1.0 };
        enemy
    }

    pub fn update(&mut self, dt_ms: f64, game_speed: f64) {
        self.x -= self.speed_x + game_speed;
        self.y += self.speed_y;
        self.animation.advance_looping(dt_ms);
        if self.x + self.width < 0.0 {
            self.marked_for_deletion = true;
        }

        match self.kind {
            EnemyKind::Flying => {
                self.angle += self.angular_velocity;
                self.y += self.angle.sin();
            }
            EnemyKind::Climbing => {
                if self.y > GAME_HEIGHT - self.height - GROUND_MARGIN {
                    self.speed_y *= -1.0;
                }
                if self.y < -self.height {
                    self.marked_for_deletion = true;
                }
            }
            EnemyKind::Ground => {}
        }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Where a climbing enemy's web meets its body (the web hangs from y = 0).
    pub fn web_anchor(&self) -> Option<(f64, f64)> {
        match self.kind {
            EnemyKind::Climbing => Some((self.x + self.width * 0.5, self.y + 50.0)),
            _ => None,
        }
    }
}
