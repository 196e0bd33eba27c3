//! Parallax background layers.

use crate::core::constants::{BACKGROUND_LAYER_WIDTH, BACKGROUND_SPEED_MODIFIERS};

#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundLayer {
    /// Fraction of the game speed this layer scrolls at.
    pub speed_modifier: f64,
    pub x: f64,
    pub width: f64,
}

impl BackgroundLayer {
    pub fn new(speed_modifier: f64) -> Self {
        Self {
            speed_modifier,
            x: 0.0,
            width: BACKGROUND_LAYER_WIDTH,
        }
    }

    pub fn update(&mut self, game_speed: f64) {
        if self.x < -self.width {
            self.x = 0.0;
        } else {
            self.x -= game_speed * self.speed_modifier;
        }
    }
}

/// Far-to-near stack of layers.
#[derive(Debug, Clone, PartialEq)]
pub struct Background {
    pub layers: Vec<BackgroundLayer>,
}

impl Default for Background {
    fn default() -> Self {
        Self::new()
    }
}

impl Background {
    pub fn new() -> Self {
        Self {
            layers: BACKGROUND_SPEED_MODIFIERS
                .iter()
                .map(|&m| BackgroundLayer::new(m))
                .collect(),
        }
    }

    pub fn update(&mut self, game_speed: f64) {
        for layer in &mut self.layers {
            layer.update(game_speed);
        }
    }
}
