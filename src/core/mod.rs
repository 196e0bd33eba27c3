//! Difficulty table and world constants shared by the game and front ends.

pub mod constants;
pub mod difficulty;

pub use constants::*;
pub use difficulty::{Difficulty, DifficultyParams, SpawnWeights};
