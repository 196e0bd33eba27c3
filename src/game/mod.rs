//! The side-scroller simulation: game state, player, enemies and effects.
//!
//! Everything here is UI-agnostic. Front ends feed key state through
//! [`logic::process_input`] and wall-clock time through [`logic::tick`], then
//! read the public fields to draw.

pub mod background;
pub mod enemies;
pub mod logic;
pub mod particles;
pub mod player;
pub mod types;

pub use background::{Background, BackgroundLayer};
pub use enemies::{Enemy, EnemyKind};
pub use logic::{add_enemy, process_input, tick, update};
pub use particles::{CollisionEffect, Particle, ParticleKind};
pub use player::{Player, PlayerState};
pub use types::{Animation, Game, GameEvent, GameOutcome};
