//! Game state shared by the simulation and the renderers.

use super::background::Background;
use super::enemies::{Enemy, EnemyKind};
use super::particles::{CollisionEffect, Particle};
use super::player::Player;
use crate::audio::Sfx;
use crate::core::constants::*;
use crate::core::difficulty::{Difficulty, SpawnWeights};
use crate::input::InputHandler;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameOutcome {
    /// Time ran out with the score above the winning score.
    Win,
    /// Out of lives, or time ran out short of the winning score.
    Loss,
    /// Player quit with Esc, Esc.
    Forfeit,
}

impl GameOutcome {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Win => "win",
            Self::Loss => "loss",
            Self::Forfeit => "forfeit",
        }
    }
}

/// Things that happened during a tick, for front ends and the simulator.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    EnemySpawned { kind: EnemyKind },
    /// Rolled or dived through an enemy.
    EnemyDestroyed { kind: EnemyKind, score: i32 },
    /// Ran into an enemy outside a roll or dive.
    PlayerHit { kind: EnemyKind, lives_left: u32 },
    TimeUp,
    GameOver { outcome: GameOutcome, score: i32 },
}

/// Sprite frame counter advanced by elapsed milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Animation {
    pub frame: u32,
    pub max_frame: u32,
    pub timer_ms: f64,
    pub interval_ms: f64,
}

impl Animation {
    pub fn new(max_frame: u32, fps: f64) -> Self {
        Self {
            frame: 0,
            max_frame,
            timer_ms: 0.0,
            interval_ms: 1000.0 / fps,
        }
    }

    /// Restart from frame 0 with a new frame count.
    pub fn reset(&mut self, max_frame: u32) {
        self.frame = 0;
        self.max_frame = max_frame;
    }

    /// Advance and wrap back to frame 0 after the last frame.
    pub fn advance_looping(&mut self, dt_ms: f64) {
        if self.timer_ms > self.interval_ms {
            self.timer_ms = 0.0;
            if self.frame < self.max_frame {
                self.frame += 1;
            } else {
                self.frame = 0;
            }
        } else {
            self.timer_ms += dt_ms;
        }
    }

    /// Advance without wrapping. Returns true once past the last frame.
    pub fn advance_once(&mut self, dt_ms: f64) -> bool {
        if self.timer_ms > self.interval_ms {
            self.frame += 1;
            self.timer_ms = 0.0;
        } else {
            self.timer_ms += dt_ms;
        }
        self.frame > self.max_frame
    }
}

/// Main game state.
#[derive(Debug, Clone)]
pub struct Game {
    pub difficulty: Difficulty,
    pub width: f64,
    pub height: f64,
    pub ground_margin: f64,

    // -- Scrolling --
    /// Current scroll speed in px/frame, set by the player's state.
    pub speed: f64,
    pub max_speed: f64,

    // -- Owned entities --
    pub background: Background,
    pub player: Player,
    pub input: InputHandler,
    pub enemies: Vec<Enemy>,
    /// Newest first. Capped at `max_particles` each frame.
    pub particles: VecDeque<Particle>,
    pub collisions: Vec<CollisionEffect>,
    pub audio: Sfx,

    // -- Spawning --
    pub enemy_timer: f64,
    pub enemy_interval: f64,
    pub spawn: SpawnWeights,
    pub max_particles: usize,

    // -- Scoring and limits --
    pub score: i32,
    pub winning_score: i32,
    /// Elapsed game time in milliseconds.
    pub time: f64,
    pub max_time: f64,
    pub lives: u32,
    pub starting_lives: u32,
    pub game_over: bool,
    pub outcome: Option<GameOutcome>,
    pub forfeit_pending: bool,
    pub debug: bool,

    // -- Stats --
    pub enemies_destroyed: u32,
    pub hits_taken: u32,

    // -- Timing --
    /// Sub-frame time accumulator (milliseconds).
    pub accumulated_time_ms: u64,
    /// Total simulated frames.
    pub frame_count: u64,

    pub(crate) events: Vec<GameEvent>,
}

impl Game {
    /// Create a new game with the given difficulty. The player starts sitting
    /// and the world does not scroll until the player starts running.
    pub fn new(difficulty: Difficulty) -> Self {
        let mut game = Self {
            difficulty,
            width: GAME_WIDTH,
            height: GAME_HEIGHT,
            ground_margin: GROUND_MARGIN,

            speed: 0.0,
            max_speed: 3.0,

            background: Background::new(),
            player: Player::new(),
            input: InputHandler::default(),
            enemies: Vec::new(),
            particles: VecDeque::new(),
            collisions: Vec::new(),
            audio: Sfx::default(),

            enemy_timer: 0.0,
            enemy_interval: 1000.0,
            spawn: difficulty.params().spawn,
            max_particles: MAX_PARTICLES,

            score: 0,
            winning_score: 50,
            time: 0.0,
            max_time: 35_000.0,
            lives: 5,
            starting_lives: 5,
            game_over: false,
            outcome: None,
            forfeit_pending: false,
            debug: false,

            enemies_destroyed: 0,
            hits_taken: 0,

            accumulated_time_ms: 0,
            frame_count: 0,

            events: Vec::new(),
        };
        game.apply_difficulty();
        game
    }

    /// Builder-style hooks for front ends.
    pub fn with_input(mut self, input: InputHandler) -> Self {
        self.input = input;
        self
    }

    pub fn with_audio(mut self, audio: Sfx) -> Self {
        self.audio = audio;
        self
    }

    fn apply_difficulty(&mut self) {
        let params = self.difficulty.params();
        self.max_speed = params.max_speed;
        self.enemy_interval = params.enemy_interval_ms;
        self.lives = params.lives;
        self.starting_lives = params.lives;
        self.winning_score = params.winning_score;
        self.max_time = params.time_limit_ms;
        self.spawn = params.spawn;
    }

    /// Y coordinate of the ground line.
    pub fn ground_line(&self) -> f64 {
        self.height - self.ground_margin
    }

    /// Milliseconds left on the clock.
    pub fn time_left(&self) -> f64 {
        (self.max_time - self.time).max(0.0)
    }

    pub fn is_running(&self) -> bool {
        !self.game_over
    }

    pub fn count_enemies(&self, kind: EnemyKind) -> usize {
        self.enemies.iter().filter(|e| e.kind == kind).count()
    }
}
