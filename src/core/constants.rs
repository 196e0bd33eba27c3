// Frame timing
/// Fixed simulation step (~60 FPS). Movement constants are per frame.
pub const FRAME_MS: u64 = 16;
/// Largest wall-clock gap fed into the simulation after a stall.
pub const MAX_FRAME_DELTA_MS: u64 = 100;
/// Sprite animation rate shared by the player and enemies.
pub const SPRITE_FPS: f64 = 20.0;

// World dimensions (logical pixels, scaled onto the terminal when drawn)
pub const GAME_WIDTH: f64 = 900.0;
pub const GAME_HEIGHT: f64 = 500.0;
pub const GROUND_MARGIN: f64 = 80.0;

// Player
pub const PLAYER_WIDTH: f64 = 100.0;
pub const PLAYER_HEIGHT: f64 = 91.3;
pub const PLAYER_WEIGHT: f64 = 1.0;
pub const PLAYER_MAX_SPEED: f64 = 10.0;
pub const JUMP_IMPULSE: f64 = 27.0;
pub const DIVE_VELOCITY: f64 = 15.0;
/// Score lost when an enemy hits the player outside a roll or dive.
pub const HIT_SCORE_PENALTY: i32 = 5;
pub const SPLASH_PARTICLE_COUNT: usize = 30;

// Effects
pub const MAX_PARTICLES: usize = 200;
pub const PARTICLE_SHRINK: f64 = 0.95;
pub const PARTICLE_MIN_SIZE: f64 = 0.5;

// Background
pub const BACKGROUND_LAYER_WIDTH: f64 = 1667.0;
pub const BACKGROUND_SPEED_MODIFIERS: [f64; 5] = [0.0, 0.2, 0.4, 0.8, 1.0];

// High scores
pub const HIGH_SCORES_PER_DIFFICULTY: usize = 10;

// Input
/// How long a key counts as held when the terminal never reports releases.
pub const DEFAULT_KEY_HOLD_MS: u64 = 550;
/// Keys on the game-over overlay are ignored until none has arrived for
/// this long, so a key held through the end of a game cannot restart it.
pub const GAME_OVER_GRACE_MS: u64 = 600;
