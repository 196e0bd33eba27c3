//! The player character and its animation-state machine.
//!
//! Each state decides, from the held keys, which state comes next and what
//! the scroll speed becomes. State changes go through [`set_state`], which
//! sets `game.speed` as a multiple of the difficulty's max speed.

use super::particles::{CollisionEffect, Particle};
use super::types::{Animation, Game, GameEvent};
use crate::core::constants::*;
use crate::input::Key;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerState {
    Sitting,
    Running,
    Jumping,
    Falling,
    Rolling,
    Diving,
    Hit,
}

impl PlayerState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sitting => "SITTING",
            Self::Running => "RUNNING",
            Self::Jumping => "JUMPING",
            Self::Falling => "FALLING",
            Self::Rolling => "ROLLING",
            Self::Diving => "DIVING",
            Self::Hit => "HIT",
        }
    }

    /// Index of the last sprite frame for this state.
    pub fn max_frame(&self) -> u32 {
        match self {
            Self::Sitting => 4,
            Self::Running => 8,
            Self::Jumping | Self::Falling | Self::Rolling | Self::Diving => 6,
            Self::Hit => 10,
        }
    }

    /// Enemies touched in these states are destroyed instead of hurting.
    pub fn is_attacking(&self) -> bool {
        matches!(self, Self::Rolling | Self::Diving)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Vertical velocity, negative is up.
    pub vy: f64,
    pub weight: f64,
    /// Horizontal velocity from Left/Right.
    pub speed: f64,
    pub max_speed: f64,
    pub state: PlayerState,
    pub animation: Animation,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    /// A sitting player at the left edge, standing on the ground.
    pub fn new() -> Self {
        let mut player = Self {
            x: 0.0,
            y: Self::ground_y(),
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            vy: 0.0,
            weight: PLAYER_WEIGHT,
            speed: 0.0,
            max_speed: PLAYER_MAX_SPEED,
            state: PlayerState::Sitting,
            animation: Animation::new(PlayerState::Sitting.max_frame(), SPRITE_FPS),
        };
        player.enter(PlayerState::Sitting);
        player
    }

    /// Top edge of the player when standing on the ground.
    pub fn ground_y() -> f64 {
        GAME_HEIGHT - PLAYER_HEIGHT - GROUND_MARGIN
    }

    pub fn on_ground(&self) -> bool {
        self.y >= Self::ground_y()
    }

    /// Switch state and run its entry action. Does not touch the scroll speed.
    pub fn enter(&mut self, state: PlayerState) {
        self.state = state;
        self.animation.reset(state.max_frame());
        match state {
            PlayerState::Jumping => {
                if self.on_ground() {
                    self.vy -= JUMP_IMPULSE;
                }
            }
            PlayerState::Diving => self.vy = DIVE_VELOCITY,
            _ => {}
        }
    }

    /// Axis-aligned box overlap.
    pub fn overlaps(&self, x: f64, y: f64, width: f64, height: f64) -> bool {
        x < self.x + self.width
            && x + width > self.x
            && y < self.y + self.height
            && y + height > self.y
    }
}

/// Change state and set the scroll speed to `max_speed * speed_multiplier`.
pub fn set_state(game: &mut Game, state: PlayerState, speed_multiplier: f64) {
    game.speed = game.max_speed * speed_multiplier;
    game.player.enter(state);
}

/// Advance the player by one frame.
pub fn update<R: Rng>(game: &mut Game, dt_ms: f64, rng: &mut R) {
    check_collision(game, rng);
    handle_input(game, rng);

    let right = game.input.is_down(Key::ArrowRight);
    let left = game.input.is_down(Key::ArrowLeft);
    let screen_width = game.width;
    let player = &mut game.player;

    // Horizontal
    player.x += player.speed;
    if right && player.state != PlayerState::Hit {
        player.speed = player.max_speed;
    } else if left {
        player.speed = -player.max_speed;
    } else {
        player.speed = 0.0;
    }
    if player.x < 0.0 {
        player.x = 0.0;
    }
    if player.x > screen_width - player.width {
        player.x = screen_width - player.width;
    }

    // Vertical
    player.y += player.vy;
    if !player.on_ground() {
        player.vy += player.weight;
    } else {
        player.vy = 0.0;
    }
    if player.y > Player::ground_y() {
        player.y = Player::ground_y();
    }

    player.animation.advance_looping(dt_ms);
}

/// Resolve overlaps with enemies: destroy them while rolling or diving,
/// otherwise take a hit.
fn check_collision<R: Rng>(game: &mut Game, rng: &mut R) {
    let player = &game.player;
    let mut hits = Vec::new();
    for enemy in &mut game.enemies {
        if enemy.marked_for_deletion
            || !player.overlaps(enemy.x, enemy.y, enemy.width, enemy.height)
        {
            continue;
        }
        enemy.marked_for_deletion = true;
        hits.push((enemy.kind, enemy.center()));
    }

    for (kind, (cx, cy)) in hits {
        game.collisions.push(CollisionEffect::new(rng, cx, cy));
        game.audio.play_boom();

        if game.player.state.is_attacking() {
            game.score += 1;
            game.enemies_destroyed += 1;
            game.events.push(GameEvent::EnemyDestroyed {
                kind,
                score: game.score,
            });
        } else {
            set_state(game, PlayerState::Hit, 0.0);
            game.score -= HIT_SCORE_PENALTY;
            game.lives = game.lives.saturating_sub(1);
            game.hits_taken += 1;
            log::debug!(
                "player hit by {} enemy, {} lives left",
                kind.name(),
                game.lives
            );
            game.events.push(GameEvent::PlayerHit {
                kind,
                lives_left: game.lives,
            });
            if game.lives == 0 {
                game.game_over = true;
            }
        }
    }
}

/// Per-state transitions driven by the held keys.
fn handle_input<R: Rng>(game: &mut Game, rng: &mut R) {
    let down = game.input.is_down(Key::ArrowDown);
    let up = game.input.is_down(Key::ArrowUp);
    let left = game.input.is_down(Key::ArrowLeft);
    let right = game.input.is_down(Key::ArrowRight);
    let enter = game.input.is_down(Key::Enter);
    let on_ground = game.player.on_ground();

    match game.player.state {
        PlayerState::Sitting => {
            if left || right {
                set_state(game, PlayerState::Running, 1.0);
            } else if enter {
                set_state(game, PlayerState::Rolling, 2.0);
            }
        }
        PlayerState::Running => {
            let p = &game.player;
            let dust = Particle::dust(rng, p.x + p.width * 0.6, p.y + p.height);
            game.particles.push_front(dust);
            if down {
                set_state(game, PlayerState::Sitting, 0.0);
            } else if up {
                set_state(game, PlayerState::Jumping, 1.0);
            } else if enter {
                set_state(game, PlayerState::Rolling, 2.0);
            }
        }
        PlayerState::Jumping => {
            if game.player.vy > game.player.weight {
                set_state(game, PlayerState::Falling, 1.0);
            } else if enter {
                set_state(game, PlayerState::Rolling, 2.0);
            } else if down {
                set_state(game, PlayerState::Diving, 0.0);
            }
        }
        PlayerState::Falling => {
            if on_ground {
                set_state(game, PlayerState::Running, 1.0);
            } else if down {
                set_state(game, PlayerState::Diving, 0.0);
            }
        }
        PlayerState::Rolling => {
            push_fire(game, rng);
            if !enter && on_ground {
                set_state(game, PlayerState::Running, 1.0);
            } else if !enter && !on_ground {
                set_state(game, PlayerState::Falling, 1.0);
            } else if enter && up && on_ground {
                game.player.vy -= JUMP_IMPULSE;
            } else if down && !on_ground {
                set_state(game, PlayerState::Diving, 0.0);
            }
        }
        PlayerState::Diving => {
            push_fire(game, rng);
            if on_ground {
                set_state(game, PlayerState::Running, 1.0);
                let p = &game.player;
                let (x, y) = (p.x + p.width * 0.5, p.y + p.height);
                for _ in 0..SPLASH_PARTICLE_COUNT {
                    game.particles.push_front(Particle::splash(rng, x, y));
                }
            }
        }
        PlayerState::Hit => {
            let finished = game.player.animation.frame >= PlayerState::Hit.max_frame();
            if finished && on_ground {
                set_state(game, PlayerState::Running, 1.0);
            } else if finished {
                set_state(game, PlayerState::Falling, 1.0);
            }
        }
    }
}

fn push_fire<R: Rng>(game: &mut Game, rng: &mut R) {
    let p = &game.player;
    let fire = Particle::fire(rng, p.x + p.width * 0.5, p.y + p.height * 0.5);
    game.particles.push_front(fire);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::difficulty::Difficulty;
    use crate::game::enemies::Enemy;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(1234)
    }

    fn game_with_keys(keys: &[Key]) -> Game {
        let mut game = Game::new(Difficulty::Easy);
        for &key in keys {
            game.input.key_down(key, 0);
        }
        game
    }

    /// Put a ground enemy right on top of the player.
    fn enemy_on_player(game: &mut Game) {
        let mut enemy = Enemy::ground();
        enemy.x = game.player.x + 10.0;
        game.enemies.push(enemy);
    }

    #[test]
    fn test_new_player_sits_on_ground() {
        let player = Player::new();
        assert_eq!(player.state, PlayerState::Sitting);
        assert!(player.on_ground());
        assert_eq!(player.x, 0.0);
        assert!((player.y - (500.0 - 91.3 - 80.0)).abs() < 1e-9);
        assert_eq!(player.animation.max_frame, 4);
    }

    #[test]
    fn test_sitting_starts_running_on_arrow() {
        let mut game = game_with_keys(&[Key::ArrowRight]);
        let mut rng = rng();
        update(&mut game, 16.0, &mut rng);
        assert_eq!(game.player.state, PlayerState::Running);
        assert!((game.speed - game.max_speed).abs() < f64::EPSILON);
    }

    #[test]
    fn test_sitting_rolls_on_enter_at_double_speed() {
        let mut game = game_with_keys(&[Key::Enter]);
        let mut rng = rng();
        update(&mut game, 16.0, &mut rng);
        assert_eq!(game.player.state, PlayerState::Rolling);
        assert!((game.speed - game.max_speed * 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_running_emits_dust_and_sits_on_down() {
        let mut game = Game::new(Difficulty::Easy);
        set_state(&mut game, PlayerState::Running, 1.0);
        game.input.key_down(Key::ArrowDown, 0);
        let mut rng = rng();
        update(&mut game, 16.0, &mut rng);

        assert_eq!(game.particles.len(), 1);
        assert_eq!(game.player.state, PlayerState::Sitting);
        assert_eq!(game.speed, 0.0);
    }

    #[test]
    fn test_jump_sets_upward_velocity_then_falls() {
        let mut game = Game::new(Difficulty::Easy);
        set_state(&mut game, PlayerState::Running, 1.0);
        game.input.key_down(Key::ArrowUp, 0);
        let mut rng = rng();

        update(&mut game, 16.0, &mut rng);
        assert_eq!(game.player.state, PlayerState::Jumping);
        assert!(!game.player.on_ground());

        game.input.key_up(Key::ArrowUp);
        let mut frames = 0;
        while game.player.state == PlayerState::Jumping {
            update(&mut game, 16.0, &mut rng);
            frames += 1;
            assert!(frames < 100);
        }
        assert_eq!(game.player.state, PlayerState::Falling);

        while game.player.state == PlayerState::Falling {
            update(&mut game, 16.0, &mut rng);
            frames += 1;
            assert!(frames < 200);
        }
        assert_eq!(game.player.state, PlayerState::Running);
        assert!(game.player.on_ground());
    }

    #[test]
    fn test_jump_from_air_adds_no_impulse() {
        let mut player = Player::new();
        player.y = 100.0;
        player.vy = 3.0;
        player.enter(PlayerState::Jumping);
        assert_eq!(player.vy, 3.0);
    }

    #[test]
    fn test_dive_sets_fixed_velocity_and_splashes_on_landing() {
        let mut game = Game::new(Difficulty::Easy);
        game.player.y = Player::ground_y() - 40.0;
        set_state(&mut game, PlayerState::Diving, 0.0);
        assert_eq!(game.player.vy, DIVE_VELOCITY);

        let mut rng = rng();
        let mut frames = 0;
        while game.player.state == PlayerState::Diving {
            update(&mut game, 16.0, &mut rng);
            frames += 1;
            assert!(frames < 50);
        }
        assert_eq!(game.player.state, PlayerState::Running);
        let fires = frames;
        assert!(game.particles.len() >= SPLASH_PARTICLE_COUNT + fires - 1);
    }

    /// Game with the player airborne in `state`, holding `keys`.
    fn airborne(state: PlayerState, multiplier: f64, keys: &[Key]) -> Game {
        let mut game = game_with_keys(keys);
        game.player.y = 200.0;
        set_state(&mut game, state, multiplier);
        game
    }

    #[test]
    fn test_jumping_dives_on_down() {
        let mut game = airborne(PlayerState::Jumping, 1.0, &[Key::ArrowDown]);
        update(&mut game, 16.0, &mut rng());
        assert_eq!(game.player.state, PlayerState::Diving);
        assert_eq!(game.speed, 0.0);
        assert!(game.player.vy >= DIVE_VELOCITY);
    }

    #[test]
    fn test_jumping_rolls_on_enter() {
        let mut game = airborne(PlayerState::Jumping, 1.0, &[Key::Enter]);
        update(&mut game, 16.0, &mut rng());
        assert_eq!(game.player.state, PlayerState::Rolling);
        assert!((game.speed - game.max_speed * 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_falling_dives_on_down() {
        let mut game = airborne(PlayerState::Falling, 1.0, &[Key::ArrowDown]);
        update(&mut game, 16.0, &mut rng());
        assert_eq!(game.player.state, PlayerState::Diving);
        assert_eq!(game.speed, 0.0);
    }

    #[test]
    fn test_rolling_in_air_dives_on_down() {
        let mut game = airborne(PlayerState::Rolling, 2.0, &[Key::Enter, Key::ArrowDown]);
        update(&mut game, 16.0, &mut rng());
        assert_eq!(game.player.state, PlayerState::Diving);
        assert_eq!(game.speed, 0.0);
    }

    #[test]
    fn test_hit_ending_in_air_falls() {
        let mut game = airborne(PlayerState::Hit, 0.0, &[]);
        game.player.animation.frame = PlayerState::Hit.max_frame();
        update(&mut game, 16.0, &mut rng());
        assert_eq!(game.player.state, PlayerState::Falling);
        assert!((game.speed - game.max_speed).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rolling_releases_to_running_on_ground() {
        let mut game = Game::new(Difficulty::Easy);
        set_state(&mut game, PlayerState::Rolling, 2.0);
        let mut rng = rng();
        update(&mut game, 16.0, &mut rng);
        assert_eq!(game.player.state, PlayerState::Running);
        assert_eq!(game.particles.len(), 1);
    }

    #[test]
    fn test_rolling_jump_keeps_rolling() {
        let mut game = game_with_keys(&[Key::Enter, Key::ArrowUp]);
        set_state(&mut game, PlayerState::Rolling, 2.0);
        let mut rng = rng();
        update(&mut game, 16.0, &mut rng);
        assert_eq!(game.player.state, PlayerState::Rolling);
        assert!(!game.player.on_ground());
    }

    #[test]
    fn test_rolling_in_air_without_enter_falls() {
        let mut game = Game::new(Difficulty::Easy);
        game.player.y = 100.0;
        set_state(&mut game, PlayerState::Rolling, 2.0);
        let mut rng = rng();
        update(&mut game, 16.0, &mut rng);
        assert_eq!(game.player.state, PlayerState::Falling);
    }

    #[test]
    fn test_horizontal_movement_and_clamping() {
        let mut game = game_with_keys(&[Key::ArrowRight]);
        let mut rng = rng();
        update(&mut game, 16.0, &mut rng);
        // Speed is applied on the following frame.
        assert_eq!(game.player.x, 0.0);
        update(&mut game, 16.0, &mut rng);
        assert_eq!(game.player.x, PLAYER_MAX_SPEED);

        game.player.x = game.width;
        update(&mut game, 16.0, &mut rng);
        assert_eq!(game.player.x, game.width - game.player.width);

        game.input.key_up(Key::ArrowRight);
        game.input.key_down(Key::ArrowLeft, 0);
        game.player.x = 5.0;
        game.player.speed = 0.0;
        update(&mut game, 16.0, &mut rng);
        update(&mut game, 16.0, &mut rng);
        assert_eq!(game.player.x, 0.0);
    }

    #[test]
    fn test_hit_when_not_attacking() {
        let mut game = Game::new(Difficulty::Easy);
        set_state(&mut game, PlayerState::Running, 1.0);
        enemy_on_player(&mut game);
        let mut rng = rng();
        update(&mut game, 16.0, &mut rng);

        assert_eq!(game.player.state, PlayerState::Hit);
        assert_eq!(game.speed, 0.0);
        assert_eq!(game.lives, 4);
        assert_eq!(game.score, -HIT_SCORE_PENALTY);
        assert!(game.enemies[0].marked_for_deletion);
        assert_eq!(game.collisions.len(), 1);
        assert!(matches!(
            game.events.last(),
            Some(GameEvent::PlayerHit { lives_left: 4, .. })
        ));
    }

    #[test]
    fn test_rolling_destroys_enemy_for_a_point() {
        let mut game = game_with_keys(&[Key::Enter]);
        set_state(&mut game, PlayerState::Rolling, 2.0);
        enemy_on_player(&mut game);
        let mut rng = rng();
        update(&mut game, 16.0, &mut rng);

        assert_eq!(game.score, 1);
        assert_eq!(game.lives, 5);
        assert_eq!(game.enemies_destroyed, 1);
        assert_eq!(game.player.state, PlayerState::Rolling);
        assert_eq!(game.collisions.len(), 1);
    }

    #[test]
    fn test_last_life_ends_game() {
        let mut game = Game::new(Difficulty::Hard);
        game.lives = 1;
        enemy_on_player(&mut game);
        let mut rng = rng();
        update(&mut game, 16.0, &mut rng);
        assert_eq!(game.lives, 0);
        assert!(game.game_over);
    }

    #[test]
    fn test_hit_recovers_after_animation() {
        let mut game = Game::new(Difficulty::Easy);
        set_state(&mut game, PlayerState::Hit, 0.0);
        let mut rng = rng();
        let mut frames = 0;
        while game.player.state == PlayerState::Hit {
            update(&mut game, 16.0, &mut rng);
            frames += 1;
            assert!(frames < 100, "hit state never ended");
        }
        assert_eq!(game.player.state, PlayerState::Running);
        // 10 sprite frames at 20 fps, each spanning five 16ms steps.
        assert!(frames >= 50);
    }

    #[test]
    fn test_hit_blocks_moving_right() {
        let mut game = game_with_keys(&[Key::ArrowRight]);
        set_state(&mut game, PlayerState::Hit, 0.0);
        let mut rng = rng();
        update(&mut game, 16.0, &mut rng);
        assert_eq!(game.player.speed, 0.0);
    }

    #[test]
    fn test_overlap_is_strict() {
        let player = Player::new();
        assert!(player.overlaps(50.0, player.y, 10.0, 10.0));
        // Touching edges do not count.
        assert!(!player.overlaps(player.width, player.y, 10.0, 10.0));
        assert!(!player.overlaps(0.0, player.y - 10.0, 10.0, 10.0));
    }
}
