//! Game loop: input processing, fixed-step frames, spawning and filtering.

use super::enemies::Enemy;
use super::player;
use super::types::{Game, GameEvent, GameOutcome};
use crate::core::constants::{FRAME_MS, MAX_FRAME_DELTA_MS};
use crate::input::RunnerInput;
use rand::Rng;

/// Process one input action. `now_ms` stamps key presses for hold windows.
pub fn process_input(game: &mut Game, input: RunnerInput, now_ms: u64) {
    if game.game_over {
        return; // Game over -- the front end decides what a key does
    }

    match input {
        RunnerInput::Forfeit => {
            if game.forfeit_pending {
                forfeit(game);
            } else {
                game.forfeit_pending = true;
                game.input.clear();
            }
        }
        RunnerInput::Release(_) | RunnerInput::Ignored if game.forfeit_pending => {}
        _ if game.forfeit_pending => {
            // Any other key press cancels the forfeit and is otherwise swallowed.
            game.forfeit_pending = false;
        }
        RunnerInput::Press(key) => {
            game.audio.start();
            game.input.key_down(key, now_ms);
        }
        RunnerInput::Release(key) => game.input.key_up(key),
        RunnerInput::ToggleDebug => game.debug = !game.debug,
        RunnerInput::Other | RunnerInput::Ignored => {}
    }
}

fn forfeit(game: &mut Game) {
    game.forfeit_pending = false;
    game.game_over = true;
    game.outcome = Some(GameOutcome::Forfeit);
    log::info!(
        "{} game forfeited at {:.1}s with score {}",
        game.difficulty.name(),
        game.time / 1000.0,
        game.score
    );
    game.events.push(GameEvent::GameOver {
        outcome: GameOutcome::Forfeit,
        score: game.score,
    });
}

/// Advance the game by `dt_ms` of wall-clock time.
///
/// Steps the simulation in fixed 16ms frames (~60 FPS), carrying the
/// remainder to the next call. Nothing runs once the game is over or while
/// a forfeit is awaiting confirmation. Returns the events produced, including
/// any queued by input processing since the last tick.
pub fn tick<R: Rng>(game: &mut Game, dt_ms: u64, rng: &mut R) -> Vec<GameEvent> {
    if game.game_over || game.forfeit_pending {
        return std::mem::take(&mut game.events);
    }

    // Clamp dt to prevent a burst of frames after a pause or stall
    let dt_ms = dt_ms.min(MAX_FRAME_DELTA_MS);

    game.accumulated_time_ms += dt_ms;
    while game.accumulated_time_ms >= FRAME_MS {
        game.accumulated_time_ms -= FRAME_MS;
        update(game, FRAME_MS as f64, rng);

        if game.game_over {
            break;
        }
    }

    std::mem::take(&mut game.events)
}

/// Single frame of `dt_ms` milliseconds.
pub fn update<R: Rng>(game: &mut Game, dt_ms: f64, rng: &mut R) {
    game.frame_count += 1;

    // 1. Clock
    game.time += dt_ms;
    if game.time > game.max_time && !game.game_over {
        game.game_over = true;
        game.events.push(GameEvent::TimeUp);
    }

    // 2. Background
    game.background.update(game.speed);

    // 3. Player (collisions, state transitions, movement)
    player::update(game, dt_ms, rng);

    // 4. Spawning
    if game.enemy_timer > game.enemy_interval {
        add_enemy(game, rng);
        game.enemy_timer = 0.0;
    } else {
        game.enemy_timer += dt_ms;
    }

    // 5. Entities
    let speed = game.speed;
    for enemy in &mut game.enemies {
        enemy.update(dt_ms, speed);
    }
    for particle in &mut game.particles {
        particle.update(speed);
    }
    for collision in &mut game.collisions {
        collision.update(dt_ms, speed);
    }

    // 6. Particle cap (newest are at the front)
    game.particles.truncate(game.max_particles);

    // 7. Filter pass
    game.enemies.retain(|e| !e.marked_for_deletion);
    game.particles.retain(|p| !p.marked_for_deletion);
    game.collisions.retain(|c| !c.marked_for_deletion);

    if game.game_over && game.outcome.is_none() {
        finish(game);
    }
}

/// Spawn enemies according to the difficulty's weights. Ground and climbing
/// enemies only appear while the world is scrolling.
pub fn add_enemy<R: Rng>(game: &mut Game, rng: &mut R) {
    let weights = game.spawn;
    let scrolling = game.speed > 0.0;

    if scrolling && rng.gen::<f64>() < weights.ground {
        push_enemy(game, Enemy::ground());
    } else if scrolling && rng.gen::<f64>() < weights.climbing {
        push_enemy(game, Enemy::climbing(rng));
    }
    if rng.gen::<f64>() < weights.flying {
        push_enemy(game, Enemy::flying(rng));
    }
}

fn push_enemy(game: &mut Game, enemy: Enemy) {
    log::trace!(
        "spawned {} enemy at ({:.0}, {:.0})",
        enemy.kind.name(),
        enemy.x,
        enemy.y
    );
    game.events.push(GameEvent::EnemySpawned { kind: enemy.kind });
    game.enemies.push(enemy);
}

/// Decide the outcome of a game that just ended. Running out of lives always
/// loses; surviving the clock wins only above the winning score.
fn finish(game: &mut Game) {
    let outcome = if game.lives > 0 && game.score > game.winning_score {
        GameOutcome::Win
    } else {
        GameOutcome::Loss
    };
    game.outcome = Some(outcome);
    game.input.clear();
    log::info!(
        "{} game over: {} with score {} ({} destroyed, {} hits, {} lives left)",
        game.difficulty.name(),
        outcome.name(),
        game.score,
        game.enemies_destroyed,
        game.hits_taken,
        game.lives
    );
    game.events.push(GameEvent::GameOver {
        outcome,
        score: game.score,
    });
}
