//! Integration test: an application session driven by key events, the way
//! the terminal loop drives it.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use nightrun::app::{App, Screen};
use nightrun::core::constants::GAME_OVER_GRACE_MS;
use nightrun::core::difficulty::Difficulty;
use nightrun::game::{GameOutcome, PlayerState};
use nightrun::input::Key;
use nightrun::persistence::{HighScores, Settings};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::fs;
use std::path::PathBuf;

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "nightrun-session-{}-{}",
        name,
        std::process::id()
    ));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn app(settings: Settings) -> App<ChaCha8Rng> {
    App::new(settings, HighScores::default(), ChaCha8Rng::seed_from_u64(11))
}

fn press(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn release(code: KeyCode) -> KeyEvent {
    KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Release)
}

/// Run out the clock on the current game with the given score.
fn finish_with_score(app: &mut App<ChaCha8Rng>, score: i32) {
    let game = app.game.as_mut().unwrap();
    game.score = score;
    game.enemies.clear();
    game.time = game.max_time;
    app.tick(16, 0);
    assert!(app.game.as_ref().unwrap().game_over);
}

#[test]
fn test_scores_are_saved_after_each_game() {
    let dir = temp_dir("scores");
    let path = dir.join("scores.json");
    let mut app = app(Settings::default()).with_scores_path(path.clone());

    app.handle_key(&press(KeyCode::Char('3')), 0);
    app.handle_key(&press(KeyCode::Enter), 0);
    assert_eq!(app.screen, Screen::Playing);
    finish_with_score(&mut app, 90);
    assert_eq!(
        app.game.as_ref().unwrap().outcome,
        Some(GameOutcome::Win)
    );
    assert!(app.last_result.new_best);

    // Play again and do worse.
    app.handle_key(&press(KeyCode::Enter), GAME_OVER_GRACE_MS);
    finish_with_score(&mut app, 40);
    assert_eq!(app.last_result.rank, Some(1));
    assert!(!app.last_result.new_best);

    let saved = HighScores::load_or_default(&path);
    let top: Vec<i32> = saved.top(Difficulty::Hard).iter().map(|e| e.score).collect();
    assert_eq!(top, vec![90, 40]);
    assert_eq!(saved.top(Difficulty::Hard)[1].outcome, GameOutcome::Loss);
    assert!(saved.top(Difficulty::Easy).is_empty());

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_menu_remembers_last_difficulty() {
    let mut app = app(Settings {
        difficulty: Difficulty::Medium,
        ..Settings::default()
    });
    assert_eq!(app.menu.selected, Difficulty::Medium);

    app.start_game(Difficulty::Hard);
    app.handle_key(&press(KeyCode::Esc), 0);
    app.handle_key(&press(KeyCode::Esc), 0);
    app.tick(16, 16);
    app.handle_key(&press(KeyCode::Esc), 16 + GAME_OVER_GRACE_MS);

    assert_eq!(app.screen, Screen::Menu);
    assert_eq!(app.menu.selected, Difficulty::Hard);
}

#[test]
fn test_held_key_expires_without_release_events() {
    let mut app = app(Settings {
        key_hold_ms: 100,
        ..Settings::default()
    });
    app.start_game(Difficulty::Easy);

    app.handle_key(&press(KeyCode::Right), 0);
    app.tick(16, 16);
    let game = app.game.as_ref().unwrap();
    assert_eq!(game.player.state, PlayerState::Running);
    assert!(game.input.is_down(Key::ArrowRight));

    // No repeat arrives: the key lets go once the window passes.
    app.tick(16, 200);
    assert!(!app.game.as_ref().unwrap().input.is_down(Key::ArrowRight));
}

#[test]
fn test_release_events_drive_the_key_set() {
    let mut app = app(Settings::default());
    app.set_hold_window(None);
    app.start_game(Difficulty::Easy);

    app.handle_key(&press(KeyCode::Right), 0);
    app.tick(16, 10_000);
    assert!(app.game.as_ref().unwrap().input.is_down(Key::ArrowRight));

    app.handle_key(&release(KeyCode::Right), 10_000);
    assert!(!app.game.as_ref().unwrap().input.is_down(Key::ArrowRight));
}

#[test]
fn test_quit_from_game_over() {
    let mut app = app(Settings::default());
    app.start_game(Difficulty::Easy);
    finish_with_score(&mut app, 0);

    // Releases are ignored on the game-over overlay.
    app.handle_key(&release(KeyCode::Enter), 0);
    assert!(app.game.as_ref().unwrap().game_over);

    app.handle_key(&press(KeyCode::Char('q')), GAME_OVER_GRACE_MS);
    assert!(app.quit);
}

#[test]
fn test_forfeit_with_release_events() {
    let mut app = app(Settings::default());
    app.set_hold_window(None);
    app.start_game(Difficulty::Medium);
    app.tick(16, 16);

    // Press and release Esc twice, as a kitty-protocol terminal or the
    // browser mirror reports it.
    app.handle_key(&press(KeyCode::Esc), 100);
    app.handle_key(&release(KeyCode::Esc), 180);
    assert!(app.game.as_ref().unwrap().forfeit_pending);
    app.handle_key(&press(KeyCode::Esc), 400);
    app.handle_key(&release(KeyCode::Esc), 480);

    let game = app.game.as_ref().unwrap();
    assert_eq!(game.outcome, Some(GameOutcome::Forfeit));
    app.tick(16, 500);
    assert!(app.scores.entries.is_empty());
}
