//! Application state: which screen is up, the running game, and the
//! persisted settings and scores around it. Terminal plumbing lives in
//! `main.rs`; everything here is driven by key events and elapsed time.

use crate::audio::Sfx;
use crate::core::constants::GAME_OVER_GRACE_MS;
use crate::core::difficulty::Difficulty;
use crate::game::{self, Game, GameEvent};
use crate::input::{self as runner_input, InputHandler};
use crate::menu::{self, Menu, MenuAction};
use crate::persistence::{HighScores, ScoreEntry, Settings};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use rand::Rng;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Playing,
}

/// Result of the last finished game, for the game-over overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LastResult {
    /// Rank in the high-score table, if it made the table.
    pub rank: Option<usize>,
    pub new_best: bool,
}

pub struct App<R: Rng> {
    pub screen: Screen,
    pub menu: Menu,
    pub game: Option<Game>,
    pub settings: Settings,
    pub scores: HighScores,
    /// Where scores are saved. `None` keeps them in memory only.
    pub scores_path: Option<PathBuf>,
    /// Key hold window for terminals that never report releases.
    pub hold_window_ms: Option<u64>,
    pub last_result: LastResult,
    pub quit: bool,
    /// Game-over keys are ignored before this time.
    overlay_ready_at_ms: u64,
    rng: R,
}

impl<R: Rng> App<R> {
    pub fn new(settings: Settings, scores: HighScores, rng: R) -> Self {
        Self {
            screen: Screen::Menu,
            menu: Menu::new(settings.difficulty),
            game: None,
            hold_window_ms: Some(settings.key_hold_ms),
            settings,
            scores,
            scores_path: None,
            last_result: LastResult::default(),
            quit: false,
            overlay_ready_at_ms: 0,
            rng,
        }
    }

    pub fn with_scores_path(mut self, path: PathBuf) -> Self {
        self.scores_path = Some(path);
        self
    }

    /// Call with `None` once the terminal is known to report key releases.
    pub fn set_hold_window(&mut self, hold_window_ms: Option<u64>) {
        self.hold_window_ms = hold_window_ms;
        if let Some(game) = self.game.as_mut() {
            game.input.set_hold_window(hold_window_ms);
        }
    }

    pub fn start_game(&mut self, difficulty: Difficulty) {
        let mut game = Game::new(difficulty)
            .with_input(InputHandler::new(self.hold_window_ms))
            .with_audio(Sfx::new(self.settings.sound));
        game.debug = self.settings.debug;

        log::info!("starting {} game ({})", difficulty.name(), difficulty.summary());
        self.menu.selected = difficulty;
        self.last_result = LastResult::default();
        self.game = Some(game);
        self.screen = Screen::Playing;
    }

    pub fn return_to_menu(&mut self) {
        self.game = None;
        self.screen = Screen::Menu;
    }

    pub fn handle_key(&mut self, event: &KeyEvent, now_ms: u64) {
        match self.screen {
            Screen::Menu => match menu::process_input(&mut self.menu, menu::map_key_event(event)) {
                MenuAction::Start(difficulty) => self.start_game(difficulty),
                MenuAction::Quit => self.quit = true,
                MenuAction::None => {}
            },
            Screen::Playing => self.handle_game_key(event, now_ms),
        }
    }

    fn handle_game_key(&mut self, event: &KeyEvent, now_ms: u64) {
        let Some(game) = self.game.as_mut() else {
            self.screen = Screen::Menu;
            return;
        };

        if !game.game_over {
            game::process_input(game, runner_input::map_key_event(event), now_ms);
            return;
        }

        match event.kind {
            KeyEventKind::Release => return,
            KeyEventKind::Repeat => {
                self.overlay_ready_at_ms = now_ms + GAME_OVER_GRACE_MS;
                return;
            }
            KeyEventKind::Press if now_ms < self.overlay_ready_at_ms => {
                // Legacy terminals report auto-repeat as presses.
                self.overlay_ready_at_ms = now_ms + GAME_OVER_GRACE_MS;
                return;
            }
            KeyEventKind::Press => {}
        }
        match event.code {
            KeyCode::Enter => {
                let difficulty = game.difficulty;
                self.start_game(difficulty);
            }
            KeyCode::Esc => self.return_to_menu(),
            KeyCode::Char('q') | KeyCode::Char('Q') => self.quit = true,
            _ => {}
        }
    }

    /// Advance the running game by `dt_ms` of wall-clock time.
    pub fn tick(&mut self, dt_ms: u64, now_ms: u64) -> Vec<GameEvent> {
        let Some(game) = self.game.as_mut() else {
            return Vec::new();
        };
        game.input.expire(now_ms);
        let events = game::tick(game, dt_ms, &mut self.rng);

        if events
            .iter()
            .any(|e| matches!(e, GameEvent::GameOver { .. }))
        {
            self.overlay_ready_at_ms = now_ms + GAME_OVER_GRACE_MS;
            self.record_result();
        }
        events
    }

    fn record_result(&mut self) {
        let Some(game) = self.game.as_ref() else {
            return;
        };
        let Some(entry) = ScoreEntry::from_game(game, chrono::Utc::now().timestamp()) else {
            return;
        };

        let rank = self.scores.record(entry);
        self.last_result = LastResult {
            rank,
            new_best: rank == Some(0),
        };

        if let Some(path) = &self.scores_path {
            if let Err(e) = self.scores.save(path) {
                log::warn!("could not save scores to {}: {}", path.display(), e);
            }
        }
    }

    /// Write queued sound effects to the terminal.
    pub fn flush_audio<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        match self.game.as_mut() {
            Some(game) => game.audio.flush(out),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameOutcome;
    use crossterm::event::{KeyEventState, KeyModifiers};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn app() -> App<ChaCha8Rng> {
        App::new(
            Settings::default(),
            HighScores::default(),
            ChaCha8Rng::seed_from_u64(7),
        )
    }

    fn key(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::empty(),
            kind,
            state: KeyEventState::empty(),
        }
    }

    fn press(code: KeyCode) -> KeyEvent {
        key(code, KeyEventKind::Press)
    }

    /// Start an Easy game and run out its clock at `now_ms`.
    fn finished_game(now_ms: u64) -> App<ChaCha8Rng> {
        let mut app = app();
        app.start_game(Difficulty::Easy);
        app.game.as_mut().unwrap().time = 1_000_000.0;
        app.tick(16, now_ms);
        assert!(app.game.as_ref().unwrap().game_over);
        app
    }

    #[test]
    fn test_menu_starts_game() {
        let mut app = app();
        app.handle_key(&press(KeyCode::Down), 0);
        app.handle_key(&press(KeyCode::Enter), 0);

        assert_eq!(app.screen, Screen::Playing);
        let game = app.game.as_ref().unwrap();
        assert_eq!(game.difficulty, Difficulty::Medium);
        assert_eq!(game.lives, 3);
    }

    #[test]
    fn test_menu_quit() {
        let mut app = app();
        app.handle_key(&press(KeyCode::Char('q')), 0);
        assert!(app.quit);
    }

    #[test]
    fn test_settings_carry_into_game() {
        let settings = Settings {
            sound: false,
            debug: true,
            ..Settings::default()
        };
        let mut app = App::new(settings, HighScores::default(), ChaCha8Rng::seed_from_u64(1));
        app.start_game(Difficulty::Hard);

        let game = app.game.as_ref().unwrap();
        assert!(game.debug);
        assert!(!game.audio.is_enabled());
    }

    #[test]
    fn test_losing_game_records_score_and_restarts() {
        let mut app = app();
        app.start_game(Difficulty::Easy);
        {
            let game = app.game.as_mut().unwrap();
            game.score = 12;
            game.time = game.max_time;
        }

        let events = app.tick(100, 100);
        assert!(events.contains(&GameEvent::TimeUp));
        assert_eq!(app.game.as_ref().unwrap().outcome, Some(GameOutcome::Loss));
        assert_eq!(app.scores.best(Difficulty::Easy).map(|e| e.score), Some(12));
        assert!(app.last_result.new_best);

        // Game-over keys: Enter restarts the same difficulty.
        app.handle_key(&press(KeyCode::Enter), 100 + GAME_OVER_GRACE_MS);
        let game = app.game.as_ref().unwrap();
        assert!(!game.game_over);
        assert_eq!(game.score, 0);
        assert_eq!(app.last_result, LastResult::default());
    }

    #[test]
    fn test_escape_after_game_over_returns_to_menu() {
        let mut app = app();
        app.start_game(Difficulty::Easy);
        app.game.as_mut().unwrap().time = 1_000_000.0;
        app.tick(16, 16);

        app.handle_key(&press(KeyCode::Esc), 16 + GAME_OVER_GRACE_MS);
        assert_eq!(app.screen, Screen::Menu);
        assert!(app.game.is_none());
    }

    #[test]
    fn test_forfeit_is_not_recorded() {
        let mut app = app();
        app.start_game(Difficulty::Easy);
        app.handle_key(&press(KeyCode::Esc), 0);
        app.handle_key(&press(KeyCode::Esc), 0);

        let events = app.tick(16, 16);
        assert!(events.contains(&GameEvent::GameOver {
            outcome: GameOutcome::Forfeit,
            score: 0
        }));
        assert!(app.scores.entries.is_empty());
        assert_eq!(app.last_result.rank, None);
        assert_eq!(app.screen, Screen::Playing);
    }

    #[test]
    fn test_esc_release_keeps_forfeit_prompt() {
        let mut app = app();
        app.set_hold_window(None);
        app.start_game(Difficulty::Easy);

        app.handle_key(&press(KeyCode::Esc), 0);
        app.handle_key(&key(KeyCode::Esc, KeyEventKind::Release), 40);
        assert!(app.game.as_ref().unwrap().forfeit_pending);

        app.handle_key(&press(KeyCode::Esc), 300);
        app.handle_key(&key(KeyCode::Esc, KeyEventKind::Release), 340);
        assert_eq!(
            app.game.as_ref().unwrap().outcome,
            Some(GameOutcome::Forfeit)
        );
    }

    #[test]
    fn test_repeat_does_not_restart_finished_game() {
        let mut app = finished_game(1_000);
        let later = 1_000 + GAME_OVER_GRACE_MS * 10;

        app.handle_key(&key(KeyCode::Enter, KeyEventKind::Repeat), later);
        assert!(app.game.as_ref().unwrap().game_over);
    }

    #[test]
    fn test_held_enter_through_game_over_is_ignored() {
        let mut app = finished_game(1_000);

        // Auto-repeat arriving as presses keeps pushing the overlay back.
        let mut now = 1_000;
        for _ in 0..40 {
            now += 30;
            app.handle_key(&press(KeyCode::Enter), now);
        }
        assert!(app.game.as_ref().unwrap().game_over);

        app.handle_key(&key(KeyCode::Enter, KeyEventKind::Release), now + 10);
        app.handle_key(&press(KeyCode::Enter), now + GAME_OVER_GRACE_MS);
        assert!(!app.game.as_ref().unwrap().game_over);
    }
}
