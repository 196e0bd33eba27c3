//! Keyboard state: the set of gameplay keys currently held down.
//!
//! The game asks "is ArrowUp held?" every frame, so input is kept as a key
//! set rather than a stream of presses. Terminals that report key releases
//! (kitty keyboard protocol) drive the set directly. Everywhere else a key
//! stays held for a short window after its last press or auto-repeat.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

/// Keys the player state machine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowDown,
    ArrowUp,
    ArrowLeft,
    ArrowRight,
    Enter,
}

/// UI-agnostic input actions for a running game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerInput {
    Press(Key),
    Release(Key),
    /// `d`: show hitboxes.
    ToggleDebug,
    /// Esc
    Forfeit,
    /// Any other key (cancels a pending forfeit).
    Other,
    /// Release of a key the game does not track.
    Ignored,
}

#[derive(Debug, Clone, Copy)]
struct HeldKey {
    key: Key,
    last_seen_ms: u64,
}

/// Ordered set of held keys, oldest press first, without duplicates.
#[derive(Debug, Clone, Default)]
pub struct InputHandler {
    held: Vec<HeldKey>,
    /// `None` when the terminal reports releases.
    hold_window_ms: Option<u64>,
}

impl InputHandler {
    pub fn new(hold_window_ms: Option<u64>) -> Self {
        Self {
            held: Vec::new(),
            hold_window_ms,
        }
    }

    /// Switch between release-driven and hold-window mode.
    pub fn set_hold_window(&mut self, hold_window_ms: Option<u64>) {
        self.hold_window_ms = hold_window_ms;
    }

    pub fn key_down(&mut self, key: Key, now_ms: u64) {
        match self.held.iter_mut().find(|h| h.key == key) {
            Some(held) => held.last_seen_ms = now_ms,
            None => self.held.push(HeldKey {
                key,
                last_seen_ms: now_ms,
            }),
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.held.retain(|h| h.key != key);
    }

    /// Release keys whose hold window has run out. No-op in release mode.
    pub fn expire(&mut self, now_ms: u64) {
        if let Some(window) = self.hold_window_ms {
            self.held
                .retain(|h| now_ms.saturating_sub(h.last_seen_ms) < window);
        }
    }

    pub fn clear(&mut self) {
        self.held.clear();
    }

    pub fn is_down(&self, key: Key) -> bool {
        self.held.iter().any(|h| h.key == key)
    }

    /// Held keys in press order.
    pub fn keys(&self) -> Vec<Key> {
        self.held.iter().map(|h| h.key).collect()
    }
}

/// Map a crossterm key code onto a gameplay key. Space doubles as jump.
pub fn gameplay_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Down => Some(Key::ArrowDown),
        KeyCode::Up | KeyCode::Char(' ') => Some(Key::ArrowUp),
        KeyCode::Left => Some(Key::ArrowLeft),
        KeyCode::Right => Some(Key::ArrowRight),
        KeyCode::Enter => Some(Key::Enter),
        _ => None,
    }
}

/// Translate a terminal key event into a game action.
pub fn map_key_event(event: &KeyEvent) -> RunnerInput {
    if let Some(key) = gameplay_key(event.code) {
        return match event.kind {
            KeyEventKind::Release => RunnerInput::Release(key),
            KeyEventKind::Press | KeyEventKind::Repeat => RunnerInput::Press(key),
        };
    }
    if event.kind == KeyEventKind::Release {
        return RunnerInput::Ignored;
    }
    match event.code {
        KeyCode::Char('d') | KeyCode::Char('D') => RunnerInput::ToggleDebug,
        KeyCode::Esc => RunnerInput::Forfeit,
        _ => RunnerInput::Other,
    }
}
