//! Difficulty menu shown before each game.

use crate::core::difficulty::Difficulty;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

/// Input actions for the menu (UI-agnostic).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuInput {
    Up,
    Down,
    /// Jump straight to a difficulty (1, 2, 3).
    Pick(Difficulty),
    Select,
    Quit,
    Other,
}

/// What the menu wants the application to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    None,
    Start(Difficulty),
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Menu {
    pub selected: Difficulty,
}

impl Menu {
    pub fn new(selected: Difficulty) -> Self {
        Self { selected }
    }

    pub fn navigate_up(&mut self) {
        let index = self.selected.index();
        self.selected = Difficulty::from_index(index.saturating_sub(1));
    }

    pub fn navigate_down(&mut self) {
        let index = (self.selected.index() + 1).min(Difficulty::ALL.len() - 1);
        self.selected = Difficulty::from_index(index);
    }
}

pub fn process_input(menu: &mut Menu, input: MenuInput) -> MenuAction {
    match input {
        MenuInput::Up => menu.navigate_up(),
        MenuInput::Down => menu.navigate_down(),
        MenuInput::Pick(difficulty) => menu.selected = difficulty,
        MenuInput::Select => return MenuAction::Start(menu.selected),
        MenuInput::Quit => return MenuAction::Quit,
        MenuInput::Other => {}
    }
    MenuAction::None
}

/// Releases and unrelated keys map to `Other`.
pub fn map_key_event(event: &KeyEvent) -> MenuInput {
    if event.kind == KeyEventKind::Release {
        return MenuInput::Other;
    }
    match event.code {
        KeyCode::Up | KeyCode::Char('k') => MenuInput::Up,
        KeyCode::Down | KeyCode::Char('j') => MenuInput::Down,
        KeyCode::Char('1') => MenuInput::Pick(Difficulty::Easy),
        KeyCode::Char('2') => MenuInput::Pick(Difficulty::Medium),
        KeyCode::Char('3') => MenuInput::Pick(Difficulty::Hard),
        KeyCode::Enter | KeyCode::Char(' ') => MenuInput::Select,
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => MenuInput::Quit,
        _ => MenuInput::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, KeyModifiers};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::empty(),
            kind: KeyEventKind::Press,
            state: KeyEventState::empty(),
        }
    }

    #[test]
    fn test_navigation_clamps_at_ends() {
        let mut menu = Menu::default();
        process_input(&mut menu, MenuInput::Up);
        assert_eq!(menu.selected, Difficulty::Easy);

        process_input(&mut menu, MenuInput::Down);
        process_input(&mut menu, MenuInput::Down);
        process_input(&mut menu, MenuInput::Down);
        assert_eq!(menu.selected, Difficulty::Hard);

        process_input(&mut menu, MenuInput::Up);
        assert_eq!(menu.selected, Difficulty::Medium);
    }

    #[test]
    fn test_select_starts_selected_difficulty() {
        let mut menu = Menu::new(Difficulty::Medium);
        assert_eq!(
            process_input(&mut menu, MenuInput::Select),
            MenuAction::Start(Difficulty::Medium)
        );
        assert_eq!(
            process_input(&mut menu, MenuInput::Pick(Difficulty::Hard)),
            MenuAction::None
        );
        assert_eq!(menu.selected, Difficulty::Hard);
        assert_eq!(process_input(&mut menu, MenuInput::Quit), MenuAction::Quit);
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(map_key_event(&press(KeyCode::Up)), MenuInput::Up);
        assert_eq!(map_key_event(&press(KeyCode::Char('j'))), MenuInput::Down);
        assert_eq!(
            map_key_event(&press(KeyCode::Char('3'))),
            MenuInput::Pick(Difficulty::Hard)
        );
        assert_eq!(map_key_event(&press(KeyCode::Enter)), MenuInput::Select);
        assert_eq!(map_key_event(&press(KeyCode::Esc)), MenuInput::Quit);

        let mut release = press(KeyCode::Enter);
        release.kind = KeyEventKind::Release;
        assert_eq!(map_key_event(&release), MenuInput::Other);
    }
}
