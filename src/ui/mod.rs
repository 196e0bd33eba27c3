pub mod game_common;
pub mod menu_scene;
pub mod play_scene;

use crate::app::{App, Screen};
use rand::Rng;
use ratatui::Frame;

/// Main UI drawing function.
pub fn draw<R: Rng>(frame: &mut Frame, app: &App<R>) {
    let size = frame.size();

    match (app.screen, app.game.as_ref()) {
        (Screen::Playing, Some(game)) => {
            play_scene::render_play_scene(frame, size, game, &app.scores, &app.last_result)
        }
        _ => menu_scene::render_menu_scene(frame, size, &app.menu, &app.scores),
    }
}
