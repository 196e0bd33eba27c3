//! Difficulty menu with the high-score table for the highlighted level.

use super::game_common::{
    create_game_layout, format_seconds, render_info_panel_frame, render_status_bar,
};
use crate::core::difficulty::Difficulty;
use crate::game::GameOutcome;
use crate::menu::Menu;
use crate::persistence::HighScores;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const TITLE_ART: &[&str] = &[
    r" _   _ _       _     _     ____              ",
    r"| \ | (_) __ _| |__ | |_  |  _ \ _   _ _ __  ",
    r"|  \| | |/ _` | '_ \| __| | |_) | | | | '_ \ ",
    r"| |\  | | (_| | | | | |_  |  _ <| |_| | | | |",
    r"|_| \_|_|\__, |_| |_|\__| |_| \_\\__,_|_| |_|",
    r"         |___/                               ",
];

pub fn render_menu_scene(frame: &mut Frame, area: Rect, menu: &Menu, scores: &HighScores) {
    let layout = create_game_layout(frame, area, " Night Run ", Color::LightMagenta, 10, 34);

    render_choices(frame, layout.content, menu);
    render_status_bar(
        frame,
        layout.status_bar,
        "Choose a difficulty",
        Color::LightMagenta,
        &[
            ("[↑↓]", "Select"),
            ("[1-3]", "Pick"),
            ("[Enter]", "Start"),
            ("[Q]", "Quit"),
        ],
    );
    render_high_scores(frame, layout.info_panel, menu.selected, scores);
}

fn render_choices(frame: &mut Frame, area: Rect, menu: &Menu) {
    let mut lines: Vec<Line> = Vec::new();

    if area.width as usize > TITLE_ART[0].len() && area.height >= 16 {
        for row in TITLE_ART {
            lines.push(Line::from(Span::styled(
                *row,
                Style::default().fg(Color::LightMagenta),
            )));
        }
        lines.push(Line::from(""));
    } else {
        lines.push(Line::from(Span::styled(
            "NIGHT RUN",
            Style::default()
                .fg(Color::LightMagenta)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));
    }

    for (i, difficulty) in Difficulty::ALL.iter().enumerate() {
        let selected = *difficulty == menu.selected;
        let marker = if selected { "> " } else { "  " };
        let name_style = if selected {
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        lines.push(Line::from(vec![
            Span::styled(marker, Style::default().fg(Color::LightMagenta)),
            Span::styled(format!("{}. {:<8}", i + 1, difficulty.name()), name_style),
            Span::styled(difficulty.summary(), Style::default().fg(Color::DarkGray)),
        ]));
    }

    lines.push(Line::from(""));
    for hint in [
        "Hold → to run, ↑ to jump, ↓ to sit.",
        "Hold Enter to roll through enemies,",
        "or press ↓ in the air to dive on them.",
        "Each hit costs a life and 5 points.",
    ] {
        lines.push(Line::from(Span::styled(
            hint,
            Style::default().fg(Color::DarkGray),
        )));
    }

    let top = area.y + 1;
    let text_area = Rect::new(
        area.x + 2,
        top,
        area.width.saturating_sub(2),
        area.height.saturating_sub(1),
    );
    frame.render_widget(Paragraph::new(lines), text_area);
}

fn render_high_scores(frame: &mut Frame, area: Rect, difficulty: Difficulty, scores: &HighScores) {
    let inner = render_info_panel_frame(frame, area);

    let mut lines = vec![
        Line::from(Span::styled(
            format!("High Scores - {}", difficulty.name()),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    let top = scores.top(difficulty);
    if top.is_empty() {
        lines.push(Line::from(Span::styled(
            "No runs yet.",
            Style::default().fg(Color::DarkGray),
        )));
    }
    for (i, entry) in top.iter().enumerate() {
        let outcome_color = match entry.outcome {
            GameOutcome::Win => Color::Green,
            _ => Color::Red,
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{:>2}. ", i + 1), Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{:>4}", entry.score),
                Style::default().fg(Color::White),
            ),
            Span::styled(
                format!(" {:<5}", entry.outcome.name()),
                Style::default().fg(outcome_color),
            ),
            Span::styled(
                format!(
                    " {:>6} {}",
                    format_seconds(entry.time_ms as f64),
                    entry.date()
                ),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}
