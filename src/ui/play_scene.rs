//! Night Run play field.
//!
//! The world is 900x500 logical pixels. It is drawn into a cell buffer
//! scaled to the content area and then stamped row-by-row as Paragraph
//! widgets, so every cell keeps its own colors. Draw order is background,
//! player, enemies, particles, collision effects, then the HUD.

use super::game_common::{
    create_game_layout, format_seconds, lives_text, render_forfeit_status_bar,
    render_game_over_overlay, render_info_panel_frame, render_status_bar,
};
use crate::app::LastResult;
use crate::game::{
    BackgroundLayer, CollisionEffect, Enemy, EnemyKind, Game, GameOutcome, Particle, ParticleKind,
    PlayerState,
};
use crate::persistence::HighScores;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const SKY_STAR: Color = Color::Rgb(170, 170, 200);
const HILL: Color = Color::Rgb(40, 40, 70);
const TREE_CROWN: Color = Color::Rgb(25, 70, 45);
const TREE_TRUNK: Color = Color::Rgb(70, 50, 35);
const BUSH: Color = Color::Rgb(35, 100, 55);
const GROUND_FG: Color = Color::Rgb(85, 65, 45);
const GROUND_BG: Color = Color::Rgb(40, 30, 22);
const HITBOX: Color = Color::Magenta;

/// Render the play scene: field, status bar, info panel and, once the
/// game is over, the result overlay.
pub fn render_play_scene(
    frame: &mut Frame,
    area: Rect,
    game: &Game,
    scores: &HighScores,
    last_result: &LastResult,
) {
    let title = format!(" Night Run - {} ", game.difficulty.name());
    let layout = create_game_layout(frame, area, &title, Color::LightMagenta, 10, 24);

    render_play_field(frame, layout.content, game);
    render_status_bar_content(frame, layout.status_bar, game);
    render_info_panel(frame, layout.info_panel, game, scores);

    if let Some(outcome) = game.outcome {
        render_result(frame, layout.content, game, outcome, last_result);
    }
}

/// Cell in the render buffer with foreground and background colors.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::Reset,
            bg: Color::Reset,
        }
    }
}

/// Grid of cells covering the whole world, with world-to-cell scaling.
struct CellBuffer {
    cols: usize,
    rows: usize,
    cells: Vec<Cell>,
    x_scale: f64,
    y_scale: f64,
}

impl CellBuffer {
    fn new(cols: u16, rows: u16, world_width: f64, world_height: f64) -> Self {
        let (cols, rows) = (cols as usize, rows as usize);
        Self {
            cols,
            rows,
            cells: vec![Cell::default(); cols * rows],
            x_scale: cols as f64 / world_width,
            y_scale: rows as f64 / world_height,
        }
    }

    fn col(&self, x: f64) -> i32 {
        (x * self.x_scale).floor() as i32
    }

    fn row(&self, y: f64) -> i32 {
        (y * self.y_scale).floor() as i32
    }

    /// World x of a column's center.
    fn world_x(&self, col: usize) -> f64 {
        (col as f64 + 0.5) / self.x_scale
    }

    fn index(&self, col: i32, row: i32) -> Option<usize> {
        if col < 0 || row < 0 || col as usize >= self.cols || row as usize >= self.rows {
            return None;
        }
        Some(row as usize * self.cols + col as usize)
    }

    fn get(&self, col: i32, row: i32) -> Option<Cell> {
        self.index(col, row).map(|i| self.cells[i])
    }

    /// Set glyph and foreground, keeping whatever background is there.
    fn put(&mut self, col: i32, row: i32, ch: char, fg: Color) {
        if let Some(i) = self.index(col, row) {
            self.cells[i].ch = ch;
            self.cells[i].fg = fg;
        }
    }

    fn put_cell(&mut self, col: i32, row: i32, cell: Cell) {
        if let Some(i) = self.index(col, row) {
            self.cells[i] = cell;
        }
    }

    /// Cell span covered by a world rectangle. Always at least one cell.
    fn span(&self, x: f64, y: f64, width: f64, height: f64) -> (i32, i32, i32, i32) {
        let c0 = self.col(x);
        let r0 = self.row(y);
        let c1 = self.col(x + width).max(c0 + 1);
        let r1 = self.row(y + height).max(r0 + 1);
        (c0, r0, c1, r1)
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, ch: char, fg: Color) {
        let (c0, r0, c1, r1) = self.span(x, y, width, height);
        for row in r0..r1 {
            for col in c0..c1 {
                self.put(col, row, ch, fg);
            }
        }
    }

    /// Corners and edges of a world rectangle.
    fn outline(&mut self, x: f64, y: f64, width: f64, height: f64, fg: Color) {
        let (c0, r0, c1, r1) = self.span(x, y, width, height);
        let (c1, r1) = (c1 - 1, r1 - 1);
        for col in c0 + 1..c1 {
            self.put(col, r0, '─', fg);
            self.put(col, r1, '─', fg);
        }
        for row in r0 + 1..r1 {
            self.put(c0, row, '│', fg);
            self.put(c1, row, '│', fg);
        }
        self.put(c0, r0, '┌', fg);
        self.put(c1, r0, '┐', fg);
        self.put(c0, r1, '└', fg);
        self.put(c1, r1, '┘', fg);
    }

    fn text(&mut self, col: i32, row: i32, text: &str, fg: Color) {
        for (i, ch) in text.chars().enumerate() {
            self.put(col + i as i32, row, ch, fg);
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        for (row_idx, row_data) in self.cells.chunks(self.cols.max(1)).enumerate() {
            let mut spans: Vec<Span> = Vec::new();
            let mut current_fg = Color::Reset;
            let mut current_bg = Color::Reset;
            let mut current_text = String::new();

            for &cell in row_data {
                if (cell.fg != current_fg || cell.bg != current_bg) && !current_text.is_empty() {
                    spans.push(Span::styled(
                        std::mem::take(&mut current_text),
                        Style::default().fg(current_fg).bg(current_bg),
                    ));
                }
                current_fg = cell.fg;
                current_bg = cell.bg;
                current_text.push(cell.ch);
            }
            if !current_text.is_empty() {
                spans.push(Span::styled(
                    current_text,
                    Style::default().fg(current_fg).bg(current_bg),
                ));
            }

            let row_area = Rect::new(area.x, area.y + row_idx as u16, self.cols as u16, 1);
            if row_area.y < area.y + area.height {
                frame.render_widget(Paragraph::new(Line::from(spans)), row_area);
            }
        }
    }
}

fn render_play_field(frame: &mut Frame, area: Rect, game: &Game) {
    if area.height < 4 || area.width < 20 {
        return;
    }
    let buffer = build_field(game, area.width, area.height);
    buffer.render(frame, area);
}

/// Draw the whole world into a buffer of `cols` x `rows` cells.
fn build_field(game: &Game, cols: u16, rows: u16) -> CellBuffer {
    let mut buf = CellBuffer::new(cols, rows, game.width, game.height);

    draw_background(&mut buf, game);
    draw_player(&mut buf, game);
    for enemy in &game.enemies {
        draw_enemy(&mut buf, enemy);
    }
    for particle in &game.particles {
        draw_particle(&mut buf, particle);
    }
    for effect in &game.collisions {
        draw_collision(&mut buf, effect);
    }
    if game.debug {
        draw_hitboxes(&mut buf, game);
    }
    draw_hud(&mut buf, game);

    buf
}

// ── Background ──────────────────────────────────────────────────────

/// (x, y) of stars within one sky layer width.
const STARS: &[(f64, f64)] = &[
    (40.0, 30.0),
    (160.0, 90.0),
    (300.0, 20.0),
    (420.0, 140.0),
    (560.0, 60.0),
    (690.0, 110.0),
    (820.0, 35.0),
    (960.0, 150.0),
    (1100.0, 70.0),
    (1240.0, 25.0),
    (1390.0, 120.0),
    (1530.0, 55.0),
];

const TREE_SPACING: f64 = 210.0;
const BUSH_SPACING: f64 = 130.0;
/// Widest background feature, in world pixels.
const FEATURE_MARGIN: f64 = 200.0;

fn draw_background(buf: &mut CellBuffer, game: &Game) {
    let ground = game.ground_line();
    let layers = &game.background.layers;

    if let Some(sky) = layers.first() {
        for &(x, y) in STARS {
            for sx in repeats(sky, x, game.width) {
                buf.put(buf.col(sx), buf.row(y), '·', SKY_STAR);
            }
        }
    }
    if let Some(hills) = layers.get(1) {
        for col in 0..buf.cols {
            let u = layer_offset(hills, buf.world_x(col));
            let top = buf.row(ground - hill_height(u, hills.width));
            for row in top..buf.row(ground) {
                buf.put(col as i32, row, '░', HILL);
            }
        }
    }
    if let Some(trees) = layers.get(2) {
        let count = (trees.width / TREE_SPACING) as usize;
        for i in 0..count {
            let x = i as f64 * TREE_SPACING + 60.0;
            for sx in repeats(trees, x, game.width) {
                buf.fill_rect(sx, ground - 150.0, 50.0, 110.0, '▲', TREE_CROWN);
                buf.fill_rect(sx + 20.0, ground - 40.0, 10.0, 40.0, '┃', TREE_TRUNK);
            }
        }
    }
    if let Some(bushes) = layers.get(3) {
        let count = (bushes.width / BUSH_SPACING) as usize;
        for i in 0..count {
            let x = i as f64 * BUSH_SPACING + 25.0;
            for sx in repeats(bushes, x, game.width) {
                buf.fill_rect(sx, ground - 25.0, 40.0, 25.0, '♣', BUSH);
            }
        }
    }

    // Ground strip scrolls with the front layer.
    let front = layers.last();
    for row in buf.row(ground).max(0)..buf.rows as i32 {
        for col in 0..buf.cols {
            let u = front.map_or(0.0, |l| layer_offset(l, buf.world_x(col)));
            let ch = if (u / 30.0) as i64 % 3 == 0 { '▒' } else { '▓' };
            buf.put_cell(
                col as i32,
                row,
                Cell {
                    ch,
                    fg: GROUND_FG,
                    bg: GROUND_BG,
                },
            );
        }
    }
}

/// Position within a repeating layer for a given screen x.
fn layer_offset(layer: &BackgroundLayer, screen_x: f64) -> f64 {
    (screen_x - layer.x).rem_euclid(layer.width)
}

/// Screen x positions where a feature at layer x `x` is visible. The layer
/// is drawn twice side by side, like an endlessly scrolling image.
fn repeats(layer: &BackgroundLayer, x: f64, view_width: f64) -> impl Iterator<Item = f64> {
    let first = layer.x + x;
    let width = layer.width;
    (-1..=2)
        .map(move |k| first + k as f64 * width)
        .filter(move |sx| *sx > -FEATURE_MARGIN && *sx < view_width)
}

fn hill_height(u: f64, width: f64) -> f64 {
    let t = u / width * std::f64::consts::TAU;
    70.0 + 35.0 * (t * 3.0).sin() + 20.0 * (t * 7.0).sin()
}

// ── Entities ────────────────────────────────────────────────────────

fn player_look(state: PlayerState, frame: u32) -> (char, Color) {
    match state {
        PlayerState::Sitting => ('▄', Color::Rgb(200, 200, 220)),
        PlayerState::Running => (if frame % 2 == 0 { '█' } else { '▓' }, Color::White),
        PlayerState::Jumping => ('▲', Color::White),
        PlayerState::Falling => ('▼', Color::White),
        PlayerState::Rolling => ('@', Color::Rgb(255, 140, 0)),
        PlayerState::Diving => ('▼', Color::Rgb(255, 90, 0)),
        PlayerState::Hit => (if frame % 2 == 0 { '×' } else { '+' }, Color::Red),
    }
}

fn draw_player(buf: &mut CellBuffer, game: &Game) {
    let p = &game.player;
    let (ch, fg) = player_look(p.state, p.animation.frame);
    // Sitting hugs the ground at half height.
    let (y, height) = if p.state == PlayerState::Sitting {
        (p.y + p.height / 2.0, p.height / 2.0)
    } else {
        (p.y, p.height)
    };
    buf.fill_rect(p.x, y, p.width, height, ch, fg);

    // Eyes on the leading edge.
    let (_, r0, c1, _) = buf.span(p.x, y, p.width, height);
    buf.put(c1 - 1, r0, '◉', Color::Yellow);
}

fn enemy_look(kind: EnemyKind, frame: u32) -> (char, Color) {
    match kind {
        EnemyKind::Flying => (
            if frame % 2 == 0 { 'W' } else { 'V' },
            Color::Rgb(180, 90, 200),
        ),
        EnemyKind::Ground => ('♠', Color::Rgb(90, 180, 70)),
        EnemyKind::Climbing => ('╳', Color::Rgb(220, 60, 60)),
    }
}

fn draw_enemy(buf: &mut CellBuffer, enemy: &Enemy) {
    if let Some((x, y)) = enemy.web_anchor() {
        let col = buf.col(x);
        for row in 0..buf.row(y).max(0) {
            buf.put(col, row, '│', Color::Rgb(150, 150, 150));
        }
    }
    let (ch, fg) = enemy_look(enemy.kind, enemy.animation.frame);
    buf.fill_rect(enemy.x, enemy.y, enemy.width, enemy.height, ch, fg);
}

fn draw_particle(buf: &mut CellBuffer, particle: &Particle) {
    let (ch, fg) = match particle.kind {
        ParticleKind::Dust => ('·', Color::Rgb(120, 120, 110)),
        ParticleKind::Splash { .. } => ('*', Color::LightRed),
        ParticleKind::Fire { .. } => (
            if particle.size > 100.0 { '✹' } else { '✦' },
            Color::Rgb(255, 160, 40),
        ),
    };
    let col = buf.col(particle.x);
    let row = buf.row(particle.y);
    // Dust never covers anything already drawn.
    if matches!(particle.kind, ParticleKind::Dust) {
        if let Some(cell) = buf.get(col, row) {
            if cell.ch != ' ' {
                return;
            }
        }
    }
    buf.put(col, row, ch, fg);
}

fn draw_collision(buf: &mut CellBuffer, effect: &CollisionEffect) {
    let ch = match effect.animation.frame {
        0 => '·',
        1 => '+',
        2 => '✶',
        3 => '✸',
        _ => '*',
    };
    let (cx, cy) = (effect.x + effect.width / 2.0, effect.y + effect.height / 2.0);
    buf.fill_rect(
        cx - effect.width / 4.0,
        cy - effect.height / 4.0,
        effect.width / 2.0,
        effect.height / 2.0,
        ch,
        Color::Yellow,
    );
}

fn draw_hitboxes(buf: &mut CellBuffer, game: &Game) {
    let p = &game.player;
    buf.outline(p.x, p.y, p.width, p.height, HITBOX);
    for e in &game.enemies {
        buf.outline(e.x, e.y, e.width, e.height, HITBOX);
    }
}

// ── HUD ─────────────────────────────────────────────────────────────

fn draw_hud(buf: &mut CellBuffer, game: &Game) {
    buf.text(1, 0, &format!("Score: {}", game.score), Color::White);
    if buf.rows > 1 {
        buf.text(
            1,
            1,
            &format!("Time: {}", format_seconds(game.time_left())),
            Color::White,
        );
    }
    if buf.rows > 2 {
        buf.text(
            1,
            2,
            &lives_text(game.lives, game.starting_lives),
            Color::LightRed,
        );
    }
    if game.debug {
        let state = game.player.state.name();
        let col = buf.cols as i32 - state.chars().count() as i32 - 1;
        buf.text(col, 0, state, HITBOX);
    }
}

fn render_status_bar_content(frame: &mut Frame, area: Rect, game: &Game) {
    if render_forfeit_status_bar(frame, area, game.forfeit_pending) {
        return;
    }
    if game.game_over {
        return;
    }

    if game.player.state == PlayerState::Sitting && game.speed == 0.0 {
        render_status_bar(
            frame,
            area,
            "Resting. Run when ready!",
            Color::LightMagenta,
            &[
                ("[→]", "Run"),
                ("[↑]", "Jump"),
                ("[Esc]", "Forfeit"),
            ],
        );
        return;
    }

    render_status_bar(
        frame,
        area,
        "Run!",
        Color::LightMagenta,
        &[
            ("[←→]", "Move"),
            ("[↑]", "Jump"),
            ("[↓]", "Sit/Dive"),
            ("[Enter]", "Roll"),
            ("[D]", "Debug"),
            ("[Esc]", "Forfeit"),
        ],
    );
}

fn render_info_panel(frame: &mut Frame, area: Rect, game: &Game, scores: &HighScores) {
    let inner = render_info_panel_frame(frame, area);

    let label = |text: &'static str| Span::styled(text, Style::default().fg(Color::DarkGray));
    let best = scores
        .best(game.difficulty)
        .map_or_else(|| "-".to_string(), |e| e.score.to_string());

    let lines: Vec<Line> = vec![
        Line::from(vec![
            label("Difficulty: "),
            Span::styled(
                game.difficulty.name(),
                Style::default().fg(Color::LightMagenta),
            ),
        ]),
        Line::from(vec![
            label("Score: "),
            Span::styled(
                format!("{}/{}", game.score, game.winning_score),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            label("Time: "),
            Span::styled(
                format_seconds(game.time_left()),
                Style::default().fg(Color::White),
            ),
        ]),
        Line::from(vec![
            label("Lives: "),
            Span::styled(
                lives_text(game.lives, game.starting_lives),
                Style::default().fg(Color::LightRed),
            ),
        ]),
        Line::from(vec![
            label("Best: "),
            Span::styled(best, Style::default().fg(Color::Cyan)),
        ]),
        Line::from(""),
        Line::from(vec![
            label("Destroyed: "),
            Span::styled(
                game.enemies_destroyed.to_string(),
                Style::default().fg(Color::White),
            ),
        ]),
        Line::from(vec![
            label("Hits: "),
            Span::styled(game.hits_taken.to_string(), Style::default().fg(Color::White)),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Legend:",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        legend_line(enemy_look(EnemyKind::Flying, 0), "Flying"),
        legend_line(enemy_look(EnemyKind::Ground, 0), "Ground"),
        legend_line(enemy_look(EnemyKind::Climbing, 0), "Climbing"),
        Line::from(""),
        Line::from(Span::styled(
            "Roll or dive into",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(
            "enemies to score.",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    frame.render_widget(Paragraph::new(lines), inner);
}

fn legend_line((ch, fg): (char, Color), name: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!(" {} ", ch), Style::default().fg(fg)),
        Span::styled(name, Style::default().fg(Color::DarkGray)),
    ])
}

/// Title and message for a finished game.
pub fn result_text(outcome: GameOutcome) -> (&'static str, &'static str) {
    match outcome {
        GameOutcome::Win => (
            "Boo-yah",
            "What are creatures of the night afraid of? YOU!!!",
        ),
        GameOutcome::Loss => ("Love at first bite?", "Nope. Better luck next time!"),
        GameOutcome::Forfeit => ("Forfeited", "The night will still be here."),
    }
}

fn render_result(
    frame: &mut Frame,
    area: Rect,
    game: &Game,
    outcome: GameOutcome,
    last_result: &LastResult,
) {
    let (title, message) = result_text(outcome);
    let mut result = format!("Score {} of {} needed", game.score, game.winning_score + 1);
    if last_result.new_best {
        result.push_str("  -  New best!");
    } else if let Some(rank) = last_result.rank {
        result.push_str(&format!("  -  #{} on the board", rank + 1));
    }
    render_game_over_overlay(frame, area, outcome, title, message, &result);
}
