//! Night Run Headless Balance Simulator
//!
//! Plays seeded games with a scripted bot and no UI, using the same
//! `tick()` as the real game, then reports win rate, scores and lives per
//! difficulty.
//!
//! Usage:
//!   cargo run --bin simulator -- [OPTIONS]
//!
//! Options:
//!   --runs N            Games per difficulty (default: 100)
//!   --seed N            First RNG seed, incremented per game (default: 42)
//!   --difficulty NAME   Only simulate one difficulty
//!   --strategy NAME     idle, runner or roller (default: roller)
//!   --verbose           One line per game
//!   --quiet             Only the summary table

use nightrun::core::constants::FRAME_MS;
use nightrun::core::difficulty::Difficulty;
use nightrun::game::{self, EnemyKind, Game, GameEvent, GameOutcome, PlayerState};
use nightrun::input::{InputHandler, Key, RunnerInput};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// ── CLI Configuration ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    /// Never touches the keyboard: the world never scrolls.
    Idle,
    /// Runs and jumps over anything low ahead.
    Runner,
    /// Runs and rolls through anything ahead.
    Roller,
}

impl Strategy {
    fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "idle" => Some(Self::Idle),
            "runner" => Some(Self::Runner),
            "roller" => Some(Self::Roller),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Runner => "runner",
            Self::Roller => "roller",
        }
    }
}

struct SimConfig {
    runs: u32,
    seed: u64,
    difficulty: Option<Difficulty>,
    strategy: Strategy,
    verbose: bool,
    quiet: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            runs: 100,
            seed: 42,
            difficulty: None,
            strategy: Strategy::Roller,
            verbose: false,
            quiet: false,
        }
    }
}

fn parse_args() -> SimConfig {
    let args: Vec<String> = std::env::args().collect();
    let mut config = SimConfig::default();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--runs" => {
                i += 1;
                config.runs = value(&args, i, "--runs")
                    .parse()
                    .unwrap_or_else(|_| usage_error("--runs requires a number"));
            }
            "--seed" => {
                i += 1;
                config.seed = value(&args, i, "--seed")
                    .parse()
                    .unwrap_or_else(|_| usage_error("--seed requires a number"));
            }
            "--difficulty" => {
                i += 1;
                let name = value(&args, i, "--difficulty");
                config.difficulty = Some(
                    Difficulty::from_name(name)
                        .unwrap_or_else(|| usage_error(&format!("Unknown difficulty: {name}"))),
                );
            }
            "--strategy" => {
                i += 1;
                let name = value(&args, i, "--strategy");
                config.strategy = Strategy::from_name(name)
                    .unwrap_or_else(|| usage_error(&format!("Unknown strategy: {name}")));
            }
            "--verbose" => config.verbose = true,
            "--quiet" => config.quiet = true,
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => usage_error(&format!("Unknown argument: {other}")),
        }
        i += 1;
    }
    config
}

fn value<'a>(args: &'a [String], i: usize, flag: &str) -> &'a str {
    match args.get(i) {
        Some(v) => v,
        None => usage_error(&format!("{flag} requires a value")),
    }
}

fn usage_error(message: &str) -> ! {
    eprintln!("{message}");
    print_usage();
    std::process::exit(1);
}

fn print_usage() {
    eprintln!(
        "Night Run Headless Simulator\n\
         \n\
         Usage: simulator [OPTIONS]\n\
         \n\
         Options:\n\
         \x20 --runs N            Games per difficulty (default: 100)\n\
         \x20 --seed N            First RNG seed (default: 42)\n\
         \x20 --difficulty NAME   Only simulate one difficulty\n\
         \x20 --strategy NAME     idle, runner or roller (default: roller)\n\
         \x20 --verbose           One line per game\n\
         \x20 --quiet             Only the summary table\n\
         \x20 --help, -h          Show this help"
    );
}

// ── Bot ──────────────────────────────────────────────────────────────

/// How far ahead (px) the bot reacts to enemies.
const LOOKAHEAD: f64 = 160.0;

/// Nearest enemy ahead of the player that it could run into.
fn threat_ahead(game: &Game) -> Option<EnemyKind> {
    let p = &game.player;
    game.enemies
        .iter()
        .filter(|e| {
            let dx = e.x - (p.x + p.width);
            dx > -p.width && dx < LOOKAHEAD && e.y < p.y + p.height && e.y + e.height > p.y - 60.0
        })
        .min_by(|a, b| a.x.total_cmp(&b.x))
        .map(|e| e.kind)
}

/// Keys the bot wants held this frame.
fn bot_keys(strategy: Strategy, game: &Game) -> Vec<Key> {
    match strategy {
        Strategy::Idle => Vec::new(),
        Strategy::Runner => {
            let mut keys = vec![Key::ArrowRight];
            if matches!(
                threat_ahead(game),
                Some(EnemyKind::Ground) | Some(EnemyKind::Climbing)
            ) {
                keys.push(Key::ArrowUp);
            }
            keys
        }
        Strategy::Roller => {
            let mut keys = vec![Key::ArrowRight];
            // Rolling only starts from running, so let the first frames run.
            if threat_ahead(game).is_some() && game.player.state != PlayerState::Sitting {
                keys.push(Key::Enter);
            }
            keys
        }
    }
}

/// Press and release keys so the held set matches `wanted`.
fn apply_keys(game: &mut Game, wanted: &[Key], now_ms: u64) {
    for key in game.input.keys() {
        if !wanted.contains(&key) {
            game::process_input(game, RunnerInput::Release(key), now_ms);
        }
    }
    for &key in wanted {
        if !game.input.is_down(key) {
            game::process_input(game, RunnerInput::Press(key), now_ms);
        }
    }
}

// ── Simulation ───────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct GameStats {
    outcome: GameOutcome,
    score: i32,
    lives_left: u32,
    destroyed: u32,
    hits: u32,
    spawned: u32,
}

fn run_game(difficulty: Difficulty, strategy: Strategy, seed: u64) -> GameStats {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut game = Game::new(difficulty).with_input(InputHandler::new(None));
    let mut spawned = 0;
    let mut now_ms = 0;
    // Safety valve: the clock always ends the game well before this.
    let max_frames = (game.max_time / FRAME_MS as f64) as u64 + 100;

    while game.is_running() && game.frame_count < max_frames {
        let wanted = bot_keys(strategy, &game);
        apply_keys(&mut game, &wanted, now_ms);

        for event in game::tick(&mut game, FRAME_MS, &mut rng) {
            if let GameEvent::EnemySpawned { .. } = event {
                spawned += 1;
            }
        }
        now_ms += FRAME_MS;
    }

    GameStats {
        outcome: game.outcome.unwrap_or(GameOutcome::Loss),
        score: game.score,
        lives_left: game.lives,
        destroyed: game.enemies_destroyed,
        hits: game.hits_taken,
        spawned,
    }
}

fn mean<T: Into<f64> + Copy>(values: impl Iterator<Item = T>) -> f64 {
    let (sum, n) = values.fold((0.0, 0u32), |(s, n), v| (s + v.into(), n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

fn print_summary(difficulty: Difficulty, stats: &[GameStats]) {
    let wins = stats
        .iter()
        .filter(|s| s.outcome == GameOutcome::Win)
        .count();
    let win_rate = if stats.is_empty() {
        0.0
    } else {
        wins as f64 / stats.len() as f64 * 100.0
    };
    let best = stats.iter().map(|s| s.score).max().unwrap_or(0);

    println!(
        "{:<8} {:>6} {:>8.1}% {:>10.1} {:>6} {:>10.2} {:>10.1} {:>8.1} {:>8.1}",
        difficulty.name(),
        stats.len(),
        win_rate,
        mean(stats.iter().map(|s| s.score)),
        best,
        mean(stats.iter().map(|s| s.lives_left)),
        mean(stats.iter().map(|s| s.destroyed)),
        mean(stats.iter().map(|s| s.hits)),
        mean(stats.iter().map(|s| s.spawned)),
    );
}

// ── Main ─────────────────────────────────────────────────────────────

fn main() {
    let config = parse_args();
    let difficulties: Vec<Difficulty> = match config.difficulty {
        Some(d) => vec![d],
        None => Difficulty::ALL.to_vec(),
    };

    if !config.quiet {
        eprintln!(
            "Night Run Simulator: {} game(s) per difficulty, strategy={}, seed={}",
            config.runs,
            config.strategy.name(),
            config.seed
        );
    }

    let mut results = Vec::with_capacity(difficulties.len());
    for &difficulty in &difficulties {
        let mut stats = Vec::with_capacity(config.runs as usize);
        for run in 0..config.runs {
            let seed = config.seed + run as u64;
            let game = run_game(difficulty, config.strategy, seed);
            if config.verbose && !config.quiet {
                println!(
                    "  {} run {} (seed={seed}): {} score={} lives={} destroyed={} hits={}",
                    difficulty.name(),
                    run + 1,
                    game.outcome.name(),
                    game.score,
                    game.lives_left,
                    game.destroyed,
                    game.hits
                );
            }
            stats.push(game);
        }
        results.push((difficulty, stats));
    }

    println!();
    println!(
        "{:<8} {:>6} {:>9} {:>10} {:>6} {:>10} {:>10} {:>8} {:>8}",
        "Level", "Games", "Win rate", "Mean score", "Best", "Mean lives", "Destroyed", "Hits",
        "Spawned"
    );
    for (difficulty, stats) in &results {
        print_summary(*difficulty, stats);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nightrun::game::Enemy;

    #[test]
    fn test_strategy_names() {
        for s in [Strategy::Idle, Strategy::Runner, Strategy::Roller] {
            assert_eq!(Strategy::from_name(s.name()), Some(s));
        }
        assert_eq!(Strategy::from_name("RUNNER"), Some(Strategy::Runner));
        assert_eq!(Strategy::from_name("dancer"), None);
    }

    #[test]
    fn test_idle_never_scrolls_or_scores() {
        let stats = run_game(Difficulty::Easy, Strategy::Idle, 1);
        assert_eq!(stats.destroyed, 0);
        assert_eq!(stats.outcome, GameOutcome::Loss);
    }

    #[test]
    fn test_games_end() {
        for strategy in [Strategy::Runner, Strategy::Roller] {
            let stats = run_game(Difficulty::Hard, strategy, 3);
            assert!(stats.spawned > 0);
            assert!(stats.lives_left <= 2);
        }
    }

    #[test]
    fn test_same_seed_same_game() {
        let a = run_game(Difficulty::Medium, Strategy::Roller, 11);
        let b = run_game(Difficulty::Medium, Strategy::Roller, 11);
        assert_eq!(a.score, b.score);
        assert_eq!(a.lives_left, b.lives_left);
        assert_eq!(a.spawned, b.spawned);
    }

    #[test]
    fn test_roller_holds_enter_near_enemy() {
        let mut game = Game::new(Difficulty::Easy).with_input(InputHandler::new(None));
        game::player::set_state(&mut game, PlayerState::Running, 1.0);
        assert_eq!(bot_keys(Strategy::Roller, &game), vec![Key::ArrowRight]);

        let mut enemy = Enemy::ground();
        enemy.x = game.player.x + game.player.width + 50.0;
        game.enemies.push(enemy);
        assert_eq!(
            bot_keys(Strategy::Roller, &game),
            vec![Key::ArrowRight, Key::Enter]
        );
    }

    #[test]
    fn test_apply_keys_presses_and_releases() {
        let mut game = Game::new(Difficulty::Easy).with_input(InputHandler::new(None));
        apply_keys(&mut game, &[Key::ArrowRight, Key::Enter], 0);
        assert!(game.input.is_down(Key::ArrowRight));
        assert!(game.input.is_down(Key::Enter));

        apply_keys(&mut game, &[Key::ArrowRight], 16);
        assert!(!game.input.is_down(Key::Enter));
        assert!(game.input.is_down(Key::ArrowRight));
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean([1u32, 2, 3].into_iter()), 2.0);
        assert_eq!(mean(std::iter::empty::<i32>()), 0.0);
    }
}
