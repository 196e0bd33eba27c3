use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyModifiers, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use nightrun::app::App;
use nightrun::build_info;
use nightrun::cli::{self, Command};
use nightrun::core::constants::FRAME_MS;
use nightrun::logging;
use nightrun::persistence::{self, HighScores, Settings};
use nightrun::ui;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Write};
use std::time::{Duration, Instant};

fn main() -> io::Result<()> {
    let options = match cli::parse_args(std::env::args().skip(1)) {
        Ok(Command::Play(options)) => options,
        Ok(Command::Version) => {
            println!("nightrun {}", build_info::version_string());
            return Ok(());
        }
        Ok(Command::Help) => {
            println!("{}", cli::USAGE);
            return Ok(());
        }
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("Run 'nightrun --help' for usage.");
            std::process::exit(1);
        }
    };

    let data_dir = persistence::data_dir()?;
    if let Err(e) = logging::init(&data_dir, options.debug) {
        eprintln!("Logging disabled: {}", e);
    }

    let settings_path = data_dir.join(persistence::settings::SETTINGS_FILE);
    let saved_settings = Settings::load_or_default(&settings_path);
    let mut settings = saved_settings.clone();
    if options.no_sound {
        settings.sound = false;
    }
    if options.debug {
        settings.debug = true;
    }

    let scores_path = data_dir.join(persistence::scores::SCORES_FILE);
    let scores = HighScores::load_or_default(&scores_path);

    let seed = options.seed.unwrap_or_else(rand::random);
    log::info!("rng seed {}", seed);
    let mut app = App::new(settings, scores, ChaCha8Rng::seed_from_u64(seed))
        .with_scores_path(scores_path);
    if let Some(difficulty) = options.difficulty {
        app.start_game(difficulty);
    }

    match options.serve {
        None => run_terminal(io::stdout(), &mut app, || None)?,
        Some(port) => serve(port, &mut app)?,
    }

    // Only the menu choice is remembered; CLI overrides stay one-off.
    let settings = Settings {
        difficulty: app.menu.selected,
        ..saved_settings
    };
    if let Err(e) = settings.save(&settings_path) {
        log::warn!("could not save settings: {}", e);
    }
    Ok(())
}

#[cfg(feature = "web")]
fn serve<R: Rng>(port: u16, app: &mut App<R>) -> io::Result<()> {
    use nightrun::web::{start_web_server, TeeWriter, WebServer};
    use std::sync::Arc;

    let server = Arc::new(WebServer::new());
    let runtime = tokio::runtime::Runtime::new()?;
    let background = Arc::clone(&server);
    std::thread::spawn(move || {
        runtime.block_on(async move {
            if let Err(e) = start_web_server(port, background).await {
                log::error!("web server stopped: {}", e);
            }
        });
    });

    let out = TeeWriter::new(server.output_sender());
    run_terminal(out, app, || server.try_recv_input_sync())
}

#[cfg(not(feature = "web"))]
fn serve<R: Rng>(_port: u16, _app: &mut App<R>) -> io::Result<()> {
    eprintln!("This build has no web support. Rebuild with `--features web`.");
    std::process::exit(1);
}

/// Set up the terminal, run the game loop, and restore the terminal even
/// when the loop fails.
fn run_terminal<W, R, F>(out: W, app: &mut App<R>, mut remote_input: F) -> io::Result<()>
where
    W: Write,
    R: Rng,
    F: FnMut() -> Option<KeyEvent>,
{
    enable_raw_mode()?;
    // With release events a held key stays held until it is let go.
    let enhanced = supports_keyboard_enhancement().unwrap_or(false);
    log::debug!("keyboard enhancement: {}", enhanced);

    let mut terminal = match Terminal::new(CrosstermBackend::new(out)) {
        Ok(terminal) => terminal,
        Err(e) => {
            let _ = disable_raw_mode();
            return Err(e);
        }
    };
    if let Err(e) = enter_screen(terminal.backend_mut(), enhanced) {
        let _ = disable_raw_mode();
        return Err(e);
    }
    if enhanced {
        app.set_hold_window(None);
    }

    let result = terminal
        .clear()
        .and_then(|()| game_loop(&mut terminal, app, &mut remote_input));

    let left = leave_screen(terminal.backend_mut(), enhanced);
    let raw = disable_raw_mode();
    let cursor = terminal.show_cursor();
    result.and(left).and(raw).and(cursor)
}

/// Switch to the alternate screen and, if `enhanced`, ask for key release
/// events. Leaves the screen again when a step fails.
fn enter_screen<W: Write>(out: &mut W, enhanced: bool) -> io::Result<()> {
    out.execute(EnterAlternateScreen)?;
    if enhanced {
        let pushed = out
            .execute(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))
            .map(|_| ());
        if let Err(e) = pushed {
            let _ = out.execute(LeaveAlternateScreen);
            return Err(e);
        }
    }
    Ok(())
}

/// Undo `enter_screen`. Every step is attempted; the first error is returned.
fn leave_screen<W: Write>(out: &mut W, enhanced: bool) -> io::Result<()> {
    let popped = if enhanced {
        out.execute(PopKeyboardEnhancementFlags).map(|_| ())
    } else {
        Ok(())
    };
    let left = out.execute(LeaveAlternateScreen).map(|_| ());
    popped.and(left)
}

fn game_loop<W, R, F>(
    terminal: &mut Terminal<CrosstermBackend<W>>,
    app: &mut App<R>,
    remote_input: &mut F,
) -> io::Result<()>
where
    W: Write,
    R: Rng,
    F: FnMut() -> Option<KeyEvent>,
{
    let start = Instant::now();
    let frame = Duration::from_millis(FRAME_MS);
    let mut last_tick = Instant::now();
    let now_ms = || start.elapsed().as_millis() as u64;

    while !app.quit {
        terminal.draw(|f| ui::draw(f, app))?;

        // Wait for input until the next frame is due, then drain the queue.
        let timeout = frame.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            loop {
                if let Event::Key(key) = event::read()? {
                    if is_interrupt(&key) {
                        app.quit = true;
                    } else {
                        app.handle_key(&key, now_ms());
                    }
                }
                if !event::poll(Duration::ZERO)? {
                    break;
                }
            }
        }
        while let Some(key) = remote_input() {
            app.handle_key(&key, now_ms());
        }

        let elapsed = last_tick.elapsed();
        if elapsed >= frame {
            last_tick = Instant::now();
            app.tick(elapsed.as_millis() as u64, now_ms());
            app.flush_audio(terminal.backend_mut())?;
        }
    }

    Ok(())
}

/// Raw mode swallows SIGINT; Ctrl+C arrives as a key.
fn is_interrupt(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}
