//! Command-line arguments for the `nightrun` binary.

use crate::core::difficulty::Difficulty;

pub const USAGE: &str = "\
Night Run - endless runner for the terminal

Usage: nightrun [options]

Options:
  --difficulty NAME  Skip the menu and start on easy, medium or hard
  --seed N           Seed the random number generator (replayable runs)
  --no-sound         Disable the collision bell
  --debug            Show hitboxes and log at debug level
  --serve[=PORT]     Mirror the game to a browser (web builds, default 3000)
  --version          Show version information
  --help             Show this help message";

pub const DEFAULT_SERVE_PORT: u16 = 3000;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayOptions {
    pub difficulty: Option<Difficulty>,
    pub seed: Option<u64>,
    pub no_sound: bool,
    pub debug: bool,
    /// Port for the web viewer.
    pub serve: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Play(PlayOptions),
    Version,
    Help,
}

/// Parse arguments (without the program name).
pub fn parse_args<I>(args: I) -> Result<Command, String>
where
    I: IntoIterator<Item = String>,
{
    let mut options = PlayOptions::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) => (flag.to_string(), Some(value.to_string())),
            None => (arg.clone(), None),
        };

        match flag.as_str() {
            "--version" | "-v" => return Ok(Command::Version),
            "--help" | "-h" => return Ok(Command::Help),
            "--no-sound" => options.no_sound = true,
            "--debug" => options.debug = true,
            "--difficulty" => {
                let value = inline
                    .or_else(|| args.next())
                    .ok_or("--difficulty needs a value")?;
                let difficulty = Difficulty::from_name(&value)
                    .ok_or_else(|| format!("Unknown difficulty: {}", value))?;
                options.difficulty = Some(difficulty);
            }
            "--seed" => {
                let value = inline.or_else(|| args.next()).ok_or("--seed needs a value")?;
                let seed = value
                    .parse::<u64>()
                    .map_err(|_| format!("Invalid seed: {}", value))?;
                options.seed = Some(seed);
            }
            "--serve" => {
                let port = match inline {
                    Some(value) => value
                        .parse::<u16>()
                        .map_err(|_| format!("Invalid port: {}", value))?,
                    None => DEFAULT_SERVE_PORT,
                };
                options.serve = Some(port);
            }
            _ => return Err(format!("Unknown argument: {}", arg)),
        }
    }

    Ok(Command::Play(options))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Command, String> {
        parse_args(args.iter().map(|s| s.to_string()))
    }

    fn play(args: &[&str]) -> PlayOptions {
        match parse(args) {
            Ok(Command::Play(options)) => options,
            other => panic!("expected play options, got {:?}", other),
        }
    }

    #[test]
    fn test_no_args_plays_with_defaults() {
        assert_eq!(play(&[]), PlayOptions::default());
    }

    #[test]
    fn test_flags() {
        let options = play(&["--difficulty", "HARD", "--seed=42", "--no-sound", "--debug"]);
        assert_eq!(options.difficulty, Some(Difficulty::Hard));
        assert_eq!(options.seed, Some(42));
        assert!(options.no_sound);
        assert!(options.debug);
        assert_eq!(options.serve, None);
    }

    #[test]
    fn test_serve_port() {
        assert_eq!(play(&["--serve"]).serve, Some(3000));
        assert_eq!(play(&["--serve=8080"]).serve, Some(8080));
        assert!(parse(&["--serve=http"]).is_err());
    }

    #[test]
    fn test_version_and_help() {
        assert_eq!(parse(&["--version"]), Ok(Command::Version));
        assert_eq!(parse(&["--seed", "1", "-h"]), Ok(Command::Help));
    }

    #[test]
    fn test_errors() {
        assert!(parse(&["--difficulty"]).is_err());
        assert!(parse(&["--difficulty", "nightmare"]).is_err());
        assert!(parse(&["--seed", "-3"]).is_err());
        assert!(parse(&["update"]).is_err());
    }
}
