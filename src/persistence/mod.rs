//! Settings and high scores on disk (JSON under the platform config dir).

pub mod scores;
pub mod settings;

pub use scores::{HighScores, ScoreEntry};
pub use settings::Settings;

use directories::ProjectDirs;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Overrides the storage directory (used for portable installs and tests).
pub const HOME_ENV_VAR: &str = "NIGHTRUN_HOME";

/// Directory holding settings, scores and the log file. Created on demand.
pub fn data_dir() -> io::Result<PathBuf> {
    let dir = match std::env::var_os(HOME_ENV_VAR) {
        Some(dir) => PathBuf::from(dir),
        None => ProjectDirs::from("", "", "nightrun")
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    "Could not determine config directory",
                )
            })?
            .config_dir()
            .to_path_buf(),
    };
    fs::create_dir_all(&dir)?;
    Ok(dir)
}
