//! File logging. The terminal belongs to the game, so log records go to
//! `nightrun.log` in the data directory instead of stderr.

use env_logger::{Builder, Env, Target};
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

pub const LOG_FILE: &str = "nightrun.log";

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "warn";

/// Install the global logger, appending to `dir/nightrun.log`.
///
/// `debug` raises the default filter to `debug` (an explicit `RUST_LOG`
/// still wins). Returns the log file path.
pub fn init(dir: &Path, debug: bool) -> io::Result<PathBuf> {
    let path = dir.join(LOG_FILE);
    let file = open_log(&path)?;

    let default_filter = if debug { "debug" } else { DEFAULT_FILTER };
    Builder::from_env(Env::default().default_filter_or(default_filter))
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::AlreadyExists, e))?;

    log::info!(
        "nightrun {} logging to {}",
        crate::build_info::version_string(),
        path.display()
    );
    Ok(path)
}

fn open_log(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}
