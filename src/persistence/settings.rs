//! User settings (`settings.json`).

use crate::core::constants::DEFAULT_KEY_HOLD_MS;
use crate::core::difficulty::Difficulty;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

pub const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Preselected on the menu.
    pub difficulty: Difficulty,
    pub sound: bool,
    /// How long a key stays held without a release event.
    pub key_hold_ms: u64,
    /// Start games with hitboxes shown.
    pub debug: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Easy,
            sound: true,
            key_hold_ms: DEFAULT_KEY_HOLD_MS,
            debug: false,
        }
    }
}

impl Settings {
    /// Load settings, or defaults when the file is missing or unreadable.
    pub fn load_or_default(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                log::warn!("ignoring unreadable settings {}: {}", path.display(), e);
                Self::default()
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                log::warn!("could not read settings {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, json)
    }
}
