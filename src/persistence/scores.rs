//! High-score table (`scores.json`), best runs per difficulty.

use crate::core::constants::HIGH_SCORES_PER_DIFFICULTY;
use crate::core::difficulty::Difficulty;
use crate::game::{Game, GameOutcome};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

pub const SCORES_FILE: &str = "scores.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub difficulty: Difficulty,
    pub score: i32,
    pub outcome: GameOutcome,
    /// Game time survived.
    pub time_ms: u64,
    pub lives_left: u32,
    /// Unix timestamp (seconds).
    pub recorded_at: i64,
}

impl ScoreEntry {
    /// Snapshot a finished game. Unfinished and forfeited games are not scored.
    pub fn from_game(game: &Game, recorded_at: i64) -> Option<Self> {
        match game.outcome? {
            GameOutcome::Forfeit => None,
            outcome => Some(Self {
                difficulty: game.difficulty,
                score: game.score,
                outcome,
                time_ms: game.time.min(game.max_time).max(0.0) as u64,
                lives_left: game.lives,
                recorded_at,
            }),
        }
    }

    /// Recorded date as `YYYY-MM-DD`.
    pub fn date(&self) -> String {
        chrono::DateTime::<chrono::Utc>::from_timestamp(self.recorded_at, 0)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "----------".to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HighScores {
    #[serde(default)]
    pub entries: Vec<ScoreEntry>,
}

impl HighScores {
    /// Load the table, or an empty one when the file is missing or corrupt.
    pub fn load_or_default(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                log::warn!("ignoring unreadable scores {}: {}", path.display(), e);
                Self::default()
            }),
            Err(_) => Self::default(),
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

    /// Insert an entry. Returns its 0-based rank within its difficulty, or
    /// `None` when it did not make the table.
    pub fn record(&mut self, entry: ScoreEntry) -> Option<usize> {
        let difficulty = entry.difficulty;
        // Ties keep the earlier run ahead.
        let rank = self
            .top(difficulty)
            .iter()
            .take_while(|e| e.score >= entry.score)
            .count();
        if rank >= HIGH_SCORES_PER_DIFFICULTY {
            return None;
        }

        self.entries.push(entry);
        self.normalize(difficulty);
        Some(rank)
    }

    /// Entries for one difficulty, best first.
    pub fn top(&self, difficulty: Difficulty) -> Vec<&ScoreEntry> {
        let mut top: Vec<&ScoreEntry> = self
            .entries
            .iter()
            .filter(|e| e.difficulty == difficulty)
            .collect();
        top.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then(a.recorded_at.cmp(&b.recorded_at))
        });
        top
    }

    pub fn best(&self, difficulty: Difficulty) -> Option<&ScoreEntry> {
        self.top(difficulty).into_iter().next()
    }

    /// Keep only the best entries for `difficulty`, preserving the rest.
    fn normalize(&mut self, difficulty: Difficulty) {
        let keep: Vec<ScoreEntry> = self
            .top(difficulty)
            .into_iter()
            .take(HIGH_SCORES_PER_DIFFICULTY)
            .cloned()
            .collect();
        self.entries.retain(|e| e.difficulty != difficulty);
        self.entries.extend(keep);
    }
}
