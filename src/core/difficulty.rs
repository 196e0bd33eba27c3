//! Difficulty levels and the tuning table behind them.

use serde::{Deserialize, Serialize};

/// Difficulty selected on the menu (or with `--difficulty`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

/// Per-interval spawn probabilities. A weight of 1 or more always spawns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnWeights {
    pub ground: f64,
    pub climbing: f64,
    pub flying: f64,
}

/// Numeric constants applied to a new game.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyParams {
    /// Scroll speed in px/frame at a speed multiplier of 1.
    pub max_speed: f64,
    /// Milliseconds between enemy spawn attempts.
    pub enemy_interval_ms: f64,
    pub lives: u32,
    /// Score that must be exceeded when time runs out.
    pub winning_score: i32,
    pub time_limit_ms: f64,
    pub spawn: SpawnWeights,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn from_index(index: usize) -> Self {
        Self::ALL.get(index).copied().unwrap_or_default()
    }

    pub fn index(&self) -> usize {
        match self {
            Self::Easy => 0,
            Self::Medium => 1,
            Self::Hard => 2,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }

    /// Case-insensitive lookup by name. `None` for anything unrecognised.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(name.trim()))
    }

    pub fn params(&self) -> DifficultyParams {
        match self {
            Self::Easy => DifficultyParams {
                max_speed: 3.0,
                enemy_interval_ms: 900.0,
                lives: 5,
                winning_score: 60,
                time_limit_ms: 40_000.0,
                spawn: SpawnWeights {
                    ground: 0.4,
                    climbing: 0.5,
                    flying: 1.0,
                },
            },
            Self::Medium => DifficultyParams {
                max_speed: 4.0,
                enemy_interval_ms: 700.0,
                lives: 3,
                winning_score: 70,
                time_limit_ms: 30_000.0,
                spawn: SpawnWeights {
                    ground: 0.6,
                    climbing: 0.7,
                    flying: 1.0,
                },
            },
            Self::Hard => DifficultyParams {
                max_speed: 5.0,
                enemy_interval_ms: 500.0,
                lives: 2,
                winning_score: 85,
                time_limit_ms: 25_000.0,
                spawn: SpawnWeights {
                    ground: 0.8,
                    climbing: 0.9,
                    flying: 2.0,
                },
            },
        }
    }

    /// One-line summary for the menu.
    pub fn summary(&self) -> String {
        let p = self.params();
        format!(
            "{} lives, {}s, beat {} points",
            p.lives,
            (p.time_limit_ms / 1000.0).round() as u32,
            p.winning_score
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_easy_parameters() {
        let p = Difficulty::Easy.params();
        assert!((p.max_speed - 3.0).abs() < f64::EPSILON);
        assert!((p.enemy_interval_ms - 900.0).abs() < f64::EPSILON);
        assert_eq!(p.lives, 5);
        assert_eq!(p.winning_score, 60);
        assert!((p.time_limit_ms - 40_000.0).abs() < f64::EPSILON);
        assert!((p.spawn.ground - 0.4).abs() < f64::EPSILON);
        assert!((p.spawn.climbing - 0.5).abs() < f64::EPSILON);
        assert!((p.spawn.flying - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hard_parameters() {
        let p = Difficulty::Hard.params();
        assert!((p.max_speed - 5.0).abs() < f64::EPSILON);
        assert!((p.enemy_interval_ms - 500.0).abs() < f64::EPSILON);
        assert_eq!(p.lives, 2);
        assert_eq!(p.winning_score, 85);
        assert!((p.time_limit_ms - 25_000.0).abs() < f64::EPSILON);
        assert!((p.spawn.flying - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_harder_levels_are_stricter() {
        for pair in Difficulty::ALL.windows(2) {
            let (easier, harder) = (pair[0].params(), pair[1].params());
            assert!(harder.max_speed > easier.max_speed);
            assert!(harder.enemy_interval_ms < easier.enemy_interval_ms);
            assert!(harder.lives < easier.lives);
            assert!(harder.winning_score > easier.winning_score);
            assert!(harder.time_limit_ms < easier.time_limit_ms);
        }
    }

    #[test]
    fn test_from_index_falls_back_to_easy() {
        assert_eq!(Difficulty::from_index(0), Difficulty::Easy);
        assert_eq!(Difficulty::from_index(1), Difficulty::Medium);
        assert_eq!(Difficulty::from_index(2), Difficulty::Hard);
        assert_eq!(Difficulty::from_index(99), Difficulty::Easy);
    }

    #[test]
    fn test_index_round_trips_through_from_index() {
        for d in Difficulty::ALL {
            assert_eq!(Difficulty::from_index(d.index()), d);
        }
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Difficulty::from_name("easy"), Some(Difficulty::Easy));
        assert_eq!(Difficulty::from_name("MEDIUM"), Some(Difficulty::Medium));
        assert_eq!(Difficulty::from_name(" Hard "), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_name("nightmare"), None);
    }

    #[test]
    fn test_default_is_easy() {
        assert_eq!(Difficulty::default(), Difficulty::Easy);
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        let json = serde_json::to_string(&Difficulty::Medium).unwrap();
        assert_eq!(json, "\"medium\"");
        let parsed: Difficulty = serde_json::from_str("\"hard\"").unwrap();
        assert_eq!(parsed, Difficulty::Hard);
    }

    #[test]
    fn test_summary_mentions_lives_and_time() {
        assert_eq!(Difficulty::Easy.summary(), "5 lives, 40s, beat 60 points");
        assert_eq!(Difficulty::Hard.summary(), "2 lives, 25s, beat 85 points");
    }
}
