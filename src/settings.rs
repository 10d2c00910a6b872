use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::StoreError;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    Expert,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Normal,
        Difficulty::Hard,
        Difficulty::Expert,
    ];

    /// Seconds between two snake moves.
    pub fn move_interval(self) -> f64 {
        match self {
            Difficulty::Easy => 0.15,
            Difficulty::Normal => 0.1,
            Difficulty::Hard => 0.07,
            Difficulty::Expert => 0.05,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
            Difficulty::Expert => "Expert",
        }
    }

    pub fn next(self) -> Difficulty {
        match self {
            Difficulty::Easy => Difficulty::Normal,
            Difficulty::Normal => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Expert,
            Difficulty::Expert => Difficulty::Easy,
        }
    }

    pub fn prev(self) -> Difficulty {
        match self {
            Difficulty::Easy => Difficulty::Expert,
            Difficulty::Normal => Difficulty::Easy,
            Difficulty::Hard => Difficulty::Normal,
            Difficulty::Expert => Difficulty::Hard,
        }
    }
}

/// Best score per difficulty, stored as `{"Easy": n, "Normal": n, ...}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HighScores {
    #[serde(rename = "Easy")]
    easy: u32,
    #[serde(rename = "Normal")]
    normal: u32,
    #[serde(rename = "Hard")]
    hard: u32,
    #[serde(rename = "Expert")]
    expert: u32,
}

impl HighScores {
    pub fn get(&self, difficulty: Difficulty) -> u32 {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Normal => self.normal,
            Difficulty::Hard => self.hard,
            Difficulty::Expert => self.expert,
        }
    }

    fn slot(&mut self, difficulty: Difficulty) -> &mut u32 {
        match difficulty {
            Difficulty::Easy => &mut self.easy,
            Difficulty::Normal => &mut self.normal,
            Difficulty::Hard => &mut self.hard,
            Difficulty::Expert => &mut self.expert,
        }
    }
}

/// High scores bound to their file.
#[derive(Debug, Clone)]
pub struct HighScoreStore {
    path: PathBuf,
    scores: HighScores,
}

impl HighScoreStore {
    /// Reads the store; a missing or unreadable file yields all zeros.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let scores = match Self::read(&path) {
            Ok(scores) => scores,
            Err(e) => {
                debug!("Using default high scores: {e}");
                HighScores::default()
            }
        };
        Self { path, scores }
    }

    fn read(path: &Path) -> Result<HighScores, StoreError> {
        let text = fs::read_to_string(path).map_err(|source| StoreError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn scores(&self) -> &HighScores {
        &self.scores
    }

    pub fn best(&self, difficulty: Difficulty) -> u32 {
        self.scores.get(difficulty)
    }

    /// Records `score` if it beats the current best and rewrites the file.
    ///
    /// Returns whether a new best was set. On a write failure the new best is
    /// kept in memory and the error returned.
    pub fn record(&mut self, difficulty: Difficulty, score: u32) -> Result<bool, StoreError> {
        let slot = self.scores.slot(difficulty);
        if score <= *slot {
            return Ok(false);
        }
        *slot = score;
        info!(difficulty = difficulty.name(), score, "new high score");
        self.save()?;
        Ok(true)
    }

    pub fn save(&self) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(&self.scores)?;
        fs::write(&self.path, text).map_err(|source| {
            let e = StoreError::Write {
                path: self.path.clone(),
                source,
            };
            warn!("{e}");
            e
        })
    }
}

/// Player-facing options.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub volume: f32,
    pub controller_present: bool,
    pub difficulty: Difficulty,
}

impl Settings {
    pub fn new(volume: f32, controller_present: bool) -> Self {
        Self {
            volume: volume.clamp(0.0, 1.0),
            controller_present,
            difficulty: Difficulty::default(),
        }
    }

    pub fn cycle_difficulty(&mut self) {
        self.difficulty = self.difficulty.next();
    }

    pub fn adjust_volume(&mut self, delta: f32) {
        // Snap to tenths so repeated steps land on exact values
        self.volume = ((self.volume + delta) * 10.0).round().clamp(0.0, 10.0) / 10.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn difficulty_cycles_through_all() {
        let mut d = Difficulty::Easy;
        for expected in [Difficulty::Normal, Difficulty::Hard, Difficulty::Expert, Difficulty::Easy] {
            d = d.next();
            assert_eq!(d, expected);
        }
        for d in Difficulty::ALL {
            assert_eq!(d.next().prev(), d);
        }
        assert!(Difficulty::Expert.move_interval() < Difficulty::Easy.move_interval());
    }

    #[test]
    fn missing_file_gives_zeros() {
        let dir = tempdir().unwrap();
        let store = HighScoreStore::load(dir.path().join("none.json"));
        assert_eq!(store.path(), dir.path().join("none.json"));
        for d in Difficulty::ALL {
            assert_eq!(store.best(d), 0);
        }
    }

    #[test]
    fn corrupt_file_gives_zeros() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scores.json");
        fs::write(&path, "{not json").unwrap();
        assert_eq!(*HighScoreStore::load(&path).scores(), HighScores::default());
    }

    #[test]
    fn partial_file_fills_missing_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scores.json");
        fs::write(&path, r#"{"Hard": 42}"#).unwrap();
        let store = HighScoreStore::load(&path);
        assert_eq!(store.best(Difficulty::Hard), 42);
        assert_eq!(store.best(Difficulty::Easy), 0);
    }

    #[test]
    fn record_only_improves() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scores.json");
        let mut store = HighScoreStore::load(&path);
        assert!(store.record(Difficulty::Easy, 5).unwrap());
        assert!(!store.record(Difficulty::Easy, 5).unwrap());
        assert!(!store.record(Difficulty::Easy, 3).unwrap());
        assert_eq!(HighScoreStore::load(&path).best(Difficulty::Easy), 5);
    }

    #[test]
    fn file_uses_difficulty_names() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scores.json");
        let mut store = HighScoreStore::load(&path);
        store.record(Difficulty::Expert, 9).unwrap();
        let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["Expert"], 9);
        assert_eq!(json["Normal"], 0);
    }

    #[test]
    fn failed_write_keeps_score_in_memory() {
        let dir = tempdir().unwrap();
        let mut store = HighScoreStore::load(dir.path().join("nope").join("scores.json"));
        assert!(matches!(store.record(Difficulty::Normal, 7), Err(StoreError::Write { .. })));
        assert_eq!(store.best(Difficulty::Normal), 7);
    }

    #[test]
    fn volume_steps_are_clamped() {
        let mut settings = Settings::new(0.95, false);
        settings.adjust_volume(0.1);
        assert_eq!(settings.volume, 1.0);
        for _ in 0..15 {
            settings.adjust_volume(-0.1);
        }
        assert_eq!(settings.volume, 0.0);
        settings.adjust_volume(0.1);
        assert_eq!(settings.volume, 0.1);
    }
}
