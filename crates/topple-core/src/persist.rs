//! Session-start/-end persistence. A missing or broken store never blocks
//! gameplay: reads fall back to defaults, writes are logged and dropped.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// What survives between sessions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub high_score: u32,
    pub best_height_blocks: u32,
    pub sound_enabled: bool,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            high_score: 0,
            best_height_blocks: 0,
            sound_enabled: true,
        }
    }
}

/// Storage seam for the profile. Queried once at session start and written
/// at game over; implementations must swallow their own failures.
pub trait ScoreStore {
    fn load(&self) -> Option<Profile>;
    fn save(&self, profile: &Profile);
}

/// File-backed store using a single JSON document.
pub struct JsonScoreStore {
    path: PathBuf,
}

impl JsonScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ScoreStore for JsonScoreStore {
    fn load(&self) -> Option<Profile> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) => {
                log::info!("no profile at {:?} ({}), using defaults", self.path, err);
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(profile) => Some(profile),
            Err(err) => {
                log::warn!("unreadable profile at {:?}: {}", self.path, err);
                None
            }
        }
    }

    fn save(&self, profile: &Profile) {
        let json = match serde_json::to_string_pretty(profile) {
            Ok(json) => json,
            Err(err) => {
                log::warn!("could not encode profile: {}", err);
                return;
            }
        };
        if let Err(err) = fs::write(&self.path, json) {
            log::warn!("could not write profile to {:?}: {}", self.path, err);
        }
    }
}
