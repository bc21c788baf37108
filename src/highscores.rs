//! Persisted high score
//!
//! A single number under the `highscore` key, stored as a plain decimal
//! string so saves from the JavaScript version of the game still load.

use crate::platform::storage::{KeyValueStore, StorageError};

/// Best score ever reached on this device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HighScore {
    best: u32,
}

impl HighScore {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "highscore";

    pub fn new(best: u32) -> Self {
        Self { best }
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    /// Record a finished run. Returns true if it beat the previous best.
    pub fn submit(&mut self, score: u32) -> bool {
        if score > self.best {
            self.best = score;
            true
        } else {
            false
        }
    }

    /// Load from storage; missing or unreadable values count as zero
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(best) => {
                    log::info!("Loaded high score {}", best);
                    Self::new(best)
                }
                Err(e) => {
                    log::warn!("Ignoring unreadable high score {:?}: {}", raw, e);
                    Self::default()
                }
            },
            None => {
                log::info!("No high score found, starting fresh");
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StorageError> {
        store.set(Self::STORAGE_KEY, &self.best.to_string())?;
        log::info!("High score saved ({})", self.best);
        Ok(())
    }
}
