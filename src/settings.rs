//! Player preferences
//!
//! Persisted separately from the high score, as JSON.

use serde::{Deserialize, Serialize};

use crate::audio::{AudioCue, AudioChannel};
use crate::platform::storage::{KeyValueStore, StorageError};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Background music and gameplay loop volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Move and game-over cues volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Silence everything
    pub muted: bool,

    // === HUD ===
    /// Draw score and high score while playing
    pub show_hud: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 1.0,
            music_volume: 1.0,
            sfx_volume: 1.0,
            muted: false,
            show_hud: true,
        }
    }
}

impl Settings {
    /// Storage key
    const STORAGE_KEY: &'static str = "podracer_settings";

    /// Final element volume for a cue
    pub fn volume_for(&self, cue: AudioCue) -> f64 {
        if self.muted {
            return 0.0;
        }
        let channel = match cue.channel() {
            AudioChannel::Music => self.music_volume,
            AudioChannel::Sfx => self.sfx_volume,
        };
        let volume = cue.base_volume() * self.master_volume.clamp(0.0, 1.0) * channel.clamp(0.0, 1.0);
        f64::from(volume)
    }

    /// Load settings from storage, falling back to defaults
    pub fn load(store: &dyn KeyValueStore) -> Self {
        if let Some(json) = store.get(Self::STORAGE_KEY) {
            match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring invalid settings: {}", e),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StorageError> {
        let json = serde_json::to_string(self)
            .map_err(|e| StorageError::Rejected(e.to_string()))?;
        store.set(Self::STORAGE_KEY, &json)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::storage::MemoryStore;

    #[test]
    fn test_default_volumes_match_cue_levels() {
        let settings = Settings::default();
        assert!((settings.volume_for(AudioCue::GameOver) - 0.5).abs() < 1e-6);
        assert!((settings.volume_for(AudioCue::Move) - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_channels_and_mute() {
        let mut settings = Settings {
            music_volume: 0.5,
            sfx_volume: 0.0,
            ..Settings::default()
        };
        assert!((settings.volume_for(AudioCue::GameplayLoop) - 0.05).abs() < 1e-6);
        assert_eq!(settings.volume_for(AudioCue::Move), 0.0);

        settings.muted = true;
        assert_eq!(settings.volume_for(AudioCue::BackgroundMusic), 0.0);
    }

    #[test]
    fn test_persisted_settings_survive_reload() {
        let mut store = MemoryStore::new();
        let settings = Settings {
            muted: true,
            show_hud: false,
            ..Settings::default()
        };
        settings.save(&mut store).unwrap();
        assert_eq!(Settings::load(&store), settings);
    }

    #[test]
    fn test_invalid_or_partial_json() {
        let mut store = MemoryStore::new();
        store.set("podracer_settings", "{{{").unwrap();
        assert_eq!(Settings::load(&store), Settings::default());

        store.set("podracer_settings", r#"{"muted":true}"#).unwrap();
        let loaded = Settings::load(&store);
        assert!(loaded.muted);
        assert_eq!(loaded.master_volume, 1.0);
    }
}
