//! Audio cues and playback
//!
//! Four clips, all fire-and-forget: nothing in the frame loop ever waits on
//! audio, and a clip that fails to load or is blocked by autoplay policy is
//! logged and otherwise ignored.

use crate::assets::AssetId;
use crate::settings::Settings;

/// Audio cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioCue {
    /// Music started when the page loads
    BackgroundMusic,
    /// Engine loop that plays while a run is in progress
    GameplayLoop,
    /// Lane change
    Move,
    /// Crash
    GameOver,
}

/// Volume channel a cue belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioChannel {
    Music,
    Sfx,
}

impl AudioCue {
    pub const ALL: [AudioCue; 4] = [
        AudioCue::BackgroundMusic,
        AudioCue::GameplayLoop,
        AudioCue::Move,
        AudioCue::GameOver,
    ];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            AudioCue::BackgroundMusic => 0,
            AudioCue::GameplayLoop => 1,
            AudioCue::Move => 2,
            AudioCue::GameOver => 3,
        }
    }

    pub fn asset(self) -> AssetId {
        match self {
            AudioCue::BackgroundMusic => AssetId::BackgroundMusic,
            AudioCue::GameplayLoop => AssetId::GameplayLoop,
            AudioCue::Move => AssetId::MoveCue,
            AudioCue::GameOver => AssetId::GameOverCue,
        }
    }

    pub fn channel(self) -> AudioChannel {
        match self {
            AudioCue::BackgroundMusic | AudioCue::GameplayLoop => AudioChannel::Music,
            AudioCue::Move | AudioCue::GameOver => AudioChannel::Sfx,
        }
    }

    /// Element volume before settings are applied
    pub fn base_volume(self) -> f32 {
        match self {
            AudioCue::GameOver => 0.5,
            _ => 0.1,
        }
    }

    pub fn looping(self) -> bool {
        self.channel() == AudioChannel::Music
    }

    /// Restart from the beginning on every play (rapid lane changes)
    pub fn rewinds(self) -> bool {
        self == AudioCue::Move
    }
}

/// Where the controller sends audio commands
pub trait AudioSink {
    /// Start (or restart) a cue. Never blocks, never fails.
    fn play(&mut self, cue: AudioCue);
    fn pause(&mut self, cue: AudioCue);
    fn is_playing(&self, cue: AudioCue) -> bool;
    /// Pick up new volumes
    fn apply_settings(&mut self, _settings: &Settings) {}
}

/// Audio sink that makes no sound but keeps track of what would be playing
#[derive(Debug, Clone, Default)]
pub struct SilentAudio {
    playing: [bool; 4],
    plays: [u32; 4],
}

impl SilentAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times a cue was started
    pub fn play_count(&self, cue: AudioCue) -> u32 {
        self.plays[cue.index()]
    }
}

impl AudioSink for SilentAudio {
    fn play(&mut self, cue: AudioCue) {
        log::debug!("(silent) play {:?}", cue);
        self.plays[cue.index()] += 1;
        // One-shots end immediately
        self.playing[cue.index()] = cue.looping();
    }

    fn pause(&mut self, cue: AudioCue) {
        self.playing[cue.index()] = false;
    }

    fn is_playing(&self, cue: AudioCue) -> bool {
        self.playing[cue.index()]
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::HtmlAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use wasm_bindgen_futures::JsFuture;
    use web_sys::HtmlAudioElement;

    use super::{AudioCue, AudioSink};
    use crate::settings::Settings;

    /// One `<audio>` element per cue
    pub struct HtmlAudio {
        elements: [Option<HtmlAudioElement>; 4],
    }

    impl HtmlAudio {
        pub fn new(settings: &Settings) -> Self {
            Self {
                elements: AudioCue::ALL.map(|cue| create_element(cue, settings)),
            }
        }

        /// Element for a cue, if it could be created
        pub fn element(&self, cue: AudioCue) -> Option<&HtmlAudioElement> {
            self.elements[cue.index()].as_ref()
        }
    }

    fn create_element(cue: AudioCue, settings: &Settings) -> Option<HtmlAudioElement> {
        match HtmlAudioElement::new_with_src(cue.asset().path()) {
            Ok(el) => {
                el.set_loop(cue.looping());
                el.set_volume(settings.volume_for(cue));
                Some(el)
            }
            Err(e) => {
                log::warn!("Failed to create audio element for {:?}: {:?}", cue, e);
                None
            }
        }
    }

    impl AudioSink for HtmlAudio {
        fn apply_settings(&mut self, settings: &Settings) {
            for cue in AudioCue::ALL {
                if let Some(el) = self.element(cue) {
                    el.set_volume(settings.volume_for(cue));
                }
            }
        }

        fn play(&mut self, cue: AudioCue) {
            let Some(el) = self.element(cue) else { return };
            if cue.rewinds() {
                el.set_current_time(0.0);
            }
            match el.play() {
                Ok(promise) => wasm_bindgen_futures::spawn_local(async move {
                    // Autoplay policy rejects plays before the first user gesture
                    if let Err(e) = JsFuture::from(promise).await {
                        log::error!("Could not play {:?}: {:?}", cue, e);
                    }
                }),
                Err(e) => log::error!("Could not play {:?}: {:?}", cue, e),
            }
        }

        fn pause(&mut self, cue: AudioCue) {
            if let Some(el) = self.element(cue) {
                if let Err(e) = el.pause() {
                    log::warn!("Could not pause {:?}: {:?}", cue, e);
                }
            }
        }

        fn is_playing(&self, cue: AudioCue) -> bool {
            self.element(cue).is_some_and(|el| !el.paused())
        }
    }
}
