//! Game controller
//!
//! Owns the state and every collaborator, and is the only thing the platform
//! layer talks to: it forwards key presses to [`Game::key_down`] and calls
//! [`Game::frame`] once per display refresh.

use crate::audio::{AudioCue, AudioSink};
use crate::highscores::HighScore;
use crate::input::{InputOutcome, Key, handle_key};
use crate::platform::storage::KeyValueStore;
use crate::renderer::{self, Surface};
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, tick};
use crate::tuning::Tuning;

/// Run-loop state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Waiting for assets
    Idle,
    Running,
    Stopped,
}

/// Result of one call to [`Game::frame`]
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// Loop not running; nothing drawn
    Skipped,
    /// Simulated and drew a gameplay frame
    Played(Vec<GameEvent>),
    /// Drew the game-over screen
    GameOver,
}

pub struct Game {
    state: GameState,
    settings: Settings,
    audio: Box<dyn AudioSink>,
    store: Box<dyn KeyValueStore>,
    loop_state: LoopState,
    music_started: bool,
    frames: u64,
}

impl Game {
    /// Build a game, reading the high score from `store`
    pub fn new(
        tuning: Tuning,
        settings: Settings,
        seed: u64,
        audio: Box<dyn AudioSink>,
        store: Box<dyn KeyValueStore>,
    ) -> Self {
        let high_score = HighScore::load(&*store);
        log::info!("Game initialized with seed: {}", seed);
        Self {
            state: GameState::new(tuning, seed, high_score),
            settings,
            audio,
            store,
            loop_state: LoopState::Idle,
            music_started: false,
            frames: 0,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn loop_state(&self) -> LoopState {
        self.loop_state
    }

    pub fn is_running(&self) -> bool {
        self.loop_state == LoopState::Running
    }

    /// Frames simulated or drawn since creation
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Start the background music if it is not already on.
    ///
    /// Independent of the frame loop: the page starts it as soon as it loads.
    pub fn start_music(&mut self) {
        if !self.music_started {
            self.audio.play(AudioCue::BackgroundMusic);
            self.music_started = true;
        }
    }

    /// Start (or resume) the frame loop
    pub fn start(&mut self) {
        if self.loop_state == LoopState::Running {
            return;
        }
        self.start_music();
        log::info!("Frame loop started");
        self.loop_state = LoopState::Running;
    }

    pub fn stop(&mut self) {
        if self.loop_state == LoopState::Running {
            self.audio.pause(AudioCue::GameplayLoop);
            log::info!("Frame loop stopped after {} frames", self.frames);
        }
        self.loop_state = LoopState::Stopped;
    }

    /// Run one display frame
    pub fn frame(&mut self, surface: &mut dyn Surface) -> FrameOutcome {
        if !self.is_running() {
            return FrameOutcome::Skipped;
        }
        self.frames += 1;

        if self.state.game_over {
            renderer::render_game_over(&self.state, surface);
            return FrameOutcome::GameOver;
        }

        if !self.audio.is_playing(AudioCue::GameplayLoop) {
            self.audio.play(AudioCue::GameplayLoop);
        }

        let events = tick(&mut self.state);
        for event in &events {
            self.on_event(event);
        }

        renderer::render_playing(&self.state, self.settings.show_hud, surface);
        FrameOutcome::Played(events)
    }

    fn on_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::Crashed { .. } => {
                self.audio.play(AudioCue::GameOver);
                self.audio.pause(AudioCue::GameplayLoop);
            }
            GameEvent::NewHighScore { .. } => {
                if let Err(e) = self.state.high_score.save(&mut *self.store) {
                    log::error!("Could not save high score: {}", e);
                }
            }
            _ => {}
        }
    }

    /// Handle a key press
    pub fn key_down(&mut self, key: Key) -> InputOutcome {
        let outcome = handle_key(&mut self.state, key);
        match outcome {
            InputOutcome::Moved(_) => self.audio.play(AudioCue::Move),
            InputOutcome::Restart => {
                log::info!("Key {:?} pressed, restarting", key);
                self.reset();
            }
            InputOutcome::Ignored => {}
        }
        outcome
    }

    /// Start a fresh run. A stopped or idle loop stays that way.
    pub fn reset(&mut self) {
        self.state.reset();
        if self.is_running() {
            self.audio.play(AudioCue::GameplayLoop);
        }
        log::info!("Game reset (high score {})", self.state.high_score.best());
    }

    /// Replace the settings and persist them
    pub fn set_settings(&mut self, settings: Settings) {
        if let Err(e) = settings.save(&mut *self.store) {
            log::warn!("Could not save settings: {}", e);
        }
        self.audio.apply_settings(&settings);
        self.settings = settings;
    }
}
