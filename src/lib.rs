//! Podracer - a three-lane obstacle dodging arcade game
//!
//! Core modules:
//! - `sim`: Per-frame simulation (scrolling, respawns, speed-up, collisions)
//! - `renderer`: Drawing onto a 2D surface, with flat-colour fallbacks
//! - `platform`: Browser/native platform abstraction (key-value storage)
//! - `tuning`: Data-driven game balance
//! - `game`: Controller that owns the state and runs the frame loop

pub mod assets;
pub mod audio;
pub mod game;
pub mod highscores;
pub mod input;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use game::{FrameOutcome, Game, LoopState};
pub use highscores::HighScore;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Canvas dimensions (pixels)
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 400.0;

    /// Vertical centre of each lane, top to bottom
    pub const LANE_CENTERS: [f32; 3] = [100.0, 200.0, 300.0];

    /// Vehicle defaults
    pub const VEHICLE_X: f32 = 50.0;
    pub const VEHICLE_WIDTH: f32 = 60.0;
    pub const VEHICLE_HEIGHT: f32 = 30.0;

    /// Obstacle defaults
    pub const OBSTACLE_WIDTH: f32 = 60.0;
    pub const OBSTACLE_HEIGHT: f32 = 30.0;
    /// Number of obstacles on screen, never more and never fewer
    pub const OBSTACLE_COUNT: usize = 2;
    /// Horizontal offset of the second obstacle past the right edge at start
    pub const SECOND_OBSTACLE_OFFSET: f32 = 300.0;
    /// Minimum gap between a respawned obstacle and its sibling
    pub const MIN_OBSTACLE_SPACING: f32 = 200.0;

    /// Speed (pixels per frame, leftward)
    pub const START_SPEED: f32 = 5.0;
    pub const SPEED_STEP: f32 = 0.3;
    pub const MAX_SPEED: f32 = 20.0;
    /// Speed-up fires when the score is a multiple of this
    pub const SPEED_UP_EVERY: u32 = 2;

    /// Give up waiting for assets after this long (ms)
    pub const ASSET_TIMEOUT_MS: u32 = 5000;

    /// Font family registered for the HUD
    pub const FONT_FAMILY: &str = "SerifGothicStd-Heavy";
}
