//! Data-driven game balance
//!
//! Every number the simulation depends on lives here so a session can be
//! replayed or rebalanced from a JSON file. Missing fields fall back to the
//! defaults in [`crate::consts`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::Lane;

/// Reasons a tuning file is rejected
#[derive(Debug, Clone, PartialEq)]
pub enum TuningError {
    /// The JSON did not parse
    Parse(String),
    /// Screen width or height is not positive
    ScreenSize { width: f32, height: f32 },
    /// An entity has a non-positive width or height
    EntitySize { what: &'static str },
    /// Starting speed is not positive or exceeds the maximum
    StartSpeed { start: f32, max: f32 },
    /// Speed step is negative
    SpeedStep(f32),
    /// Speed-up interval is zero
    SpeedUpEvery,
    /// Spacing between obstacles is negative
    Spacing(f32),
    /// Both obstacles start in the same lane
    StartLanes,
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "invalid tuning json: {msg}"),
            Self::ScreenSize { width, height } => {
                write!(f, "screen size must be positive, got {width}x{height}")
            }
            Self::EntitySize { what } => write!(f, "{what} size must be positive"),
            Self::StartSpeed { start, max } => {
                write!(f, "start speed {start} must be in (0, {max}]")
            }
            Self::SpeedStep(step) => write!(f, "speed step {step} must not be negative"),
            Self::SpeedUpEvery => write!(f, "speed_up_every must be at least 1"),
            Self::Spacing(spacing) => write!(f, "obstacle spacing {spacing} must not be negative"),
            Self::StartLanes => write!(f, "obstacles must start in different lanes"),
        }
    }
}

impl std::error::Error for TuningError {}

/// Game balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub screen_width: f32,
    pub screen_height: f32,
    /// Vertical centre of each lane (index = lane)
    pub lane_centers: [f32; 3],

    pub vehicle_x: f32,
    pub vehicle_width: f32,
    pub vehicle_height: f32,
    pub vehicle_start_lane: Lane,

    pub obstacle_width: f32,
    pub obstacle_height: f32,
    /// Starting lane of obstacle 0 and obstacle 1
    pub obstacle_start_lanes: [Lane; 2],
    /// Obstacle 1 starts this far past obstacle 0
    pub second_obstacle_offset: f32,
    pub min_obstacle_spacing: f32,

    /// Leftward speed at the start of a run (pixels per frame)
    pub start_speed: f32,
    pub speed_step: f32,
    pub max_speed: f32,
    pub speed_up_every: u32,

    pub asset_timeout_ms: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            lane_centers: LANE_CENTERS,

            vehicle_x: VEHICLE_X,
            vehicle_width: VEHICLE_WIDTH,
            vehicle_height: VEHICLE_HEIGHT,
            vehicle_start_lane: Lane::Middle,

            obstacle_width: OBSTACLE_WIDTH,
            obstacle_height: OBSTACLE_HEIGHT,
            obstacle_start_lanes: [Lane::Top, Lane::Middle],
            second_obstacle_offset: SECOND_OBSTACLE_OFFSET,
            min_obstacle_spacing: MIN_OBSTACLE_SPACING,

            start_speed: START_SPEED,
            speed_step: SPEED_STEP,
            max_speed: MAX_SPEED,
            speed_up_every: SPEED_UP_EVERY,

            asset_timeout_ms: ASSET_TIMEOUT_MS,
        }
    }
}

impl Tuning {
    /// Parse and validate a tuning file
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning =
            serde_json::from_str(json).map_err(|e| TuningError::Parse(e.to_string()))?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check the parameters the simulation relies on
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.screen_width <= 0.0 || self.screen_height <= 0.0 {
            return Err(TuningError::ScreenSize {
                width: self.screen_width,
                height: self.screen_height,
            });
        }
        if self.vehicle_width <= 0.0 || self.vehicle_height <= 0.0 {
            return Err(TuningError::EntitySize { what: "vehicle" });
        }
        if self.obstacle_width <= 0.0 || self.obstacle_height <= 0.0 {
            return Err(TuningError::EntitySize { what: "obstacle" });
        }
        if self.start_speed <= 0.0 || self.start_speed > self.max_speed {
            return Err(TuningError::StartSpeed {
                start: self.start_speed,
                max: self.max_speed,
            });
        }
        if self.speed_step < 0.0 {
            return Err(TuningError::SpeedStep(self.speed_step));
        }
        if self.speed_up_every == 0 {
            return Err(TuningError::SpeedUpEvery);
        }
        if self.min_obstacle_spacing < 0.0 || self.second_obstacle_offset < 0.0 {
            return Err(TuningError::Spacing(
                self.min_obstacle_spacing.min(self.second_obstacle_offset),
            ));
        }
        if self.obstacle_start_lanes[0] == self.obstacle_start_lanes[1] {
            return Err(TuningError::StartLanes);
        }
        Ok(())
    }

    /// Vertical centre of a lane
    #[inline]
    pub fn lane_center(&self, lane: Lane) -> f32 {
        self.lane_centers[lane.index()]
    }

    /// Horizontal velocity at the start of a run
    #[inline]
    pub fn start_dx(&self) -> f32 {
        -self.start_speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.start_dx(), -5.0);
        assert_eq!(tuning.lane_center(Lane::Bottom), 300.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "max_speed": 12.5, "speed_up_every": 3 }"#).unwrap();
        assert_eq!(tuning.max_speed, 12.5);
        assert_eq!(tuning.speed_up_every, 3);
        assert_eq!(tuning.screen_width, SCREEN_WIDTH);
        assert_eq!(tuning.obstacle_start_lanes, [Lane::Top, Lane::Middle]);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            Tuning::from_json("{ not json"),
            Err(TuningError::Parse(_))
        ));
        assert_eq!(
            Tuning::from_json(r#"{ "speed_up_every": 0 }"#),
            Err(TuningError::SpeedUpEvery)
        );
        assert_eq!(
            Tuning::from_json(r#"{ "obstacle_start_lanes": ["Bottom", "Bottom"] }"#),
            Err(TuningError::StartLanes)
        );
        assert!(matches!(
            Tuning::from_json(r#"{ "start_speed": 30.0 }"#),
            Err(TuningError::StartSpeed { .. })
        ));
    }
}
