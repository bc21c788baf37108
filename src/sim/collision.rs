//! Collision detection between the vehicle and obstacles
//!
//! Positions are lane-quantized and every sprite in a lane has the same
//! height, so a hit is a horizontal overlap plus an exact lane match.

use glam::Vec2;

use super::state::{Obstacle, Vehicle};

/// Axis-aligned rectangle in canvas pixels (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Open-interval overlap of the horizontal extents
    #[inline]
    pub fn overlaps_horizontally(&self, other: &Rect) -> bool {
        self.min.x < other.max().x && self.max().x > other.min.x
    }
}

/// Does the vehicle touch this obstacle?
pub fn vehicle_hits_obstacle(vehicle: &Vehicle, obstacle: &Obstacle) -> bool {
    vehicle.x < obstacle.x + obstacle.width
        && vehicle.x + vehicle.width > obstacle.x
        && vehicle.lane == obstacle.lane
}

/// Index of the first obstacle the vehicle touches
pub fn first_hit(vehicle: &Vehicle, obstacles: &[Obstacle]) -> Option<usize> {
    obstacles
        .iter()
        .position(|obstacle| vehicle_hits_obstacle(vehicle, obstacle))
}
