//! Game state and core simulation types
//!
//! Everything the frame loop mutates lives in [`GameState`]; there is no other
//! mutable game data.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::consts::OBSTACLE_COUNT;
use crate::highscores::HighScore;
use crate::tuning::Tuning;

/// One of the three horizontal lanes, top to bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lane {
    Top,
    Middle,
    Bottom,
}

impl Lane {
    pub const ALL: [Lane; 3] = [Lane::Top, Lane::Middle, Lane::Bottom];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Lane::Top => 0,
            Lane::Middle => 1,
            Lane::Bottom => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Lane above, if any (no wraparound)
    pub fn up(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    /// Lane below, if any (no wraparound)
    pub fn down(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }
}

/// The player's vehicle. Only its lane ever changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vehicle {
    pub x: f32,
    pub width: f32,
    pub height: f32,
    pub lane: Lane,
}

impl Vehicle {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            x: tuning.vehicle_x,
            width: tuning.vehicle_width,
            height: tuning.vehicle_height,
            lane: tuning.vehicle_start_lane,
        }
    }

    /// Screen rectangle, centred vertically on the lane
    pub fn rect(&self, tuning: &Tuning) -> Rect {
        lane_rect(tuning, self.lane, self.x, self.width, self.height)
    }
}

/// An oncoming obstacle. Never destroyed, only moved back to the right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub x: f32,
    pub width: f32,
    pub height: f32,
    pub lane: Lane,
    /// Horizontal velocity (negative = leftward)
    pub dx: f32,
}

impl Obstacle {
    /// Obstacle `index` as it is at the start of a run
    pub fn initial(index: usize, tuning: &Tuning) -> Self {
        Self {
            x: tuning.screen_width + index as f32 * tuning.second_obstacle_offset,
            width: tuning.obstacle_width,
            height: tuning.obstacle_height,
            lane: tuning.obstacle_start_lanes[index],
            dx: tuning.start_dx(),
        }
    }

    /// Speed magnitude (pixels per frame)
    #[inline]
    pub fn speed(&self) -> f32 {
        -self.dx
    }

    /// Trailing edge has crossed the left border
    #[inline]
    pub fn is_off_screen(&self) -> bool {
        self.x + self.width < 0.0
    }

    pub fn rect(&self, tuning: &Tuning) -> Rect {
        lane_rect(tuning, self.lane, self.x, self.width, self.height)
    }
}

fn lane_rect(tuning: &Tuning, lane: Lane, x: f32, width: f32, height: f32) -> Rect {
    Rect::new(x, tuning.lane_center(lane) - height / 2.0, width, height)
}

/// The other obstacle of the fixed pair
#[inline]
pub fn sibling_of(index: usize) -> usize {
    (index + 1) % OBSTACLE_COUNT
}

/// Things that happened during a tick, for audio and logging
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// An obstacle left the screen and came back on the right
    Respawned {
        obstacle: usize,
        x: f32,
        lane: Lane,
        sibling_x: f32,
        sibling_lane: Lane,
        score: u32,
    },
    /// Both obstacles sped up
    SpeedUp { dx: [f32; OBSTACLE_COUNT] },
    /// Speed-up was due but the respawning obstacle is already at max speed
    MaxSpeedReached { dx: f32 },
    /// The vehicle hit an obstacle; the run is over
    Crashed { obstacle: usize, score: u32 },
    /// The crash score beat the stored high score
    NewHighScore { score: u32 },
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Balance parameters this state was built from
    pub tuning: Tuning,
    /// Seed the RNG was created with
    pub seed: u64,
    pub vehicle: Vehicle,
    pub obstacles: [Obstacle; OBSTACLE_COUNT],
    /// Horizontal scroll offset of the background (<= 0)
    pub background_x: f32,
    pub score: u32,
    pub high_score: HighScore,
    pub game_over: bool,
    rng: Pcg32,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(tuning: Tuning, seed: u64, high_score: HighScore) -> Self {
        Self {
            vehicle: Vehicle::new(&tuning),
            obstacles: [Obstacle::initial(0, &tuning), Obstacle::initial(1, &tuning)],
            background_x: 0.0,
            score: 0,
            high_score,
            game_over: false,
            rng: Pcg32::seed_from_u64(seed),
            seed,
            tuning,
        }
    }

    /// Restore the start-of-run values in place.
    ///
    /// The high score and the RNG stream carry over.
    pub fn reset(&mut self) {
        self.score = 0;
        self.game_over = false;
        self.vehicle = Vehicle::new(&self.tuning);
        for (index, obstacle) in self.obstacles.iter_mut().enumerate() {
            *obstacle = Obstacle::initial(index, &self.tuning);
        }
        self.background_x = 0.0;
    }

    /// Draw a lane uniformly, retrying until it differs from `excluded`
    pub fn random_lane_except(&mut self, excluded: Lane) -> Lane {
        loop {
            let lane = Lane::ALL[self.rng.random_range(0..Lane::ALL.len())];
            if lane != excluded {
                return lane;
            }
        }
    }

    /// Current speed magnitude (obstacles always share it outside reset)
    pub fn speed(&self) -> f32 {
        self.obstacles[0].speed()
    }
}
