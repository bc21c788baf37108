//! Per-frame simulation module
//!
//! All gameplay logic lives here. No rendering, audio or platform
//! dependencies; randomness comes from the seeded RNG inside the state.

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{Rect, first_hit, vehicle_hits_obstacle};
pub use state::{GameEvent, GameState, Lane, Obstacle, Vehicle, sibling_of};
pub use tick::{advance_obstacles, check_collision, scroll_background, tick};
