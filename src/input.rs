//! Keyboard input
//!
//! Only the vertical arrow keys mean anything. While a run is in progress
//! they change lanes; once it is over either one asks for a restart.

use crate::sim::{GameState, Lane};

/// Recognised keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
}

impl Key {
    /// Map a `KeyboardEvent.code` value
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ArrowUp" => Some(Key::Up),
            "ArrowDown" => Some(Key::Down),
            _ => None,
        }
    }
}

/// What a key press did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// Vehicle changed to this lane
    Moved(Lane),
    /// Already at the edge
    Ignored,
    /// Run is over; the caller should reset
    Restart,
}

/// Apply a key press to the state
pub fn handle_key(state: &mut GameState, key: Key) -> InputOutcome {
    if state.game_over {
        return InputOutcome::Restart;
    }

    let target = match key {
        Key::Up => state.vehicle.lane.up(),
        Key::Down => state.vehicle.lane.down(),
    };
    match target {
        Some(lane) => {
            state.vehicle.lane = lane;
            InputOutcome::Moved(lane)
        }
        None => InputOutcome::Ignored,
    }
}
