//! Vehicle lifecycle states.

use std::fmt;

/// Where a vehicle is in its mission cycle.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum VehicleState {
    /// Patrolling, available for dispatch.
    #[default]
    Idle,
    /// Driving to an assigned target.
    Responding,
    /// At the target, waiting out the dwell time.
    OnScene,
    /// Driving back to home base.
    Returning,
}

impl VehicleState {
    /// Label used in logs and output files.
    pub fn as_str(self) -> &'static str {
        match self {
            VehicleState::Idle       => "idle",
            VehicleState::Responding => "responding",
            VehicleState::OnScene    => "on_scene",
            VehicleState::Returning  => "returning",
        }
    }

    #[inline]
    pub fn is_idle(self) -> bool {
        matches!(self, VehicleState::Idle)
    }
}

impl fmt::Display for VehicleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Travel direction along the current route.  Only idle vehicles ever move
/// `Backward` (the return leg of the patrol ping-pong).
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

impl Direction {
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Direction::Forward  => 1.0,
            Direction::Backward => -1.0,
        }
    }
}
