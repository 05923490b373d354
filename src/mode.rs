//! Parkour modes and transitions.
//!
//! Exactly one [`ParkourMode`] is active at any time. Modes only change
//! through [`ParkourController::request_mode`](crate::controller::ParkourController::request_mode),
//! which produces a [`ModeTransition`].

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// The mutually exclusive parkour ability currently driving the character.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ParkourMode {
    /// Free movement, no ability active.
    #[default]
    None,
    /// Running along a wall on the character's left.
    LeftWallRun,
    /// Running along a wall on the character's right.
    RightWallRun,
    /// Climbing straight up a wall in front of the character.
    VerticalWallRun,
    /// Hanging from a ledge, movement and gravity disabled.
    LedgeGrab,
    /// Pulling up over a ledge.
    Mantle,
    /// Crouched slide on the ground.
    Slide,
    /// Sprinting on the ground.
    Sprint,
    /// Crouched on the ground.
    Crouch,
}

impl ParkourMode {
    /// Every mode, in declaration order.
    pub const ALL: [ParkourMode; 9] = [
        ParkourMode::None,
        ParkourMode::LeftWallRun,
        ParkourMode::RightWallRun,
        ParkourMode::VerticalWallRun,
        ParkourMode::LedgeGrab,
        ParkourMode::Mantle,
        ParkourMode::Slide,
        ParkourMode::Sprint,
        ParkourMode::Crouch,
    ];

    /// Left or right wall-run.
    #[inline]
    pub fn is_wall_running(self) -> bool {
        matches!(self, ParkourMode::LeftWallRun | ParkourMode::RightWallRun)
    }

    /// Part of the climbing chain (vertical wall-run, ledge grab, mantle),
    /// which shares one end routine.
    #[inline]
    pub fn is_climbing(self) -> bool {
        matches!(
            self,
            ParkourMode::VerticalWallRun | ParkourMode::LedgeGrab | ParkourMode::Mantle
        )
    }

    /// Modes that restore the default locomotion baseline when entered.
    #[inline]
    pub fn is_free(self) -> bool {
        matches!(self, ParkourMode::None | ParkourMode::Crouch)
    }

    /// Whether leaving this mode should put the host back into walking
    /// (as opposed to falling).
    #[inline]
    pub fn resumes_walking(self) -> bool {
        matches!(
            self,
            ParkourMode::None
                | ParkourMode::Mantle
                | ParkourMode::Slide
                | ParkourMode::Sprint
                | ParkourMode::Crouch
        )
    }

    /// Sign applied to the wall tangent when pushing along a wall.
    ///
    /// Right-side walls push with `-1`, left-side walls with `+1`.
    pub fn wall_run_direction(self) -> Option<f32> {
        match self {
            ParkourMode::RightWallRun => Some(-1.0),
            ParkourMode::LeftWallRun => Some(1.0),
            _ => None,
        }
    }
}

/// Record of an accepted mode change.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeTransition {
    /// Mode active before the change.
    pub previous: ParkourMode,
    /// Mode active after the change.
    pub current: ParkourMode,
}

impl ModeTransition {
    /// Create a transition record.
    pub fn new(previous: ParkourMode, current: ParkourMode) -> Self {
        Self { previous, current }
    }
}

/// Movement mode of the host simulation, as far as parkour cares.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SimulatedMovementMode {
    /// Movement disabled (ledge grab).
    None,
    /// On the ground.
    #[default]
    Walking,
    /// In the air.
    Falling,
}
