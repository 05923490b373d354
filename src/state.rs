//! Parkour events and state marker components.
//!
//! Mode changes and cues are emitted as events for animation, audio and
//! camera code. The marker components mirror the active mode family and
//! are added and removed automatically after every fixed step.

use bevy::prelude::*;

use crate::backend::ParkourCue;
use crate::mode::ParkourMode;

/// The parkour mode of `entity` changed.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParkourModeChanged {
    pub entity: Entity,
    pub previous: ParkourMode,
    pub current: ParkourMode,
}

/// The controller of `entity` asked for a cosmetic cue.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParkourCueEvent {
    pub entity: Entity,
    pub cue: ParkourCue,
}

/// Marker component: running along a wall.
///
/// Carries the side of the wall relative to the character.
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq, Eq)]
#[reflect(Component)]
pub enum WallRunning {
    Left,
    Right,
}

impl WallRunning {
    /// Marker for `mode`, if it is a wall-run.
    pub fn from_mode(mode: ParkourMode) -> Option<Self> {
        match mode {
            ParkourMode::LeftWallRun => Some(Self::Left),
            ParkourMode::RightWallRun => Some(Self::Right),
            _ => None,
        }
    }
}

/// Marker component: climbing, hanging from a ledge or mantling.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Climbing;

/// Marker component: sliding.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Sliding;

/// Marker component: sprinting.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Sprinting;

/// Marker component: crouching, including while sliding.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Crouching;
