//! # `msg_parkour_controller`
//!
//! A parkour movement controller for first-person characters, with a physics
//! backend abstraction for Bevy.
//!
//! The controller layers a set of parkour abilities on top of an existing
//! walking/falling locomotion:
//! - Wall-running along steep walls to either side
//! - Climbing up walls in front, catching ledges and mantling onto them
//! - Sliding out of a sprint, down slopes
//! - Sprinting and crouching
//!
//! ## Architecture
//!
//! [`ParkourController`](controller::ParkourController) is a state machine
//! with exactly one active [`ParkourMode`](mode::ParkourMode). Every step it:
//! 1. Fires due deferred actions (gate reopening, queue checks)
//! 2. Advances any capsule snap onto a wall or ledge
//! 3. Runs the per-step routine of every ability whose gate is open
//! 4. Eases the camera roll toward the active mode's tilt
//!
//! Abilities are debounced by gates that close on exit and reopen after a
//! cooldown. A slide or sprint requested in the air is queued and started on
//! landing.
//!
//! The core never talks to an engine directly. It is driven through the
//! [`ParkourHost`](backend::ParkourHost) traits, which the Bevy plugin
//! implements over a [`ParkourPhysicsBackend`](backend::ParkourPhysicsBackend).
//!
//! ## Usage
//!
//! ```rust
//! use bevy::prelude::*;
//! use msg_parkour_controller::prelude::*;
//!
//! // The controller pulls in a default motor and intent.
//! let controller = ParkourController::new(ParkourConfig::player());
//! let motor = ParkourMotor::new(34.0, 88.0).with_eye_height(64.0);
//! let intent = ParkourIntent::default();
//!
//! // These can be spawned together with the physics components
//! ```

use bevy::prelude::*;

pub mod backend;
pub mod camera;
pub mod climb;
pub mod collision;
pub mod config;
pub mod controller;
pub mod eligibility;
pub mod error;
pub mod gates;
pub mod geometry;
pub mod intent;
pub mod mode;
pub mod motor;
pub mod slide;
pub mod sprint;
pub mod state;
pub mod systems;
pub mod timers;
pub mod wall_run;

#[cfg(test)]
mod test_support;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::backend::{
        CharacterPose, FeedbackAdapter, MovementInterface, NoOpBackendPlugin, ParkourCue, ParkourHost,
        ParkourPhysicsBackend, ProbeInterface,
    };
    pub use crate::collision::ProbeHit;
    pub use crate::config::{
        ClimbConfig, LocomotionBaseline, ParkourConfig, SlideConfig, SprintConfig, WallRunConfig,
    };
    pub use crate::controller::ParkourController;
    pub use crate::error::{ConfigError, ConfigResult};
    pub use crate::gates::{Gate, Queue};
    pub use crate::intent::{ParkourInput, ParkourIntent};
    pub use crate::mode::{ModeTransition, ParkourMode, SimulatedMovementMode};
    pub use crate::motor::ParkourMotor;
    pub use crate::state::{Climbing, Crouching, ParkourCueEvent, ParkourModeChanged, Sliding, Sprinting, WallRunning};
    pub use crate::{ParkourControllerPlugin, ParkourSet};
}

/// System sets for the parkour controller, run in order in `FixedUpdate`.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParkourSet {
    /// Input, movement mode reports and the controller step.
    Drive,
    /// Marker components follow the new state.
    SyncState,
}

/// Main plugin for the parkour controller.
///
/// Generic over a physics backend `B` providing transforms, velocity and
/// world probes. Schedule the game's own locomotion after
/// [`ParkourSet::SyncState`] so it sees this step's motor parameters.
///
/// # Examples
///
/// ```rust,ignore
/// use bevy::prelude::*;
/// use msg_parkour_controller::prelude::*;
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(ParkourControllerPlugin::<MyBackend>::default())
///     .run();
/// ```
pub struct ParkourControllerPlugin<B: backend::ParkourPhysicsBackend> {
    _marker: std::marker::PhantomData<B>,
}

impl<B: backend::ParkourPhysicsBackend> Default for ParkourControllerPlugin<B> {
    fn default() -> Self {
        Self {
            _marker: std::marker::PhantomData,
        }
    }
}

impl<B: backend::ParkourPhysicsBackend> Plugin for ParkourControllerPlugin<B> {
    fn build(&self, app: &mut App) {
        app.register_type::<config::ParkourConfig>();
        app.register_type::<mode::ParkourMode>();
        app.register_type::<motor::ParkourMotor>();
        app.register_type::<intent::ParkourIntent>();
        app.register_type::<state::WallRunning>();
        app.register_type::<state::Climbing>();
        app.register_type::<state::Sliding>();
        app.register_type::<state::Sprinting>();
        app.register_type::<state::Crouching>();

        app.add_event::<state::ParkourModeChanged>();
        app.add_event::<state::ParkourCueEvent>();

        app.add_plugins(B::plugin());

        app.configure_sets(FixedUpdate, (ParkourSet::Drive, ParkourSet::SyncState).chain());
        app.add_systems(
            FixedUpdate,
            (
                systems::drive_parkour::<B>.in_set(ParkourSet::Drive),
                systems::sync_state_markers.in_set(ParkourSet::SyncState),
            ),
        );
    }
}
