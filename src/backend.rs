//! Collaborator abstractions.
//!
//! The parkour core never touches the physics engine directly. It reads
//! probe results and movement state, and writes movement parameters, through
//! the traits in this module:
//!
//! - [`ProbeInterface`]: line traces and capsule sweeps against the world.
//! - [`MovementInterface`]: the host locomotion (velocity, gravity scale,
//!   friction, speed caps, launches, walking/falling).
//! - [`CharacterPose`]: the character's transform and capsule dimensions.
//! - [`FeedbackAdapter`]: fire-and-forget cosmetic notifications.
//!
//! [`ParkourHost`] bundles all four and is what the controller is driven
//! with. For Bevy, [`ParkourPhysicsBackend`] plays the role the physics
//! backend trait plays for the character controller: static functions over
//! `(&World, Entity)` that the plugin's systems adapt into a host.

use bevy::prelude::*;

use crate::collision::ProbeHit;
use crate::mode::{ParkourMode, SimulatedMovementMode};

/// Physics queries against world geometry.
///
/// Probes are synchronous: the result is complete when the call returns.
pub trait ProbeInterface {
    /// Trace a line from `start` to `end` and return the first blocking hit.
    fn line_trace(&self, start: Vec3, end: Vec3) -> ProbeHit;

    /// Sweep a capsule from `start` to `end` and return the first blocking hit.
    ///
    /// # Arguments
    /// * `rotation` - Orientation of the capsule during the sweep
    /// * `radius` - Capsule radius
    /// * `half_height` - Capsule half height (including the hemispheres)
    fn sweep_capsule(&self, start: Vec3, end: Vec3, rotation: Quat, radius: f32, half_height: f32) -> ProbeHit;
}

/// The host locomotion simulation.
pub trait MovementInterface {
    /// Whether the character is airborne.
    fn is_falling(&self) -> bool;

    /// Whether the character is walking on the ground.
    fn is_walking(&self) -> bool;

    /// Current linear velocity.
    fn velocity(&self) -> Vec3;

    /// Last movement input direction (world space, not normalized).
    fn last_input_direction(&self) -> Vec3;

    /// Whether a surface with this normal counts as walkable floor.
    fn is_walkable(&self, normal: Vec3) -> bool;

    // === Movement parameters ===

    /// Current gravity multiplier.
    fn gravity_scale(&self) -> f32;
    /// Set the gravity multiplier.
    fn set_gravity_scale(&mut self, scale: f32);

    /// Current ground friction.
    fn ground_friction(&self) -> f32;
    /// Set the ground friction.
    fn set_ground_friction(&mut self, friction: f32);

    /// Current walking braking deceleration.
    fn braking_deceleration(&self) -> f32;
    /// Set the walking braking deceleration.
    fn set_braking_deceleration(&mut self, deceleration: f32);

    /// Current maximum walking speed.
    fn max_walk_speed(&self) -> f32;
    /// Set the maximum walking speed.
    fn set_max_walk_speed(&mut self, speed: f32);

    /// Current maximum crouched walking speed.
    fn max_crouch_speed(&self) -> f32;
    /// Set the maximum crouched walking speed.
    fn set_max_crouch_speed(&mut self, speed: f32);

    /// Constrain movement to the plane with the given normal, or lift the
    /// constraint.
    fn set_plane_constraint(&mut self, normal: Vec3, enabled: bool);

    // === Mode and impulses ===

    /// Disable host movement entirely (velocity integration and gravity).
    fn disable_movement(&mut self);

    /// Zero the velocity immediately.
    fn stop_immediately(&mut self);

    /// Launch the character.
    ///
    /// Horizontal and vertical components either replace (`override`) or add
    /// to the current velocity. Launching puts the host into falling.
    fn launch(&mut self, velocity: Vec3, xy_override: bool, z_override: bool);

    /// Apply an instantaneous velocity change, ignoring mass.
    fn add_impulse(&mut self, impulse: Vec3);

    /// Switch the host between walking and falling. Also re-enables
    /// movement after [`disable_movement`](Self::disable_movement).
    fn set_simulated_mode(&mut self, mode: SimulatedMovementMode);

    // === Orientation and posture ===

    /// Rotate the character toward its movement direction.
    fn set_orient_rotation_to_movement(&mut self, enabled: bool);

    /// Whether the character yaw follows the controller yaw.
    fn use_controller_yaw(&self) -> bool;
    /// Make the character yaw follow the controller yaw.
    fn set_use_controller_yaw(&mut self, enabled: bool);

    /// Enter the crouched posture.
    fn crouch(&mut self);
    /// Leave the crouched posture.
    fn uncrouch(&mut self);
}

/// The character's transform, capsule and view.
pub trait CharacterPose {
    /// World position of the capsule center.
    fn location(&self) -> Vec3;
    /// Teleport the capsule center.
    fn set_location(&mut self, location: Vec3);

    /// Actor yaw in radians about +Z.
    fn yaw(&self) -> f32;
    /// Set the actor yaw in radians.
    fn set_yaw(&mut self, yaw: f32);

    /// Actor rotation.
    fn rotation(&self) -> Quat {
        Quat::from_rotation_z(self.yaw())
    }

    /// Actor forward direction.
    fn forward(&self) -> Vec3 {
        self.rotation() * Vec3::X
    }

    /// Actor right direction.
    fn right(&self) -> Vec3 {
        self.rotation() * Vec3::NEG_Y
    }

    /// Actor up direction.
    fn up(&self) -> Vec3 {
        Vec3::Z
    }

    /// Capsule radius.
    fn capsule_radius(&self) -> f32;

    /// Capsule half height (including the hemispheres).
    fn capsule_half_height(&self) -> f32;

    /// World position of the eyes (view point).
    fn eyes_location(&self) -> Vec3;

    /// Controller (camera) yaw in radians.
    fn control_yaw(&self) -> f32;
    /// Set the controller (camera) yaw in radians.
    fn set_control_yaw(&mut self, yaw: f32);
}

/// Cosmetic cue requested by the controller.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParkourCue {
    /// Jump from rest or landing.
    JumpLand,
    /// Caught a ledge.
    LedgeGrab,
    /// Slow mantle.
    Mantle,
    /// Fast mantle.
    QuickMantle,
}

/// Cosmetic notifications. Implementations must not fail in a way the
/// controller has to observe.
pub trait FeedbackAdapter {
    /// The active mode changed.
    fn on_mode_changed(&mut self, previous: ParkourMode, current: ParkourMode);

    /// Play a cue (camera shake, sound, ...).
    fn on_cue(&mut self, cue: ParkourCue);

    /// Camera roll (degrees) after this frame's tilt interpolation.
    fn on_camera_roll(&mut self, _roll_degrees: f32) {}
}

/// Everything the controller is driven with.
pub trait ParkourHost: ProbeInterface + MovementInterface + CharacterPose + FeedbackAdapter {}

impl<T> ParkourHost for T where T: ProbeInterface + MovementInterface + CharacterPose + FeedbackAdapter {}

/// Trait for Bevy physics backend implementations.
///
/// Implement this trait to integrate a physics engine with the parkour
/// plugin. The backend provides velocity and transform access plus the
/// world probes; movement parameters are written to the
/// [`ParkourMotor`](crate::motor::ParkourMotor) component for the game's
/// locomotion to consume.
pub trait ParkourPhysicsBackend: 'static + Send + Sync {
    /// Returns the plugin that sets up this backend.
    fn plugin() -> impl Plugin;

    /// Get the current velocity of an entity.
    fn get_velocity(world: &World, entity: Entity) -> Vec3;

    /// Set the velocity of an entity.
    fn set_velocity(world: &mut World, entity: Entity, velocity: Vec3);

    /// Get the current position of an entity.
    fn get_position(world: &World, entity: Entity) -> Vec3;

    /// Teleport an entity.
    fn set_position(world: &mut World, entity: Entity, position: Vec3);

    /// Get the yaw of an entity (radians about +Z).
    fn get_yaw(world: &World, entity: Entity) -> f32;

    /// Set the yaw of an entity.
    fn set_yaw(world: &mut World, entity: Entity, yaw: f32);

    /// Trace a line, ignoring `exclude_entity`.
    fn line_trace(world: &World, start: Vec3, end: Vec3, exclude_entity: Entity) -> ProbeHit;

    /// Sweep a capsule, ignoring `exclude_entity`.
    fn sweep_capsule(
        world: &World,
        start: Vec3,
        end: Vec3,
        rotation: Quat,
        radius: f32,
        half_height: f32,
        exclude_entity: Entity,
    ) -> ProbeHit;

    /// Get the fixed timestep delta time.
    fn get_fixed_timestep(world: &World) -> f32 {
        world
            .get_resource::<Time<Fixed>>()
            .map(|t| t.delta_secs())
            .filter(|&d| d > 0.0)
            .unwrap_or(1.0 / 60.0)
    }
}

/// Empty plugin for backends that don't need additional setup.
pub struct NoOpBackendPlugin;

impl Plugin for NoOpBackendPlugin {
    fn build(&self, _app: &mut App) {}
}
