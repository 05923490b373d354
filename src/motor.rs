//! Locomotion parameters shared between the parkour controller and the
//! game's movement code.
//!
//! The controller writes walk speed, gravity scale, friction and the rest
//! into [`ParkourMotor`]; the game's locomotion reads them when integrating
//! the character. The motor also carries what the controller needs to know
//! about the character that a physics backend does not: the capsule, the
//! view and whether the character is walking or falling.

use bevy::prelude::*;

use crate::mode::SimulatedMovementMode;

/// Locomotion parameters and posture of a parkour character.
#[derive(Component, Reflect, Debug, Clone, PartialEq)]
#[reflect(Component)]
pub struct ParkourMotor {
    /// Walking or falling, as reported by the game's locomotion.
    pub simulated: SimulatedMovementMode,
    /// Set while hanging from a ledge. Locomotion should not integrate
    /// velocity or gravity.
    pub movement_disabled: bool,

    pub gravity_scale: f32,
    pub ground_friction: f32,
    pub braking_deceleration: f32,
    pub max_walk_speed: f32,
    pub max_crouch_speed: f32,
    /// Normal of the plane movement is locked to, if any.
    pub plane_constraint: Option<Vec3>,

    pub orient_rotation_to_movement: bool,
    pub use_controller_yaw: bool,
    pub crouched: bool,
    /// Camera yaw in radians about +Z.
    pub control_yaw: f32,

    pub capsule_radius: f32,
    /// Half height including the hemispheres.
    pub capsule_half_height: f32,
    /// Eyes above the capsule center.
    pub eye_height: f32,
    /// Minimum normal Z of walkable floor.
    pub walkable_floor_z: f32,

    /// Last simulated mode the controller was told about.
    #[reflect(ignore)]
    pub(crate) reported: Option<SimulatedMovementMode>,
}

impl Default for ParkourMotor {
    fn default() -> Self {
        Self {
            simulated: SimulatedMovementMode::Walking,
            movement_disabled: false,
            gravity_scale: 1.0,
            ground_friction: 8.0,
            braking_deceleration: 2048.0,
            max_walk_speed: 600.0,
            max_crouch_speed: 300.0,
            plane_constraint: None,
            orient_rotation_to_movement: true,
            use_controller_yaw: false,
            crouched: false,
            control_yaw: 0.0,
            capsule_radius: 34.0,
            capsule_half_height: 88.0,
            eye_height: 64.0,
            // cos(45 deg)
            walkable_floor_z: 0.71,
            reported: None,
        }
    }
}

impl ParkourMotor {
    /// Motor for a capsule of the given size.
    pub fn new(capsule_radius: f32, capsule_half_height: f32) -> Self {
        Self {
            capsule_radius,
            capsule_half_height,
            ..default()
        }
    }

    pub fn with_eye_height(mut self, eye_height: f32) -> Self {
        self.eye_height = eye_height;
        self
    }

    pub fn with_walk_speed(mut self, max_walk_speed: f32) -> Self {
        self.max_walk_speed = max_walk_speed;
        self
    }

    pub fn with_crouch_speed(mut self, max_crouch_speed: f32) -> Self {
        self.max_crouch_speed = max_crouch_speed;
        self
    }

    pub fn with_friction(mut self, ground_friction: f32, braking_deceleration: f32) -> Self {
        self.ground_friction = ground_friction;
        self.braking_deceleration = braking_deceleration;
        self
    }

    /// Maximum walkable slope, in radians.
    pub fn with_walkable_slope(mut self, max_slope: f32) -> Self {
        self.walkable_floor_z = max_slope.cos();
        self
    }

    pub fn with_controller_yaw(mut self, enabled: bool) -> Self {
        self.use_controller_yaw = enabled;
        self
    }

    pub fn airborne(mut self) -> Self {
        self.simulated = SimulatedMovementMode::Falling;
        self
    }

    pub fn is_walking(&self) -> bool {
        self.simulated == SimulatedMovementMode::Walking
    }

    pub fn is_falling(&self) -> bool {
        self.simulated == SimulatedMovementMode::Falling
    }

    /// Whether a surface with this normal counts as floor.
    pub fn is_walkable(&self, normal: Vec3) -> bool {
        normal.z >= self.walkable_floor_z
    }

    /// Speed cap for the current posture.
    pub fn speed_cap(&self) -> f32 {
        if self.crouched {
            self.max_crouch_speed
        } else {
            self.max_walk_speed
        }
    }

    /// Remove the component of `velocity` along the plane constraint normal.
    pub fn constrain(&self, velocity: Vec3) -> Vec3 {
        match self.plane_constraint.and_then(|normal| normal.try_normalize()) {
            Some(normal) => velocity - normal * velocity.dot(normal),
            None => velocity,
        }
    }

    /// World position of the eyes for a capsule centered at `location`.
    pub fn eyes(&self, location: Vec3) -> Vec3 {
        location + Vec3::Z * self.eye_height
    }
}
