//! Scripted host for unit tests.
//!
//! World geometry is a list of infinite planes. Traces hit a plane when they
//! start in front of it and end behind it; sweeps are treated as traces of
//! their center line. Nothing integrates: the host only records what the
//! controller writes.

use bevy::prelude::*;

use crate::backend::{CharacterPose, FeedbackAdapter, MovementInterface, ParkourCue, ProbeInterface};
use crate::collision::ProbeHit;
use crate::config::ParkourConfig;
use crate::controller::ParkourController;
use crate::mode::{ParkourMode, SimulatedMovementMode};

pub const DT: f32 = 1.0 / 60.0;

#[derive(Debug, Clone, Copy)]
pub struct TestPlane {
    pub point: Vec3,
    pub normal: Vec3,
}

impl TestPlane {
    pub fn new(point: Vec3, normal: Vec3) -> Self {
        Self {
            point,
            normal: normal.normalize(),
        }
    }

    fn intersect(&self, start: Vec3, end: Vec3) -> Option<ProbeHit> {
        let d0 = (start - self.point).dot(self.normal);
        let d1 = (end - self.point).dot(self.normal);
        if d0 < 0.0 || d1 >= 0.0 {
            return None;
        }
        let t = d0 / (d0 - d1);
        let point = start.lerp(end, t);
        Some(ProbeHit::hit(self.normal, point, start.distance(point)))
    }
}

#[derive(Debug, Clone)]
pub struct ScriptedHost {
    pub planes: Vec<TestPlane>,
    pub walkable_min_z: f32,

    pub location: Vec3,
    pub yaw: f32,
    pub control_yaw: f32,
    pub radius: f32,
    pub half_height: f32,
    pub eye_height: f32,

    pub velocity: Vec3,
    pub input: Vec3,
    pub simulated: SimulatedMovementMode,
    pub movement_disabled: bool,

    pub gravity_scale: f32,
    pub ground_friction: f32,
    pub braking_deceleration: f32,
    pub max_walk_speed: f32,
    pub max_crouch_speed: f32,
    pub plane_constraint: Option<Vec3>,
    pub orient_to_movement: bool,
    pub use_controller_yaw: bool,
    pub crouched: bool,

    pub launches: Vec<(Vec3, bool, bool)>,
    pub impulses: Vec<Vec3>,
    pub mode_changes: Vec<(ParkourMode, ParkourMode)>,
    pub cues: Vec<ParkourCue>,
    pub camera_roll: f32,
    /// Number of movement and pose writes.
    pub writes: usize,
}

impl Default for ScriptedHost {
    fn default() -> Self {
        Self {
            planes: Vec::new(),
            walkable_min_z: 0.71,
            location: Vec3::new(0.0, 0.0, 100.0),
            yaw: 0.0,
            control_yaw: 0.0,
            radius: 34.0,
            half_height: 88.0,
            eye_height: 64.0,
            velocity: Vec3::ZERO,
            input: Vec3::ZERO,
            simulated: SimulatedMovementMode::Walking,
            movement_disabled: false,
            gravity_scale: 1.0,
            ground_friction: 8.0,
            braking_deceleration: 2048.0,
            max_walk_speed: 600.0,
            max_crouch_speed: 300.0,
            plane_constraint: None,
            orient_to_movement: true,
            use_controller_yaw: true,
            crouched: false,
            launches: Vec::new(),
            impulses: Vec::new(),
            mode_changes: Vec::new(),
            cues: Vec::new(),
            camera_roll: 0.0,
            writes: 0,
        }
    }
}

impl ScriptedHost {
    pub fn grounded() -> Self {
        Self::default()
    }

    pub fn airborne() -> Self {
        Self {
            simulated: SimulatedMovementMode::Falling,
            ..default()
        }
    }

    pub fn with_forward_input(mut self) -> Self {
        self.input = Vec3::X;
        self
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_plane(mut self, plane: TestPlane) -> Self {
        self.planes.push(plane);
        self
    }

    /// An initialised default controller driving this host.
    pub fn with_controller(self) -> (ParkourController, Self) {
        let mut controller = ParkourController::new(ParkourConfig::default());
        controller.initialise(&self);
        (controller, self)
    }

    fn trace(&self, start: Vec3, end: Vec3) -> ProbeHit {
        self.planes
            .iter()
            .filter_map(|plane| plane.intersect(start, end))
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
            .unwrap_or_else(ProbeHit::miss)
    }
}

impl ProbeInterface for ScriptedHost {
    fn line_trace(&self, start: Vec3, end: Vec3) -> ProbeHit {
        self.trace(start, end)
    }

    fn sweep_capsule(&self, start: Vec3, end: Vec3, _rotation: Quat, _radius: f32, _half_height: f32) -> ProbeHit {
        self.trace(start, end)
    }
}

impl MovementInterface for ScriptedHost {
    fn is_falling(&self) -> bool {
        self.simulated == SimulatedMovementMode::Falling
    }

    fn is_walking(&self) -> bool {
        self.simulated == SimulatedMovementMode::Walking
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn last_input_direction(&self) -> Vec3 {
        self.input
    }

    fn is_walkable(&self, normal: Vec3) -> bool {
        normal.z >= self.walkable_min_z
    }

    fn gravity_scale(&self) -> f32 {
        self.gravity_scale
    }

    fn set_gravity_scale(&mut self, scale: f32) {
        self.writes += 1;
        self.gravity_scale = scale;
    }

    fn ground_friction(&self) -> f32 {
        self.ground_friction
    }

    fn set_ground_friction(&mut self, friction: f32) {
        self.writes += 1;
        self.ground_friction = friction;
    }

    fn braking_deceleration(&self) -> f32 {
        self.braking_deceleration
    }

    fn set_braking_deceleration(&mut self, deceleration: f32) {
        self.writes += 1;
        self.braking_deceleration = deceleration;
    }

    fn max_walk_speed(&self) -> f32 {
        self.max_walk_speed
    }

    fn set_max_walk_speed(&mut self, speed: f32) {
        self.writes += 1;
        self.max_walk_speed = speed;
    }

    fn max_crouch_speed(&self) -> f32 {
        self.max_crouch_speed
    }

    fn set_max_crouch_speed(&mut self, speed: f32) {
        self.writes += 1;
        self.max_crouch_speed = speed;
    }

    fn set_plane_constraint(&mut self, normal: Vec3, enabled: bool) {
        self.writes += 1;
        self.plane_constraint = enabled.then_some(normal);
    }

    fn disable_movement(&mut self) {
        self.writes += 1;
        self.movement_disabled = true;
    }

    fn stop_immediately(&mut self) {
        self.writes += 1;
        self.velocity = Vec3::ZERO;
    }

    fn launch(&mut self, velocity: Vec3, xy_override: bool, z_override: bool) {
        self.writes += 1;
        self.launches.push((velocity, xy_override, z_override));

        let mut next = if xy_override {
            velocity.with_z(self.velocity.z)
        } else {
            self.velocity + velocity.with_z(0.0)
        };
        next.z = if z_override {
            velocity.z
        } else {
            self.velocity.z + velocity.z
        };
        self.velocity = next;
        self.simulated = SimulatedMovementMode::Falling;
    }

    fn add_impulse(&mut self, impulse: Vec3) {
        self.writes += 1;
        self.impulses.push(impulse);
        self.velocity += impulse;
    }

    fn set_simulated_mode(&mut self, mode: SimulatedMovementMode) {
        self.writes += 1;
        self.simulated = mode;
        self.movement_disabled = false;
    }

    fn set_orient_rotation_to_movement(&mut self, enabled: bool) {
        self.writes += 1;
        self.orient_to_movement = enabled;
    }

    fn use_controller_yaw(&self) -> bool {
        self.use_controller_yaw
    }

    fn set_use_controller_yaw(&mut self, enabled: bool) {
        self.writes += 1;
        self.use_controller_yaw = enabled;
    }

    fn crouch(&mut self) {
        self.writes += 1;
        self.crouched = true;
    }

    fn uncrouch(&mut self) {
        self.writes += 1;
        self.crouched = false;
    }
}

impl CharacterPose for ScriptedHost {
    fn location(&self) -> Vec3 {
        self.location
    }

    fn set_location(&mut self, location: Vec3) {
        self.writes += 1;
        self.location = location;
    }

    fn yaw(&self) -> f32 {
        self.yaw
    }

    fn set_yaw(&mut self, yaw: f32) {
        self.writes += 1;
        self.yaw = yaw;
    }

    fn capsule_radius(&self) -> f32 {
        self.radius
    }

    fn capsule_half_height(&self) -> f32 {
        self.half_height
    }

    fn eyes_location(&self) -> Vec3 {
        self.location + Vec3::Z * self.eye_height
    }

    fn control_yaw(&self) -> f32 {
        self.control_yaw
    }

    fn set_control_yaw(&mut self, yaw: f32) {
        self.writes += 1;
        self.control_yaw = yaw;
    }
}

impl FeedbackAdapter for ScriptedHost {
    fn on_mode_changed(&mut self, previous: ParkourMode, current: ParkourMode) {
        self.mode_changes.push((previous, current));
    }

    fn on_cue(&mut self, cue: ParkourCue) {
        self.cues.push(cue);
    }

    fn on_camera_roll(&mut self, roll_degrees: f32) {
        self.camera_roll = roll_degrees;
    }
}
