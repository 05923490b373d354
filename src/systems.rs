//! Bevy systems driving [`ParkourController`] components.
//!
//! The controller core is engine agnostic and is driven through a
//! [`ParkourHost`](crate::backend::ParkourHost). [`WorldHost`] is that host
//! for a Bevy entity: transform and velocity come from the physics backend,
//! locomotion parameters live in the entity's [`ParkourMotor`], input in its
//! [`ParkourIntent`], and feedback is sent as events.

use std::marker::PhantomData;

use bevy::prelude::*;

use crate::backend::{
    CharacterPose, FeedbackAdapter, MovementInterface, ParkourCue, ParkourPhysicsBackend, ProbeInterface,
};
use crate::collision::ProbeHit;
use crate::controller::ParkourController;
use crate::intent::{ParkourInput, ParkourIntent};
use crate::mode::{ParkourMode, SimulatedMovementMode};
use crate::motor::ParkourMotor;
use crate::state::{Climbing, Crouching, ParkourCueEvent, ParkourModeChanged, Sliding, Sprinting, WallRunning};

/// [`ParkourHost`](crate::backend::ParkourHost) over one entity of a Bevy
/// world.
///
/// The motor is held by value while the controller runs and written back by
/// [`into_motor`](Self::into_motor). Walking/falling switches made by the
/// controller itself are recorded as already reported, so they are not
/// echoed back to it as movement mode changes.
pub struct WorldHost<'w, B: ParkourPhysicsBackend> {
    world: &'w mut World,
    entity: Entity,
    motor: ParkourMotor,
    move_input: Vec3,
    _backend: PhantomData<fn() -> B>,
}

impl<'w, B: ParkourPhysicsBackend> WorldHost<'w, B> {
    pub fn new(world: &'w mut World, entity: Entity, motor: ParkourMotor, move_input: Vec3) -> Self {
        Self {
            world,
            entity,
            motor,
            move_input,
            _backend: PhantomData,
        }
    }

    pub fn entity(&self) -> Entity {
        self.entity
    }

    pub fn motor(&self) -> &ParkourMotor {
        &self.motor
    }

    /// Release the world and return the updated motor.
    pub fn into_motor(self) -> ParkourMotor {
        self.motor
    }

    /// Tell the controller about walking/falling switches made by the game
    /// since the last step. Touching down from a fall is a landing.
    pub fn report_movement_mode(&mut self, controller: &mut ParkourController) {
        let current = self.motor.simulated;
        let Some(previous) = self.motor.reported.replace(current) else {
            return;
        };
        if previous == current {
            return;
        }

        debug!("{:?} movement {previous:?} -> {current:?}", self.entity);
        if previous == SimulatedMovementMode::Falling && current == SimulatedMovementMode::Walking {
            controller.landed(self);
        }
        controller.movement_mode_changed(previous, current, self);
    }

    fn switch_simulated(&mut self, mode: SimulatedMovementMode) {
        self.motor.simulated = mode;
        self.motor.reported = Some(mode);
    }
}

impl<B: ParkourPhysicsBackend> ProbeInterface for WorldHost<'_, B> {
    fn line_trace(&self, start: Vec3, end: Vec3) -> ProbeHit {
        B::line_trace(self.world, start, end, self.entity)
    }

    fn sweep_capsule(&self, start: Vec3, end: Vec3, rotation: Quat, radius: f32, half_height: f32) -> ProbeHit {
        B::sweep_capsule(self.world, start, end, rotation, radius, half_height, self.entity)
    }
}

impl<B: ParkourPhysicsBackend> MovementInterface for WorldHost<'_, B> {
    fn is_falling(&self) -> bool {
        self.motor.is_falling()
    }

    fn is_walking(&self) -> bool {
        self.motor.is_walking()
    }

    fn velocity(&self) -> Vec3 {
        B::get_velocity(self.world, self.entity)
    }

    fn last_input_direction(&self) -> Vec3 {
        self.move_input
    }

    fn is_walkable(&self, normal: Vec3) -> bool {
        self.motor.is_walkable(normal)
    }

    fn gravity_scale(&self) -> f32 {
        self.motor.gravity_scale
    }

    fn set_gravity_scale(&mut self, scale: f32) {
        self.motor.gravity_scale = scale;
    }

    fn ground_friction(&self) -> f32 {
        self.motor.ground_friction
    }

    fn set_ground_friction(&mut self, friction: f32) {
        self.motor.ground_friction = friction;
    }

    fn braking_deceleration(&self) -> f32 {
        self.motor.braking_deceleration
    }

    fn set_braking_deceleration(&mut self, deceleration: f32) {
        self.motor.braking_deceleration = deceleration;
    }

    fn max_walk_speed(&self) -> f32 {
        self.motor.max_walk_speed
    }

    fn set_max_walk_speed(&mut self, speed: f32) {
        self.motor.max_walk_speed = speed;
    }

    fn max_crouch_speed(&self) -> f32 {
        self.motor.max_crouch_speed
    }

    fn set_max_crouch_speed(&mut self, speed: f32) {
        self.motor.max_crouch_speed = speed;
    }

    fn set_plane_constraint(&mut self, normal: Vec3, enabled: bool) {
        self.motor.plane_constraint = enabled.then_some(normal);
    }

    fn disable_movement(&mut self) {
        self.motor.movement_disabled = true;
    }

    fn stop_immediately(&mut self) {
        B::set_velocity(self.world, self.entity, Vec3::ZERO);
    }

    fn launch(&mut self, velocity: Vec3, xy_override: bool, z_override: bool) {
        let current = B::get_velocity(self.world, self.entity);
        let horizontal = if xy_override {
            velocity.with_z(0.0)
        } else {
            current.with_z(0.0) + velocity.with_z(0.0)
        };
        let vertical = if z_override {
            velocity.z
        } else {
            current.z + velocity.z
        };
        B::set_velocity(self.world, self.entity, horizontal.with_z(vertical));
        self.switch_simulated(SimulatedMovementMode::Falling);
    }

    fn add_impulse(&mut self, impulse: Vec3) {
        let current = B::get_velocity(self.world, self.entity);
        B::set_velocity(self.world, self.entity, current + impulse);
    }

    fn set_simulated_mode(&mut self, mode: SimulatedMovementMode) {
        self.motor.movement_disabled = false;
        self.switch_simulated(mode);
    }

    fn set_orient_rotation_to_movement(&mut self, enabled: bool) {
        self.motor.orient_rotation_to_movement = enabled;
    }

    fn use_controller_yaw(&self) -> bool {
        self.motor.use_controller_yaw
    }

    fn set_use_controller_yaw(&mut self, enabled: bool) {
        self.motor.use_controller_yaw = enabled;
    }

    fn crouch(&mut self) {
        self.motor.crouched = true;
    }

    fn uncrouch(&mut self) {
        self.motor.crouched = false;
    }
}

impl<B: ParkourPhysicsBackend> CharacterPose for WorldHost<'_, B> {
    fn location(&self) -> Vec3 {
        B::get_position(self.world, self.entity)
    }

    fn set_location(&mut self, location: Vec3) {
        B::set_position(self.world, self.entity, location);
    }

    fn yaw(&self) -> f32 {
        B::get_yaw(self.world, self.entity)
    }

    fn set_yaw(&mut self, yaw: f32) {
        B::set_yaw(self.world, self.entity, yaw);
    }

    fn capsule_radius(&self) -> f32 {
        self.motor.capsule_radius
    }

    fn capsule_half_height(&self) -> f32 {
        self.motor.capsule_half_height
    }

    fn eyes_location(&self) -> Vec3 {
        self.motor.eyes(self.location())
    }

    fn control_yaw(&self) -> f32 {
        self.motor.control_yaw
    }

    fn set_control_yaw(&mut self, yaw: f32) {
        self.motor.control_yaw = yaw;
    }
}

impl<B: ParkourPhysicsBackend> FeedbackAdapter for WorldHost<'_, B> {
    fn on_mode_changed(&mut self, previous: ParkourMode, current: ParkourMode) {
        self.world.send_event(ParkourModeChanged {
            entity: self.entity,
            previous,
            current,
        });
    }

    fn on_cue(&mut self, cue: ParkourCue) {
        self.world.send_event(ParkourCueEvent {
            entity: self.entity,
            cue,
        });
    }
}

/// Step every parkour controller once.
///
/// For each entity: report walking/falling switches, apply buffered input
/// presses in order, then run the controller update with the fixed timestep.
/// Controllers that were never initialised capture their baseline from the
/// motor on their first step.
pub fn drive_parkour<B: ParkourPhysicsBackend>(world: &mut World) {
    let dt = B::get_fixed_timestep(world);

    let entities: Vec<Entity> = world
        .query_filtered::<Entity, (With<ParkourController>, With<ParkourMotor>)>()
        .iter(world)
        .collect();

    for entity in entities {
        let taken = {
            let Ok(mut entity_mut) = world.get_entity_mut(entity) else {
                continue;
            };
            let Some(motor) = entity_mut.get::<ParkourMotor>().cloned() else {
                continue;
            };
            let Some(controller) = entity_mut
                .get_mut::<ParkourController>()
                .map(|mut controller| std::mem::take(&mut *controller))
            else {
                continue;
            };
            let (move_input, inputs) = entity_mut
                .get_mut::<ParkourIntent>()
                .map(|mut intent| (intent.move_input, intent.take_inputs()))
                .unwrap_or_default();
            (controller, motor, move_input, inputs)
        };
        let (mut controller, motor, move_input, inputs) = taken;

        let mut host = WorldHost::<B>::new(world, entity, motor, move_input);

        if !controller.is_initialised() {
            controller.initialise(&host);
        }
        host.report_movement_mode(&mut controller);

        for input in inputs {
            trace!("{entity:?} input {input:?}");
            match input {
                ParkourInput::Jump => controller.jump_pressed(&mut host),
                ParkourInput::Sprint => controller.sprint_pressed(&mut host),
                ParkourInput::CrouchOrSlide => controller.crouch_or_slide_pressed(&mut host),
            }
        }

        controller.update(&mut host, dt);

        let motor = host.into_motor();
        if let Some(mut slot) = world.get_mut::<ParkourController>(entity) {
            *slot = controller;
        }
        if let Some(mut slot) = world.get_mut::<ParkourMotor>(entity) {
            *slot = motor;
        }
    }
}

/// Synchronize state marker components with controller state.
pub fn sync_state_markers(
    mut commands: Commands,
    q_controllers: Query<(
        Entity,
        &ParkourController,
        Option<&ParkourMotor>,
        Option<&WallRunning>,
        Has<Climbing>,
        Has<Sliding>,
        Has<Sprinting>,
        Has<Crouching>,
    )>,
) {
    for (entity, controller, motor, wall_running, has_climbing, has_sliding, has_sprinting, has_crouching) in
        &q_controllers
    {
        let mode = controller.mode();
        let mut entity_commands = commands.entity(entity);

        match (WallRunning::from_mode(mode), wall_running) {
            (Some(side), Some(current)) if side == *current => {}
            (Some(side), _) => {
                entity_commands.insert(side);
            }
            (None, Some(_)) => {
                entity_commands.remove::<WallRunning>();
            }
            (None, None) => {}
        }

        sync_marker(&mut entity_commands, Climbing, mode.is_climbing(), has_climbing);
        sync_marker(&mut entity_commands, Sliding, mode == ParkourMode::Slide, has_sliding);
        sync_marker(&mut entity_commands, Sprinting, mode == ParkourMode::Sprint, has_sprinting);

        let crouched = motor.is_some_and(|motor| motor.crouched);
        sync_marker(&mut entity_commands, Crouching, crouched, has_crouching);
    }
}

fn sync_marker<M: Component>(commands: &mut EntityCommands, marker: M, wanted: bool, present: bool) {
    if wanted && !present {
        commands.insert(marker);
    } else if !wanted && present {
        commands.remove::<M>();
    }
}
