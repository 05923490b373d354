//! The parkour state machine.
//!
//! [`ParkourController`] owns the single authoritative [`ParkourMode`], the
//! gate and queue registry, the timer service and every geometry snapshot.
//! It is driven by the host through [`update`](ParkourController::update)
//! once per simulation step and through the input handlers below. The
//! per-ability routines live in [`wall_run`](crate::wall_run),
//! [`climb`](crate::climb), [`slide`](crate::slide) and
//! [`sprint`](crate::sprint).

use std::time::Duration;

use bevy::prelude::*;

use crate::backend::{MovementInterface, ParkourCue, ParkourHost};
use crate::config::{LocomotionBaseline, ParkourConfig};
use crate::eligibility;
use crate::gates::{Gate, GateSet, Queue, QueueSet};
use crate::geometry::{CapsuleMove, ClimbContact, LedgeSnapshot, WallContact};
use crate::intent::ParkourIntent;
use crate::mode::{ModeTransition, ParkourMode, SimulatedMovementMode};
use crate::motor::ParkourMotor;
use crate::timers::{DeferredAction, TimerService};

const UNINITIALISED: &str = "ParkourController driven before initialise(): the locomotion baseline has not been captured";

/// Parkour movement controller.
///
/// # Example
///
/// ```rust,ignore
/// let mut controller = ParkourController::new(ParkourConfig::player());
/// controller.initialise(&host);
///
/// // every simulation step
/// controller.update(&mut host, dt);
///
/// // on input
/// controller.jump_pressed(&mut host);
/// ```
#[derive(Component, Debug, Clone, Default)]
#[require(ParkourMotor, ParkourIntent)]
pub struct ParkourController {
    pub(crate) config: ParkourConfig,
    pub(crate) baseline: Option<LocomotionBaseline>,

    pub(crate) mode: ParkourMode,
    pub(crate) last_transition: Option<ModeTransition>,

    pub(crate) gates: GateSet,
    pub(crate) queues: QueueSet,
    pub(crate) timers: TimerService,

    pub(crate) wall: Option<WallContact>,
    pub(crate) climb: Option<ClimbContact>,
    pub(crate) ledge: Option<LedgeSnapshot>,

    pub(crate) wall_run_gravity_on: bool,
    pub(crate) capsule_move: Option<CapsuleMove>,
    pub(crate) camera_roll: f32,

    /// Delta of the step currently being processed.
    pub(crate) dt: f32,
}

impl ParkourController {
    /// Create an uninitialised controller.
    pub fn new(config: ParkourConfig) -> Self {
        Self {
            config,
            ..default()
        }
    }

    /// Capture the locomotion baseline from the host. Must be called before
    /// the controller is driven.
    pub fn initialise(&mut self, movement: &impl MovementInterface) {
        let baseline = LocomotionBaseline {
            gravity_scale: movement.gravity_scale(),
            ground_friction: movement.ground_friction(),
            braking_deceleration: movement.braking_deceleration(),
            max_walk_speed: movement.max_walk_speed(),
            max_crouch_speed: movement.max_crouch_speed(),
            use_controller_yaw: movement.use_controller_yaw(),
        };
        debug!("parkour baseline captured: {baseline:?}");
        self.baseline = Some(baseline);
    }

    // === Accessors ===

    pub fn config(&self) -> &ParkourConfig {
        &self.config
    }

    /// Replace the configuration. The baseline and current state are kept.
    pub fn set_config(&mut self, config: ParkourConfig) {
        self.config = config;
    }

    pub fn is_initialised(&self) -> bool {
        self.baseline.is_some()
    }

    pub fn baseline(&self) -> Option<&LocomotionBaseline> {
        self.baseline.as_ref()
    }

    /// The active mode.
    pub fn mode(&self) -> ParkourMode {
        self.mode
    }

    /// The most recent accepted mode change.
    pub fn last_transition(&self) -> Option<ModeTransition> {
        self.last_transition
    }

    pub fn gates(&self) -> &GateSet {
        &self.gates
    }

    pub fn queues(&self) -> &QueueSet {
        &self.queues
    }

    /// Wall of the current wall-run, if wall-running.
    pub fn wall_contact(&self) -> Option<&WallContact> {
        self.wall.as_ref()
    }

    /// Wall of the current vertical climb, if climbing.
    pub fn climb_contact(&self) -> Option<&ClimbContact> {
        self.climb.as_ref()
    }

    /// Ledge being grabbed or mantled, if any.
    pub fn ledge(&self) -> Option<&LedgeSnapshot> {
        self.ledge.as_ref()
    }

    /// Whether wall-run gravity has taken over vertical motion.
    pub fn wall_run_gravity_on(&self) -> bool {
        self.wall_run_gravity_on
    }

    /// Whether a capsule snap onto a wall or ledge is in flight.
    pub fn is_correcting(&self) -> bool {
        self.capsule_move.is_some()
    }

    /// Current camera roll in degrees.
    pub fn camera_roll(&self) -> f32 {
        self.camera_roll
    }

    /// Simulated time advanced through [`update`](Self::update).
    pub fn elapsed(&self) -> Duration {
        self.timers.elapsed()
    }

    /// Number of deferred actions still waiting to fire.
    pub fn pending_timers(&self) -> usize {
        self.timers.pending_count()
    }

    // === Transition protocol ===

    /// Switch to `mode`.
    ///
    /// Returns `false` without side effects if `mode` is already active.
    /// Otherwise records the transition, drops snapshots and capsule moves
    /// belonging to the old mode, resets movement parameters for the new
    /// mode and notifies the feedback adapter. Callers run entry-only side
    /// effects only when this returns `true`.
    pub fn request_mode(&mut self, mode: ParkourMode, host: &mut impl ParkourHost) -> bool {
        self.assert_initialised();
        if mode == self.mode {
            return false;
        }

        let transition = ModeTransition::new(self.mode, mode);
        debug!("parkour mode {:?} -> {:?}", transition.previous, transition.current);
        self.mode = mode;
        self.last_transition = Some(transition);

        if !mode.is_wall_running() {
            self.wall = None;
        }
        if !mode.is_climbing() {
            self.climb = None;
            self.ledge = None;
        }
        self.capsule_move = None;

        self.reset_movement(transition, host);
        host.on_mode_changed(transition.previous, transition.current);
        true
    }

    fn reset_movement(&self, transition: ModeTransition, host: &mut impl ParkourHost) {
        let baseline = self.expect_baseline();

        if transition.current.is_free() {
            host.set_orient_rotation_to_movement(true);
            host.set_use_controller_yaw(baseline.use_controller_yaw);

            host.set_gravity_scale(baseline.gravity_scale);
            host.set_ground_friction(baseline.ground_friction);
            host.set_braking_deceleration(baseline.braking_deceleration);
            host.set_max_walk_speed(baseline.max_walk_speed);
            host.set_max_crouch_speed(baseline.max_crouch_speed);
            host.set_plane_constraint(Vec3::ZERO, false);

            let resume = if transition.previous.resumes_walking() {
                SimulatedMovementMode::Walking
            } else {
                SimulatedMovementMode::Falling
            };
            host.set_simulated_mode(resume);
        } else {
            // Facing is locked for every ability except sprint.
            let sprinting = transition.current == ParkourMode::Sprint;
            host.set_orient_rotation_to_movement(sprinting);
            host.set_use_controller_yaw(sprinting && baseline.use_controller_yaw);
        }
    }

    // === Frame update ===

    /// Run one simulation step of `dt` seconds.
    ///
    /// Due timers are applied first so that reopened gates are visible to
    /// this step's ability checks. Then the in-flight capsule snap advances,
    /// every ability routine whose gate is open runs, and the camera roll is
    /// updated.
    pub fn update(&mut self, host: &mut impl ParkourHost, dt: f32) {
        self.assert_initialised();
        self.dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        let delta = Duration::try_from_secs_f32(self.dt).unwrap_or(Duration::ZERO);
        for action in self.timers.advance(delta) {
            self.apply_deferred(action, host);
        }

        self.advance_capsule_move(host);

        if self.gates.is_open(Gate::WallRun) {
            self.wall_run_update(host);
        }
        if self.gates.is_open(Gate::VerticalWallRun) {
            self.vertical_wall_run_update(host);
        }
        if self.gates.is_open(Gate::CheckMantle) {
            self.mantle_check(host);
        }
        if self.gates.is_open(Gate::Mantle) {
            self.mantle_movement(host);
        }
        if self.gates.is_open(Gate::Slide) {
            self.slide_update(host);
        }
        if self.gates.is_open(Gate::Sprint) {
            self.sprint_update(host);
        }

        if self.config.sprint.always_sprint {
            self.auto_sprint(host);
        }

        self.camera_tick(host);
    }

    fn apply_deferred(&mut self, action: DeferredAction, host: &mut impl ParkourHost) {
        trace!("deferred {action:?}");
        match action {
            DeferredAction::OpenGate(gate) => self.gates.open(gate),
            DeferredAction::EnableWallRunGravity => {
                self.wall_run_gravity_on = self.mode.is_wall_running();
            }
            DeferredAction::CheckQueues => self.check_queues(host),
        }
    }

    fn advance_capsule_move(&mut self, host: &mut impl ParkourHost) {
        let Some(capsule_move) = self.capsule_move.as_mut() else {
            return;
        };

        let (location, yaw) = capsule_move.advance(self.dt);
        host.set_location(location);
        host.set_yaw(yaw);

        if capsule_move.is_finished() {
            self.capsule_move = None;
        }
    }

    /// Start snapping the capsule to `target` over the correction duration.
    pub(crate) fn start_capsule_move(&mut self, host: &impl ParkourHost, (location, yaw): (Vec3, f32)) {
        self.capsule_move = Some(CapsuleMove::new(
            host.location(),
            host.yaw(),
            location,
            yaw,
            self.config.correction_duration,
        ));
    }

    // === Input handlers ===

    /// Jump input.
    ///
    /// From rest this only clears cooldowns. Otherwise every ability's jump
    /// handler runs in priority order; each is a no-op outside its own mode.
    /// A sprint is queued afterwards whichever handler consumed the jump.
    pub fn jump_pressed(&mut self, host: &mut impl ParkourHost) {
        self.assert_initialised();

        if self.mode == ParkourMode::None {
            if !host.is_falling() {
                self.gates.open_locomotion();
                self.cue(host, ParkourCue::JumpLand);
            }
            return;
        }

        self.wall_jump(host);
        self.ledge_jump(host);
        self.slide_jump(host);
        self.crouch_jump(host);
        self.sprint_jump(host);
        self.queues.arm(Queue::Sprint);
    }

    /// The character touched down.
    pub fn landed(&mut self, host: &mut impl ParkourHost) {
        self.assert_initialised();
        self.end_everything(host);
        self.gates.close_locomotion();
        self.gates.open_locomotion();
        self.cue(host, ParkourCue::JumpLand);
    }

    /// Sprint input.
    pub fn sprint_pressed(&mut self, host: &mut impl ParkourHost) {
        self.assert_initialised();
        self.sprint_start(host);
    }

    /// Crouch/slide input: cancels a climb or wall-run, otherwise slides
    /// (now or on landing) when eligible, otherwise toggles crouch.
    pub fn crouch_or_slide_pressed(&mut self, host: &mut impl ParkourHost) {
        self.assert_initialised();
        let cancel = self.config.cancel_cooldown;

        if self.mode.is_climbing() {
            self.climb_end(host, cancel);
        } else if self.mode.is_wall_running() {
            self.wall_run_end(host, cancel);
        } else if self.can_slide(host) {
            if host.is_walking() {
                self.slide_start(host);
            } else {
                self.queues.arm(Queue::Slide);
            }
        } else {
            self.toggle_crouch(host);
        }
    }

    /// The host switched between walking and falling.
    pub fn movement_mode_changed(
        &mut self,
        previous: SimulatedMovementMode,
        current: SimulatedMovementMode,
        host: &mut impl ParkourHost,
    ) {
        self.assert_initialised();
        use SimulatedMovementMode::{Falling, Walking};

        match (previous, current) {
            (Walking, Falling) => {
                self.sprint_jump(host);
                self.end_everything(host);
                self.gates.open_locomotion();
            }
            (Falling, Walking) => self.check_queues(host),
            _ => {}
        }
    }

    /// End every ability with no cooldown.
    pub fn end_everything(&mut self, host: &mut impl ParkourHost) {
        self.wall_run_end(host, 0.0);
        self.climb_end(host, 0.0);
        self.sprint_end(host);
        self.slide_end(host, false);
    }

    /// Start a queued ability. Slide wins over sprint.
    pub fn check_queues(&mut self, host: &mut impl ParkourHost) {
        match self.queues.next() {
            Some(Queue::Slide) => self.slide_start(host),
            Some(Queue::Sprint) => self.sprint_start(host),
            None => {}
        }
    }

    // === Shared helpers ===

    pub(crate) fn forward_input(&self, host: &impl ParkourHost) -> f32 {
        eligibility::forward_input(host.forward(), host.last_input_direction())
    }

    pub(crate) fn can_slide(&self, host: &impl ParkourHost) -> bool {
        eligibility::can_slide(self.mode, self.forward_input(host), self.queues.is_queued(Queue::Sprint))
    }

    pub(crate) fn cue(&self, host: &mut impl ParkourHost, cue: ParkourCue) {
        if self.config.camera_shake {
            host.on_cue(cue);
        }
    }

    #[track_caller]
    fn assert_initialised(&self) {
        assert!(self.baseline.is_some(), "{UNINITIALISED}");
    }

    #[track_caller]
    fn expect_baseline(&self) -> LocomotionBaseline {
        match self.baseline {
            Some(baseline) => baseline,
            None => panic!("{UNINITIALISED}"),
        }
    }
}
