//! Sprinting and crouching.

use crate::backend::ParkourHost;
use crate::controller::ParkourController;
use crate::eligibility::can_sprint;
use crate::gates::{Gate, Queue};
use crate::mode::ParkourMode;
use crate::timers::DeferredAction;

impl ParkourController {
    /// Stand up out of a slide or crouch, then sprint if on the ground with
    /// no other ability active.
    pub(crate) fn sprint_start(&mut self, host: &mut impl ParkourHost) {
        self.slide_end(host, false);
        self.crouch_end(host);

        if !can_sprint(self.mode, host.is_walking()) || !self.gates.is_open(Gate::Sprint) {
            return;
        }
        if self.request_mode(ParkourMode::Sprint, host) {
            host.set_max_walk_speed(self.config.sprint.speed);
            self.gates.open(Gate::Sprint);
            self.queues.clear();
        }
    }

    /// Per-step sprint routine, guarded by the sprint gate.
    pub(crate) fn sprint_update(&mut self, host: &mut impl ParkourHost) {
        if self.mode == ParkourMode::Sprint && self.forward_input(host) <= 0.0 {
            self.sprint_end(host);
        }
    }

    /// Sprint whenever possible while pushing forward.
    pub(crate) fn auto_sprint(&mut self, host: &mut impl ParkourHost) {
        let eligible = can_sprint(self.mode, host.is_walking()) && self.gates.is_open(Gate::Sprint);
        if eligible && self.forward_input(host) > 0.0 {
            self.sprint_start(host);
        }
    }

    /// Stop sprinting. The sprint gate stays closed for a short debounce.
    /// No-op unless sprinting.
    pub fn sprint_end(&mut self, host: &mut impl ParkourHost) {
        if self.mode != ParkourMode::Sprint {
            return;
        }
        if self.request_mode(ParkourMode::None, host) {
            self.gates.close(Gate::Sprint);
            self.timers
                .schedule(self.config.sprint.reopen_delay, DeferredAction::OpenGate(Gate::Sprint), false);
        }
    }

    /// Jumping out of a sprint carries the sprint into the next landing.
    pub(crate) fn sprint_jump(&mut self, host: &mut impl ParkourHost) {
        if self.mode == ParkourMode::Sprint {
            self.sprint_end(host);
            self.queues.arm(Queue::Sprint);
        }
    }

    pub(crate) fn crouch_start(&mut self, host: &mut impl ParkourHost) {
        if self.mode == ParkourMode::None {
            host.crouch();
            self.request_mode(ParkourMode::Crouch, host);
            self.queues.clear();
        }
    }

    /// Stand up. No-op unless crouching.
    pub fn crouch_end(&mut self, host: &mut impl ParkourHost) {
        if self.mode == ParkourMode::Crouch {
            host.uncrouch();
            self.request_mode(ParkourMode::None, host);
            self.queues.clear();
        }
    }

    pub(crate) fn crouch_jump(&mut self, host: &mut impl ParkourHost) {
        self.crouch_end(host);
    }

    pub(crate) fn toggle_crouch(&mut self, host: &mut impl ParkourHost) {
        match self.mode {
            ParkourMode::None => self.crouch_start(host),
            ParkourMode::Crouch => self.crouch_end(host),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use super::*;
    use crate::test_support::{ScriptedHost, DT};

    #[test]
    fn sprint_raises_walk_speed() {
        let (mut controller, mut host) = ScriptedHost::grounded().with_forward_input().with_controller();
        controller.queues.arm(Queue::Slide);

        controller.sprint_pressed(&mut host);

        assert_eq!(controller.mode(), ParkourMode::Sprint);
        assert_eq!(host.max_walk_speed, 1000.0);
        assert_eq!(controller.queues().next(), None);
        assert!(host.orient_to_movement);
    }

    #[test]
    fn sprint_needs_ground() {
        let (mut controller, mut host) = ScriptedHost::airborne().with_forward_input().with_controller();
        controller.sprint_pressed(&mut host);
        assert_eq!(controller.mode(), ParkourMode::None);
    }

    #[test]
    fn releasing_forward_ends_sprint_with_debounce() {
        let (mut controller, mut host) = ScriptedHost::grounded().with_forward_input().with_controller();
        controller.sprint_pressed(&mut host);

        host.input = Vec3::ZERO;
        controller.update(&mut host, DT);

        assert_eq!(controller.mode(), ParkourMode::None);
        assert!(!controller.gates().is_open(Gate::Sprint));
        assert_eq!(host.max_walk_speed, controller.baseline().expect("baseline").max_walk_speed);

        // Sprint input during the debounce is ignored.
        host.input = Vec3::X;
        controller.sprint_pressed(&mut host);
        assert_eq!(controller.mode(), ParkourMode::None);

        controller.update(&mut host, 0.125);
        assert!(controller.gates().is_open(Gate::Sprint));
        controller.sprint_pressed(&mut host);
        assert_eq!(controller.mode(), ParkourMode::Sprint);
    }

    #[test]
    fn sprint_stands_up_from_crouch() {
        let (mut controller, mut host) = ScriptedHost::grounded().with_forward_input().with_controller();
        controller.crouch_or_slide_pressed(&mut host);
        assert_eq!(controller.mode(), ParkourMode::Crouch);

        controller.sprint_pressed(&mut host);

        assert_eq!(controller.mode(), ParkourMode::Sprint);
        assert!(!host.crouched);
    }

    #[test]
    fn sprint_jump_queues_sprint() {
        let (mut controller, mut host) = ScriptedHost::grounded().with_forward_input().with_controller();
        controller.sprint_pressed(&mut host);

        controller.jump_pressed(&mut host);

        assert_eq!(controller.mode(), ParkourMode::None);
        assert!(controller.queues().is_queued(Queue::Sprint));
        assert!(!controller.gates().is_open(Gate::Sprint));
    }

    #[test]
    fn crouch_toggles() {
        let (mut controller, mut host) = ScriptedHost::grounded().with_controller();
        controller.queues.arm(Queue::Sprint);

        controller.crouch_or_slide_pressed(&mut host);
        assert_eq!(controller.mode(), ParkourMode::Crouch);
        assert!(host.crouched);
        assert_eq!(controller.queues().next(), None);

        controller.crouch_or_slide_pressed(&mut host);
        assert_eq!(controller.mode(), ParkourMode::None);
        assert!(!host.crouched);
    }

    #[test]
    fn crouch_only_from_free_movement() {
        let (mut controller, mut host) = ScriptedHost::grounded().with_controller();
        controller.request_mode(ParkourMode::Slide, &mut host);

        controller.crouch_start(&mut host);
        assert_eq!(controller.mode(), ParkourMode::Slide);
        assert!(!host.crouched);
    }

    #[test]
    fn ends_outside_their_mode_are_no_ops() {
        let (mut controller, mut host) = ScriptedHost::grounded().with_controller();

        controller.sprint_end(&mut host);
        controller.crouch_end(&mut host);

        assert_eq!(controller.mode(), ParkourMode::None);
        assert_eq!(controller.pending_timers(), 0);
        assert!(host.mode_changes.is_empty());
        assert_eq!(host.writes, 0);
    }
}
