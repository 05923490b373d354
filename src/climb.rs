//! Vertical wall-run, ledge grab and mantle.
//!
//! These three modes form one climbing chain with a shared end routine
//! ([`ParkourController::climb_end`]). Each step while climbing, a capsule
//! sweep from above the eyes down to just above the feet looks for a
//! walkable ledge in front of the character, and a short forward sweep at
//! feet height looks for the wall below it. Ledge and wall together catch
//! the ledge; wall alone keeps the character climbing.

use bevy::prelude::*;

use crate::backend::{ParkourCue, ParkourHost};
use crate::collision::ProbeHit;
use crate::controller::ParkourController;
use crate::eligibility::{can_mantle, can_quick_mantle, can_vertical_wall_run};
use crate::gates::Gate;
use crate::geometry::{interp_vec_to, interp_yaw_to, yaw_of, ClimbContact, LedgeSnapshot};
use crate::mode::ParkourMode;
use crate::timers::DeferredAction;

impl ParkourController {
    /// Per-step climbing routine, guarded by the vertical wall-run gate.
    pub(crate) fn vertical_wall_run_update(&mut self, host: &mut impl ParkourHost) {
        let eligible = can_vertical_wall_run(self.mode, self.forward_input(host), host.is_falling());
        if !eligible {
            self.climb_end(host, self.config.climb.end_cooldown);
            return;
        }

        let climb = self.config.climb;
        let (eyes, feet) = self.mantle_probe_points(host);
        let floor = host
            .sweep_capsule(
                eyes,
                feet,
                host.rotation(),
                climb.ledge_sweep_radius,
                climb.ledge_sweep_half_height,
            )
            .blocking_hit();

        if let Some(floor) = floor.filter(|floor| host.is_walkable(floor.normal)) {
            if let Some(wall) = self.forward_tracer(host) {
                self.catch_ledge(host, floor, wall);
                return;
            }
        }

        self.vertical_wall_run_movement(host);
    }

    /// Start and end points of the ledge sweep: above the eyes and just above
    /// the feet, both pushed out in front of the character.
    fn mantle_probe_points(&self, host: &impl ParkourHost) -> (Vec3, Vec3) {
        let climb = &self.config.climb;
        let ahead = host.forward() * climb.forward_reach;

        let eyes = host.eyes_location() + Vec3::Z * climb.eyes_lift + ahead;
        let feet = host.location() - Vec3::Z * (host.capsule_half_height() - climb.mantle_height) + ahead;
        (eyes, feet)
    }

    /// Short forward sweep at feet height for a climbable wall.
    fn forward_tracer(&self, host: &impl ParkourHost) -> Option<ProbeHit> {
        let climb = &self.config.climb;
        let (_, feet) = self.mantle_probe_points(host);
        let end = feet + host.forward() * climb.forward_reach;

        host.sweep_capsule(
            feet,
            end,
            host.rotation(),
            climb.forward_sweep_radius,
            climb.forward_sweep_half_height,
        )
        .blocking_hit()
        .filter(|hit| hit.normal.z >= climb.forward_min_normal_z)
    }

    fn catch_ledge(&mut self, host: &mut impl ParkourHost, floor: ProbeHit, wall: ProbeHit) {
        let climb = self.config.climb;
        let half_height = host.capsule_half_height();

        let location = host.location();
        let close_to_ground = host
            .line_trace(location, location - host.up() * (half_height + climb.ground_clearance))
            .blocking;

        self.gates.close(Gate::VerticalWallRun);
        self.grab_ledge(host);
        self.ledge = Some(LedgeSnapshot {
            floor_position: floor.point,
            climb_wall_position: wall.point,
            climb_wall_normal: wall.normal,
            mantle_position: floor.point + Vec3::Z * half_height,
            trace_distance: floor.distance,
            close_to_ground,
        });

        if can_quick_mantle(self.ledge.as_ref(), climb.mantle_height) {
            self.gates.open(Gate::CheckMantle);
        } else {
            self.correct_ledge_location(host);
            self.timers
                .schedule(climb.mantle_check_delay, DeferredAction::OpenGate(Gate::CheckMantle), false);
        }
    }

    fn grab_ledge(&mut self, host: &mut impl ParkourHost) {
        if self.request_mode(ParkourMode::LedgeGrab, host) {
            host.disable_movement();
            host.stop_immediately();
            host.set_gravity_scale(0.0);
            self.cue(host, ParkourCue::LedgeGrab);
        }
    }

    fn correct_ledge_location(&mut self, host: &mut impl ParkourHost) {
        if self.mode != ParkourMode::LedgeGrab {
            return;
        }
        if let Some(ledge) = self.ledge {
            let target = ledge.hang_target(host.capsule_radius(), host.capsule_half_height());
            self.start_capsule_move(host, target);
        }
    }

    /// Keep climbing while a wall is in front, otherwise drop off.
    fn vertical_wall_run_movement(&mut self, host: &mut impl ParkourHost) {
        let climb = self.config.climb;
        let Some(wall) = self.forward_tracer(host) else {
            self.climb_end(host, climb.end_cooldown);
            return;
        };

        self.climb = Some(ClimbContact {
            normal: wall.normal,
            point: wall.point,
        });
        if self.request_mode(ParkourMode::VerticalWallRun, host) {
            self.correct_climb_location(host);
        }

        let into_wall = -wall.normal * climb.wall_push;
        host.launch(Vec3::new(into_wall.x, into_wall.y, climb.climb_speed), true, true);
    }

    fn correct_climb_location(&mut self, host: &mut impl ParkourHost) {
        if let Some(contact) = self.climb.filter(|_| self.mode == ParkourMode::VerticalWallRun) {
            let target = contact.target(host.capsule_radius(), host.location().z);
            self.start_capsule_move(host, target);
        }
    }

    /// Per-step mantle check, guarded by the check-mantle gate.
    pub(crate) fn mantle_check(&mut self, host: &mut impl ParkourHost) {
        let quick = can_quick_mantle(self.ledge.as_ref(), self.config.climb.mantle_height);
        if can_mantle(self.mode, self.forward_input(host), quick) {
            self.mantle_start(host);
        }
    }

    fn mantle_start(&mut self, host: &mut impl ParkourHost) {
        if !self.request_mode(ParkourMode::Mantle, host) {
            return;
        }

        let cue = if can_quick_mantle(self.ledge.as_ref(), self.config.climb.mantle_height) {
            ParkourCue::QuickMantle
        } else {
            ParkourCue::Mantle
        };
        self.cue(host, cue);
        self.gates.close(Gate::CheckMantle);
        self.gates.open(Gate::Mantle);
    }

    /// Per-step mantle movement, guarded by the mantle gate: turn the view
    /// toward the ledge and pull the capsule onto it.
    pub(crate) fn mantle_movement(&mut self, host: &mut impl ParkourHost) {
        let Some(ledge) = self.ledge else {
            return;
        };
        let climb = self.config.climb;
        let location = host.location();

        let look = (ledge.mantle_position - location).with_z(0.0);
        if look.length_squared() > f32::EPSILON {
            let yaw = interp_yaw_to(host.control_yaw(), yaw_of(look), self.dt, climb.mantle_turn_speed);
            host.set_control_yaw(yaw);
        }

        let speed = if can_quick_mantle(Some(&ledge), climb.mantle_height) {
            climb.quick_mantle_speed
        } else {
            climb.mantle_speed
        };
        let location = interp_vec_to(location, ledge.mantle_position, self.dt, speed);
        host.set_location(location);

        if location.distance(ledge.mantle_position) < climb.mantle_arrival_distance {
            self.climb_end(host, climb.mantle_end_cooldown);
        }
    }

    /// Leave the climbing chain and reopen the vertical wall-run gate after
    /// `reset_delay` seconds. No-op unless climbing.
    ///
    /// Queued abilities are retried shortly after, once the host has had a
    /// chance to land.
    pub fn climb_end(&mut self, host: &mut impl ParkourHost, reset_delay: f32) {
        if !self.mode.is_climbing() {
            return;
        }
        if self.request_mode(ParkourMode::None, host) {
            self.gates.close(Gate::VerticalWallRun);
            self.gates.close(Gate::CheckMantle);
            self.gates.close(Gate::Mantle);

            self.timers
                .schedule(reset_delay, DeferredAction::OpenGate(Gate::VerticalWallRun), false);
            self.timers
                .schedule(self.config.climb.queue_check_delay, DeferredAction::CheckQueues, false);
        }
    }

    /// Jump off the wall or ledge.
    pub(crate) fn ledge_jump(&mut self, host: &mut impl ParkourHost) {
        if !self.mode.is_climbing() {
            return;
        }
        let climb = self.config.climb;
        let normal = self
            .ledge
            .map(|ledge| ledge.climb_wall_normal)
            .or(self.climb.map(|contact| contact.normal))
            .unwrap_or(Vec3::ZERO);

        self.climb_end(host, climb.end_cooldown);
        let launch = Vec3::new(
            normal.x * climb.ledge_jump_force,
            normal.y * climb.ledge_jump_force,
            climb.ledge_jump_height,
        );
        host.launch(launch, false, true);
    }
}
