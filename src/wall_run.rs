//! Side wall-running.
//!
//! While airborne and pushing forward, the character probes for a wall to
//! its right, then to its left. A steep enough wall pushes the character
//! along it and enters the matching wall-run mode. Running out of wall, or
//! letting go of forward, ends the run with a cooldown on the wall-run gate.

use bevy::prelude::*;

use crate::backend::ParkourHost;
use crate::controller::ParkourController;
use crate::eligibility::{can_wall_run, wall_normal_in_range};
use crate::gates::{Gate, Queue};
use crate::geometry::{interp_to, WallContact};
use crate::mode::ParkourMode;
use crate::timers::DeferredAction;

impl ParkourController {
    /// Per-step wall-run routine, guarded by the wall-run gate.
    pub(crate) fn wall_run_update(&mut self, host: &mut impl ParkourHost) {
        let wall_run = self.config.wall_run;

        if !can_wall_run(self.mode, self.forward_input(host)) {
            self.wall_run_end(host, wall_run.disengage_cooldown);
            return;
        }

        if self.try_wall(host, ParkourMode::RightWallRun) {
            self.hold_wall_run(host, ParkourMode::RightWallRun);
        } else if self.mode == ParkourMode::RightWallRun {
            self.wall_run_end(host, wall_run.out_of_wall_cooldown);
        } else if self.try_wall(host, ParkourMode::LeftWallRun) {
            self.hold_wall_run(host, ParkourMode::LeftWallRun);
        } else {
            self.wall_run_end(host, wall_run.out_of_wall_cooldown);
        }
    }

    /// Probe for a wall on `side` and, if one is accepted, record it and push
    /// the character along it.
    fn try_wall(&mut self, host: &mut impl ParkourHost, side: ParkourMode) -> bool {
        let Some(direction) = side.wall_run_direction() else {
            return false;
        };
        let wall_run = self.config.wall_run;

        // Right-side probes reach along +right, left-side ones along -right.
        let reach = if side == ParkourMode::RightWallRun {
            wall_run.probe_reach
        } else {
            -wall_run.probe_reach
        };
        let start = host.location();
        let end = start + host.right() * reach - host.forward() * wall_run.probe_back_offset;

        let Some(hit) = host.line_trace(start, end).blocking_hit() else {
            return false;
        };
        if !wall_normal_in_range(hit.normal, wall_run.max_normal_z) || !host.is_falling() {
            return false;
        }

        self.wall = Some(WallContact {
            normal: hit.normal,
            point: hit.point,
        });

        let speed = if self.queues.is_queued(Queue::Sprint) {
            wall_run.sprint_speed
        } else {
            wall_run.speed
        };
        let along_wall = Vec3::Z.cross(hit.normal) * direction * speed;
        let z_override = !self.mode.is_wall_running() || !self.wall_run_gravity_on;
        host.launch(along_wall, true, z_override);
        true
    }

    fn hold_wall_run(&mut self, host: &mut impl ParkourHost, side: ParkourMode) {
        if self.request_mode(side, host) {
            self.timers
                .schedule(self.config.wall_run.gravity_enable_delay, DeferredAction::EnableWallRunGravity, false);
            self.correct_wall_run_location(host);
        }
        self.interpolate_wall_run_gravity(host);
    }

    fn correct_wall_run_location(&mut self, host: &mut impl ParkourHost) {
        if let Some(wall) = self.wall.filter(|_| self.mode.is_wall_running()) {
            let target = wall.target(host.capsule_radius(), self.mode);
            self.start_capsule_move(host, target);
        }
    }

    fn interpolate_wall_run_gravity(&self, host: &mut impl ParkourHost) {
        let wall_run = &self.config.wall_run;
        let gravity = interp_to(
            host.gravity_scale(),
            wall_run.target_gravity,
            self.dt,
            wall_run.gravity_interp_speed,
        );
        host.set_gravity_scale(gravity);
    }

    /// End the wall-run and reopen the wall-run gate after `reset_delay`
    /// seconds. No-op unless wall-running.
    ///
    /// Wall-run gravity is switched off immediately and re-evaluated on the
    /// next step.
    pub fn wall_run_end(&mut self, host: &mut impl ParkourHost, reset_delay: f32) {
        if !self.mode.is_wall_running() {
            return;
        }
        if self.request_mode(ParkourMode::None, host) {
            self.gates.close(Gate::WallRun);
            self.timers
                .schedule(reset_delay, DeferredAction::OpenGate(Gate::WallRun), false);

            self.wall_run_gravity_on = false;
            self.timers
                .schedule(0.0, DeferredAction::EnableWallRunGravity, false);
        }
    }

    /// Jump off the wall: away from it horizontally, with a fixed upward
    /// velocity.
    pub(crate) fn wall_jump(&mut self, host: &mut impl ParkourHost) {
        let Some(wall) = self.wall.filter(|_| self.mode.is_wall_running()) else {
            return;
        };
        let wall_run = self.config.wall_run;

        self.wall_run_end(host, wall_run.jump_cooldown);
        let launch = Vec3::new(
            wall.normal.x * wall_run.jump_scale,
            wall.normal.y * wall_run.jump_scale,
            wall_run.jump_force,
        );
        host.launch(launch, false, true);
    }
}
