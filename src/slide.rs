//! Sliding.
//!
//! A slide starts from a sprint (or a queued sprint) on the ground. It drops
//! friction, locks movement to the plane of the current velocity and kicks
//! the character along the slope, then ends once the character has slowed
//! to a crawl.

use bevy::prelude::*;

use crate::backend::ParkourHost;
use crate::controller::ParkourController;
use crate::gates::Gate;
use crate::mode::ParkourMode;

impl ParkourController {
    /// Start sliding if eligible and on the ground.
    pub(crate) fn slide_start(&mut self, host: &mut impl ParkourHost) {
        if !self.can_slide(host) || !host.is_walking() || !self.gates.is_open(Gate::Slide) {
            return;
        }
        let slide = self.config.slide;

        self.sprint_end(host);
        self.request_mode(ParkourMode::Slide, host);

        host.crouch();
        host.set_ground_friction(0.0);
        host.set_braking_deceleration(slide.braking_deceleration);
        host.set_max_crouch_speed(0.0);

        let heading = host.velocity().normalize_or_zero();
        host.set_plane_constraint(Vec3::Z.cross(heading), true);

        let direction = self.slide_vector(host);
        if direction.z <= slide.max_uphill_z {
            host.add_impulse(direction * slide.impulse);
        }

        self.gates.open(Gate::Slide);
        self.queues.clear();
    }

    /// Slide direction from the ground normal under the character. Points
    /// down the slope on inclines and straight ahead on flat ground.
    fn slide_vector(&self, host: &impl ParkourHost) -> Vec3 {
        let location = host.location();
        let end = location - host.up() * self.config.slide.ground_probe_length;
        let ground_normal = host
            .line_trace(location, end)
            .blocking_hit()
            .map_or(Vec3::ZERO, |hit| hit.normal);

        ground_normal.cross(host.right())
    }

    /// Per-step slide routine, guarded by the slide gate.
    pub(crate) fn slide_update(&mut self, host: &mut impl ParkourHost) {
        if self.mode == ParkourMode::Slide && host.velocity().length() <= self.config.slide.min_speed {
            self.slide_end(host, false);
        }
    }

    /// End the slide into a crouch or back to standing. No-op unless sliding.
    pub fn slide_end(&mut self, host: &mut impl ParkourHost, to_crouch: bool) {
        if self.mode != ParkourMode::Slide {
            return;
        }
        let next = if to_crouch { ParkourMode::Crouch } else { ParkourMode::None };
        if self.request_mode(next, host) {
            self.gates.open(Gate::Slide);
            if !to_crouch {
                host.uncrouch();
            }
        }
    }

    pub(crate) fn slide_jump(&mut self, host: &mut impl ParkourHost) {
        if self.mode == ParkourMode::Slide {
            self.slide_end(host, false);
        }
    }
}
