//! Camera roll while wall-running and sliding.

use crate::backend::ParkourHost;
use crate::controller::ParkourController;
use crate::geometry::interp_to;
use crate::mode::ParkourMode;

/// Roll (degrees) the camera leans toward in `mode`.
///
/// Leans into the wall on a wall-run and back on a slide.
pub fn target_roll(mode: ParkourMode, tilt: f32) -> f32 {
    match mode {
        ParkourMode::LeftWallRun => tilt,
        ParkourMode::RightWallRun | ParkourMode::Slide => -tilt,
        _ => 0.0,
    }
}

impl ParkourController {
    pub(crate) fn camera_tick(&mut self, host: &mut impl ParkourHost) {
        let target = target_roll(self.mode, self.config.camera_tilt);
        self.camera_roll = interp_to(self.camera_roll, target, self.dt, self.config.camera_tilt_speed);
        host.on_camera_roll(self.camera_roll);
    }
}

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use super::*;
    use crate::test_support::{ScriptedHost, TestPlane, DT};

    #[test]
    fn roll_targets() {
        assert_eq!(target_roll(ParkourMode::LeftWallRun, 15.0), 15.0);
        assert_eq!(target_roll(ParkourMode::RightWallRun, 15.0), -15.0);
        assert_eq!(target_roll(ParkourMode::Slide, 15.0), -15.0);
        for mode in [
            ParkourMode::None,
            ParkourMode::Sprint,
            ParkourMode::Crouch,
            ParkourMode::VerticalWallRun,
            ParkourMode::LedgeGrab,
            ParkourMode::Mantle,
        ] {
            assert_eq!(target_roll(mode, 15.0), 0.0, "{mode:?}");
        }
    }

    #[test]
    fn camera_leans_into_right_wall_and_recovers() {
        let (mut controller, mut host) = ScriptedHost::airborne()
            .with_forward_input()
            .with_plane(TestPlane::new(Vec3::new(0.0, -50.0, 0.0), Vec3::Y))
            .with_controller();

        for _ in 0..60 {
            controller.update(&mut host, DT);
        }
        assert_eq!(controller.mode(), ParkourMode::RightWallRun);
        assert!((controller.camera_roll() + 15.0).abs() < 0.1, "{}", controller.camera_roll());
        assert_eq!(host.camera_roll, controller.camera_roll());

        controller.wall_run_end(&mut host, 10.0);
        for _ in 0..60 {
            controller.update(&mut host, DT);
        }
        assert!(controller.camera_roll().abs() < 0.1, "{}", controller.camera_roll());
    }

    #[test]
    fn roll_stays_level_at_rest() {
        let (mut controller, mut host) = ScriptedHost::grounded().with_controller();
        controller.update(&mut host, DT);
        assert_eq!(controller.camera_roll(), 0.0);
        assert_eq!(host.camera_roll, 0.0);
    }
}
