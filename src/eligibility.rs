//! Transition predicates.
//!
//! Pure functions of the current mode, movement state and cached geometry.
//! A false result is never an error: the caller simply does not transition.

use bevy::prelude::*;

use crate::geometry::LedgeSnapshot;
use crate::mode::ParkourMode;

/// How much of the player's input points along the character's forward
/// direction.
#[inline]
pub fn forward_input(forward: Vec3, last_input: Vec3) -> f32 {
    forward.dot(last_input)
}

/// Free or already wall-running, and pushing forward.
pub fn can_wall_run(mode: ParkourMode, forward_input: f32) -> bool {
    (mode == ParkourMode::None || mode.is_wall_running()) && forward_input > 0.0
}

/// Pushing forward while airborne, from free movement, a vertical climb or a
/// side wall-run.
pub fn can_vertical_wall_run(mode: ParkourMode, forward_input: f32, falling: bool) -> bool {
    let viable = matches!(mode, ParkourMode::None | ParkourMode::VerticalWallRun) || mode.is_wall_running();
    forward_input > 0.0 && falling && viable
}

/// Pushing forward while sprinting or with a sprint queued.
pub fn can_slide(mode: ParkourMode, forward_input: f32, sprint_queued: bool) -> bool {
    forward_input > 0.0 && (mode == ParkourMode::Sprint || sprint_queued)
}

/// Walking with no ability active.
pub fn can_sprint(mode: ParkourMode, walking: bool) -> bool {
    walking && mode == ParkourMode::None
}

/// A ledge is far enough below the eyes, or the ground close enough below
/// the feet, to skip the grab and pull up straight away.
pub fn can_quick_mantle(ledge: Option<&LedgeSnapshot>, mantle_height: f32) -> bool {
    ledge.is_some_and(|ledge| ledge.trace_distance > mantle_height || ledge.close_to_ground)
}

/// Pushing forward while hanging, or in a position to quick mantle.
pub fn can_mantle(mode: ParkourMode, forward_input: f32, quick_mantle: bool) -> bool {
    forward_input > 0.0 && (mode == ParkourMode::LedgeGrab || quick_mantle)
}

/// Steep enough to run on: neither floor nor ceiling.
///
/// The bounds are exclusive, so a normal with `|z| == max_z` is rejected.
#[inline]
pub fn wall_normal_in_range(normal: Vec3, max_z: f32) -> bool {
    -max_z < normal.z && normal.z < max_z
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledge(trace_distance: f32, close_to_ground: bool) -> LedgeSnapshot {
        LedgeSnapshot {
            floor_position: Vec3::ZERO,
            climb_wall_position: Vec3::ZERO,
            climb_wall_normal: Vec3::X,
            mantle_position: Vec3::ZERO,
            trace_distance,
            close_to_ground,
        }
    }

    #[test]
    fn forward_input_is_projection() {
        assert_eq!(forward_input(Vec3::X, Vec3::new(1.0, 0.5, 0.0)), 1.0);
        assert_eq!(forward_input(Vec3::X, Vec3::NEG_X), -1.0);
        assert_eq!(forward_input(Vec3::X, Vec3::Y), 0.0);
    }

    #[test]
    fn wall_run_needs_forward_input() {
        assert!(can_wall_run(ParkourMode::None, 1.0));
        assert!(can_wall_run(ParkourMode::LeftWallRun, 0.1));
        assert!(can_wall_run(ParkourMode::RightWallRun, 0.1));
        assert!(!can_wall_run(ParkourMode::None, 0.0));
        assert!(!can_wall_run(ParkourMode::Sprint, 1.0));
        assert!(!can_wall_run(ParkourMode::VerticalWallRun, 1.0));
    }

    #[test]
    fn vertical_wall_run_needs_air() {
        assert!(can_vertical_wall_run(ParkourMode::None, 1.0, true));
        assert!(can_vertical_wall_run(ParkourMode::VerticalWallRun, 1.0, true));
        assert!(can_vertical_wall_run(ParkourMode::LeftWallRun, 1.0, true));
        assert!(!can_vertical_wall_run(ParkourMode::None, 1.0, false));
        assert!(!can_vertical_wall_run(ParkourMode::None, -1.0, true));
        assert!(!can_vertical_wall_run(ParkourMode::LedgeGrab, 1.0, true));
        assert!(!can_vertical_wall_run(ParkourMode::Slide, 1.0, true));
    }

    #[test]
    fn slide_needs_sprint_or_queue() {
        assert!(can_slide(ParkourMode::Sprint, 1.0, false));
        assert!(can_slide(ParkourMode::None, 1.0, true));
        assert!(!can_slide(ParkourMode::None, 1.0, false));
        assert!(!can_slide(ParkourMode::Sprint, 0.0, true));
    }

    #[test]
    fn sprint_needs_ground_and_free_mode() {
        assert!(can_sprint(ParkourMode::None, true));
        assert!(!can_sprint(ParkourMode::None, false));
        assert!(!can_sprint(ParkourMode::Crouch, true));
    }

    #[test]
    fn quick_mantle_conditions() {
        assert!(!can_quick_mantle(None, 44.0));
        assert!(can_quick_mantle(Some(&ledge(50.0, false)), 44.0));
        assert!(can_quick_mantle(Some(&ledge(10.0, true)), 44.0));
        assert!(!can_quick_mantle(Some(&ledge(44.0, false)), 44.0));
    }

    #[test]
    fn mantle_from_grab_or_quick() {
        assert!(can_mantle(ParkourMode::LedgeGrab, 1.0, false));
        assert!(can_mantle(ParkourMode::VerticalWallRun, 1.0, true));
        assert!(!can_mantle(ParkourMode::VerticalWallRun, 1.0, false));
        assert!(!can_mantle(ParkourMode::LedgeGrab, 0.0, true));
    }

    #[test]
    fn wall_normal_boundaries_are_strict() {
        let normal = |z: f32| Vec3::new(1.0, 0.0, z);
        assert!(wall_normal_in_range(normal(0.0), 0.52));
        assert!(wall_normal_in_range(normal(0.51), 0.52));
        assert!(wall_normal_in_range(normal(-0.51), 0.52));
        assert!(!wall_normal_in_range(normal(0.52), 0.52));
        assert!(!wall_normal_in_range(normal(-0.52), 0.52));
        assert!(!wall_normal_in_range(Vec3::Z, 0.52));
    }
}
