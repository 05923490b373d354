//! Cached probe geometry, snap targets and interpolation helpers.
//!
//! Snapshots are owned by the controller as `Option`s that are cleared when
//! the mode chain that produced them ends, so stale geometry cannot be read
//! after the mode exits.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use bevy::prelude::*;

use crate::mode::ParkourMode;

/// Wall touched by the current wall-run.
#[derive(Reflect, Debug, Clone, Copy, PartialEq)]
pub struct WallContact {
    pub normal: Vec3,
    pub point: Vec3,
}

impl WallContact {
    /// Capsule position and yaw that put the character flush against the
    /// wall, facing along it in the run direction.
    pub fn target(&self, capsule_radius: f32, mode: ParkourMode) -> (Vec3, f32) {
        let position = self.point + self.normal * capsule_radius;
        let turn = if mode == ParkourMode::LeftWallRun { FRAC_PI_2 } else { -FRAC_PI_2 };
        (position, wrap_angle(yaw_of(self.normal) + turn))
    }
}

/// Wall the character is climbing straight up.
#[derive(Reflect, Debug, Clone, Copy, PartialEq)]
pub struct ClimbContact {
    pub normal: Vec3,
    pub point: Vec3,
}

impl ClimbContact {
    /// Capsule position and yaw that put the character flush against the
    /// wall at `height`, facing into it.
    ///
    /// The contact comes from a probe at feet height, so the capsule keeps
    /// its own height rather than snapping down to the contact.
    pub fn target(&self, capsule_radius: f32, height: f32) -> (Vec3, f32) {
        let position = (self.point + self.normal * capsule_radius).with_z(height);
        (position, facing_into(self.normal))
    }
}

/// Ledge found above a climbing character.
#[derive(Reflect, Debug, Clone, Copy, PartialEq)]
pub struct LedgeSnapshot {
    /// Walkable point on top of the ledge.
    pub floor_position: Vec3,
    /// Point on the wall below the ledge.
    pub climb_wall_position: Vec3,
    /// Normal of the wall below the ledge.
    pub climb_wall_normal: Vec3,
    /// Capsule center once the mantle completes.
    pub mantle_position: Vec3,
    /// Distance the ledge sweep travelled before hitting the floor.
    pub trace_distance: f32,
    /// Whether solid ground is just below the character's feet.
    pub close_to_ground: bool,
}

impl LedgeSnapshot {
    /// Capsule position and yaw for hanging off the ledge: against the wall,
    /// with the capsule top level with the ledge floor.
    pub fn hang_target(&self, capsule_radius: f32, capsule_half_height: f32) -> (Vec3, f32) {
        let against_wall = self.climb_wall_position + self.climb_wall_normal * capsule_radius;
        let position = against_wall.with_z(self.floor_position.z - capsule_half_height);
        (position, facing_into(self.climb_wall_normal))
    }
}

/// Linear capsule move toward a target position and yaw over a fixed
/// duration.
#[derive(Reflect, Debug, Clone, Copy, PartialEq)]
pub struct CapsuleMove {
    from_position: Vec3,
    from_yaw: f32,
    to_position: Vec3,
    to_yaw: f32,
    duration: f32,
    elapsed: f32,
}

impl CapsuleMove {
    pub fn new(from_position: Vec3, from_yaw: f32, to_position: Vec3, to_yaw: f32, duration: f32) -> Self {
        Self {
            from_position,
            from_yaw,
            to_position,
            to_yaw,
            duration: duration.max(0.0),
            elapsed: 0.0,
        }
    }

    /// Advance by `dt` and return the pose to apply.
    pub fn advance(&mut self, dt: f32) -> (Vec3, f32) {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        let alpha = if self.duration > 0.0 {
            self.elapsed / self.duration
        } else {
            1.0
        };

        let position = self.from_position.lerp(self.to_position, alpha);
        let yaw = wrap_angle(self.from_yaw + wrap_angle(self.to_yaw - self.from_yaw) * alpha);
        (position, yaw)
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    pub fn target(&self) -> (Vec3, f32) {
        (self.to_position, self.to_yaw)
    }
}

/// Yaw (radians about +Z) of a direction's horizontal projection.
#[inline]
pub fn yaw_of(direction: Vec3) -> f32 {
    direction.y.atan2(direction.x)
}

/// Yaw that faces against a surface normal.
#[inline]
pub fn facing_into(normal: Vec3) -> f32 {
    wrap_angle(yaw_of(normal) - PI)
}

/// Wrap an angle into `(-PI, PI]`.
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Frame-rate aware approach toward `target`: covers `dt * speed` of the
/// remaining distance per call, clamped to the full distance.
pub fn interp_to(current: f32, target: f32, dt: f32, speed: f32) -> f32 {
    if speed <= 0.0 {
        return target;
    }
    current + (target - current) * (dt * speed).clamp(0.0, 1.0)
}

/// [`interp_to`] for vectors.
pub fn interp_vec_to(current: Vec3, target: Vec3, dt: f32, speed: f32) -> Vec3 {
    if speed <= 0.0 {
        return target;
    }
    current + (target - current) * (dt * speed).clamp(0.0, 1.0)
}

/// [`interp_to`] for angles, taking the short way round.
pub fn interp_yaw_to(current: f32, target: f32, dt: f32, speed: f32) -> f32 {
    if speed <= 0.0 {
        return wrap_angle(target);
    }
    let delta = wrap_angle(target - current);
    wrap_angle(current + delta * (dt * speed).clamp(0.0, 1.0))
}
