//! Probe result structures.
//!
//! These structures hold the results of physics queries (line traces and
//! capsule sweeps) used by the parkour abilities to find walls and ledges.

use bevy::prelude::*;

/// Information about a line trace or shape sweep.
///
/// A probe that hits nothing returns [`ProbeHit::miss`], which is
/// non-blocking with zeroed geometry. Callers must check [`ProbeHit::blocking`]
/// before reading the geometry.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProbeHit {
    /// Whether the probe was stopped by blocking geometry.
    pub blocking: bool,
    /// Normal of the surface at the hit point.
    pub normal: Vec3,
    /// World position of the impact point.
    pub point: Vec3,
    /// Distance travelled from the probe start to the hit.
    pub distance: f32,
}

impl ProbeHit {
    /// Create a probe result that hit nothing.
    pub fn miss() -> Self {
        Self::default()
    }

    /// Create a blocking hit.
    pub fn hit(normal: Vec3, point: Vec3, distance: f32) -> Self {
        Self {
            blocking: true,
            normal,
            point,
            distance,
        }
    }

    /// The hit, if it was blocking.
    pub fn blocking_hit(self) -> Option<Self> {
        self.blocking.then_some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_miss() {
        let probe = ProbeHit::miss();
        assert!(!probe.blocking);
        assert_eq!(probe.distance, 0.0);
        assert!(probe.blocking_hit().is_none());
    }

    #[test]
    fn probe_hit() {
        let probe = ProbeHit::hit(Vec3::X, Vec3::new(10.0, 0.0, 5.0), 12.5);

        assert!(probe.blocking);
        assert_eq!(probe.normal, Vec3::X);
        assert_eq!(probe.point, Vec3::new(10.0, 0.0, 5.0));
        assert_eq!(probe.blocking_hit().map(|h| h.distance), Some(12.5));
    }
}
