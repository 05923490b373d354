//! Controller configuration.
//!
//! All tunables live in [`ParkourConfig`], grouped by ability. Every field has
//! a default, so RON files only need to list what they change:
//!
//! ```ron
//! (
//!     wall_run: (speed: 900.0),
//!     sprint: (always_sprint: true),
//! )
//! ```

use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Wall-run tunables.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallRunConfig {
    /// Speed along the wall.
    pub speed: f32,
    /// Speed along the wall when a sprint is queued.
    pub sprint_speed: f32,
    /// Gravity scale the wall-run eases toward.
    pub target_gravity: f32,
    /// Interpolation speed toward `target_gravity`.
    pub gravity_interp_speed: f32,
    /// Sideways reach of the wall probes.
    pub probe_reach: f32,
    /// How far behind the character the wall probes end.
    pub probe_back_offset: f32,
    /// Walls are accepted when `|normal.z|` is strictly below this.
    pub max_normal_z: f32,
    /// Horizontal push of a wall jump, scaled by the wall normal.
    pub jump_scale: f32,
    /// Vertical velocity of a wall jump.
    pub jump_force: f32,
    /// Delay before wall-run gravity is re-evaluated after entering a wall.
    pub gravity_enable_delay: f32,
    /// Cooldown after running out of wall.
    pub out_of_wall_cooldown: f32,
    /// Cooldown after the player stops pushing forward.
    pub disengage_cooldown: f32,
    /// Cooldown after a wall jump.
    pub jump_cooldown: f32,
}

impl Default for WallRunConfig {
    fn default() -> Self {
        Self {
            speed: 850.0,
            sprint_speed: 1100.0,
            target_gravity: 0.2,
            gravity_interp_speed: 20.0,
            probe_reach: 75.0,
            probe_back_offset: 35.0,
            max_normal_z: 0.52,
            jump_scale: 600.0,
            jump_force: 600.0,
            gravity_enable_delay: 1.0,
            out_of_wall_cooldown: 0.5,
            disengage_cooldown: 1.0,
            jump_cooldown: 0.35,
        }
    }
}

/// Vertical wall-run, ledge grab and mantle tunables.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClimbConfig {
    /// Upward speed while climbing a wall.
    pub climb_speed: f32,
    /// Velocity pressing the character into the wall while climbing.
    pub wall_push: f32,
    /// Height above the feet where the ledge sweep ends. Ledges found
    /// further than this from the sweep start allow a quick mantle.
    pub mantle_height: f32,
    /// Lift of the ledge sweep start above the eyes.
    pub eyes_lift: f32,
    /// How far in front of the character the ledge and wall probes run.
    pub forward_reach: f32,
    /// Radius of the ledge sweep capsule.
    pub ledge_sweep_radius: f32,
    /// Half height of the ledge sweep capsule.
    pub ledge_sweep_half_height: f32,
    /// Radius of the forward wall sweep capsule.
    pub forward_sweep_radius: f32,
    /// Half height of the forward wall sweep capsule.
    pub forward_sweep_half_height: f32,
    /// Forward wall hits need `normal.z` at least this.
    pub forward_min_normal_z: f32,
    /// Clearance below the capsule used to decide "close to ground".
    pub ground_clearance: f32,
    /// Mantle interpolation speed.
    pub mantle_speed: f32,
    /// Quick mantle interpolation speed.
    pub quick_mantle_speed: f32,
    /// Camera turn speed toward the mantle target.
    pub mantle_turn_speed: f32,
    /// Mantle completes within this distance of the target.
    pub mantle_arrival_distance: f32,
    /// Horizontal push of a ledge jump, scaled by the wall normal.
    pub ledge_jump_force: f32,
    /// Vertical velocity of a ledge jump.
    pub ledge_jump_height: f32,
    /// Grace period before a hanging character may mantle.
    pub mantle_check_delay: f32,
    /// Delay before queued abilities are retried after the chain ends.
    pub queue_check_delay: f32,
    /// Cooldown after losing the wall or jumping off.
    pub end_cooldown: f32,
    /// Cooldown after finishing a mantle.
    pub mantle_end_cooldown: f32,
}

impl Default for ClimbConfig {
    fn default() -> Self {
        Self {
            climb_speed: 300.0,
            wall_push: 600.0,
            mantle_height: 44.0,
            eyes_lift: 50.0,
            forward_reach: 50.0,
            ledge_sweep_radius: 20.0,
            ledge_sweep_half_height: 10.0,
            forward_sweep_radius: 10.0,
            forward_sweep_half_height: 5.0,
            forward_min_normal_z: -0.1,
            ground_clearance: 40.0,
            mantle_speed: 10.0,
            quick_mantle_speed: 20.0,
            mantle_turn_speed: 7.0,
            mantle_arrival_distance: 8.0,
            ledge_jump_force: 300.0,
            ledge_jump_height: 400.0,
            mantle_check_delay: 0.25,
            queue_check_delay: 0.02,
            end_cooldown: 0.35,
            mantle_end_cooldown: 0.5,
        }
    }
}

/// Slide tunables.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlideConfig {
    /// Velocity change applied along the slide direction on start.
    pub impulse: f32,
    /// Braking deceleration while sliding.
    pub braking_deceleration: f32,
    /// Slide ends at or below this speed.
    pub min_speed: f32,
    /// The start impulse is skipped when the slide direction points up more
    /// than this.
    pub max_uphill_z: f32,
    /// Length of the ground probe used for the slide direction.
    pub ground_probe_length: f32,
}

impl Default for SlideConfig {
    fn default() -> Self {
        Self {
            impulse: 600.0,
            braking_deceleration: 1000.0,
            min_speed: 35.0,
            max_uphill_z: 0.02,
            ground_probe_length: 200.0,
        }
    }
}

/// Sprint tunables.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SprintConfig {
    /// Max walk speed while sprinting.
    pub speed: f32,
    /// Debounce before sprint may start again after it ends.
    pub reopen_delay: f32,
    /// Start sprinting automatically whenever the character walks forward.
    pub always_sprint: bool,
}

impl Default for SprintConfig {
    fn default() -> Self {
        Self {
            speed: 1000.0,
            reopen_delay: 0.1,
            always_sprint: false,
        }
    }
}

/// Configuration parameters for the parkour controller.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParkourConfig {
    pub wall_run: WallRunConfig,
    pub climb: ClimbConfig,
    pub slide: SlideConfig,
    pub sprint: SprintConfig,

    /// Duration of the capsule snap onto walls and ledges.
    pub correction_duration: f32,
    /// Cooldown when crouch/slide input cancels a wall-run or climb.
    pub cancel_cooldown: f32,

    /// Whether cues are emitted.
    pub camera_shake: bool,
    /// Camera roll (degrees) while wall-running or sliding.
    pub camera_tilt: f32,
    /// Interpolation speed of the camera roll.
    pub camera_tilt_speed: f32,
}

impl Default for ParkourConfig {
    fn default() -> Self {
        Self {
            wall_run: WallRunConfig::default(),
            climb: ClimbConfig::default(),
            slide: SlideConfig::default(),
            sprint: SprintConfig::default(),
            correction_duration: 0.1,
            cancel_cooldown: 0.5,
            camera_shake: true,
            camera_tilt: 15.0,
            camera_tilt_speed: 10.0,
        }
    }
}

impl ParkourConfig {
    /// Create a config tuned for a player-controlled character.
    pub fn player() -> Self {
        Self::default()
    }

    /// Create a faster, more forgiving config.
    pub fn arcade() -> Self {
        Self {
            wall_run: WallRunConfig {
                speed: 1000.0,
                sprint_speed: 1300.0,
                target_gravity: 0.1,
                ..default()
            },
            climb: ClimbConfig {
                climb_speed: 400.0,
                quick_mantle_speed: 25.0,
                ..default()
            },
            sprint: SprintConfig {
                speed: 1200.0,
                always_sprint: true,
                ..default()
            },
            ..default()
        }
    }

    /// Parse a config from RON and validate it.
    pub fn from_ron_str(source: &str) -> ConfigResult<Self> {
        let config: Self = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a RON file and validate it.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let source = std::fs::read_to_string(path.as_ref())?;
        Self::from_ron_str(&source).inspect_err(|e| {
            warn!("rejected parkour config {}: {e}", path.as_ref().display());
        })
    }

    /// Check every numeric tunable is finite and non-negative.
    ///
    /// `forward_min_normal_z` is a normal component and may be negative; it
    /// only has to be finite.
    pub fn validate(&self) -> ConfigResult<()> {
        let w = &self.wall_run;
        let c = &self.climb;
        let s = &self.slide;
        let non_negative = [
            ("wall_run.speed", w.speed),
            ("wall_run.sprint_speed", w.sprint_speed),
            ("wall_run.target_gravity", w.target_gravity),
            ("wall_run.gravity_interp_speed", w.gravity_interp_speed),
            ("wall_run.probe_reach", w.probe_reach),
            ("wall_run.probe_back_offset", w.probe_back_offset),
            ("wall_run.max_normal_z", w.max_normal_z),
            ("wall_run.jump_scale", w.jump_scale),
            ("wall_run.jump_force", w.jump_force),
            ("wall_run.gravity_enable_delay", w.gravity_enable_delay),
            ("wall_run.out_of_wall_cooldown", w.out_of_wall_cooldown),
            ("wall_run.disengage_cooldown", w.disengage_cooldown),
            ("wall_run.jump_cooldown", w.jump_cooldown),
            ("climb.climb_speed", c.climb_speed),
            ("climb.wall_push", c.wall_push),
            ("climb.mantle_height", c.mantle_height),
            ("climb.eyes_lift", c.eyes_lift),
            ("climb.forward_reach", c.forward_reach),
            ("climb.ledge_sweep_radius", c.ledge_sweep_radius),
            ("climb.ledge_sweep_half_height", c.ledge_sweep_half_height),
            ("climb.forward_sweep_radius", c.forward_sweep_radius),
            ("climb.forward_sweep_half_height", c.forward_sweep_half_height),
            ("climb.ground_clearance", c.ground_clearance),
            ("climb.mantle_speed", c.mantle_speed),
            ("climb.quick_mantle_speed", c.quick_mantle_speed),
            ("climb.mantle_turn_speed", c.mantle_turn_speed),
            ("climb.mantle_arrival_distance", c.mantle_arrival_distance),
            ("climb.ledge_jump_force", c.ledge_jump_force),
            ("climb.ledge_jump_height", c.ledge_jump_height),
            ("climb.mantle_check_delay", c.mantle_check_delay),
            ("climb.queue_check_delay", c.queue_check_delay),
            ("climb.end_cooldown", c.end_cooldown),
            ("climb.mantle_end_cooldown", c.mantle_end_cooldown),
            ("slide.impulse", s.impulse),
            ("slide.braking_deceleration", s.braking_deceleration),
            ("slide.min_speed", s.min_speed),
            ("slide.ground_probe_length", s.ground_probe_length),
            ("sprint.speed", self.sprint.speed),
            ("sprint.reopen_delay", self.sprint.reopen_delay),
            ("correction_duration", self.correction_duration),
            ("cancel_cooldown", self.cancel_cooldown),
            ("camera_tilt_speed", self.camera_tilt_speed),
        ];

        if let Some((field, value)) = non_negative
            .into_iter()
            .find(|(_, value)| !value.is_finite() || *value < 0.0)
        {
            return Err(ConfigError::Invalid { field, value });
        }

        let finite = [
            ("climb.forward_min_normal_z", c.forward_min_normal_z),
            ("slide.max_uphill_z", s.max_uphill_z),
            ("camera_tilt", self.camera_tilt),
        ];
        if let Some((field, value)) = finite.into_iter().find(|(_, value)| !value.is_finite()) {
            return Err(ConfigError::Invalid { field, value });
        }

        Ok(())
    }

    /// Builder: set wall-run speeds.
    pub fn with_wall_run_speed(mut self, speed: f32, sprint_speed: f32) -> Self {
        self.wall_run.speed = speed;
        self.wall_run.sprint_speed = sprint_speed;
        self
    }

    /// Builder: set the gravity scale wall-runs ease toward.
    pub fn with_wall_run_gravity(mut self, target_gravity: f32) -> Self {
        self.wall_run.target_gravity = target_gravity;
        self
    }

    /// Builder: set the mantle height.
    pub fn with_mantle_height(mut self, height: f32) -> Self {
        self.climb.mantle_height = height;
        self
    }

    /// Builder: set the sprint speed.
    pub fn with_sprint_speed(mut self, speed: f32) -> Self {
        self.sprint.speed = speed;
        self
    }

    /// Builder: enable or disable automatic sprinting.
    pub fn with_always_sprint(mut self, enabled: bool) -> Self {
        self.sprint.always_sprint = enabled;
        self
    }

    /// Builder: set the slide start impulse.
    pub fn with_slide_impulse(mut self, impulse: f32) -> Self {
        self.slide.impulse = impulse;
        self
    }

    /// Builder: enable or disable cues.
    pub fn with_camera_shake(mut self, enabled: bool) -> Self {
        self.camera_shake = enabled;
        self
    }
}

/// Locomotion parameters captured when the controller is initialised and
/// restored whenever the character returns to free movement.
#[derive(Reflect, Debug, Clone, Copy, PartialEq)]
pub struct LocomotionBaseline {
    pub gravity_scale: f32,
    pub ground_friction: f32,
    pub braking_deceleration: f32,
    pub max_walk_speed: f32,
    pub max_crouch_speed: f32,
    pub use_controller_yaw: bool,
}
