//! Input intent component.
//!
//! The game writes player (or AI) input into [`ParkourIntent`] every frame.
//! Button state is edge-detected into buffered [`ParkourInput`] presses that
//! the controller consumes on its next fixed step.

use bevy::prelude::*;

/// A discrete parkour input.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParkourInput {
    Jump,
    Sprint,
    /// Crouch toggle, or slide when eligible.
    CrouchOrSlide,
}

/// Movement input for a parkour character.
///
/// # Example
///
/// ```rust
/// use bevy::prelude::*;
/// use msg_parkour_controller::prelude::*;
///
/// let mut intent = ParkourIntent::new();
/// intent.set_move_input(Vec3::X);
///
/// // Held buttons only register once.
/// intent.set_jump_pressed(true);
/// intent.set_jump_pressed(true);
/// assert_eq!(intent.take_inputs(), vec![ParkourInput::Jump]);
///
/// intent.set_jump_pressed(false);
/// intent.set_jump_pressed(true);
/// assert_eq!(intent.take_inputs(), vec![ParkourInput::Jump]);
/// ```
#[derive(Component, Reflect, Debug, Clone, Default)]
#[reflect(Component)]
pub struct ParkourIntent {
    /// Desired movement direction in world space. Only its projection onto
    /// the character's forward axis matters to the controller.
    pub move_input: Vec3,

    /// Presses waiting for the next fixed step, oldest first.
    pending: Vec<ParkourInput>,

    jump_held: bool,
    sprint_held: bool,
    crouch_held: bool,
}

impl ParkourIntent {
    /// Create an intent with no input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the movement direction.
    pub fn set_move_input(&mut self, direction: Vec3) {
        self.move_input = if direction.is_finite() { direction } else { Vec3::ZERO };
    }

    /// Clear the movement direction.
    pub fn clear_move_input(&mut self) {
        self.move_input = Vec3::ZERO;
    }

    /// Whether there is any movement input.
    pub fn is_moving(&self) -> bool {
        self.move_input.length_squared() > 1e-6
    }

    /// Report the jump button state. A press is buffered on the rising edge.
    pub fn set_jump_pressed(&mut self, pressed: bool) {
        if pressed && !self.jump_held {
            self.press(ParkourInput::Jump);
        }
        self.jump_held = pressed;
    }

    /// Report the sprint button state. A press is buffered on the rising edge.
    pub fn set_sprint_pressed(&mut self, pressed: bool) {
        if pressed && !self.sprint_held {
            self.press(ParkourInput::Sprint);
        }
        self.sprint_held = pressed;
    }

    /// Report the crouch/slide button state. A press is buffered on the
    /// rising edge.
    pub fn set_crouch_pressed(&mut self, pressed: bool) {
        if pressed && !self.crouch_held {
            self.press(ParkourInput::CrouchOrSlide);
        }
        self.crouch_held = pressed;
    }

    /// Buffer a press directly, bypassing edge detection.
    pub fn press(&mut self, input: ParkourInput) {
        self.pending.push(input);
    }

    /// Whether any press is waiting.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Take every buffered press, oldest first.
    pub fn take_inputs(&mut self) -> Vec<ParkourInput> {
        std::mem::take(&mut self.pending)
    }

    /// Drop every buffered press.
    pub fn clear_inputs(&mut self) {
        self.pending.clear();
    }
}
