//! Input Module
//!
//! Platform-agnostic input for the walking controls. Directional input
//! arrives as [`DirectionalEvent`]s from a [`DirectionalInputProvider`];
//! pointer capture goes through a [`PointerLockHost`].
//!
//! # Example
//!
//! ```rust,ignore
//! use catacombs_engine::input::{KeyboardInput, KeyCode};
//!
//! let mut keyboard = KeyboardInput::new();
//! keyboard.handle_key(KeyCode::W, true); // W pressed
//!
//! // Once per frame, before ticking the controller
//! controls.pump_input(&mut keyboard);
//! ```

pub mod keyboard;
pub mod pointer_lock;
pub mod provider;

use glam::Vec3;

pub use keyboard::KeyCode;
pub use pointer_lock::{
    LockState, PointerLockHost, PointerLockNotice, RecordingPointerLock, WinitPointerLock,
};
pub use provider::{
    DirectionalInputProvider, KeyboardInput, ScriptedInput, TouchButton, TouchOverlayInput,
};

/// Logical walking inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKey {
    Forward,
    Left,
    Backward,
    Right,
    Sprint,
    Jump,
}

/// A press or release of one walking input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectionalEvent {
    Press(MoveKey),
    Release(MoveKey),
}

impl DirectionalEvent {
    pub fn new(key: MoveKey, pressed: bool) -> Self {
        if pressed {
            DirectionalEvent::Press(key)
        } else {
            DirectionalEvent::Release(key)
        }
    }

    pub fn key(&self) -> MoveKey {
        match *self {
            DirectionalEvent::Press(key) | DirectionalEvent::Release(key) => key,
        }
    }

    pub fn is_press(&self) -> bool {
        matches!(self, DirectionalEvent::Press(_))
    }
}

/// Held state of the four directional inputs and sprint.
///
/// Jump is edge-triggered and does not live here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    pub forward: bool,
    pub left: bool,
    pub backward: bool,
    pub right: bool,
    pub sprint: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the held state of one direction.
    ///
    /// Returns `true` when a directional flag actually flipped, i.e. the
    /// movement direction needs recomputing. Sprint and jump never do.
    pub fn set_direction(&mut self, key: MoveKey, pressed: bool) -> bool {
        let flag = match key {
            MoveKey::Forward => &mut self.forward,
            MoveKey::Left => &mut self.left,
            MoveKey::Backward => &mut self.backward,
            MoveKey::Right => &mut self.right,
            MoveKey::Sprint | MoveKey::Jump => return false,
        };
        let changed = *flag != pressed;
        *flag = pressed;
        changed
    }

    /// Camera-local movement intent: `x = right - left`, `z = backward - forward`.
    ///
    /// -Z is forward, matching the camera convention.
    pub fn relative_velocity(&self) -> Vec3 {
        Vec3::new(
            self.right as i32 as f32 - self.left as i32 as f32,
            0.0,
            self.backward as i32 as f32 - self.forward as i32 as f32,
        )
    }

    pub fn any_direction(&self) -> bool {
        self.forward || self.left || self.backward || self.right
    }

    /// Release everything.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_state_default() {
        let input = InputState::new();
        assert!(!input.any_direction());
        assert_eq!(input.relative_velocity(), Vec3::ZERO);
    }

    #[test]
    fn test_set_direction_reports_transitions() {
        let mut input = InputState::new();
        assert!(input.set_direction(MoveKey::Forward, true));
        // Key repeat: already held
        assert!(!input.set_direction(MoveKey::Forward, true));
        assert!(input.set_direction(MoveKey::Forward, false));
        assert!(!input.set_direction(MoveKey::Sprint, true));
        assert!(!input.set_direction(MoveKey::Jump, true));
    }

    #[test]
    fn test_relative_velocity_axes() {
        let mut input = InputState::new();
        input.set_direction(MoveKey::Forward, true);
        assert_eq!(input.relative_velocity(), Vec3::new(0.0, 0.0, -1.0));

        input.set_direction(MoveKey::Backward, true);
        // Both pressed cancels out
        assert_eq!(input.relative_velocity().z, 0.0);

        input.set_direction(MoveKey::Right, true);
        assert_eq!(input.relative_velocity().x, 1.0);
    }

    #[test]
    fn test_directional_event_helpers() {
        let event = DirectionalEvent::new(MoveKey::Jump, true);
        assert!(event.is_press());
        assert_eq!(event.key(), MoveKey::Jump);
        assert!(!DirectionalEvent::new(MoveKey::Left, false).is_press());
    }
}
