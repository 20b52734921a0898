//! Directional Input Providers
//!
//! Sources of [`DirectionalEvent`]s. The walking controls drain whichever
//! provider the host hands them, so keyboards, on-screen touch buttons and
//! scripted test input all drive the controller the same way.

use std::collections::VecDeque;

use super::keyboard::KeyCode;
use super::{DirectionalEvent, MoveKey};

/// A queue of directional press/release events.
pub trait DirectionalInputProvider {
    /// Next pending event, oldest first.
    fn next_event(&mut self) -> Option<DirectionalEvent>;
}

/// Physical keyboard: WASD or arrows, shift to sprint, space to jump.
#[derive(Debug, Clone, Default)]
pub struct KeyboardInput {
    pending: VecDeque<DirectionalEvent>,
}

impl KeyboardInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a key press or release.
    ///
    /// Returns `true` if the key drives walking input, `false` otherwise.
    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) -> bool {
        match key.move_key() {
            Some(move_key) => {
                self.pending.push_back(DirectionalEvent::new(move_key, pressed));
                true
            }
            None => false,
        }
    }

    /// Number of queued events.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

impl DirectionalInputProvider for KeyboardInput {
    fn next_event(&mut self) -> Option<DirectionalEvent> {
        self.pending.pop_front()
    }
}

/// Buttons of the on-screen arrow overlay shown on touch devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchButton {
    Up,
    Down,
    Left,
    Right,
}

impl TouchButton {
    pub const ALL: [TouchButton; 4] = [
        TouchButton::Up,
        TouchButton::Left,
        TouchButton::Down,
        TouchButton::Right,
    ];

    pub fn move_key(self) -> MoveKey {
        match self {
            TouchButton::Up => MoveKey::Forward,
            TouchButton::Down => MoveKey::Backward,
            TouchButton::Left => MoveKey::Left,
            TouchButton::Right => MoveKey::Right,
        }
    }
}

/// On-screen arrow buttons. Tracks which buttons are held so a cancelled
/// touch can release everything at once.
#[derive(Debug, Clone, Default)]
pub struct TouchOverlayInput {
    held: [bool; 4],
    pending: VecDeque<DirectionalEvent>,
}

impl TouchOverlayInput {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(button: TouchButton) -> usize {
        match button {
            TouchButton::Up => 0,
            TouchButton::Left => 1,
            TouchButton::Down => 2,
            TouchButton::Right => 3,
        }
    }

    /// Touch started on `button`.
    pub fn touch_start(&mut self, button: TouchButton) {
        self.held[Self::slot(button)] = true;
        self.pending.push_back(DirectionalEvent::Press(button.move_key()));
    }

    /// Touch ended on `button`.
    pub fn touch_end(&mut self, button: TouchButton) {
        self.held[Self::slot(button)] = false;
        self.pending.push_back(DirectionalEvent::Release(button.move_key()));
    }

    /// Touch cancelled (e.g. the finger left the overlay): release every held button.
    pub fn touch_cancel(&mut self) {
        for button in TouchButton::ALL {
            if self.is_held(button) {
                self.touch_end(button);
            }
        }
    }

    pub fn is_held(&self, button: TouchButton) -> bool {
        self.held[Self::slot(button)]
    }
}

impl DirectionalInputProvider for TouchOverlayInput {
    fn next_event(&mut self) -> Option<DirectionalEvent> {
        self.pending.pop_front()
    }
}

/// Pre-recorded input, for tests and demos.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    events: VecDeque<DirectionalEvent>,
}

impl ScriptedInput {
    pub fn new(events: impl IntoIterator<Item = DirectionalEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }

    pub fn push(&mut self, event: DirectionalEvent) {
        self.events.push_back(event);
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl DirectionalInputProvider for ScriptedInput {
    fn next_event(&mut self) -> Option<DirectionalEvent> {
        self.events.pop_front()
    }
}
