//! Keyboard Input Module
//!
//! Generic key codes for the walking controls, decoupled from winit. The
//! viewer converts winit key codes with [`KeyCode::from_winit`].

use super::MoveKey;

/// Generic key codes, independent of windowing system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    // Movement keys
    W,
    A,
    S,
    D,
    Space,
    ShiftLeft,
    ShiftRight,

    // Arrow keys
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    // Viewer controls
    Escape,
    F,

    /// Catch-all for unhandled keys
    Unknown,
}

impl KeyCode {
    /// Convert a winit physical key code.
    pub fn from_winit(key: winit::keyboard::KeyCode) -> Self {
        use winit::keyboard::KeyCode as Winit;
        match key {
            Winit::KeyW => KeyCode::W,
            Winit::KeyA => KeyCode::A,
            Winit::KeyS => KeyCode::S,
            Winit::KeyD => KeyCode::D,
            Winit::Space => KeyCode::Space,
            Winit::ShiftLeft => KeyCode::ShiftLeft,
            Winit::ShiftRight => KeyCode::ShiftRight,
            Winit::ArrowUp => KeyCode::ArrowUp,
            Winit::ArrowDown => KeyCode::ArrowDown,
            Winit::ArrowLeft => KeyCode::ArrowLeft,
            Winit::ArrowRight => KeyCode::ArrowRight,
            Winit::Escape => KeyCode::Escape,
            Winit::KeyF => KeyCode::F,
            _ => KeyCode::Unknown,
        }
    }

    /// The walking input this key drives, if any.
    ///
    /// WASD and the arrow keys both move; either shift key sprints.
    pub fn move_key(self) -> Option<MoveKey> {
        match self {
            KeyCode::W | KeyCode::ArrowUp => Some(MoveKey::Forward),
            KeyCode::A | KeyCode::ArrowLeft => Some(MoveKey::Left),
            KeyCode::S | KeyCode::ArrowDown => Some(MoveKey::Backward),
            KeyCode::D | KeyCode::ArrowRight => Some(MoveKey::Right),
            KeyCode::ShiftLeft | KeyCode::ShiftRight => Some(MoveKey::Sprint),
            KeyCode::Space => Some(MoveKey::Jump),
            _ => None,
        }
    }
}
