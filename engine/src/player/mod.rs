//! Player Module
//!
//! First-person walking over loaded scan geometry.
//!
//! # Components
//!
//! - [`WalkingControls`] - Gravity, ray collision, ground snap, jump, sprint and mouse look
//!   - Built through [`WalkingControlsBuilder`] (camera and pointer-lock host required)
//!   - Lock/unlock lifecycle driven by pointer capture notifications
//! - [`SceneLighting`] - Flashlight mode: camera spot light on, scene lights hidden
//! - [`HintToast`] - Transient hint shown when walking starts

pub mod hint;
pub mod lighting;
pub mod walking_controls;

pub use hint::HintToast;
pub use lighting::{Flashlight, SceneLighting};
pub use walking_controls::{
    GroundState, WalkingControls, WalkingControlsBuilder, block_velocity, dedup_by_normal,
};
