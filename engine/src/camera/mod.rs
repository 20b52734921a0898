//! Camera Module
//!
//! The shared camera pose the host renders from and the active camera
//! controller writes. This module is window-system agnostic - it only deals
//! with camera state and math.

pub mod pose;

use std::cell::RefCell;
use std::rc::Rc;

pub use pose::CameraPose;

/// Camera shared between the render loop and the active controller.
///
/// Only one controller may write through the handle at a time; the host's
/// mode switching is responsible for that.
pub type CameraHandle = Rc<RefCell<CameraPose>>;

/// Wrap a pose in a new shared handle.
pub fn shared_camera(pose: CameraPose) -> CameraHandle {
    Rc::new(RefCell::new(pose))
}
