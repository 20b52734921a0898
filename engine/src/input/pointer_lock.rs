//! Pointer Lock
//!
//! Exclusive pointer capture, modelled on the browser primitive: a request
//! is asynchronous and the outcome arrives later as a [`PointerLockNotice`]
//! (capture gained, capture lost, or an error). Hosts queue the notices and
//! the walking controls drain them once per frame.
//!
//! # Usage
//!
//! ```rust,ignore
//! let host = WinitPointerLock::new(window.clone());
//! let mut controls = WalkingControls::builder()
//!     .camera(camera)
//!     .pointer_lock(Box::new(host))
//!     .build()?;
//!
//! // Left click: ask for capture
//! controls.lock();
//!
//! // Every frame: deliver queued lock changes
//! controls.poll_pointer_lock();
//! ```

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::Arc;

use winit::window::{CursorGrabMode, Window};

/// Whether pointer motion currently drives the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockState {
    #[default]
    Unlocked,
    Locked,
}

/// Outcome of a capture request or an external capture change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerLockNotice {
    /// Capture state changed; `true` when the pointer is now captured
    Changed(bool),
    /// The host refused capture
    Error(String),
}

/// Access to the host's exclusive pointer capture.
pub trait PointerLockHost {
    /// Ask for capture. The result is reported through [`poll_notice`](Self::poll_notice).
    fn request_lock(&mut self);

    /// Release capture if held.
    fn exit_lock(&mut self);

    /// Next queued notice, oldest first.
    fn poll_notice(&mut self) -> Option<PointerLockNotice>;
}

/// Pointer capture on a winit window.
///
/// Tries `CursorGrabMode::Locked` first and falls back to `Confined` on
/// platforms without true locking (e.g. Windows).
pub struct WinitPointerLock {
    window: Arc<Window>,
    captured: bool,
    notices: VecDeque<PointerLockNotice>,
}

impl WinitPointerLock {
    pub fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            captured: false,
            notices: VecDeque::new(),
        }
    }

    pub fn is_captured(&self) -> bool {
        self.captured
    }

    /// Report a capture loss the window system caused (e.g. focus lost).
    pub fn capture_lost(&mut self) {
        if self.captured {
            self.release_window();
            self.notices.push_back(PointerLockNotice::Changed(false));
        }
    }

    fn release_window(&mut self) {
        let _ = self.window.set_cursor_grab(CursorGrabMode::None);
        self.window.set_cursor_visible(true);
        self.captured = false;
    }
}

impl PointerLockHost for WinitPointerLock {
    fn request_lock(&mut self) {
        if self.captured {
            return;
        }
        let grabbed = self
            .window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Confined));
        match grabbed {
            Ok(()) => {
                self.window.set_cursor_visible(false);
                self.captured = true;
                self.notices.push_back(PointerLockNotice::Changed(true));
            }
            Err(e) => self.notices.push_back(PointerLockNotice::Error(e.to_string())),
        }
    }

    fn exit_lock(&mut self) {
        self.capture_lost();
    }

    fn poll_notice(&mut self) -> Option<PointerLockNotice> {
        self.notices.pop_front()
    }
}

/// Counters kept by [`RecordingPointerLock`].
#[derive(Debug, Clone, Default)]
pub struct PointerLockLog {
    pub requests: u32,
    pub exits: u32,
    notices: VecDeque<PointerLockNotice>,
}

/// Headless pointer-lock host. Records requests and only reports the
/// notices queued on it, so tests decide when capture is confirmed.
///
/// Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingPointerLock {
    log: Rc<RefCell<PointerLockLog>>,
}

impl RecordingPointerLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> u32 {
        self.log.borrow().requests
    }

    pub fn exits(&self) -> u32 {
        self.log.borrow().exits
    }

    /// Queue a notice for the controller to pick up.
    pub fn push_notice(&self, notice: PointerLockNotice) {
        self.log.borrow_mut().notices.push_back(notice);
    }
}

impl PointerLockHost for RecordingPointerLock {
    fn request_lock(&mut self) {
        self.log.borrow_mut().requests += 1;
    }

    fn exit_lock(&mut self) {
        self.log.borrow_mut().exits += 1;
    }

    fn poll_notice(&mut self) -> Option<PointerLockNotice> {
        self.log.borrow_mut().notices.pop_front()
    }
}
