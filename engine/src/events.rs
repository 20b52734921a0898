//! Control Events
//!
//! Lifecycle notifications produced by the walking controller. The controller
//! only depends on the [`ControlsNotifier`] capability; hosts choose how the
//! events are delivered:
//!
//! - [`ListenerRegistry`] - synchronous callbacks, zero or more listeners
//! - [`ChannelNotifier`] - events pushed into an `mpsc` channel and drained
//!   by the host loop

use std::sync::mpsc::{Receiver, Sender, channel};

/// Notification emitted by a camera controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlEvent {
    /// Exclusive pointer capture was confirmed
    Lock,
    /// Pointer capture was lost
    Unlock,
    /// Look direction or input state changed
    Change,
}

/// Sink for controller events.
///
/// Events are delivered synchronously, at the point the controller emits
/// them.
pub trait ControlsNotifier {
    fn notify(&mut self, event: ControlEvent);
}

/// Ignores every event.
impl ControlsNotifier for () {
    fn notify(&mut self, _event: ControlEvent) {}
}

type Listener = Box<dyn FnMut(ControlEvent)>;

/// Callback list; every registered listener receives every event.
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: Vec<(ListenerId, Listener)>,
    next_id: u64,
}

/// Handle returned by [`ListenerRegistry::add_listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback. Listeners run in registration order.
    pub fn add_listener(&mut self, listener: impl FnMut(ControlEvent) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a callback. Returns `false` if it was already removed.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl ControlsNotifier for ListenerRegistry {
    fn notify(&mut self, event: ControlEvent) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(event);
        }
    }
}

/// Forwards events into an `mpsc` channel.
///
/// A dropped receiver is not an error; events are discarded.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    sender: Sender<ControlEvent>,
}

impl ChannelNotifier {
    /// Create a notifier and the receiver the host drains.
    pub fn new() -> (Self, Receiver<ControlEvent>) {
        let (sender, receiver) = channel();
        (Self { sender }, receiver)
    }

    pub fn from_sender(sender: Sender<ControlEvent>) -> Self {
        Self { sender }
    }
}

impl ControlsNotifier for ChannelNotifier {
    fn notify(&mut self, event: ControlEvent) {
        if self.sender.send(event).is_err() {
            log::trace!("control event {:?} dropped: receiver closed", event);
        }
    }
}
