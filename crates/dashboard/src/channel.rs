//! Outbound side of the backend connection

use std::cell::RefCell;
use std::rc::Rc;

use syncify_protocol::ClientEvent;

/// Fire-and-forget sink for events bound to the backend
///
/// Implementations must not call back into the dashboard while emitting.
pub trait Channel {
    fn emit(&self, event: ClientEvent);
}

impl<T: Channel + ?Sized> Channel for Rc<T> {
    fn emit(&self, event: ClientEvent) {
        (**self).emit(event);
    }
}

impl<T: Channel + ?Sized> Channel for &T {
    fn emit(&self, event: ClientEvent) {
        (**self).emit(event);
    }
}

/// Keeps every emitted event in order
#[derive(Debug, Default)]
pub struct RecordingChannel {
    events: RefCell<Vec<ClientEvent>>,
}

impl RecordingChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain recorded events
    pub fn take(&self) -> Vec<ClientEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}

impl Channel for RecordingChannel {
    fn emit(&self, event: ClientEvent) {
        self.events.borrow_mut().push(event);
    }
}
