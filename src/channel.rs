//! Cross-thread event queues.
//!
//! Hook procedures run on whatever thread the OS picks and must return
//! quickly, so they only push translated events into an [`EventChannel`].
//! The consumer thread later takes everything out in one go with
//! [`EventChannel::drain_all`].
//!
//! Producers never take a lock. The receiving end sits behind a mutex that
//! only the consumer touches.

use crate::event::{KeyboardEvent, MouseEvent};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, PoisonError};

/// Unbounded multi-producer, single-consumer FIFO for one event class.
pub struct EventChannel<T> {
    sender: Sender<T>,
    receiver: Mutex<Receiver<T>>,
}

impl<T> EventChannel<T> {
    /// Create an empty channel.
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            sender,
            receiver: Mutex::new(receiver),
        }
    }

    /// Append an event. Never blocks.
    pub fn enqueue(&self, event: T) {
        // The receiver lives as long as `self`, so sending cannot fail.
        let _ = self.sender.send(event);
    }

    /// Remove and return every queued event, oldest first.
    pub fn drain_all(&self) -> Vec<T> {
        let receiver = self
            .receiver
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        receiver.try_iter().collect()
    }
}

impl<T> Default for EventChannel<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// One channel per event class, shared with the hook procedures.
#[derive(Default)]
pub struct EventChannels {
    /// Keyboard events.
    pub keyboard: Arc<EventChannel<KeyboardEvent>>,
    /// Mouse events.
    pub mouse: Arc<EventChannel<MouseEvent>>,
}

impl EventChannels {
    /// Create an empty pair of channels.
    pub fn new() -> Self {
        Self::default()
    }
}
