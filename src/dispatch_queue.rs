//! FIFO serialization of inbound backend messages.
//!
//! `dispatch` never processes inline: it enqueues the message and defers one
//! task. Each task consumes the oldest queued message, so n dispatches before
//! the first tick are observed in arrival order, one per tick.

use std::collections::VecDeque;

use crate::event_loop::{EventLoopOwner, Task};

/// Ordered buffer of messages awaiting processing.
#[derive(Debug)]
pub struct DispatchQueue<M> {
    pending: VecDeque<M>,
}

impl<M> Default for DispatchQueue<M> {
    fn default() -> Self {
        Self {
            pending: VecDeque::new(),
        }
    }
}

impl<M> DispatchQueue<M> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, message: M) {
        self.pending.push_back(message);
    }

    /// Remove the oldest message.
    pub fn take_next(&mut self) -> Option<M> {
        self.pending.pop_front()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// An event-loop owner that consumes queued messages.
pub trait DispatchTarget: EventLoopOwner {
    type Message: 'static;

    fn queue(&mut self) -> &mut DispatchQueue<Self::Message>;

    fn process_message(&mut self, message: Self::Message);
}

/// Enqueue `message` and schedule exactly one deferred processing tick.
pub fn dispatch<T: DispatchTarget>(target: &mut T, message: T::Message) {
    target.queue().enqueue(message);
    let task: Task<T> = Box::new(|target: &mut T| {
        // Earlier ticks may already have drained the queue.
        if let Some(message) = target.queue().take_next() {
            target.process_message(message);
        }
    });
    target.event_loop().defer(task);
}
