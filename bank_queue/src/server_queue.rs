use std::collections::VecDeque;

use des::Time;
use thiserror::Error;

use crate::Event;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    #[error("server queue is empty")]
    Empty,
}

/// Customers waiting at (or being served by) one teller
///
/// The head of the queue is the customer in service. Besides the FIFO the
/// queue keeps the longest length it has ever reached and the total time it
/// has spent empty.
#[derive(Debug, Clone, Default)]
pub struct ServerQueue {
    events: VecDeque<Event>,
    max_length: usize,
    idle_time: Time,
}

impl ServerQueue {
    pub fn new() -> ServerQueue {
        ServerQueue::default()
    }

    pub fn enqueue(&mut self, event: Event) {
        self.events.push_back(event);
        self.max_length = self.max_length.max(self.events.len());
    }

    pub fn dequeue_front(&mut self) -> Result<Event, QueueError> {
        self.events.pop_front().ok_or(QueueError::Empty)
    }

    pub fn peek_front(&self) -> Option<&Event> {
        self.events.front()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn current_length(&self) -> usize {
        self.events.len()
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn idle_time(&self) -> Time {
        self.idle_time
    }

    /// Caller guarantees the queue was empty for the whole interval.
    pub fn add_idle_time(&mut self, duration: Time) {
        debug_assert!(self.is_empty(), "idle time added to a busy teller");
        self.idle_time += duration;
    }
}
