//! Discrete-event simulation kernel
//!
//! Provides the time-ordered schedule that drives a simulation: events are
//! pushed with an absolute timestamp and popped earliest first. The model
//! crates own the clock and decide what an event means.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use thiserror::Error;

/// Simulated time in integer ticks
pub type Time = i64;

/// Anything that fires at a known point in simulated time
pub trait Timestamped {
    fn timestamp(&self) -> Time;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("event schedule is empty")]
    Empty,
}

// Heap entry ordered on timestamp only, reversed so the max-heap pops the earliest.
#[derive(Debug, Clone)]
struct Entry<T> {
    t: Time,
    data: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.t == other.t
    }
}

impl<T> Eq for Entry<T> {}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        other.t.cmp(&self.t)
    }
}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Pending events ordered by ascending timestamp
///
/// Events sharing a timestamp come out in no particular order. Insertion
/// order is not preserved among ties and callers must not rely on it.
#[derive(Debug, Clone)]
pub struct EventSchedule<T> {
    queue: BinaryHeap<Entry<T>>,
}

impl<T: Timestamped> EventSchedule<T> {
    pub fn new() -> Self {
        EventSchedule {
            queue: BinaryHeap::new(),
        }
    }

    pub fn schedule(&mut self, event: T) {
        self.queue.push(Entry {
            t: event.timestamp(),
            data: event,
        });
    }

    /// Remove and return the event with the smallest timestamp
    pub fn pop_earliest(&mut self) -> Result<T, ScheduleError> {
        self.queue
            .pop()
            .map(|entry| entry.data)
            .ok_or(ScheduleError::Empty)
    }

    pub fn peek_earliest(&self) -> Option<&T> {
        self.queue.peek().map(|entry| &entry.data)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Pending events in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.queue.iter().map(|entry| &entry.data)
    }
}

impl<T: Timestamped> Default for EventSchedule<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Timestamped> FromIterator<T> for EventSchedule<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let queue: BinaryHeap<Entry<T>> = iter
            .into_iter()
            .map(|data| Entry {
                t: data.timestamp(),
                data,
            })
            .collect();
        EventSchedule { queue }
    }
}
