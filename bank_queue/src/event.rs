use std::fmt;

use des::{Time, Timestamped};

/// What happens when an event fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Arrival,
    /// Service completion at the given server index
    Departure(usize),
}

/// A scheduled occurrence, immutable once built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    timestamp: Time,
    service_duration: Time,
    kind: EventKind,
}

impl Event {
    pub fn new(timestamp: Time, service_duration: Time, kind: EventKind) -> Event {
        debug_assert!(service_duration >= 0, "negative service duration");
        Event {
            timestamp,
            service_duration,
            kind,
        }
    }

    pub fn arrival(timestamp: Time, service_duration: Time) -> Event {
        Event::new(timestamp, service_duration, EventKind::Arrival)
    }

    pub fn departure(timestamp: Time, service_duration: Time, server: usize) -> Event {
        Event::new(timestamp, service_duration, EventKind::Departure(server))
    }

    pub fn timestamp(&self) -> Time {
        self.timestamp
    }

    pub fn service_duration(&self) -> Time {
        self.service_duration
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// Server index for departures, `None` for arrivals
    pub fn server(&self) -> Option<usize> {
        match self.kind {
            EventKind::Arrival => None,
            EventKind::Departure(server) => Some(server),
        }
    }
}

impl Timestamped for Event {
    fn timestamp(&self) -> Time {
        self.timestamp
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            EventKind::Arrival => write!(
                f,
                "arrival at {} (service {})",
                self.timestamp, self.service_duration
            ),
            EventKind::Departure(server) => write!(
                f,
                "departure from teller {} at {} (service {})",
                server, self.timestamp, self.service_duration
            ),
        }
    }
}
