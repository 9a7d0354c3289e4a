use des::{ScheduleError, Time};
use thiserror::Error;

use crate::{Event, QueueError};

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("invalid sampling range: mean {mean}, variance {variance}")]
    InvalidRange { mean: Time, variance: Time },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invariant violated at clock {clock} ({}): {reason}", context(.event, .server))]
    Invariant {
        clock: Time,
        event: Option<Event>,
        server: Option<usize>,
        reason: InvariantViolation,
    },
}

/// Internal failures that can only happen if the engine's bookkeeping is wrong
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
    #[error(transparent)]
    Queue(#[from] QueueError),
    #[error("no teller with index {0}")]
    UnknownServer(usize),
    #[error("event at {0} is earlier than the clock")]
    ClockRegression(Time),
}

fn context(event: &Option<Event>, server: &Option<usize>) -> String {
    match (event, server) {
        (Some(event), Some(server)) => format!("{event}, teller {server}"),
        (Some(event), None) => event.to_string(),
        (None, Some(server)) => format!("teller {server}"),
        (None, None) => "no event".to_string(),
    }
}
