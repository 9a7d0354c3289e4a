//! Simulation parameters
//!
//! A run is fully described by [`SimulationConfig`] plus the sampler it is
//! given. Configurations can be built in code or read from TOML:
//!
//! ```toml
//! num_servers = 2
//! time_limit = 2000
//!
//! [arrival]
//! mean = 3
//! variance = 2
//!
//! [service]
//! mean = 8
//! variance = 3
//! ```

use std::fs;
use std::path::Path;

use des::Time;
use serde::{Deserialize, Serialize};

use crate::{SimulationError, UniformSpec};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of tellers, each with its own queue
    pub num_servers: usize,
    /// Time between consecutive arrivals
    pub arrival: UniformSpec,
    /// Time a teller spends with one customer
    pub service: UniformSpec,
    /// The loop keeps going while the clock is at or below this
    pub time_limit: Time,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            num_servers: 2,
            arrival: UniformSpec::new(3, 2),
            service: UniformSpec::new(8, 3),
            time_limit: 2000,
        }
    }
}

impl SimulationConfig {
    pub fn new(
        num_servers: usize,
        arrival: UniformSpec,
        service: UniformSpec,
        time_limit: Time,
    ) -> Self {
        SimulationConfig {
            num_servers,
            arrival,
            service,
            time_limit,
        }
    }

    /// Reject parameters that would give a degenerate or endless run
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.num_servers == 0 {
            return Err(invalid("num_servers must be at least 1"));
        }
        if self.time_limit < 0 {
            return Err(invalid(format!(
                "time_limit must not be negative, got {}",
                self.time_limit
            )));
        }
        if self.arrival.variance < 0 || self.service.variance < 0 {
            return Err(invalid("variances must not be negative"));
        }
        // Inter-arrival samples of at least 1 keep the clock moving
        if self.arrival.variance >= self.arrival.mean {
            return Err(invalid(format!(
                "arrival variance ({}) must be below the arrival mean ({})",
                self.arrival.variance, self.arrival.mean
            )));
        }
        if self.service.variance > self.service.mean {
            return Err(invalid(format!(
                "service variance ({}) must not exceed the service mean ({})",
                self.service.variance, self.service.mean
            )));
        }
        let (Some((_, arrival_high)), Some((_, service_high))) = (
            self.arrival.checked_bounds(),
            self.service.checked_bounds(),
        ) else {
            return Err(invalid("sampling ranges overflow the time type"));
        };
        // The last handled event can schedule past the limit by one arrival
        // plus one service at most; the clock must stay representable.
        if self
            .time_limit
            .checked_add(arrival_high)
            .and_then(|t| t.checked_add(service_high))
            .is_none()
        {
            return Err(invalid(format!(
                "time_limit ({}) plus the largest samples overflows the clock",
                self.time_limit
            )));
        }
        Ok(())
    }

    pub fn from_toml_str(s: &str) -> Result<Self, SimulationError> {
        let config: SimulationConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SimulationError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }
}

fn invalid(msg: impl Into<String>) -> SimulationError {
    SimulationError::InvalidConfiguration(msg.into())
}
