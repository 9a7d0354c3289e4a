//! Multi-teller bank queue as a discrete-event simulation
//!
//! Customers arrive in an open stream, join the shortest teller queue and
//! leave after service. The clock only moves when an event fires.
//!
//! ```rust
//! use bank_queue::{NullReporter, RngSampler, Simulation, SimulationConfig};
//!
//! let config = SimulationConfig::default();
//! let mut sim = Simulation::new(config, RngSampler::seeded(42)).unwrap();
//! let summary = sim.run(&mut NullReporter).unwrap();
//! assert!(summary.customers_processed <= summary.customers_arrived);
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod config;
pub mod error;
pub mod event;
pub mod report;
pub mod sampling;
pub mod server_queue;
pub mod simulation;

pub use config::SimulationConfig;
pub use error::{InvariantViolation, SimulationError};
pub use event::{Event, EventKind};
pub use report::{
    ConsoleReporter, NullReporter, Recorder, Reporter, Snapshot, Summary, write_snapshots_csv,
    write_summary_json,
};
pub use sampling::{RngSampler, Sampler, ScriptedSampler, UniformSpec, uniform_random};
pub use server_queue::{QueueError, ServerQueue};
pub use simulation::{SNAPSHOT_INTERVAL, Simulation, Statistics};

pub use des::{EventSchedule, ScheduleError, Time};
