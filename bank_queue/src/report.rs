//! Read-only views of a run and the sinks that consume them
//!
//! The engine hands a [`Snapshot`] to its [`Reporter`] every reporting
//! interval and a [`Summary`] once at the end. Reporters never touch engine
//! state.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use des::Time;
use serde::Serialize;

use crate::SimulationError;

/// Queue lengths at one reporting instant
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub clock: Time,
    pub queue_lengths: Vec<usize>,
    pub pending_events: usize,
}

/// Final figures of a run
///
/// Averages are `None` when nothing was counted, idle percentages are
/// `None` when the run ended at clock 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub clock: Time,
    pub customers_processed: u64,
    pub customers_arrived: u64,
    pub average_inter_arrival_time: Option<f64>,
    pub average_service_time: Option<f64>,
    pub average_wait_time: Option<f64>,
    pub idle_percentages: Vec<Option<u32>>,
    pub max_wait_time: Time,
    pub max_queue_length: usize,
    pub customers_in_queues: usize,
}

pub trait Reporter {
    fn snapshot(&mut self, _snapshot: &Snapshot) {}

    fn summary(&mut self, _summary: &Summary) {}
}

/// Discards everything
#[derive(Debug, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {}

/// Keeps every snapshot and the final summary
#[derive(Debug, Default)]
pub struct Recorder {
    pub snapshots: Vec<Snapshot>,
    pub summary: Option<Summary>,
}

impl Recorder {
    pub fn new() -> Self {
        Recorder::default()
    }
}

impl Reporter for Recorder {
    fn snapshot(&mut self, snapshot: &Snapshot) {
        self.snapshots.push(snapshot.clone());
    }

    fn summary(&mut self, summary: &Summary) {
        self.summary = Some(summary.clone());
    }
}

/// Prints the classic teller report
pub struct ConsoleReporter<W: Write> {
    out: W,
}

impl ConsoleReporter<io::Stdout> {
    pub fn stdout() -> Self {
        ConsoleReporter { out: io::stdout() }
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        ConsoleReporter { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn write_snapshot(&mut self, snapshot: &Snapshot) -> io::Result<()> {
        writeln!(self.out, "Clock Time: {}", snapshot.clock)?;
        for (i, length) in snapshot.queue_lengths.iter().enumerate() {
            writeln!(self.out, "Number of customers for Teller ({i}): {length}")?;
        }
        writeln!(
            self.out,
            "Number of items in event queue: {}",
            snapshot.pending_events
        )?;
        writeln!(self.out)
    }

    pub fn write_summary(&mut self, summary: &Summary) -> io::Result<()> {
        let out = &mut self.out;
        writeln!(
            out,
            "The total number of customers processed: {}",
            summary.customers_processed
        )?;
        writeln!(
            out,
            "The average inter-arrival time: {}",
            truncated(summary.average_inter_arrival_time)
        )?;
        writeln!(
            out,
            "The average service time: {}",
            truncated(summary.average_service_time)
        )?;
        writeln!(
            out,
            "The average wait time per customer: {}",
            truncated(summary.average_wait_time)
        )?;
        for (i, idle) in summary.idle_percentages.iter().enumerate() {
            match idle {
                Some(percent) => {
                    writeln!(out, "Percent of idle time for teller ({i}): {percent}%")?
                }
                None => writeln!(out, "Percent of idle time for teller ({i}): {NO_DATA}")?,
            }
        }
        writeln!(out, "The maximum customer wait time: {}", summary.max_wait_time)?;
        writeln!(
            out,
            "The maximum queue length of any customer queue: {}",
            summary.max_queue_length
        )?;
        writeln!(
            out,
            "The total number of people left in queues at the end of the simulation: {}",
            summary.customers_in_queues
        )
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn snapshot(&mut self, snapshot: &Snapshot) {
        if let Err(e) = self.write_snapshot(snapshot) {
            tracing::warn!("Failed to write snapshot: {}", e);
        }
    }

    fn summary(&mut self, summary: &Summary) {
        if let Err(e) = self.write_summary(summary) {
            tracing::warn!("Failed to write summary: {}", e);
        }
    }
}

const NO_DATA: &str = "no data";

fn truncated(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{}", v.trunc() as i64),
        None => NO_DATA.to_string(),
    }
}

#[derive(Serialize)]
struct SnapshotRow {
    clock: Time,
    pending_events: usize,
    queue_lengths: String,
}

/// Export snapshots as CSV, one row per reporting instant
pub fn write_snapshots_csv<P: AsRef<Path>>(
    path: P,
    snapshots: &[Snapshot],
) -> Result<(), SimulationError> {
    let mut writer = csv::Writer::from_path(path)?;
    for snapshot in snapshots {
        let queue_lengths = snapshot
            .queue_lengths
            .iter()
            .map(|l| l.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        writer.serialize(SnapshotRow {
            clock: snapshot.clock,
            pending_events: snapshot.pending_events,
            queue_lengths,
        })?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_summary_json<P: AsRef<Path>>(
    path: P,
    summary: &Summary,
) -> Result<(), SimulationError> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, summary)?;
    Ok(())
}
