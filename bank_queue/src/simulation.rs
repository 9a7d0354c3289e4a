//! The event-interpretation loop
//!
//! [`Simulation`] owns the clock, the event schedule, one [`ServerQueue`]
//! per teller and the running statistics. Each [`Simulation::step`] pops the
//! earliest event, charges idle time to every empty teller for the gap since
//! the previous event, moves the clock and then handles the event:
//!
//! - an arrival joins the shortest queue (lowest index on ties), starts
//!   service straight away if that teller was idle, and schedules the next
//!   arrival;
//! - a departure removes the customer at the head of its teller's queue,
//!   records the wait and starts serving the next customer, if any.
//!
//! The loop condition is checked before popping, so the event that first
//! carries the clock past the time limit is still handled in full.

use des::{EventSchedule, Time};
use tracing::{debug, error, info, trace};

use crate::error::InvariantViolation;
use crate::{
    Event, EventKind, Reporter, Sampler, ServerQueue, SimulationConfig, SimulationError, Snapshot,
    Summary,
};

/// A snapshot is reported whenever the clock lands on a multiple of this
pub const SNAPSHOT_INTERVAL: Time = 500;

/// Running totals, updated as events are handled
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statistics {
    /// Departures completed
    pub customers_processed: u64,
    /// Arrivals generated, including the one still pending
    pub customers_arrived: u64,
    pub total_wait_time: Time,
    pub max_wait_time: Time,
    pub total_inter_arrival_time: Time,
    /// Sum of the service durations drawn for generated arrivals
    pub total_service_time: Time,
}

pub struct Simulation<S> {
    config: SimulationConfig,
    sampler: S,
    clock: Time,
    schedule: EventSchedule<Event>,
    servers: Vec<ServerQueue>,
    stats: Statistics,
}

impl<S: Sampler> Simulation<S> {
    /// Validate the configuration and seed the schedule with the first arrival
    pub fn new(config: SimulationConfig, sampler: S) -> Result<Self, SimulationError> {
        config.validate()?;
        let servers = (0..config.num_servers).map(|_| ServerQueue::new()).collect();
        let mut sim = Simulation {
            config,
            sampler,
            clock: 0,
            schedule: EventSchedule::new(),
            servers,
            stats: Statistics::default(),
        };
        sim.schedule_arrival()?;
        Ok(sim)
    }

    pub fn clock(&self) -> Time {
        self.clock
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn statistics(&self) -> &Statistics {
        &self.stats
    }

    pub fn servers(&self) -> &[ServerQueue] {
        &self.servers
    }

    pub fn schedule(&self) -> &EventSchedule<Event> {
        &self.schedule
    }

    /// Whether the loop would run another iteration
    pub fn is_running(&self) -> bool {
        self.clock <= self.config.time_limit
    }

    /// Run until the clock passes the time limit
    pub fn run(&mut self, reporter: &mut dyn Reporter) -> Result<Summary, SimulationError> {
        info!(
            "Starting simulation: {} tellers, arrivals {} ± {}, service {} ± {}, time limit {}",
            self.config.num_servers,
            self.config.arrival.mean,
            self.config.arrival.variance,
            self.config.service.mean,
            self.config.service.variance,
            self.config.time_limit
        );

        while self.is_running() {
            if let Some(snapshot) = self.step()? {
                reporter.snapshot(&snapshot);
            }
        }

        let summary = self.summary();
        info!(
            "Simulation finished at clock {}: {} processed, {} still queued",
            self.clock, summary.customers_processed, summary.customers_in_queues
        );
        reporter.summary(&summary);
        Ok(summary)
    }

    /// Handle the next event; returns a snapshot when the clock lands on a
    /// reporting boundary.
    pub fn step(&mut self) -> Result<Option<Snapshot>, SimulationError> {
        let clock = self.clock;
        let event = self
            .schedule
            .pop_earliest()
            .map_err(|e| violation(clock, None, None, e.into()))?;
        if event.timestamp() < clock {
            return Err(violation(
                clock,
                Some(event),
                event.server(),
                InvariantViolation::ClockRegression(event.timestamp()),
            ));
        }

        self.accrue_idle_time(event.timestamp());
        self.clock = event.timestamp();
        debug!("[{}] {}", self.clock, event);

        match event.kind() {
            EventKind::Arrival => self.handle_arrival(event)?,
            EventKind::Departure(server) => self.handle_departure(event, server)?,
        }

        if self.clock % SNAPSHOT_INTERVAL == 0 {
            Ok(Some(self.snapshot()))
        } else {
            Ok(None)
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            clock: self.clock,
            queue_lengths: self.servers.iter().map(|q| q.current_length()).collect(),
            pending_events: self.schedule.len(),
        }
    }

    pub fn summary(&self) -> Summary {
        let stats = &self.stats;
        let idle_percentages = self
            .servers
            .iter()
            .map(|q| {
                (self.clock > 0).then(|| (q.idle_time() as f64 / self.clock as f64 * 100.0) as u32)
            })
            .collect();

        Summary {
            clock: self.clock,
            customers_processed: stats.customers_processed,
            customers_arrived: stats.customers_arrived,
            average_inter_arrival_time: average(
                stats.total_inter_arrival_time,
                stats.customers_arrived,
            ),
            average_service_time: average(stats.total_service_time, stats.customers_arrived),
            average_wait_time: average(stats.total_wait_time, stats.customers_processed),
            idle_percentages,
            max_wait_time: stats.max_wait_time,
            max_queue_length: self
                .servers
                .iter()
                .map(|q| q.max_length())
                .max()
                .unwrap_or(0),
            customers_in_queues: self.servers.iter().map(|q| q.current_length()).sum(),
        }
    }

    // Every teller that is empty now stayed empty since the previous event.
    fn accrue_idle_time(&mut self, until: Time) {
        let gap = until - self.clock;
        for (i, queue) in self.servers.iter_mut().enumerate() {
            if queue.is_empty() {
                trace!("Teller {} idle for {}", i, gap);
                queue.add_idle_time(gap);
            }
        }
    }

    fn handle_arrival(&mut self, event: Event) -> Result<(), SimulationError> {
        let server = self.shortest_queue().ok_or_else(|| {
            violation(
                self.clock,
                Some(event),
                None,
                InvariantViolation::UnknownServer(0),
            )
        })?;

        let queue = &mut self.servers[server];
        queue.enqueue(event);
        if queue.current_length() == 1 {
            self.schedule_departure(&event, server);
        }

        self.schedule_arrival()
    }

    fn handle_departure(&mut self, event: Event, server: usize) -> Result<(), SimulationError> {
        let clock = self.clock;
        self.stats.customers_processed += 1;

        let queue = self.servers.get_mut(server).ok_or_else(|| {
            violation(
                clock,
                Some(event),
                Some(server),
                InvariantViolation::UnknownServer(server),
            )
        })?;
        let head = queue
            .dequeue_front()
            .map_err(|e| violation(clock, Some(event), Some(server), e.into()))?;

        // The firing departure's duration, not the head's own
        let wait_time = clock - head.timestamp() - event.service_duration();
        self.stats.max_wait_time = self.stats.max_wait_time.max(wait_time);
        self.stats.total_wait_time += wait_time;

        let next = queue.peek_front().copied();
        if let Some(next) = next {
            self.schedule_departure(&next, server);
        }
        Ok(())
    }

    // First minimum wins, so ties go to the lowest index.
    fn shortest_queue(&self) -> Option<usize> {
        self.servers
            .iter()
            .enumerate()
            .min_by_key(|(_, q)| q.current_length())
            .map(|(i, _)| i)
    }

    fn schedule_departure(&mut self, customer: &Event, server: usize) {
        let service = customer.service_duration();
        self.schedule
            .schedule(Event::departure(self.clock + service, service, server));
    }

    fn schedule_arrival(&mut self) -> Result<(), SimulationError> {
        let inter_arrival = self.sampler.sample(self.config.arrival)?;
        let service = self.sampler.sample(self.config.service)?;
        self.schedule
            .schedule(Event::arrival(self.clock + inter_arrival, service));

        self.stats.total_inter_arrival_time += inter_arrival;
        self.stats.total_service_time += service;
        self.stats.customers_arrived += 1;
        Ok(())
    }
}

fn average(total: Time, count: u64) -> Option<f64> {
    (count > 0).then(|| total as f64 / count as f64)
}

fn violation(
    clock: Time,
    event: Option<Event>,
    server: Option<usize>,
    reason: InvariantViolation,
) -> SimulationError {
    let err = SimulationError::Invariant {
        clock,
        event,
        server,
        reason,
    };
    error!("{}", err);
    err
}
