// Invariants checked after every iteration of many seeded runs.
// Everything is observed through the engine's read-only accessors.

use bank_queue::{
    EventKind, NullReporter, RngSampler, Simulation, SimulationConfig, Time, UniformSpec,
};

fn configs() -> Vec<SimulationConfig> {
    vec![
        SimulationConfig::default(),
        // Overloaded single teller, queue grows without bound
        SimulationConfig::new(1, UniformSpec::new(3, 2), UniformSpec::new(8, 3), 1500),
        // Lightly loaded, tellers mostly idle
        SimulationConfig::new(4, UniformSpec::new(10, 9), UniformSpec::new(6, 6), 3000),
        // Zero-length service is allowed
        SimulationConfig::new(3, UniformSpec::new(2, 1), UniformSpec::new(1, 1), 1000),
    ]
}

struct Observer {
    clock: Time,
    lengths: Vec<usize>,
    idle: Vec<Time>,
    peaks: Vec<usize>,
}

impl Observer {
    fn new(sim: &Simulation<RngSampler<rand::rngs::StdRng>>) -> Self {
        Observer {
            clock: sim.clock(),
            lengths: sim.servers().iter().map(|q| q.current_length()).collect(),
            idle: sim.servers().iter().map(|q| q.idle_time()).collect(),
            peaks: vec![0; sim.servers().len()],
        }
    }

    fn check(&mut self, sim: &Simulation<RngSampler<rand::rngs::StdRng>>) {
        // Monotonic clock
        assert!(sim.clock() >= self.clock, "clock went backwards");

        // Exactly one arrival pending
        let arrivals = sim
            .schedule()
            .iter()
            .filter(|e| e.kind() == EventKind::Arrival)
            .count();
        assert_eq!(arrivals, 1, "pending arrivals at clock {}", sim.clock());

        // A departure is pending for a teller iff its queue is non-empty
        for (i, queue) in sim.servers().iter().enumerate() {
            let departures = sim
                .schedule()
                .iter()
                .filter(|e| e.kind() == EventKind::Departure(i))
                .count();
            let expected = usize::from(!queue.is_empty());
            assert_eq!(departures, expected, "teller {i} at clock {}", sim.clock());
        }

        for (i, queue) in sim.servers().iter().enumerate() {
            // Idle time never shrinks and only grows while the teller was empty
            assert!(queue.idle_time() >= self.idle[i]);
            if self.lengths[i] > 0 {
                assert_eq!(queue.idle_time(), self.idle[i], "busy teller {i} accrued idle time");
            }

            // High-water mark matches what we have seen
            self.peaks[i] = self.peaks[i].max(queue.current_length());
            assert!(queue.max_length() >= queue.current_length());
            assert_eq!(queue.max_length(), self.peaks[i]);
        }

        // Conservation
        let stats = sim.statistics();
        let queued: usize = sim.servers().iter().map(|q| q.current_length()).sum();
        assert!(stats.customers_processed <= stats.customers_arrived);
        assert_eq!(
            stats.customers_arrived,
            stats.customers_processed + queued as u64 + 1,
            "every generated customer is pending, queued or processed"
        );

        self.clock = sim.clock();
        self.lengths = sim.servers().iter().map(|q| q.current_length()).collect();
        self.idle = sim.servers().iter().map(|q| q.idle_time()).collect();
    }
}

#[test]
fn invariants_hold_after_every_step() {
    for config in configs() {
        for seed in 0..25 {
            let mut sim = Simulation::new(config.clone(), RngSampler::seeded(seed)).unwrap();
            let mut observer = Observer::new(&sim);
            observer.check(&sim);

            while sim.is_running() {
                sim.step().unwrap();
                observer.check(&sim);
            }
            assert!(sim.clock() > config.time_limit);
        }
    }
}

#[test]
fn waits_are_never_negative() {
    for seed in 0..25 {
        let mut sim =
            Simulation::new(SimulationConfig::default(), RngSampler::seeded(seed)).unwrap();
        let mut total = 0;
        while sim.is_running() {
            sim.step().unwrap();
            let stats = sim.statistics();
            assert!(stats.total_wait_time >= total);
            assert!(stats.max_wait_time >= 0);
            total = stats.total_wait_time;
        }
    }
}

#[test]
fn same_seed_same_summary() {
    let run = |seed| {
        let mut sim =
            Simulation::new(SimulationConfig::default(), RngSampler::seeded(seed)).unwrap();
        sim.run(&mut NullReporter).unwrap()
    };
    assert_eq!(run(1234), run(1234));
}

#[test]
fn idle_percentages_are_bounded() {
    for seed in 0..10 {
        let config =
            SimulationConfig::new(5, UniformSpec::new(7, 3), UniformSpec::new(20, 10), 5000);
        let mut sim = Simulation::new(config, RngSampler::seeded(seed)).unwrap();
        let summary = sim.run(&mut NullReporter).unwrap();
        for percent in summary.idle_percentages {
            let percent = percent.expect("clock moved past zero");
            assert!(percent <= 100);
        }
    }
}
