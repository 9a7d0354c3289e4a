//! Bank teller queue simulation
//!
//! Usage:
//!   cargo run --release -p bank_queue -- --config bank_queue/configs/baseline.toml --seed 42

use std::path::PathBuf;
use std::process::ExitCode;

use bank_queue::{
    ConsoleReporter, Recorder, Reporter, RngSampler, Simulation, SimulationConfig,
    SimulationError, Snapshot, Summary, Time, write_snapshots_csv, write_summary_json,
};
use clap::Parser;
use rand::Rng;

#[derive(Parser, Debug)]
#[command(
    name = "bank_queue",
    about = "Discrete-event simulation of a multi-teller bank queue."
)]
struct Cli {
    /// Path to a TOML config file (overrides defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of tellers
    #[arg(long)]
    servers: Option<usize>,

    #[arg(long)]
    arrival_mean: Option<Time>,

    #[arg(long)]
    arrival_variance: Option<Time>,

    #[arg(long)]
    service_mean: Option<Time>,

    #[arg(long)]
    service_variance: Option<Time>,

    /// Run while the clock is at or below this
    #[arg(long)]
    time_limit: Option<Time>,

    /// Seed for the random number generator (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Write every snapshot to this CSV file
    #[arg(long)]
    snapshots_csv: Option<PathBuf>,

    /// Write the final summary to this JSON file
    #[arg(long)]
    summary_json: Option<PathBuf>,

    /// Do not print the report to stdout
    #[arg(short, long)]
    quiet: bool,

    /// Debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn simulation_config(&self) -> Result<SimulationConfig, SimulationError> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("Loading configuration from {}", path.display());
                SimulationConfig::load(path)?
            }
            None => SimulationConfig::default(),
        };

        if let Some(n) = self.servers {
            config.num_servers = n;
        }
        if let Some(mean) = self.arrival_mean {
            config.arrival.mean = mean;
        }
        if let Some(variance) = self.arrival_variance {
            config.arrival.variance = variance;
        }
        if let Some(mean) = self.service_mean {
            config.service.mean = mean;
        }
        if let Some(variance) = self.service_variance {
            config.service.variance = variance;
        }
        if let Some(limit) = self.time_limit {
            config.time_limit = limit;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Fans reports out to the console and the in-memory recorder
struct Tee<'a> {
    console: Option<ConsoleReporter<std::io::Stdout>>,
    recorder: &'a mut Recorder,
}

impl Reporter for Tee<'_> {
    fn snapshot(&mut self, snapshot: &Snapshot) {
        if let Some(console) = self.console.as_mut() {
            console.snapshot(snapshot);
        }
        self.recorder.snapshot(snapshot);
    }

    fn summary(&mut self, summary: &Summary) {
        if let Some(console) = self.console.as_mut() {
            console.summary(summary);
        }
        self.recorder.summary(summary);
    }
}

fn run(cli: &Cli) -> Result<(), SimulationError> {
    let config = cli.simulation_config()?;
    let seed = cli.seed.unwrap_or_else(|| rand::rng().random());
    tracing::info!("Using seed {}", seed);

    let mut sim = Simulation::new(config, RngSampler::seeded(seed))?;
    let mut recorder = Recorder::new();
    let summary = {
        let mut reporter = Tee {
            console: (!cli.quiet).then(ConsoleReporter::stdout),
            recorder: &mut recorder,
        };
        sim.run(&mut reporter)?
    };

    if let Some(path) = &cli.snapshots_csv {
        write_snapshots_csv(path, &recorder.snapshots)?;
        tracing::info!("Wrote {} snapshots to {}", recorder.snapshots.len(), path.display());
    }
    if let Some(path) = &cli.summary_json {
        write_summary_json(path, &summary)?;
        tracing::info!("Wrote summary to {}", path.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Simulation failed: {}", e);
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
