//! xsmall — smallest example for rumor_grid.
//!
//! Simulates half an hour of traffic across a synthetic 3 × 3 downtown grid
//! inspired by Mobile, Alabama.  Rumors about named streets are offered every
//! 50 s; believers steer around the rumored street one edge ahead, while the
//! signal-controlled junctions' power buses fail and recover at random.
//!
//! ```text
//! cargo run -p xsmall               # built-in parameters
//! cargo run -p xsmall -- run.toml   # parameters from a TOML file
//! RUST_LOG=debug cargo run -p xsmall
//! ```

mod classifier;
mod network;
mod traffic;

use std::path::Path;
use std::time::Instant;

use anyhow::{Result, anyhow};
use tracing::info;
use tracing_subscriber::{EnvFilter, prelude::*};

use rg_core::{ContagionParams, SimConfig};
use rg_graph::{DijkstraRouter, PopulationGraph};
use rg_output::{CsvWriter, OutputWriter, SimOutputObserver};
use rg_power::ConnectivitySolver;
use rg_sim::{PowerSnapshot, PromptPool, RunSummary, SimBuilder, SimObserver, TickReport};

use classifier::KeywordClassifier;
use network::build_network;
use traffic::LoopTraffic;

// ── Constants ─────────────────────────────────────────────────────────────────

const POPULATION:   usize = 40;
const SEED:         u64   = 42;
const SIM_SECS:     u64   = 1_800;
const DEPART_EVERY: u64   = 15;
const OUTPUT_DIR:   &str  = "output/xsmall";

const PROMPTS: [&str; 5] = [
    "Active shooter reported near Dauphin St",
    "Huge traffic jam on Royal St, avoid it",
    "Lovely parade on Water St today",
    "Fire trucks blocking Government St",
    "Car crash at Conception St, lanes closed",
];

/// Corner-to-corner trips, each named by its first and last edge.
const TRIPS: [(&str, &str); 4] = [
    ("r0c0", "c2r1"),
    ("-c2r1", "-r0c0"),
    ("c0r0", "r2c1"),
    ("-r2c1", "-c0r0"),
];

// ── Observer wrapper to count rows ────────────────────────────────────────────

struct CountingObserver<W: OutputWriter> {
    inner:        SimOutputObserver<W>,
    bus_rows:     usize,
    summary_rows: usize,
    rerouted:     usize,
    rumors:       usize,
}

impl<W: OutputWriter> CountingObserver<W> {
    fn new(inner: SimOutputObserver<W>) -> Self {
        Self { inner, bus_rows: 0, summary_rows: 0, rerouted: 0, rumors: 0 }
    }
}

impl<W: OutputWriter> SimObserver for CountingObserver<W> {
    fn on_tick_end(&mut self, report: &TickReport) {
        self.summary_rows += 1;
        self.rerouted += report.rerouted;
        self.rumors += report.rumor.as_ref().is_some_and(|r| r.is_accepted()) as usize;
        self.inner.on_tick_end(report);
    }

    fn on_snapshot(&mut self, tick: rg_core::Tick, power: &PowerSnapshot<'_>) {
        self.bus_rows += power.topology.bus_count();
        self.inner.on_snapshot(tick, power);
    }

    fn on_sim_end(&mut self, final_tick: rg_core::Tick, summary: &RunSummary) {
        self.inner.on_sim_end(final_tick, summary);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // 1. Configuration: a TOML file if given, built-in parameters otherwise.
    let config = match std::env::args().nth(1) {
        Some(path) => SimConfig::load(Path::new(&path))?,
        None => SimConfig {
            start_unix_secs:       1_700_000_000, // fixed reference Monday 00:00 UTC
            total_ticks:           SIM_SECS,
            seed:                  SEED,
            output_interval_ticks: 60,
            contagion: ContagionParams { step_interval_ticks: 50, ..ContagionParams::default() },
            ..SimConfig::default()
        },
    };
    info!(ticks = config.total_ticks, seed = config.seed, population = POPULATION, "xsmall starting");

    // 2. Road network and traffic.
    let network = build_network()?;
    info!(nodes = network.node_count(), edges = network.edge_count(), "road network built");
    let traffic = LoopTraffic::new(&network, &DijkstraRouter, &TRIPS, DEPART_EVERY)
        .map_err(|e| anyhow!("traffic setup failed: {e}"))?;

    // 3. Build sim.  The power topology is derived from the signalled junctions.
    let population = PopulationGraph::complete(POPULATION)?;
    let mut sim = SimBuilder::new(config.clone(), network, population, traffic, DijkstraRouter)
        .classifier(Box::new(KeywordClassifier))
        .feed(Box::new(PromptPool::new(PROMPTS)))
        .power_flow(Box::new(ConnectivitySolver))
        .build()?;
    info!(
        buses    = sim.failures.topology().bus_count(),
        branches = sim.failures.topology().branch_count(),
        "power topology derived"
    );

    // 4. Set up output.
    std::fs::create_dir_all(OUTPUT_DIR)?;
    let writer = CsvWriter::new(Path::new(OUTPUT_DIR))?;
    let mut obs = CountingObserver::new(SimOutputObserver::new(writer, &config));

    // 5. Run.
    let t0 = Instant::now();
    sim.run(&mut obs)?;
    let elapsed = t0.elapsed();

    if let Some(e) = obs.inner.take_error() {
        eprintln!("output error: {e}");
    }

    // 6. Summary.
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("  vehicles launched   : {}", sim.traffic.launched());
    println!("  rumors accepted     : {}", obs.rumors);
    println!("  reroutes            : {}", obs.rerouted);
    println!("  tick_summaries.csv  : {} rows", obs.summary_rows);
    println!("  bus_states.csv      : {} rows", obs.bus_rows);
    println!();

    println!("{:<6} {:<44} {:>6} {:>9} {:>9}", "Rumor", "Label", "Steps", "Believed", "Complete");
    println!("{}", "-".repeat(78));
    for r in sim.contagion.summaries() {
        println!(
            "{:<6} {:<44} {:>6} {:>9} {:>9}",
            r.id.0,
            r.label,
            r.steps,
            r.infected + r.recovered,
            if r.complete { "yes" } else { "no" },
        );
    }

    Ok(())
}
