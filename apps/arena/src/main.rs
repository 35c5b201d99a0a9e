//! arena — runs a population of sandboxed behavior scripts in a 2D world.
//!
//! Every `*.rhai` file in the behavior directory defines one actor type.
//! Actors are spawned at random positions, stepped once per tick, and each
//! actor's snapshot is written to stdout as a JSON line the moment it is
//! processed.  Logs (including script `log` output) go to stderr; tune them
//! with `RUST_LOG`, e.g. `RUST_LOG=arena::script=info,arena_sim=debug`.

// Counts heap bytes per thread so each sandbox's memory quota is enforced.
#[global_allocator]
static GLOBAL: arena_sandbox::CountingAllocator = arena_sandbox::CountingAllocator;

mod setup;

use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use arena_output::{CsvWriter, JsonLinesBroadcaster, SimOutputObserver};
use arena_sim::SimBuilder;

use setup::{DEFAULT_SPAWNS, load_behaviors, load_config, parse_spawn};

#[derive(Parser, Debug)]
#[command(
    name = "arena",
    version,
    about = "Run sandboxed actor behavior scripts and stream snapshots as JSON lines"
)]
struct Cli {
    /// Directory of `*.rhai` behavior scripts; each file's stem names a type.
    #[arg(long, default_value = "apps/arena/behaviors")]
    behaviors: PathBuf,

    /// Actors to create as TYPE=COUNT.  Repeatable.  Default: actor1=18 actor2=9.
    #[arg(long = "spawn", value_name = "TYPE=COUNT", value_parser = parse_spawn)]
    spawns: Vec<(String, usize)>,

    /// JSON world configuration.  Missing fields keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Stop after this many ticks (overrides the config file).
    #[arg(long)]
    ticks: Option<u64>,

    /// Placement seed (overrides the config file).
    #[arg(long)]
    seed: Option<u64>,

    /// Also record snapshots, faults, and tick summaries as CSV here.
    #[arg(long)]
    csv_dir: Option<PathBuf>,

    /// Run sweeps back to back instead of once per tick period.
    #[arg(long)]
    unpaced: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    // ── Configuration ─────────────────────────────────────────────────────
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(ticks) = cli.ticks {
        config.total_ticks = Some(ticks);
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if cli.unpaced {
        config.tick_period_ms = 0;
    }

    // ── World ─────────────────────────────────────────────────────────────
    let behaviors = load_behaviors(&cli.behaviors)?;
    let spawns: Vec<(String, usize)> = if cli.spawns.is_empty() {
        DEFAULT_SPAWNS.iter().map(|&(t, n)| (t.to_string(), n)).collect()
    } else {
        cli.spawns
    };

    let mut builder = SimBuilder::new(config.clone());
    for (name, source) in &behaviors {
        builder = builder.behavior(name.as_str(), source.as_str());
    }
    for (name, count) in &spawns {
        builder = builder.spawn(name.as_str(), *count);
    }
    let mut sim = builder.build().context("building the world")?;

    info!(
        actors = sim.actors().len(),
        behaviors = ?behaviors.iter().map(|(n, _)| n.as_str()).collect::<Vec<_>>(),
        width = config.bounds.width,
        height = config.bounds.height,
        tick_period_ms = config.tick_period_ms,
        total_ticks = ?config.total_ticks,
        "arena ready"
    );

    // ── Observers ─────────────────────────────────────────────────────────
    let mut stream = JsonLinesBroadcaster::new(BufWriter::new(io::stdout().lock()));
    let mut history = match &cli.csv_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating {}", dir.display()))?;
            let writer = CsvWriter::new(dir)
                .with_context(|| format!("opening CSV output in {}", dir.display()))?;
            Some(SimOutputObserver::new(writer))
        }
        None => None,
    };

    // ── Run ───────────────────────────────────────────────────────────────
    let t0 = Instant::now();
    sim.run(&mut (&mut stream, &mut history));

    let crashes: u64 = sim.actors().iter().map(|r| r.crash_count()).sum();
    info!(
        ticks = sim.current_tick().0,
        snapshots = stream.sent(),
        crashes,
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "arena finished"
    );

    if let Some(e) = stream.take_error() {
        warn!("snapshot stream error: {e}");
    }
    if let Some(e) = history.as_mut().and_then(SimOutputObserver::take_error) {
        return Err(e).context("writing CSV history");
    }
    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
