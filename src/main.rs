use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use gridtown::save::{self, SnapshotWriter};
use gridtown::scenario::ScenarioLoader;

#[derive(Debug, Parser)]
#[command(author, version, about = "gridtown headless simulation runner")]
struct Cli {
    /// Path to the scenario YAML file
    #[arg(long, default_value = "scenarios/little_harbor.yaml")]
    scenario: PathBuf,

    /// Override tick count (uses scenario default when omitted)
    #[arg(long)]
    ticks: Option<u64>,

    /// Override the scenario's random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override snapshot interval in ticks (0 disables)
    #[arg(long)]
    snapshot_interval: Option<u64>,

    /// Directory for periodic snapshots
    #[arg(long, default_value = "snapshots")]
    snapshot_dir: PathBuf,

    /// Write a final save file here after the run
    #[arg(long)]
    save: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let loader = ScenarioLoader::new(".");
    let mut scenario = loader.load(&cli.scenario)?;
    if let Some(seed) = cli.seed {
        scenario.seed = seed;
    }
    let ticks = scenario.ticks(cli.ticks);
    let snapshot_interval = cli
        .snapshot_interval
        .unwrap_or(scenario.snapshot_interval_ticks);
    let writer = SnapshotWriter::new(&cli.snapshot_dir, snapshot_interval);

    let mut session = scenario.build_session()?;
    info!(
        scenario = %scenario.name,
        seed = scenario.seed,
        ticks,
        "starting run"
    );

    for _ in 0..ticks {
        let summary = session.tick()?;
        debug!(
            day = summary.day,
            income = summary.income,
            population = summary.population,
            "tick complete"
        );
        if let Some(path) = writer.maybe_write(session.state())? {
            info!(path = %path.display(), "snapshot written");
        }
    }

    if let Some(path) = &cli.save {
        save::write_save(path, session.state())?;
        info!(path = %path.display(), "save written");
    }

    let stats = session.stats();
    println!(
        "Scenario '{}' completed after {} ticks. Day {}, population {}, treasury {}, happiness {}.",
        scenario.name, ticks, stats.day, stats.population, stats.money, stats.happiness
    );
    Ok(())
}
