use anyhow::{Context, Result};
use clap::Parser;
use predators_lib::app::App;
use predators_lib::model::metrics::init_logging;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file path (TOML); defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the default configuration to this path and exit
    #[arg(long)]
    write_config: Option<PathBuf>,

    /// Number of ticks to run
    #[arg(short, long, default_value_t = 1000)]
    ticks: u64,

    /// Seed for a reproducible run (overrides the config file)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Eggs scattered at random before the first tick
    #[arg(long, default_value_t = 60)]
    eggs: usize,

    /// Food items scattered at random before the first tick
    #[arg(long, default_value_t = 120)]
    food: usize,

    /// Print the final grid as ASCII
    #[arg(long)]
    print_grid: bool,

    /// Print the final summary as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging();

    if let Some(path) = args.write_config.as_deref() {
        App::write_default_config(path)?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(());
    }

    let mut config = App::load_config(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.world.seed = Some(seed);
    }

    let mut app = App::new(config)?;
    app.config_path = args.config.clone();
    let (eggs, food) = app.seed_random(args.eggs, args.food);
    tracing::info!(eggs, food, ticks = args.ticks, "Starting headless run");

    let summary = app.run(args.ticks);

    if args.print_grid {
        print!("{}", app.world.snapshot_grid().to_ascii());
    }
    if args.json {
        let json = serde_json::to_string_pretty(&summary).context("failed to encode summary")?;
        println!("{json}");
    } else {
        let stats = &summary.stats;
        println!(
            "cycle {} | population {} | eggs {} | food {} | groups {} | coop p {:.2} | max hunger {} | max age {}",
            stats.cycle,
            stats.population,
            stats.unhatched_eggs,
            stats.food_count,
            stats.group_count,
            stats.coop_probability,
            stats.max_hunger,
            stats.max_age
        );
        if summary.extinct {
            println!("Population went extinct after {} ticks.", summary.ticks_run);
        }
    }
    Ok(())
}
