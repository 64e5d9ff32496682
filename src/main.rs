use std::path::PathBuf;

use clap::Parser;
use env_logger::Env;
use log::info;
use vicinity::{Config, SearchProcess};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Query latitude in degrees
    #[arg(long, allow_hyphen_values = true)]
    latitude: f64,

    /// Query longitude in degrees
    #[arg(long, allow_hyphen_values = true)]
    longitude: f64,

    /// Search radius in meters
    #[arg(long)]
    radius: f64,

    /// Geojson source to index on a cache miss
    #[arg(long)]
    source: Option<PathBuf>,

    /// Location of the persisted index artifact
    #[arg(long)]
    cache: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut config = Config::default();
    if let Some(source) = args.source {
        config.source_path = source;
    }
    if let Some(cache) = args.cache {
        config.cache_path = cache;
    }

    let mut search = SearchProcess::new(config);
    let results = search.process(args.latitude, args.longitude, args.radius)?;

    info!(
        "{} points of interest within {} m",
        results.len(),
        args.radius
    );
    for result in &results {
        println!("{result}");
    }

    Ok(())
}
