use std::path::{Path, PathBuf};

use astragal::prelude::*;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Dice notation, one pool per argument (e.g. 4d6L, -1d4, 2d{HT})
    #[arg(value_name = "NOTATION", allow_hyphen_values = true)]
    notation: Vec<String>,

    /// JSON file holding one options object or an array of them
    #[arg(short, long, value_name = "FILE")]
    options: Option<PathBuf>,

    /// Random seed for reproducibility
    #[arg(long, default_value = None)]
    seed: Option<u64>,

    /// Print the combined result as JSON
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Log every pool and modifier stage
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn load_options(path: &Path) -> anyhow::Result<Vec<RollArgument>> {
    log::info!("Loading roll options from {}", path.display());
    let file = std::fs::File::open(path)?;
    let reader = std::io::BufReader::new(file);
    let value: serde_json::Value = serde_json::from_reader(reader)?;

    let values = match value {
        serde_json::Value::Array(values) => values,
        value => vec![value],
    };
    let options = values
        .into_iter()
        .map(|value| RollOptions::from_json(value).map(RollArgument::Options))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(options)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .format_timestamp_secs()
        .filter_level(level)
        .parse_default_env()
        .init();
    log::debug!("Rolling with args: {:?}", args);

    let mut pools: Vec<RollArgument> = args
        .notation
        .iter()
        .map(|notation| RollArgument::from(notation.as_str()))
        .collect();
    if let Some(path) = &args.options {
        pools.extend(load_options(path)?);
    }
    if pools.is_empty() {
        anyhow::bail!("Nothing to roll: pass at least one notation or --options FILE");
    }

    let mut roller = match args.seed {
        Some(seed) => Roller::from_seed(seed),
        None => Roller::new(),
    };
    let result = roll_with(&mut roller, pools)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        let mut buf = String::new();
        result.pretty_print(&mut buf)?;
        println!("{buf}");
    }

    Ok(())
}
