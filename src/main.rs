mod config;
mod scenario;

use anyhow::{bail, Result};
use clap::Parser;
use config::{LarderConfig, DEFAULT_CONFIG_PATH};
use scenario::Scenario;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless driver for the larder inventory and cooking engines", long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Item catalog JSON (overrides the config file)
    #[arg(long)]
    items: Option<PathBuf>,

    /// Cooking recipe JSON (overrides the config file)
    #[arg(long)]
    cooking_recipes: Option<PathBuf>,

    /// Crafting recipe JSON (overrides the config file)
    #[arg(long)]
    crafting_recipes: Option<PathBuf>,

    /// Scenario to run
    #[arg(short, long, value_enum, default_value_t = Scenario::All)]
    scenario: Scenario,

    /// Number of advance() calls per cooking phase
    #[arg(long, default_value_t = 30)]
    ticks: u32,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    info!("Starting larder v{}", env!("CARGO_PKG_VERSION"));

    let mut config = LarderConfig::load_from_path(&args.config);
    if args.items.is_some() {
        config.items_path = args.items;
    }
    if args.cooking_recipes.is_some() {
        config.cooking_recipes_path = args.cooking_recipes;
    }
    if args.crafting_recipes.is_some() {
        config.crafting_recipes_path = args.crafting_recipes;
    }
    if !(config.tick_seconds > 0.0) {
        bail!("tick_seconds must be positive, got {}", config.tick_seconds);
    }

    let catalogs = config::load_catalogs(&config)?;
    info!(
        items = catalogs.items.len(),
        cooking_recipes = catalogs.cooking.len(),
        crafting_recipes = catalogs.crafting.len(),
        "catalogs loaded"
    );

    scenario::run(args.scenario, &catalogs, &config, args.ticks)
}
