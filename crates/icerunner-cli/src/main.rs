use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, warn};

use icerunner_core::config::{ConfigLoadError, IceRunnerConfig};
use icerunner_core::{DeckSettings, PhysicsManager};
use icerunner_scripting::DeckLoader;

mod logging;

#[derive(Parser)]
#[command(version, about = "Run an Ice Runner deck script", long_about = None)]
pub struct Cli {
    /// Deck script to run (overrides [deck].script from the config file)
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Config file to use instead of the platform default
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enables debug logging; repeat for trace
    #[arg(short, long, action = clap::ArgAction::Count)]
    debug: u8,
}

/// Load config, falling back to defaults when there is no file
fn load_config(path: Option<&Path>) -> Result<IceRunnerConfig> {
    let result = match path {
        Some(path) => IceRunnerConfig::load_from(path),
        None => IceRunnerConfig::load(),
    };

    match result {
        Ok(config) => Ok(config),
        Err(ConfigLoadError::NotFound(_) | ConfigLoadError::NoConfigDir) => {
            Ok(IceRunnerConfig::default())
        }
        Err(e) => Err(e).context("Failed to load config"),
    }
}

fn log_deck(deck: &DeckSettings) {
    if deck.is_empty() {
        warn!("Deck script registered no map factories");
        return;
    }

    for (difficulty, factory) in deck.factories() {
        let dimensions = factory.map_kit().dimensions();
        info!(
            "Difficulty {}: {}x{} map, {} walls, map color {}, player color {}",
            difficulty,
            dimensions.num_rows,
            dimensions.num_columns,
            factory.map_kit().wall_count(),
            factory.map_color(),
            factory.player_color()
        );
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    let _guard = logging::init_logging(config.logging.file, cli.debug)
        .context("Failed to initialize logging")?;

    if let Some(script) = cli.script {
        config.deck.script = script;
    }

    info!("Starting Ice Runner with deck {}", config.deck.script.display());

    let mut loader = DeckLoader::from_config(&config.deck);
    loader
        .init()
        .context("Failed to initialize deck script engine")?;
    if let Err(e) = loader.configure() {
        bail!(
            "Deck script {} failed: {}",
            loader.script_path().display(),
            e
        );
    }
    loader.shutdown();

    log_deck(&loader.deck_settings());

    let mut physics = PhysicsManager::new();
    if !physics.init() {
        bail!("Failed to initialize physics");
    }
    physics.simulate();

    if let Err(e) = loader.load() {
        warn!("Maps were not built: {}", e);
    }

    Ok(())
}
