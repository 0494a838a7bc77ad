use std::path::PathBuf;

use anyhow::Context;
use forest_walk::{AtlasSet, GameConfig, GameLoop, LoopState, MacroquadPlatform};
use macroquad::prelude::*;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn config_path() -> Option<PathBuf> {
    std::env::args_os().nth(1).map(PathBuf::from)
}

fn read_config() -> anyhow::Result<GameConfig> {
    match config_path() {
        Some(path) => GameConfig::load(&path)
            .with_context(|| format!("Loading config {}", path.display())),
        None => Ok(GameConfig::default()),
    }
}

// Runs before logging exists, so a bad config falls back to default window
// settings here. `run` reads the config again and reports the error.
fn window_conf() -> Conf {
    let window = read_config().unwrap_or_default().window;
    Conf {
        window_title: window.title,
        window_width: window.width as i32,
        window_height: window.height as i32,
        ..Default::default()
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn run() -> anyhow::Result<()> {
    let config = read_config()?;
    if config_path().is_none() {
        info!("no config file given, using defaults");
    }

    let map = config.map.build().context("Loading map")?;
    let mut platform = MacroquadPlatform::load(&config)
        .await
        .context("Loading assets")?;
    let atlases = AtlasSet::new(config.tiles.tile_size, |key| platform.atlas_size(key))
        .context("Resolving tile atlases")?;

    let mut game = GameLoop::new(map, atlases, &config);
    while game.step(&mut platform) == LoopState::Running {
        next_frame().await;
    }

    drop(platform);
    info!("bye");
    Ok(())
}

#[macroquad::main(window_conf)]
async fn main() {
    init_tracing();
    info!("=== Forest game startup ===");

    if let Err(err) = run().await {
        error!("{err:#}");
        std::process::exit(1);
    }
}
