use anyhow::Result;
use clap::Parser;
use log::info;

mod app;
mod config;
mod core;
mod engine;
mod game;

use config::LaunchConfig;

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let config = LaunchConfig::parse();
    info!("Starting {} ({}x{})", config.title, config.width, config.height);

    app::run(config)
}
