// Launch configuration from the command line

use clap::Parser;
use std::path::PathBuf;

/// Window and startup options
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "ball-drop", version, about = "Tap the ball to push it up")]
pub struct LaunchConfig {
    /// Window title
    #[arg(long, default_value = "Valve 3")]
    pub title: String,

    /// Window width in logical pixels
    #[arg(long, default_value_t = 800)]
    pub width: u32,

    /// Window height in logical pixels
    #[arg(long, default_value_t = 600)]
    pub height: u32,

    /// Render on a software (fallback) adapter instead of the GPU
    #[arg(long)]
    pub software: bool,

    /// Directory holding the `textures/` folder
    #[arg(long, default_value = "assets")]
    pub assets: PathBuf,
}
