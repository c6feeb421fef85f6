// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::Parser;

use crate::controls::ControlsMode;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "scene-viewer")]
#[command(about = "Random cube field and cloud viewer", long_about = None)]
pub struct Cli {
    /// JSON configuration file
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Camera navigation scheme
    #[arg(long, value_enum)]
    pub controls: Option<ControlsMode>,

    /// Seed for cube and scene generation
    #[arg(long)]
    pub seed: Option<u64>,

    /// Disable UI elements
    #[arg(long = "no-ui", default_value = "false")]
    pub no_ui: bool,

    /// Scale first-person movement by frame time instead of moving a fixed step per frame
    #[arg(long = "per-second", default_value = "false")]
    pub per_second: bool,
}
