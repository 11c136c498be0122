// Harptos Almanac
// Main entry point

use anyhow::Result;
use clap::Parser;
use env_logger::{Builder, Env};

use harptos_almanac::ui_cli::{self, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = ui_cli::load_settings(&cli)?;

    // RUST_LOG still wins over the configured level
    Builder::from_env(Env::default().default_filter_or(settings.log_level.as_str())).init();

    log::info!("Starting Harptos Almanac");

    ui_cli::run(cli, settings)
}
