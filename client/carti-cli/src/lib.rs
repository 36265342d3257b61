//! carti - command-line client for the Carti account and catalog backend.
//!
//! Every command opens the configured backend, follows the session for the
//! duration of the command and prints a JSON result.

pub(crate) mod app;
pub(crate) mod cli;
pub(crate) mod commands;
pub(crate) mod error;
pub(crate) mod logger;
pub(crate) mod tab_commands;


pub use cli::Cli;
pub use error::{CliError, Result};

use app::App;
use carti_config::Config;
use log::LevelFilter;
use serde_json::Value;

/// Load configuration, initialize logging and run the parsed command.
pub async fn run(cli: Cli) -> Result<Value> {
    let config = Config::load()?;
    config.validate()?;

    let level = cli
        .log_level
        .map_or(config.logging.level.0, LevelFilter::from);
    logger::initialize(level, config.log_file_path()?, config.logging.colored)?;
    config.log_summary();

    let app = App::open(&config).await?;
    app.run(cli.command).await
}
