use crate::commands::Commands;

use carti_config::LogLevel;
use clap::Parser;

#[derive(Parser)]
#[command(name = "carti")]
#[command(about = "Carti account and catalog client")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub(crate) command: Commands,

    /// Override the configured log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true)]
    pub(crate) log_level: Option<LogLevel>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,
}
