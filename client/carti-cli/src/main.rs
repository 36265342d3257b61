//! carti - Carti account and catalog CLI
//!
//! # Examples
//!
//! ```bash
//! # Sign in, then show the session and profile
//! CARTI_PASSWORD=secret carti login --email alice@example.com
//! carti whoami --pretty
//!
//! # Change the phone number
//! carti update-profile --phone-number 555-1234
//!
//! # Home screen lists
//! carti home --pretty
//!
//! # Featured products of the active brand tab
//! carti tab featured best-sellers
//! ```

use carti_cli::Cli;

use std::process::ExitCode;

use clap::Parser;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let pretty = cli.pretty;

    match carti_cli::run(cli).await {
        Ok(value) => {
            let output = if pretty {
                serde_json::to_string_pretty(&value)
            } else {
                serde_json::to_string(&value)
            };

            match output {
                Ok(json) => {
                    println!("{json}");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Error serializing response: {e}");
                    ExitCode::FAILURE
                }
            }
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
