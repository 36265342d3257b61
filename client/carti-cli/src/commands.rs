use crate::tab_commands::TabCommands;

use carti_session::registration::DATE_OF_BIRTH_FORMAT;
use chrono::NaiveDate;
use clap::Subcommand;

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Create an account and its profile
    Register {
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone_number: String,
        /// Date of birth, dd/mm/yyyy
        #[arg(long, value_parser = parse_date_of_birth)]
        date_of_birth: NaiveDate,
        #[arg(long, env = "CARTI_PASSWORD", hide_env_values = true)]
        password: String,
        /// Defaults to --password
        #[arg(long)]
        confirm_password: Option<String>,
    },

    /// Sign in with email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "CARTI_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Sign out and forget the cached profile
    Logout,

    /// Show the current session and profile
    Whoami,

    /// Change fields of the signed-in user's profile
    UpdateProfile {
        #[arg(long)]
        full_name: Option<String>,
        #[arg(long)]
        phone_number: Option<String>,
        /// Date of birth, dd/mm/yyyy
        #[arg(long, value_parser = parse_date_of_birth)]
        date_of_birth: Option<NaiveDate>,
        /// Avatar image URL
        #[arg(long)]
        avatar: Option<String>,
    },

    /// Re-read the profile from the backend
    Refresh,

    /// Email a password reset link
    ResetPassword {
        #[arg(long)]
        email: String,
    },

    /// Best sellers, banners and recommendations of the home screen
    Home,

    /// Brand tab catalog
    Tab {
        #[command(subcommand)]
        action: TabCommands,
    },
}

pub(crate) fn parse_date_of_birth(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), DATE_OF_BIRTH_FORMAT)
        .map_err(|e| format!("expected dd/mm/yyyy, got '{value}': {e}"))
}
