//! Command-line surface of the `fleetwatch` binary.

mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

pub use commands::run;

#[derive(Debug, Parser)]
#[command(
    name = "fleetwatch",
    version,
    about = "Delivery back-office client with live driver tracking"
)]
pub struct Cli {
    /// Base URL of the delivery REST API
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// URL of the server-sent events stream with driver positions
    #[arg(long, global = true)]
    pub push_url: Option<String>,

    /// Session file holding the bearer token
    #[arg(long, global = true)]
    pub session: Option<PathBuf>,

    /// Config file (defaults to <config_dir>/fleetwatch/config.json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in with a phone number and one-time code
    Login {
        #[command(subcommand)]
        action: LoginAction,
    },
    /// Forget the stored session token
    Logout,
    /// Manage delivery drivers
    Drivers {
        #[command(subcommand)]
        action: DriversAction,
    },
    /// Follow driver positions live until interrupted
    Track {
        /// Print map markers instead of the full roster table
        #[arg(long)]
        markers: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum LoginAction {
    /// Ask the server to text a code to this phone
    Send {
        #[arg(long)]
        phone: String,
    },
    /// Exchange the code for a session token and store it
    Verify {
        #[arg(long)]
        phone: String,
        #[arg(long)]
        code: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum DriversAction {
    /// Print all drivers
    List {
        /// Re-fetch on the configured interval until interrupted
        #[arg(long)]
        follow: bool,
    },
    /// Create a driver
    Add(DriverArgs),
    /// Replace a driver's details
    Update {
        id: String,
        #[command(flatten)]
        details: DriverArgs,
    },
    /// Delete a driver
    Delete { id: String },
}

#[derive(Debug, Clone, Args)]
pub struct DriverArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long, default_value = "")]
    pub phone: String,
    #[arg(long, default_value = "")]
    pub vehicle: String,
    #[arg(long, default_value = "available")]
    pub status: String,
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    pub lat: String,
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    pub lng: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_driver_update_with_negative_longitude() {
        let cli = Cli::try_parse_from([
            "fleetwatch",
            "drivers",
            "update",
            "abc",
            "--name",
            "Ali",
            "--lat",
            "24.7",
            "--lng",
            "-46.6",
        ])
        .unwrap();
        match cli.command {
            Command::Drivers {
                action: DriversAction::Update { id, details },
            } => {
                assert_eq!(id, "abc");
                assert_eq!(details.lng, "-46.6");
                assert_eq!(details.status, "available");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
