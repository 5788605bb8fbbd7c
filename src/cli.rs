use std::path::PathBuf;

use clap::{Parser, Subcommand};
pub use clap_complete;

use crate::logging::LogLevel;

#[derive(Parser)]
#[command(
    name = "marstime",
    version,
    about = "What time is it on Mars?",
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Convert this UTC instant instead of now: Unix seconds or YYYY-MM-DD[THH:MM[:SS]]
    #[arg(long, global = true, allow_hyphen_values = true, value_parser = crate::time_utils::parse_utc)]
    pub at: Option<f64>,

    /// Time zone to display (see `marstime zones`); defaults to the configured zone
    #[arg(short, long, global = true)]
    pub zone: Option<String>,

    /// Show local mean solar time at this longitude (degrees west) instead of a named zone
    #[arg(long, global = true, allow_hyphen_values = true, conflicts_with = "zone")]
    pub longitude: Option<f64>,

    /// Leap second list to read (NTP `leap-seconds.list` format)
    #[arg(long, global = true)]
    pub leap_file: Option<PathBuf>,

    /// Log level for diagnostics on stderr (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<LogLevel>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the current time in every known zone
    All,
    /// Show every step of the conversion (TAI, TT, J2000, MSD, Ls, ...)
    Detail {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the known time zones
    Zones,
    /// Inspect or refresh the leap second table
    Leap {
        #[command(subcommand)]
        command: LeapCommand,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
pub enum LeapCommand {
    /// Show when the table was published, when it expires, and its entries
    Info,
    /// Download the latest leap second list into the data directory
    Update {
        /// Where to download from
        #[arg(long, default_value = crate::leap_update::LEAP_LIST_URL)]
        url: String,
    },
}
