//! Shared types for the pillbox application.
//!
//! This module contains the crate-wide Result alias and the CLI
//! subcommand definitions.
use clap::Subcommand;

use crate::PillboxError;

/// A specialized Result type for pillbox operations.
pub type Result<T> = std::result::Result<T, PillboxError>;

/// Available subcommands for the pillbox application
#[derive(Subcommand)]
pub enum Commands {
    /// Add a new reminder
    Add {
        /// Name of the medication
        #[clap(short, long)]
        name: String,

        /// Time of day the alarm fires (24-hour HH:MM)
        #[clap(short, long)]
        time: String,

        /// Optional free-text note
        #[clap(short = 'N', long)]
        note: Option<String>,
    },

    /// List all reminders sorted by time
    List,

    /// Delete a reminder by id
    Delete {
        /// Id of the reminder to delete
        id: i64,

        /// Skip confirmation prompt
        #[clap(short, long)]
        force: bool,
    },

    /// Run the watch loop: check for due reminders and raise alarms
    Watch,
}
