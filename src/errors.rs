//! Error types for the pillbox application.
//!
//! This module defines custom error types that categorize different failures
//! that can occur while managing reminders.

use std::{io, path::PathBuf};

use thiserror::Error;

/// The main error type for the pillbox application.
#[derive(Error, Debug)]
pub enum PillboxError {
    /// Errors related to file I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Errors related to serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A reminder name was empty or all whitespace.
    #[error("Reminder name must not be empty")]
    EmptyName,

    /// A reminder time was not a valid zero-padded 24-hour HH:MM value.
    #[error("Invalid reminder time: {value} (expected HH:MM, 24-hour)")]
    InvalidTime { value: String },

    /// Reminder was not found when performing an operation.
    #[error("Reminder not found: {id}")]
    ReminderNotFound { id: i64 },

    /// Directory creation or access failed.
    #[error("Failed to create or access directory: {path}")]
    DirectoryError { path: PathBuf },

    /// A cached asset was requested but exists neither in the cache nor
    /// at the origin.
    #[error("Asset not available: {name}")]
    AssetMissing { name: String },

    /// Errors related to configuration.
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Generic application error with a custom message.
    #[error("{message}")]
    ApplicationError { message: String },
}
