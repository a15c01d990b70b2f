//! Terminal medication reminder library
//!
//! This library provides functionality for keeping a small collection of
//! timed medication reminders, checking them on a background cadence, and
//! raising a bounded alarm when one comes due.

mod alarm;
mod cache;
mod cli;
mod config;
mod errors;
mod persist;
pub mod reminder;
pub mod render;
mod store;
mod ticker;
mod types;

// Re-export key components
pub use alarm::*;
pub use cache::*;
pub use cli::*;
pub use config::*;
pub use errors::*;
pub use persist::*;
pub use reminder::Reminder;
pub use store::*;
pub use ticker::*;
pub use types::*;
