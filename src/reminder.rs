//! Core data structures for the pillbox application.
//!
//! This module contains the primary types used throughout the application,
//! most importantly the Reminder record.
use chrono::{NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Represents a single medication reminder in our system
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reminder {
    /// Unique identifier, the creation timestamp in milliseconds
    pub id: i64,
    /// Display name of the medication
    pub name: String,
    /// Time of day the alarm fires, zero-padded 24-hour "HH:MM"
    pub time: String,
    /// Optional free-text note shown alongside the name
    pub note: Option<String>,
    /// Day identifier ("YYYY-MM-DD") of the last day the alarm fired,
    /// used to guarantee at most one trigger per reminder per day
    pub last_fired: Option<String>,
}

impl Reminder {
    /// Creates a new reminder with the given name, time and optional note.
    /// The id is the current timestamp in milliseconds.
    pub fn new(name: String, time: String, note: Option<String>) -> Self {
        Reminder {
            id: Utc::now().timestamp_millis(),
            name,
            time,
            note,
            last_fired: None,
        }
    }
}

/// Validates a wall-clock time string as zero-padded 24-hour "HH:MM".
pub fn is_valid_time(time: &str) -> bool {
    time.len() == 5 && NaiveTime::parse_from_str(time, "%H:%M").is_ok()
}

/// The clock reading "HH:MM" for a given instant, for due matching.
pub fn clock_of(now: NaiveDateTime) -> String {
    now.format("%H:%M").to_string()
}

/// The day identifier "YYYY-MM-DD" for a given instant.
pub fn day_of(now: NaiveDateTime) -> String {
    now.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_validation() {
        assert!(is_valid_time("00:00"));
        assert!(is_valid_time("08:30"));
        assert!(is_valid_time("23:59"));
        assert!(!is_valid_time("24:00"));
        assert!(!is_valid_time("8:30"));
        assert!(!is_valid_time("08:60"));
        assert!(!is_valid_time("0830"));
        assert!(!is_valid_time(""));
    }

    #[test]
    fn clock_and_day_formatting() {
        let now = NaiveDateTime::parse_from_str("2024-03-05 07:05:59", "%Y-%m-%d %H:%M:%S")
            .unwrap();
        assert_eq!(clock_of(now), "07:05");
        assert_eq!(day_of(now), "2024-03-05");
    }
}
