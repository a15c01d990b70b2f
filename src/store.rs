//! In-memory reminder collection and its mutation API.
//!
//! The store is the sole owner of the collection: every write path goes
//! through a method here, and every mutation re-persists the whole
//! collection through the persistence adapter before returning. Readers
//! get clones, never references into the collection.

use log::{info, warn};

use crate::{
    reminder::{clock_of, day_of, is_valid_time},
    JsonStore, PillboxError, Reminder, Result,
};

/// Manages the reminder collection, backed by a [`JsonStore`].
pub struct ReminderStore {
    /// Persistence adapter for the collection
    persist: JsonStore,

    /// The collection, kept sorted ascending by time string
    reminders: Vec<Reminder>,
}

impl ReminderStore {
    /// Opens the store, loading any previously persisted collection.
    /// Missing or malformed data starts the store empty; this never fails.
    pub fn open(persist: JsonStore) -> Self {
        let mut reminders = persist.load();
        if reminders.is_empty() {
            info!("Starting with an empty reminder collection");
        } else {
            info!("Loaded {} reminder(s)", reminders.len());
        }
        sort_by_time(&mut reminders);
        Self { persist, reminders }
    }

    /// The current collection, ascending by time (stable for ties).
    pub fn reminders(&self) -> &[Reminder] {
        &self.reminders
    }

    pub fn len(&self) -> usize {
        self.reminders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reminders.is_empty()
    }

    /// Returns a copy of the reminder with the given id, if present.
    pub fn get(&self, id: i64) -> Option<Reminder> {
        self.reminders.iter().find(|r| r.id == id).cloned()
    }

    /// Creates a reminder with a fresh unique id and a clear fired marker,
    /// appends it and persists the collection.
    pub fn add(&mut self, name: String, time: String, note: Option<String>) -> Result<Reminder> {
        if name.trim().is_empty() {
            return Err(PillboxError::EmptyName);
        }
        if !is_valid_time(&time) {
            return Err(PillboxError::InvalidTime { value: time });
        }

        let mut reminder = Reminder::new(name, time, note.filter(|n| !n.trim().is_empty()));
        // Two adds within the same millisecond would collide; bump until
        // the id is unique in the collection
        while self.reminders.iter().any(|r| r.id == reminder.id) {
            reminder.id += 1;
        }

        self.reminders.push(reminder.clone());
        sort_by_time(&mut self.reminders);
        self.persist.save(&self.reminders)?;
        info!("Added reminder {} ({})", reminder.name, reminder.id);
        Ok(reminder)
    }

    /// Removes the reminder with the given id. Removing an absent id is a
    /// no-op; either way the collection is re-persisted.
    pub fn remove(&mut self, id: i64) -> Result<()> {
        let before = self.reminders.len();
        self.reminders.retain(|r| r.id != id);
        if self.reminders.len() == before {
            warn!("Delete requested for unknown reminder id {}", id);
        } else {
            info!("Removed reminder {}", id);
        }
        self.persist.save(&self.reminders)
    }

    /// Returns copies of the reminders that are due at `now`: their time
    /// equals the current "HH:MM" reading and they have not already fired
    /// on the current day. Exact equality at minute granularity; a
    /// reminder only fires within the minute the clock matches.
    pub fn find_due(&self, now: chrono::NaiveDateTime) -> Vec<Reminder> {
        let clock = clock_of(now);
        let today = day_of(now);
        self.reminders
            .iter()
            .filter(|r| r.time == clock && r.last_fired.as_deref() != Some(today.as_str()))
            .cloned()
            .collect()
    }

    /// Records that the reminder fired on `day_id`, so it is excluded
    /// from due checks for the rest of that day, and persists.
    pub fn mark_fired(&mut self, id: i64, day_id: &str) -> Result<()> {
        let reminder = self
            .reminders
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(PillboxError::ReminderNotFound { id })?;
        reminder.last_fired = Some(day_id.to_string());
        self.persist.save(&self.reminders)
    }
}

/// Stable ascending sort by the "HH:MM" time string; ties keep their
/// original relative order.
fn sort_by_time(reminders: &mut [Reminder]) {
    reminders.sort_by(|a, b| a.time.cmp(&b.time));
}
