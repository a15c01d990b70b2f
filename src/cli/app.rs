//! CLI module for the pillbox application
//!
//! This module handles the command-line interface: it dispatches each
//! user command into the reminder store's mutation API and hosts the
//! watch loop that ties the ticker, the store and the alarm controller
//! together.
use std::io::{stdin, stdout, Write};

use chrono::Local;
use log::{info, warn};
use tokio::io::AsyncBufReadExt;
use tokio::time::{sleep_until, Duration, Instant};

use crate::{
    render,
    reminder::day_of,
    AlarmController, AlarmSink, AssetCache, Commands, Config, DesktopNotifier, Notifier,
    ReminderStore, Result, TerminalAlarmSink, Ticker,
};

/// CLI application handler - processes CLI commands and interfaces with
/// the ReminderStore
pub struct App {
    /// The reminder store backend
    store: ReminderStore,

    /// Application configuration
    config: Config,

    /// Whether to display verbose output
    verbose: bool,
}

impl App {
    /// Create a new CLI application with the given store and config
    pub fn new(store: ReminderStore, config: Config, verbose: bool) -> Self {
        Self {
            store,
            config,
            verbose,
        }
    }

    /// Run the CLI application with the given command
    pub async fn run(&mut self, command: Commands) -> Result<()> {
        match command {
            Commands::Add { name, time, note } => self.handle_add(name, time, note)?,

            Commands::List => render::print_list(self.store.reminders()),

            Commands::Delete { id, force } => self.handle_delete(id, force)?,

            Commands::Watch => self.watch().await?,
        }

        Ok(())
    }

    fn handle_add(&mut self, name: String, time: String, note: Option<String>) -> Result<()> {
        let reminder = self.store.add(name, time, note)?;
        println!(
            "{} {} at {} (id {})",
            console::style("Added").green(),
            reminder.name,
            render::format_time_12h(&reminder.time),
            reminder.id
        );
        if self.verbose {
            render::print_list(self.store.reminders());
        }
        Ok(())
    }

    fn handle_delete(&mut self, id: i64, force: bool) -> Result<()> {
        // Deleting an unknown id is a no-op, but say so
        let Some(reminder) = self.store.get(id) else {
            println!("No reminder with id {}, nothing to delete.", id);
            return self.store.remove(id);
        };

        if !force {
            println!("You are about to delete the following reminder:");
            println!("Name: {}", reminder.name);
            println!("Time: {}", render::format_time_12h(&reminder.time));
            if let Some(note) = &reminder.note {
                println!("Note: {}", note);
            }

            print!("Are you sure you want to delete this reminder? [y/N]: ");
            stdout().flush()?;

            let mut input = String::new();
            stdin().read_line(&mut input)?;

            let input = input.trim().to_lowercase();
            if input != "y" && input != "yes" {
                println!("Deletion cancelled.");
                return Ok(());
            }
        }

        self.store.remove(id)?;
        println!("Reminder '{}' ({}) has been deleted.", reminder.name, id);
        Ok(())
    }

    /// The watch loop: reacts to ticker signals with a due-check pass,
    /// raises alarms for matches, and handles auto-stop and dismissal.
    /// All store mutations happen serially here.
    async fn watch(&mut self) -> Result<()> {
        // Prime the offline asset cache; a failure only costs the assets
        let cache = AssetCache::new(self.config.assets_dir.clone(), &self.config.data_dir);
        if let Err(e) = cache.install() {
            warn!("Asset cache install failed: {}", e);
        }

        let mut alarm = AlarmController::with_duration(
            TerminalAlarmSink::new(cache.alarm_banner()),
            DesktopNotifier::new(),
            Duration::from_secs(self.config.alarm_duration_secs),
        );

        let mut ticker = Ticker::start(
            Duration::from_secs(self.config.tick_interval_secs),
            Duration::from_secs(self.config.fallback_interval_secs),
        );

        render::print_list(self.store.reminders());
        println!(
            "\n{}",
            console::style("Watching for due reminders (Ctrl-C to quit)").dim()
        );

        let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
        let mut stdin_open = true;

        loop {
            let deadline = alarm.deadline();

            tokio::select! {
                _ = ticker.tick() => {
                    let now = Local::now().naive_local();
                    if fire_due(&mut self.store, &mut alarm, now) > 0 {
                        render::print_list(self.store.reminders());
                    }
                }

                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    info!("Alarm auto-stop after {}s", self.config.alarm_duration_secs);
                    alarm.stop();
                }

                line = lines.next_line(), if stdin_open => {
                    match line {
                        Ok(Some(_)) => {
                            if alarm.is_ringing() {
                                alarm.stop();
                            }
                        }
                        Ok(None) => stdin_open = false,
                        Err(e) => {
                            warn!("Failed to read stdin: {}", e);
                            stdin_open = false;
                        }
                    }
                }

                _ = tokio::signal::ctrl_c() => {
                    println!();
                    info!("Shutting down watch loop");
                    break;
                }
            }
        }

        ticker.stop();
        alarm.stop();
        Ok(())
    }
}

/// One due-check pass: raises the alarm for each match and marks it
/// fired. Returns how many reminders fired.
///
/// A persistence failure on the fired marker is logged and swallowed;
/// the in-memory marker is already set, so the reminder cannot re-fire
/// the same day in-process, and the watch loop keeps running.
fn fire_due<S: AlarmSink, N: Notifier>(
    store: &mut ReminderStore,
    alarm: &mut AlarmController<S, N>,
    now: chrono::NaiveDateTime,
) -> usize {
    let due = store.find_due(now);
    let today = day_of(now);
    for reminder in &due {
        alarm.trigger(reminder, Instant::now());
        if let Err(e) = store.mark_fired(reminder.id, &today) {
            warn!(
                "Failed to persist fired marker for reminder {}: {}",
                reminder.id, e
            );
        }
    }
    due.len()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use chrono::NaiveDate;
    use tempfile::TempDir;

    use super::*;
    use crate::{JsonStore, Result};

    struct NullSink;

    impl AlarmSink for NullSink {
        fn show_alarm(&mut self, _message: &str) -> Result<()> {
            Ok(())
        }

        fn hide_alarm(&mut self) -> Result<()> {
            Ok(())
        }

        fn start_sound(&mut self) -> Result<()> {
            Ok(())
        }

        fn stop_sound(&mut self) -> Result<()> {
            Ok(())
        }
    }

    struct NullNotifier;

    impl Notifier for NullNotifier {
        fn notify(&mut self, _title: &str, _body: &str) -> Result<()> {
            Ok(())
        }
    }

    fn eight_am() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    #[test]
    fn fire_due_raises_alarm_and_marks_fired() {
        let dir = TempDir::new().unwrap();
        let mut store = ReminderStore::open(JsonStore::new(dir.path().to_path_buf()));
        let reminder = store.add("Aspirin".into(), "08:00".into(), None).unwrap();
        let mut alarm = AlarmController::new(NullSink, NullNotifier);

        assert_eq!(fire_due(&mut store, &mut alarm, eight_am()), 1);
        assert!(alarm.is_ringing());
        assert_eq!(
            store.get(reminder.id).unwrap().last_fired.as_deref(),
            Some("2024-03-05")
        );
        // Same pass a moment later finds nothing left to fire
        assert_eq!(fire_due(&mut store, &mut alarm, eight_am()), 0);
    }

    #[test]
    fn fire_due_survives_a_broken_storage_backend() {
        let root = TempDir::new().unwrap();
        let data_dir = root.path().join("data");
        let mut store = ReminderStore::open(JsonStore::new(data_dir.clone()));
        store.add("Aspirin".into(), "08:00".into(), None).unwrap();

        // Storage breaks mid-run: the data directory becomes a plain file
        fs::remove_dir_all(&data_dir).unwrap();
        fs::write(&data_dir, "in the way").unwrap();

        let mut alarm = AlarmController::new(NullSink, NullNotifier);
        assert_eq!(fire_due(&mut store, &mut alarm, eight_am()), 1);
        assert!(alarm.is_ringing());

        // The in-memory marker still prevents a same-day re-fire
        assert_eq!(fire_due(&mut store, &mut alarm, eight_am()), 0);
    }
}
