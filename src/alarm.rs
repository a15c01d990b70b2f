//! Alarm controller: the IDLE -> RINGING -> IDLE state machine raised
//! when a reminder comes due.
//!
//! Side effects (alarm view, sound, desktop notification) go through the
//! [`AlarmSink`] and [`Notifier`] seams so the watch loop drives real
//! terminal output while tests drive recording fakes. Every side-effect
//! failure is logged and swallowed; an alarm never aborts because one of
//! its channels is unavailable.

use std::io::Write;
use std::path::PathBuf;
use std::process::Command;

use log::{debug, info, warn};
use tokio::time::{Duration, Instant};

use crate::{PillboxError, Reminder, Result};

/// How long an alarm rings before it stops on its own.
pub const ALARM_DURATION: Duration = Duration::from_secs(30);

/// Receives the visual and audible side of the alarm.
pub trait AlarmSink {
    fn show_alarm(&mut self, message: &str) -> Result<()>;
    fn hide_alarm(&mut self) -> Result<()>;
    fn start_sound(&mut self) -> Result<()>;
    fn stop_sound(&mut self) -> Result<()>;
}

/// Delivers the system-notification side of the alarm.
pub trait Notifier {
    fn notify(&mut self, title: &str, body: &str) -> Result<()>;
}

/// The message shown in the alarm view: name, with the note in
/// parentheses when present.
pub fn alarm_message(reminder: &Reminder) -> String {
    match &reminder.note {
        Some(note) => format!("{} ({})", reminder.name, note),
        None => reminder.name.clone(),
    }
}

enum AlarmState {
    Idle,
    Ringing { reminder_id: i64, deadline: Instant },
}

/// Drives the alarm lifecycle for due reminders.
pub struct AlarmController<S, N> {
    sink: S,
    notifier: N,
    duration: Duration,
    state: AlarmState,
}

impl<S: AlarmSink, N: Notifier> AlarmController<S, N> {
    pub fn new(sink: S, notifier: N) -> Self {
        Self::with_duration(sink, notifier, ALARM_DURATION)
    }

    pub fn with_duration(sink: S, notifier: N, duration: Duration) -> Self {
        Self {
            sink,
            notifier,
            duration,
            state: AlarmState::Idle,
        }
    }

    /// Enters (or re-enters) RINGING for the given reminder.
    ///
    /// Re-entrant triggers while already ringing overwrite the view
    /// message and replace the auto-stop deadline: the last trigger wins,
    /// and exactly one deadline is ever armed.
    pub fn trigger(&mut self, reminder: &Reminder, now: Instant) {
        info!("Alarm triggered for reminder {} ({})", reminder.name, reminder.id);

        let message = alarm_message(reminder);
        if let Err(e) = self.sink.show_alarm(&message) {
            warn!("Failed to show alarm view: {}", e);
        }
        if let Err(e) = self.sink.start_sound() {
            warn!("Audio play failed: {}", e);
        }

        let body = format!(
            "Time to take {}\nNote: {}",
            reminder.name,
            reminder.note.as_deref().unwrap_or("none")
        );
        if let Err(e) = self.notifier.notify("Medication reminder", &body) {
            warn!("Notification failed: {}", e);
        }

        self.state = AlarmState::Ringing {
            reminder_id: reminder.id,
            deadline: now + self.duration,
        };
    }

    /// Leaves RINGING: stops the sound, hides the view, clears the
    /// deadline. Safe to call when already idle.
    pub fn stop(&mut self) {
        if let AlarmState::Ringing { reminder_id, .. } = self.state {
            info!("Alarm stopped for reminder {}", reminder_id);
            if let Err(e) = self.sink.stop_sound() {
                warn!("Failed to stop alarm sound: {}", e);
            }
            if let Err(e) = self.sink.hide_alarm() {
                warn!("Failed to hide alarm view: {}", e);
            }
        }
        self.state = AlarmState::Idle;
    }

    pub fn is_ringing(&self) -> bool {
        matches!(self.state, AlarmState::Ringing { .. })
    }

    /// The reminder currently ringing, if any.
    pub fn ringing_reminder(&self) -> Option<i64> {
        match self.state {
            AlarmState::Ringing { reminder_id, .. } => Some(reminder_id),
            AlarmState::Idle => None,
        }
    }

    /// The pending auto-stop deadline, if ringing.
    pub fn deadline(&self) -> Option<Instant> {
        match self.state {
            AlarmState::Ringing { deadline, .. } => Some(deadline),
            AlarmState::Idle => None,
        }
    }
}

/// Alarm view and sound on the terminal the watch loop runs in. The
/// "sound" is the terminal bell; there is no looping playback to stop.
pub struct TerminalAlarmSink {
    banner: String,
}

impl TerminalAlarmSink {
    pub fn new(banner: String) -> Self {
        Self { banner }
    }
}

impl AlarmSink for TerminalAlarmSink {
    fn show_alarm(&mut self, message: &str) -> Result<()> {
        println!("\n{}", console::style(&self.banner).red().bold());
        println!("{}", console::style(message).bold());
        println!("{}", console::style("(press Enter to dismiss)").dim());
        Ok(())
    }

    fn hide_alarm(&mut self) -> Result<()> {
        println!("{}", console::style("Alarm dismissed.").dim());
        Ok(())
    }

    fn start_sound(&mut self) -> Result<()> {
        let mut stdout = std::io::stdout();
        stdout.write_all(b"\x07")?;
        stdout.flush()?;
        Ok(())
    }

    fn stop_sound(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Desktop notifications through the `notify-send` binary, located once
/// at startup. A missing binary means the channel was never granted and
/// notifications are skipped without complaint.
pub struct DesktopNotifier {
    command: Option<PathBuf>,
}

impl DesktopNotifier {
    pub fn new() -> Self {
        let command = which::which("notify-send").ok();
        match &command {
            Some(path) => debug!("Desktop notifications via {}", path.display()),
            None => debug!("notify-send not found, desktop notifications disabled"),
        }
        Self { command }
    }
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&mut self, title: &str, body: &str) -> Result<()> {
        let Some(command) = &self.command else {
            debug!("Skipping notification, transport not available");
            return Ok(());
        };

        let status = Command::new(command).arg(title).arg(body).status()?;
        if !status.success() {
            return Err(PillboxError::ApplicationError {
                message: format!("notify-send exited with status {}", status),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingSink {
        shown: Vec<String>,
        hide_calls: usize,
        sound_starts: usize,
        sound_stops: usize,
        fail_sound: bool,
    }

    impl AlarmSink for RecordingSink {
        fn show_alarm(&mut self, message: &str) -> Result<()> {
            self.shown.push(message.to_string());
            Ok(())
        }

        fn hide_alarm(&mut self) -> Result<()> {
            self.hide_calls += 1;
            Ok(())
        }

        fn start_sound(&mut self) -> Result<()> {
            if self.fail_sound {
                return Err(PillboxError::ApplicationError {
                    message: "sound blocked".to_string(),
                });
            }
            self.sound_starts += 1;
            Ok(())
        }

        fn stop_sound(&mut self) -> Result<()> {
            self.sound_stops += 1;
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        sent: Vec<(String, String)>,
        fail: bool,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&mut self, title: &str, body: &str) -> Result<()> {
            if self.fail {
                return Err(PillboxError::ApplicationError {
                    message: "no notification daemon".to_string(),
                });
            }
            self.sent.push((title.to_string(), body.to_string()));
            Ok(())
        }
    }

    fn reminder(id: i64, name: &str, note: Option<&str>) -> Reminder {
        Reminder {
            id,
            name: name.to_string(),
            time: "08:00".to_string(),
            note: note.map(|n| n.to_string()),
            last_fired: None,
        }
    }

    fn controller() -> AlarmController<RecordingSink, RecordingNotifier> {
        AlarmController::new(RecordingSink::default(), RecordingNotifier::default())
    }

    #[test]
    fn message_includes_note_when_present() {
        assert_eq!(
            alarm_message(&reminder(1, "Aspirin", Some("before food"))),
            "Aspirin (before food)"
        );
        assert_eq!(alarm_message(&reminder(1, "Aspirin", None)), "Aspirin");
    }

    #[test]
    fn trigger_enters_ringing_with_all_channels() {
        let mut alarm = controller();
        alarm.trigger(&reminder(1, "Aspirin", Some("before food")), Instant::now());

        assert!(alarm.is_ringing());
        assert_eq!(alarm.ringing_reminder(), Some(1));
        assert_eq!(alarm.sink.shown, vec!["Aspirin (before food)"]);
        assert_eq!(alarm.sink.sound_starts, 1);
        assert_eq!(alarm.notifier.sent.len(), 1);
        assert!(alarm.notifier.sent[0].1.contains("before food"));
    }

    #[test]
    fn sound_failure_does_not_abort_the_alarm() {
        let sink = RecordingSink {
            fail_sound: true,
            ..Default::default()
        };
        let mut alarm = AlarmController::new(sink, RecordingNotifier::default());
        alarm.trigger(&reminder(1, "Aspirin", None), Instant::now());

        assert!(alarm.is_ringing());
        assert_eq!(alarm.sink.shown.len(), 1);
        assert_eq!(alarm.notifier.sent.len(), 1);
    }

    #[test]
    fn notification_failure_does_not_abort_the_alarm() {
        let notifier = RecordingNotifier {
            fail: true,
            ..Default::default()
        };
        let mut alarm = AlarmController::new(RecordingSink::default(), notifier);
        alarm.trigger(&reminder(1, "Aspirin", None), Instant::now());

        assert!(alarm.is_ringing());
        assert_eq!(alarm.sink.sound_starts, 1);
    }

    #[test]
    fn stop_is_idempotent() {
        let mut alarm = controller();

        // Stopping while idle touches nothing
        alarm.stop();
        assert_eq!(alarm.sink.hide_calls, 0);
        assert_eq!(alarm.sink.sound_stops, 0);

        alarm.trigger(&reminder(1, "Aspirin", None), Instant::now());
        alarm.stop();
        assert!(!alarm.is_ringing());
        assert_eq!(alarm.sink.hide_calls, 1);
        assert_eq!(alarm.sink.sound_stops, 1);

        alarm.stop();
        assert_eq!(alarm.sink.hide_calls, 1);
        assert_eq!(alarm.sink.sound_stops, 1);
        assert!(alarm.deadline().is_none());
    }

    #[test]
    fn retrigger_replaces_deadline_and_message() {
        let mut alarm = controller();
        let t0 = Instant::now();
        alarm.trigger(&reminder(1, "Aspirin", None), t0);
        let first_deadline = alarm.deadline().unwrap();

        // Second reminder comes due 10s in; its countdown replaces the first
        let t1 = t0 + Duration::from_secs(10);
        alarm.trigger(&reminder(2, "Ibuprofen", None), t1);

        assert_eq!(alarm.ringing_reminder(), Some(2));
        assert_eq!(alarm.sink.shown.last().map(String::as_str), Some("Ibuprofen"));
        let second_deadline = alarm.deadline().unwrap();
        assert_eq!(second_deadline, t1 + ALARM_DURATION);
        assert!(second_deadline > first_deadline);

        // Firing the single pending countdown stops the alarm exactly once
        alarm.stop();
        assert!(!alarm.is_ringing());
        assert_eq!(alarm.sink.hide_calls, 1);
    }
}
