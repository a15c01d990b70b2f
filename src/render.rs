//! Renders the reminder collection as a terminal list.
//!
//! Projection is a pure function of the collection: `render_list` builds
//! the display lines, and `print_list` only adds terminal styling around
//! them. User-supplied text goes through `escape_text` before it is
//! placed in the output.

use crate::Reminder;

/// Placeholder shown when the collection is empty.
pub const EMPTY_PLACEHOLDER: &str = "No reminders yet. Add one to get started!";

/// Escapes user-supplied text against markup injection. Covers the
/// characters `& < > " '`.
pub fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#039;")
}

/// Formats a 24-hour "HH:MM" time as 12-hour with an AM/PM label.
/// Hours 0 and 12 both display as 12; minutes keep their zero-padding.
pub fn format_time_12h(time: &str) -> String {
    let (hour, minute) = match time.split_once(':') {
        Some(parts) => parts,
        None => return time.to_string(),
    };
    let h: u32 = match hour.parse() {
        Ok(h) => h,
        Err(_) => return time.to_string(),
    };
    let label = if h >= 12 { "PM" } else { "AM" };
    let h12 = match h % 12 {
        0 => 12,
        h => h,
    };
    format!("{}:{} {}", h12, minute, label)
}

/// Builds the display lines for one reminder: name, formatted time,
/// optional note, and the id as the delete affordance.
pub fn render_reminder(reminder: &Reminder) -> Vec<String> {
    let mut lines = vec![
        escape_text(&reminder.name),
        format!("  at {}", format_time_12h(&reminder.time)),
    ];
    if let Some(note) = &reminder.note {
        lines.push(format!("  note: {}", escape_text(note)));
    }
    lines.push(format!("  [delete with id {}]", reminder.id));
    lines
}

/// Projects the (sorted) collection into its full textual list.
pub fn render_list(reminders: &[Reminder]) -> String {
    if reminders.is_empty() {
        return EMPTY_PLACEHOLDER.to_string();
    }
    reminders
        .iter()
        .map(|r| render_reminder(r).join("\n"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prints the collection to the terminal with light styling.
pub fn print_list(reminders: &[Reminder]) {
    let term_width = terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(80);

    if reminders.is_empty() {
        println!("{}", console::style(EMPTY_PLACEHOLDER).dim());
        return;
    }

    for (i, reminder) in reminders.iter().enumerate() {
        if i > 0 {
            println!("{}", "-".repeat(term_width.min(40)));
        }
        println!("{}", console::style(escape_text(&reminder.name)).bold());
        println!("  at {}", console::style(format_time_12h(&reminder.time)).cyan());
        if let Some(note) = &reminder.note {
            println!("  note: {}", escape_text(note));
        }
        println!("  id: {}", console::style(reminder.id).dim());
    }

    println!(
        "\n{} reminder{}",
        reminders.len(),
        if reminders.len() == 1 { "" } else { "s" }
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reminder(name: &str, time: &str, note: Option<&str>) -> Reminder {
        Reminder {
            id: 1,
            name: name.to_string(),
            time: time.to_string(),
            note: note.map(|n| n.to_string()),
            last_fired: None,
        }
    }

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            escape_text(r#"<b>"A&B"</b> 'x'"#),
            "&lt;b&gt;&quot;A&amp;B&quot;&lt;/b&gt; &#039;x&#039;"
        );
    }

    #[test]
    fn rendered_name_contains_no_raw_angle_brackets() {
        let rendered = render_list(&[reminder("<b>X</b>", "08:00", None)]);
        assert!(!rendered.contains('<'));
        assert!(!rendered.contains('>'));
        assert!(rendered.contains("&lt;b&gt;X&lt;/b&gt;"));
    }

    #[test]
    fn formats_midnight_as_twelve_am() {
        assert_eq!(format_time_12h("00:05"), "12:05 AM");
    }

    #[test]
    fn formats_afternoon_as_pm() {
        assert_eq!(format_time_12h("13:30"), "1:30 PM");
    }

    #[test]
    fn formats_noon_as_twelve_pm() {
        assert_eq!(format_time_12h("12:00"), "12:00 PM");
    }

    #[test]
    fn preserves_minute_zero_padding() {
        assert_eq!(format_time_12h("09:07"), "9:07 AM");
    }

    #[test]
    fn empty_collection_renders_placeholder() {
        assert_eq!(render_list(&[]), EMPTY_PLACEHOLDER);
    }

    #[test]
    fn note_line_only_present_when_note_set() {
        let with_note = render_list(&[reminder("Aspirin", "08:00", Some("before food"))]);
        assert!(with_note.contains("note: before food"));

        let without = render_list(&[reminder("Aspirin", "08:00", None)]);
        assert!(!without.contains("note:"));
    }
}
