use crate::models::event::Event;
use crate::models::harptos::{HarptosDate, DAYS_IN_YEAR};
use crate::services::advance::AdvanceOutcome;

pub(super) fn date_header(date: HarptosDate) -> String {
    format!("{} (day {} of {})", date, date.day_of_year(), DAYS_IN_YEAR)
}

pub(super) fn outcome_line(outcome: &AdvanceOutcome) -> String {
    if outcome.initialized && !outcome.advanced() {
        return format!("Calendar started at {}", outcome.current);
    }
    match outcome.elapsed_days {
        0 => format!("Calendar already current: {}", outcome.current),
        1 => format!("Advanced 1 day: {} -> {}", outcome.previous, outcome.current),
        n => format!("Advanced {} days: {} -> {}", n, outcome.previous, outcome.current),
    }
}

pub(super) fn event_line(event: &Event) -> String {
    let mut line = format!(
        "#{:<4} {:<28} {}",
        event.id.unwrap_or_default(),
        event.date().to_string(),
        event.display_title()
    );
    if let Some(real) = event.real_world_date {
        line.push_str(&format!("  [{}]", real.format("%Y-%m-%d")));
    }
    if event.hidden {
        line.push_str("  (hidden)");
    }
    line
}

/// Event line followed by its notes, indented.
pub(super) fn event_detail(event: &Event) -> String {
    let mut out = event_line(event);
    if let Some(notes) = &event.notes {
        for line in notes.lines() {
            out.push_str("\n      ");
            out.push_str(line);
        }
    }
    out
}

pub(super) fn event_list(events: &[Event], empty_message: &str) -> String {
    if events.is_empty() {
        return empty_message.to_string();
    }
    events
        .iter()
        .map(event_detail)
        .collect::<Vec<_>>()
        .join("\n")
}
