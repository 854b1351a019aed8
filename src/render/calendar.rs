use super::common::{banner, render_editable, status_banner, EditableCopy};
use super::{CardInput, CardRenderer, CardView, Section};
use crate::classify::Banner;
use crate::draft::DraftField;
use crate::types::{CalendarEvent, ToolKind, ToolResult};
use chrono::{DateTime, NaiveDateTime};
use serde_json::Value;

const CALENDAR_INVITE: EditableCopy = EditableCopy {
    title: "Calendar Invite",
    pending: "Scheduling event...",
    success: "Successfully scheduled",
    error: "Failed to schedule event",
    submit: "Schedule Event",
    feedback_placeholder: "Suggest a different time or attendees...",
};

const DISPLAY_FORMAT: &str = "%b %-d, %Y %-I:%M %p";
const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

/// `2024-07-01T14:00:00` → `Jul 1, 2024 2:00 PM`; anything unparseable is
/// returned as given.
pub fn format_event_time(raw: &str) -> String {
    let trimmed = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return parsed.format(DISPLAY_FORMAT).to_string();
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .map(|parsed| parsed.format(DISPLAY_FORMAT).to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// Events from a calendar query result. Text results are parsed as a JSON
/// array; entries that do not look like events are dropped.
pub fn parse_events(result: Option<&ToolResult>) -> Vec<CalendarEvent> {
    let items = match result {
        Some(ToolResult::Items(items)) => items.clone(),
        Some(ToolResult::Text(text)) => {
            serde_json::from_str::<Vec<Value>>(text).unwrap_or_default()
        }
        None => Vec::new(),
    };
    items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect()
}

pub struct CalendarInviteCard;

impl CardRenderer for CalendarInviteCard {
    fn kind(&self) -> ToolKind {
        ToolKind::SendCalendarInvite
    }

    fn render(&self, input: &CardInput<'_>) -> CardView {
        let mut view = render_editable(&CALENDAR_INVITE, input);
        if !input.awaiting_input {
            let time_labels = [DraftField::StartTime.label(), DraftField::EndTime.label()];
            for section in &mut view.sections {
                if let Section::Field(field) = section {
                    if time_labels.contains(&field.label) {
                        field.value = format_event_time(&field.value);
                    }
                }
            }
        }
        view
    }
}

/// Informational: the agent looked up the calendar for a day.
pub struct EventsForDaysCard;

impl CardRenderer for EventsForDaysCard {
    fn kind(&self) -> ToolKind {
        ToolKind::GetEventsForDays
    }

    fn render(&self, input: &CardInput<'_>) -> CardView {
        let date = input
            .call
            .arg_str("date_str")
            .map(str::trim)
            .filter(|date| !date.is_empty())
            .unwrap_or("the requested date");
        let mut view = CardView::new(self.kind(), "Calendar Lookup", input.classification.tone);
        let pending = format!("Searching for events for {date}");
        let found = format!("Events for {date}");

        match &input.classification.banner {
            Banner::Error(message) => {
                let headline = message.as_deref().unwrap_or("Failed to retrieve events");
                view.banner = Some(banner(input.classification.tone, headline, None));
            }
            Banner::Success(_) => {
                view.banner = Some(banner(input.classification.tone, &found, None));
                let events: Vec<CalendarEvent> = parse_events(input.call.result.as_ref())
                    .into_iter()
                    .map(|event| CalendarEvent {
                        start_time: format_event_time(&event.start_time),
                        end_time: format_event_time(&event.end_time),
                        ..event
                    })
                    .collect();
                if events.is_empty() {
                    view.sections
                        .push(Section::Note("No events found for this date".to_string()));
                } else {
                    view.sections.push(Section::Events(events));
                }
            }
            _ => view.banner = Some(status_banner(input, &pending, &found, "")),
        }
        view
    }
}

#[cfg(test)]
mod tests {
    use super::super::common::fixtures::{card, card_with_result, view};
    use super::super::Section;
    use super::*;
    use crate::types::ToolStatus;
    use serde_json::json;

    #[test]
    fn test_formats_iso_local_and_offset_times() {
        assert_eq!(format_event_time("2024-07-01T14:00:00"), "Jul 1, 2024 2:00 PM");
        assert_eq!(format_event_time("2024-07-01T09:05"), "Jul 1, 2024 9:05 AM");
        assert_eq!(
            format_event_time("2024-12-25T18:30:00-05:00"),
            "Dec 25, 2024 6:30 PM"
        );
        assert_eq!(format_event_time("tomorrow at noon"), "tomorrow at noon");
    }

    #[test]
    fn test_events_parse_from_text_or_list() {
        let text = ToolResult::Text(
            r#"[{"id":"e1","summary":"Standup","start_time":"2024-07-01T09:00:00","end_time":"2024-07-01T09:15:00"}]"#
                .to_string(),
        );
        let events = parse_events(Some(&text));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].summary, "Standup");

        let list = ToolResult::Items(vec![json!({"start_time": "x"}), json!(42)]);
        let events = parse_events(Some(&list));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].summary, "No Title");

        assert!(parse_events(Some(&ToolResult::Text("no events".to_string()))).is_empty());
        assert!(parse_events(None).is_empty());
    }

    #[test]
    fn test_settled_invite_shows_human_times() {
        let card = card(
            ToolKind::SendCalendarInvite,
            json!({"event_title": "Sync", "start_time": "2024-07-01T14:00:00"}),
            ToolStatus::Completed,
        );
        let view = view(&card);
        assert!(view.sections.iter().any(|section| matches!(
            section,
            Section::Field(field) if field.value == "Jul 1, 2024 2:00 PM"
        )));
        assert_eq!(
            view.banner.map(|b| b.headline),
            Some("Successfully scheduled".to_string())
        );
    }

    #[test]
    fn test_interrupted_invite_keeps_raw_times_for_editing() {
        let card = card(
            ToolKind::SendCalendarInvite,
            json!({"start_time": "2024-07-01T14:00:00"}),
            ToolStatus::Interrupted,
        );
        let view = view(&card);
        assert!(view.sections.iter().any(|section| matches!(
            section,
            Section::Field(field) if field.value == "2024-07-01T14:00:00" && field.target.is_some()
        )));
        assert!(view.sections.iter().any(|section| matches!(
            section,
            Section::Field(field) if field.value == "America/New_York"
        )));
    }

    #[test]
    fn test_events_card_by_status() {
        let pending = view(&card(
            ToolKind::GetEventsForDays,
            json!({"date_str": "07-01-2024"}),
            ToolStatus::Pending,
        ));
        assert_eq!(
            pending.banner.map(|b| b.headline),
            Some("Searching for events for 07-01-2024".to_string())
        );

        let empty = view(&card_with_result(
            ToolKind::GetEventsForDays,
            json!({}),
            ToolStatus::Completed,
            "[]",
        ));
        assert_eq!(
            empty.banner.map(|b| b.headline),
            Some("Events for the requested date".to_string())
        );
        assert_eq!(
            empty.sections,
            vec![Section::Note("No events found for this date".to_string())]
        );

        let failed = view(&card(ToolKind::GetEventsForDays, json!({}), ToolStatus::Error));
        assert_eq!(
            failed.banner.map(|b| b.headline),
            Some("Failed to retrieve events".to_string())
        );
    }
}
