use super::{
    join_recipients, parse_recipient_text, present_recipients, present_string, string_list,
    ArgDraft, DraftField,
};
use crate::types::{ProposedArgs, ToolKind};
use serde_json::{Map, Value};

/// Used when the agent proposes an invite without a timezone.
pub const DEFAULT_TIMEZONE: &str = "America/New_York";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarInviteDraft {
    pub emails: Vec<String>,
    pub event_title: String,
    pub start_time: String,
    pub end_time: String,
    pub timezone: String,
}

impl Default for CalendarInviteDraft {
    fn default() -> Self {
        Self {
            emails: Vec::new(),
            event_title: String::new(),
            start_time: String::new(),
            end_time: String::new(),
            timezone: DEFAULT_TIMEZONE.to_string(),
        }
    }
}

impl ArgDraft for CalendarInviteDraft {
    const KIND: ToolKind = ToolKind::SendCalendarInvite;
    const FIELDS: &'static [DraftField] = &[
        DraftField::EventTitle,
        DraftField::Emails,
        DraftField::StartTime,
        DraftField::EndTime,
        DraftField::Timezone,
    ];

    fn seed(args: &ProposedArgs) -> Self {
        let mut draft = Self::default();
        draft.reseed(args);
        draft
    }

    fn reseed(&mut self, args: &ProposedArgs) {
        if let Some(emails) = present_recipients(args, "emails") {
            self.emails = emails;
        }
        if let Some(title) = present_string(args, "event_title") {
            self.event_title = title;
        }
        if let Some(start) = present_string(args, "start_time") {
            self.start_time = start;
        }
        if let Some(end) = present_string(args, "end_time") {
            self.end_time = end;
        }
        if let Some(timezone) = present_string(args, "timezone") {
            self.timezone = timezone;
        }
    }

    fn to_args(&self) -> Map<String, Value> {
        let mut args = Map::new();
        args.insert("emails".to_string(), string_list(&self.emails));
        args.insert(
            "event_title".to_string(),
            Value::String(self.event_title.clone()),
        );
        args.insert("start_time".to_string(), Value::String(self.start_time.clone()));
        args.insert("end_time".to_string(), Value::String(self.end_time.clone()));
        args.insert("timezone".to_string(), Value::String(self.timezone.clone()));
        args
    }

    fn get(&self, field: DraftField) -> Option<String> {
        match field {
            DraftField::Emails => Some(join_recipients(&self.emails)),
            DraftField::EventTitle => Some(self.event_title.clone()),
            DraftField::StartTime => Some(self.start_time.clone()),
            DraftField::EndTime => Some(self.end_time.clone()),
            DraftField::Timezone => Some(self.timezone.clone()),
            _ => None,
        }
    }

    fn set(&mut self, field: DraftField, text: &str) -> bool {
        match field {
            DraftField::Emails => self.emails = parse_recipient_text(text),
            DraftField::EventTitle => self.event_title = text.to_string(),
            DraftField::StartTime => self.start_time = text.to_string(),
            DraftField::EndTime => self.end_time = text.to_string(),
            DraftField::Timezone => self.timezone = text.to_string(),
            _ => return false,
        }
        true
    }
}
