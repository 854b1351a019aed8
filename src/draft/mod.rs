//! Human-editable shadows of a tool call's proposed arguments.
//!
//! A draft is seeded from the proposal when a card is interrupted, reseeded
//! from re-proposals (only the fields the re-proposal carries), and compared
//! against the proposal to decide between `accept` and `edit`.

mod calendar;
mod email;
pub mod recipients;

pub use calendar::{CalendarInviteDraft, DEFAULT_TIMEZONE};
pub use email::{EmailReplyDraft, NewThreadDraft};
pub use recipients::{join_recipients, parse_recipient_text, parse_recipients};

use crate::types::{ProposedArgs, ToolKind};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    Recipients,
    Subject,
    Content,
    Emails,
    EventTitle,
    StartTime,
    EndTime,
    Timezone,
    Response,
}

impl DraftField {
    pub fn label(self) -> &'static str {
        match self {
            DraftField::Recipients => "Recipients",
            DraftField::Subject => "Subject",
            DraftField::Content => "Content",
            DraftField::Emails => "Attendees",
            DraftField::EventTitle => "Event Title",
            DraftField::StartTime => "Start Time",
            DraftField::EndTime => "End Time",
            DraftField::Timezone => "Timezone",
            DraftField::Response => "Your Response",
        }
    }

    pub fn is_address_list(self) -> bool {
        matches!(self, DraftField::Recipients | DraftField::Emails)
    }

    pub fn is_multiline(self) -> bool {
        matches!(self, DraftField::Content | DraftField::Response)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("{kind} has no editable field '{}'", field.label())]
    UnknownField { kind: ToolKind, field: DraftField },
}

/// Per-kind draft behaviour shared by every variant of [`EditableDraft`].
pub(crate) trait ArgDraft: Sized {
    const KIND: ToolKind;
    const FIELDS: &'static [DraftField];

    fn seed(args: &ProposedArgs) -> Self;
    fn reseed(&mut self, args: &ProposedArgs);
    fn to_args(&self) -> Map<String, Value>;
    fn get(&self, field: DraftField) -> Option<String>;
    fn set(&mut self, field: DraftField, text: &str) -> bool;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageUserDraft {
    pub response: String,
}

impl ArgDraft for MessageUserDraft {
    const KIND: ToolKind = ToolKind::MessageUser;
    const FIELDS: &'static [DraftField] = &[DraftField::Response];

    fn seed(_args: &ProposedArgs) -> Self {
        Self::default()
    }

    fn reseed(&mut self, _args: &ProposedArgs) {}

    fn to_args(&self) -> Map<String, Value> {
        Map::new()
    }

    fn get(&self, field: DraftField) -> Option<String> {
        (field == DraftField::Response).then(|| self.response.clone())
    }

    fn set(&mut self, field: DraftField, text: &str) -> bool {
        if field != DraftField::Response {
            return false;
        }
        self.response = text.to_string();
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditableDraft {
    EmailReply(EmailReplyDraft),
    NewThread(NewThreadDraft),
    CalendarInvite(CalendarInviteDraft),
    MessageUser(MessageUserDraft),
}

macro_rules! with_draft {
    ($draft:expr, $inner:ident => $body:expr) => {
        match $draft {
            EditableDraft::EmailReply($inner) => $body,
            EditableDraft::NewThread($inner) => $body,
            EditableDraft::CalendarInvite($inner) => $body,
            EditableDraft::MessageUser($inner) => $body,
        }
    };
}

impl EditableDraft {
    /// `None` for read-only kinds.
    pub fn seed(kind: ToolKind, args: &ProposedArgs) -> Option<Self> {
        match kind {
            ToolKind::WriteEmailResponse => Some(Self::EmailReply(EmailReplyDraft::seed(args))),
            ToolKind::StartNewEmailThread => Some(Self::NewThread(NewThreadDraft::seed(args))),
            ToolKind::SendCalendarInvite => {
                Some(Self::CalendarInvite(CalendarInviteDraft::seed(args)))
            }
            ToolKind::MessageUser => Some(Self::MessageUser(MessageUserDraft::seed(args))),
            ToolKind::EmailMarkedAsRead | ToolKind::GetEventsForDays => None,
        }
    }

    pub fn reseed(mut self, args: &ProposedArgs) -> Self {
        with_draft!(&mut self, draft => draft.reseed(args));
        self
    }

    pub fn kind(&self) -> ToolKind {
        match self {
            EditableDraft::EmailReply(_) => EmailReplyDraft::KIND,
            EditableDraft::NewThread(_) => NewThreadDraft::KIND,
            EditableDraft::CalendarInvite(_) => CalendarInviteDraft::KIND,
            EditableDraft::MessageUser(_) => MessageUserDraft::KIND,
        }
    }

    pub fn fields(&self) -> &'static [DraftField] {
        match self {
            EditableDraft::EmailReply(_) => EmailReplyDraft::FIELDS,
            EditableDraft::NewThread(_) => NewThreadDraft::FIELDS,
            EditableDraft::CalendarInvite(_) => CalendarInviteDraft::FIELDS,
            EditableDraft::MessageUser(_) => MessageUserDraft::FIELDS,
        }
    }

    /// Arguments an `edit` resume sends: the whole draft, never a diff.
    pub fn to_args(&self) -> Map<String, Value> {
        with_draft!(self, draft => draft.to_args())
    }

    /// Field-by-field comparison against a fresh seed of `args`.
    pub fn is_dirty(&self, args: &ProposedArgs) -> bool {
        match Self::seed(self.kind(), args) {
            Some(pristine) => pristine.to_args() != self.to_args(),
            None => false,
        }
    }

    pub fn field_text(&self, field: DraftField) -> Option<String> {
        with_draft!(self, draft => draft.get(field))
    }

    pub fn set_field(&mut self, field: DraftField, text: &str) -> Result<(), DraftError> {
        let kind = self.kind();
        let applied = with_draft!(self, draft => draft.set(field, text));
        if applied {
            Ok(())
        } else {
            Err(DraftError::UnknownField { kind, field })
        }
    }
}

/// String-valued argument if present and non-null; non-strings are rendered as JSON.
pub(crate) fn present_string(args: &ProposedArgs, key: &str) -> Option<String> {
    match args.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(text.clone()),
        Some(other) => Some(other.to_string()),
    }
}

pub(crate) fn present_recipients(args: &ProposedArgs, key: &str) -> Option<Vec<String>> {
    match args.get(key) {
        None | Some(Value::Null) => None,
        Some(value) => Some(parse_recipients(value)),
    }
}

pub(crate) fn string_list(values: &[String]) -> Value {
    Value::Array(values.iter().cloned().map(Value::String).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> ProposedArgs {
        match value {
            Value::Object(map) => map,
            _ => panic!("test args must be an object"),
        }
    }

    #[test]
    fn test_fresh_seed_is_never_dirty() {
        let samples = [
            (
                ToolKind::WriteEmailResponse,
                json!({"new_recipients": "a@x.com, b@y.com", "content": "Hi"}),
            ),
            (ToolKind::WriteEmailResponse, json!({})),
            (
                ToolKind::StartNewEmailThread,
                json!({"recipients": ["a@x.com"], "subject": "Lunch", "content": "Free?"}),
            ),
            (
                ToolKind::SendCalendarInvite,
                json!({"emails": ["a@x.com"], "event_title": "Sync", "start_time": "2024-07-01T14:00:00"}),
            ),
            (
                ToolKind::MessageUser,
                json!({"question_for_user": "Confirm send?"}),
            ),
        ];
        for (kind, proposed) in samples {
            let proposed = args(proposed);
            let draft = EditableDraft::seed(kind, &proposed).expect("editable kind");
            assert!(!draft.is_dirty(&proposed), "{kind} seed was dirty");
        }
    }

    #[test]
    fn test_read_only_kinds_have_no_draft() {
        let proposed = args(json!({"date_str": "01-07-2024"}));
        assert!(EditableDraft::seed(ToolKind::GetEventsForDays, &proposed).is_none());
        assert!(EditableDraft::seed(ToolKind::EmailMarkedAsRead, &proposed).is_none());
    }

    #[test]
    fn test_reseed_is_idempotent() {
        let original = args(json!({"recipients": ["a@x.com"], "subject": "Hi", "content": "Body"}));
        let revised = args(json!({"subject": "Hello again"}));
        let mut draft = EditableDraft::seed(ToolKind::StartNewEmailThread, &original)
            .expect("editable kind");
        draft
            .set_field(DraftField::Content, "Edited body")
            .expect("content field");

        let once = draft.clone().reseed(&revised);
        let twice = once.clone().reseed(&revised);
        assert_eq!(once, twice);
        assert_eq!(once.field_text(DraftField::Subject).as_deref(), Some("Hello again"));
        assert_eq!(once.field_text(DraftField::Content).as_deref(), Some("Edited body"));
    }

    #[test]
    fn test_editing_a_field_makes_draft_dirty() {
        let proposed = args(json!({"new_recipients": ["a@x.com"], "content": "Hi"}));
        let mut draft =
            EditableDraft::seed(ToolKind::WriteEmailResponse, &proposed).expect("editable kind");
        draft
            .set_field(DraftField::Content, "Hi there")
            .expect("content field");
        assert!(draft.is_dirty(&proposed));

        draft.set_field(DraftField::Content, "Hi").expect("content field");
        assert!(!draft.is_dirty(&proposed));
    }

    #[test]
    fn test_message_user_response_never_counts_as_dirty() {
        let proposed = args(json!({"question_for_user": "Confirm send?"}));
        let mut draft = EditableDraft::seed(ToolKind::MessageUser, &proposed).expect("draft");
        draft.set_field(DraftField::Response, "Yes").expect("response");
        assert!(!draft.is_dirty(&proposed));
        assert_eq!(draft.field_text(DraftField::Response).as_deref(), Some("Yes"));
    }

    #[test]
    fn test_foreign_field_is_rejected() {
        let mut draft =
            EditableDraft::seed(ToolKind::WriteEmailResponse, &Map::new()).expect("draft");
        assert_eq!(
            draft.set_field(DraftField::Timezone, "UTC"),
            Err(DraftError::UnknownField {
                kind: ToolKind::WriteEmailResponse,
                field: DraftField::Timezone,
            })
        );
    }
}
