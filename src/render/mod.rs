//! Presentation models for cards, one renderer per tool kind.
//!
//! Renderers are pure: the same card and board context always produce the
//! same [`CardView`]. Drawing the view is the `ui` module's job.

mod calendar;
mod common;
mod email;
mod message;

pub use calendar::{format_event_time, parse_events, CalendarInviteCard, EventsForDaysCard};
pub use email::{EmailReplyCard, MarkAsReadCard, NewThreadCard};
pub use message::MessageUserCard;

use crate::card::{BoardContext, Card};
use crate::classify::{BorderTone, Classification};
use crate::draft::{DraftField, EditableDraft};
use crate::types::{CalendarEvent, ToolCall, ToolKind};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FocusTarget {
    Field(DraftField),
    Feedback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannerView {
    pub tone: BorderTone,
    pub headline: String,
    pub detail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldView {
    pub label: &'static str,
    pub value: String,
    pub placeholder: &'static str,
    /// Set only while the field can be edited.
    pub target: Option<FocusTarget>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBoxView {
    pub label: &'static str,
    pub text: String,
    pub placeholder: &'static str,
    pub target: FocusTarget,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Section {
    Field(FieldView),
    Text { label: &'static str, text: String },
    Events(Vec<CalendarEvent>),
    Note(String),
    Input(TextBoxView),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Decide,
    Respond,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionView {
    pub kind: ActionKind,
    pub label: &'static str,
    pub keys: &'static str,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub kind: ToolKind,
    pub title: String,
    pub tone: BorderTone,
    pub hidden: bool,
    pub banner: Option<BannerView>,
    pub sections: Vec<Section>,
    pub actions: Vec<ActionView>,
    pub gmail_link: Option<String>,
}

impl CardView {
    pub fn new(kind: ToolKind, title: impl Into<String>, tone: BorderTone) -> Self {
        Self {
            kind,
            title: title.into(),
            tone,
            hidden: false,
            banner: None,
            sections: Vec::new(),
            actions: Vec::new(),
            gmail_link: None,
        }
    }

    /// Editable targets in display order.
    pub fn focus_targets(&self) -> Vec<FocusTarget> {
        self.sections
            .iter()
            .filter_map(|section| match section {
                Section::Field(field) => field.target,
                Section::Input(input) => Some(input.target),
                _ => None,
            })
            .collect()
    }

    pub fn action(&self, kind: ActionKind) -> Option<&ActionView> {
        self.actions.iter().find(|action| action.kind == kind)
    }
}

/// Everything a renderer may look at.
pub struct CardInput<'a> {
    pub call: &'a ToolCall,
    pub draft: Option<&'a EditableDraft>,
    pub feedback: &'a str,
    pub classification: &'a Classification,
    pub context: &'a BoardContext,
    pub awaiting_input: bool,
    pub can_submit_response: bool,
}

pub trait CardRenderer: Sync {
    fn kind(&self) -> ToolKind;
    fn render(&self, input: &CardInput<'_>) -> CardView;
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("no card renderer registered for: {}", join_kinds(.0))]
    Missing(Vec<ToolKind>),
    #[error("unknown tool kind '{0}'")]
    UnknownKind(String),
}

fn join_kinds(kinds: &[ToolKind]) -> String {
    kinds
        .iter()
        .map(|kind| kind.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

static EMAIL_MARKED_AS_READ: MarkAsReadCard = MarkAsReadCard;
static WRITE_EMAIL_RESPONSE: EmailReplyCard = EmailReplyCard;
static MESSAGE_USER: MessageUserCard = MessageUserCard;
static SEND_CALENDAR_INVITE: CalendarInviteCard = CalendarInviteCard;
static START_NEW_EMAIL_THREAD: NewThreadCard = NewThreadCard;
static GET_EVENTS_FOR_DAYS: EventsForDaysCard = EventsForDaysCard;

/// Static kind → renderer table, built once at startup.
#[derive(Default)]
pub struct RendererRegistry {
    renderers: HashMap<ToolKind, &'static dyn CardRenderer>,
}

impl RendererRegistry {
    pub fn standard() -> Self {
        let mut registry = Self::default();
        registry.register(&EMAIL_MARKED_AS_READ);
        registry.register(&WRITE_EMAIL_RESPONSE);
        registry.register(&MESSAGE_USER);
        registry.register(&SEND_CALENDAR_INVITE);
        registry.register(&START_NEW_EMAIL_THREAD);
        registry.register(&GET_EVENTS_FOR_DAYS);
        registry
    }

    pub fn register(&mut self, renderer: &'static dyn CardRenderer) {
        self.renderers.insert(renderer.kind(), renderer);
    }

    pub fn get(&self, kind: ToolKind) -> Option<&'static dyn CardRenderer> {
        self.renderers.get(&kind).copied()
    }

    pub fn lookup(&self, name: &str) -> Result<&'static dyn CardRenderer, RegistryError> {
        ToolKind::from_name(name)
            .and_then(|kind| self.get(kind))
            .ok_or_else(|| RegistryError::UnknownKind(name.to_string()))
    }

    /// Startup check that every tool kind can be drawn.
    pub fn ensure_exhaustive(&self) -> Result<(), RegistryError> {
        let missing: Vec<ToolKind> = ToolKind::ALL
            .into_iter()
            .filter(|kind| !self.renderers.contains_key(kind))
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(RegistryError::Missing(missing))
        }
    }

    pub fn render(&self, card: &Card, context: &BoardContext) -> Result<CardView, RegistryError> {
        let renderer = self
            .get(card.kind())
            .ok_or_else(|| RegistryError::Missing(vec![card.kind()]))?;
        let classification = card.classification();
        let input = CardInput {
            call: card.call(),
            draft: card.draft(),
            feedback: card.feedback(),
            classification: &classification,
            context,
            awaiting_input: card.is_awaiting_input(),
            can_submit_response: card.can_submit_response(),
        };
        Ok(renderer.render(&input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ToolStatus;
    use serde_json::Map;

    #[test]
    fn test_standard_registry_covers_every_kind() {
        let registry = RendererRegistry::standard();
        assert_eq!(registry.ensure_exhaustive(), Ok(()));
        for kind in ToolKind::ALL {
            assert_eq!(registry.get(kind).map(|renderer| renderer.kind()), Some(kind));
        }
    }

    #[test]
    fn test_missing_renderers_are_reported_at_startup() {
        let mut registry = RendererRegistry::default();
        registry.register(&MESSAGE_USER);
        let Err(RegistryError::Missing(missing)) = registry.ensure_exhaustive() else {
            panic!("expected missing renderers");
        };
        assert_eq!(missing.len(), ToolKind::ALL.len() - 1);
        assert!(!missing.contains(&ToolKind::MessageUser));
    }

    #[test]
    fn test_lookup_resolves_wire_names() {
        let registry = RendererRegistry::standard();
        let renderer = registry.lookup("send_calendar_invite").ok().expect("renderer");
        assert_eq!(renderer.kind(), ToolKind::SendCalendarInvite);
        assert_eq!(
            registry.lookup("archive_email").err(),
            Some(RegistryError::UnknownKind("archive_email".to_string()))
        );
    }

    #[test]
    fn test_rendering_is_repeatable() {
        let registry = RendererRegistry::standard();
        let mut args = Map::new();
        args.insert("content".to_string(), serde_json::json!("Hi"));
        let card = Card::new(
            ToolCall::new("c1", ToolKind::WriteEmailResponse, args)
                .with_status(ToolStatus::Interrupted),
        );
        let context = BoardContext::default();
        let first = registry.render(&card, &context).expect("view");
        let second = registry.render(&card, &context).expect("view");
        assert_eq!(first, second);
    }
}
