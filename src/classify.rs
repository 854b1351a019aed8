//! Maps a tool call's raw `(status, result)` onto what a card should show.
//!
//! Cancellation and feedback are detected by substring search over the
//! result text. A human who writes feedback containing the sentinel phrase
//! will see their card as cancelled; the orchestrator relies on these exact
//! phrases, so the matching stays literal.

use crate::types::{ToolResult, ToolStatus, FEEDBACK_PREFIX};
use aho_corasick::AhoCorasick;
use std::sync::LazyLock;

/// Result text the orchestrator writes for a call it skipped.
pub const CANCELLED_SENTINEL: &str = "Please ignore this tool call, it did not execute.";

pub const GENERIC_FAILURE: &str = "An error occurred";

const SENTINEL_PATTERN: usize = 0;
const FEEDBACK_PATTERN: usize = 1;

static MARKERS: LazyLock<Option<AhoCorasick>> =
    LazyLock::new(|| AhoCorasick::new([CANCELLED_SENTINEL, FEEDBACK_PREFIX]).ok());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BorderTone {
    Neutral,
    Blue,
    Green,
    Yellow,
    Purple,
    Red,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayState {
    Pending,
    Interrupted,
    Error,
    Cancelled,
    FeedbackGiven,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Banner {
    InProgress,
    AwaitingInput,
    Cancelled,
    /// Text following the feedback marker, trimmed.
    FeedbackProvided(String),
    /// `None` when the backend gave no message.
    Error(Option<String>),
    /// Carries the raw result text for informational cards.
    Success(Option<String>),
}

impl Banner {
    pub fn label(&self) -> String {
        match self {
            Banner::InProgress => "in progress".to_string(),
            Banner::AwaitingInput => "awaiting input".to_string(),
            Banner::Cancelled => "cancelled".to_string(),
            Banner::FeedbackProvided(text) => format!("feedback provided: {text}"),
            Banner::Error(message) => {
                format!("error: {}", message.as_deref().unwrap_or(GENERIC_FAILURE))
            }
            Banner::Success(_) => "success".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub state: DisplayState,
    pub tone: BorderTone,
    pub banner: Banner,
}

impl Classification {
    pub fn is_editable(&self) -> bool {
        self.state == DisplayState::Interrupted
    }

    fn new(state: DisplayState, tone: BorderTone, banner: Banner) -> Self {
        Self {
            state,
            tone,
            banner,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Markers {
    cancelled: bool,
    feedback_at: Option<usize>,
}

fn scan_markers(text: &str) -> Markers {
    let Some(automaton) = MARKERS.as_ref() else {
        return Markers {
            cancelled: text.contains(CANCELLED_SENTINEL),
            feedback_at: text.find(FEEDBACK_PREFIX).map(|at| at + FEEDBACK_PREFIX.len()),
        };
    };

    let mut markers = Markers::default();
    for found in automaton.find_overlapping_iter(text) {
        match found.pattern().as_usize() {
            SENTINEL_PATTERN => markers.cancelled = true,
            FEEDBACK_PATTERN if markers.feedback_at.is_none() => {
                markers.feedback_at = Some(found.end());
            }
            _ => {}
        }
    }
    markers
}

pub fn classify(status: ToolStatus, result: Option<&ToolResult>) -> Classification {
    match status {
        ToolStatus::Pending => {
            Classification::new(DisplayState::Pending, BorderTone::Blue, Banner::InProgress)
        }
        ToolStatus::Interrupted => Classification::new(
            DisplayState::Interrupted,
            BorderTone::Purple,
            Banner::AwaitingInput,
        ),
        ToolStatus::Error => {
            let message = result
                .and_then(ToolResult::text)
                .map(str::trim)
                .filter(|text| !text.is_empty())
                .map(str::to_string);
            Classification::new(DisplayState::Error, BorderTone::Red, Banner::Error(message))
        }
        ToolStatus::Completed => classify_completed(result.and_then(ToolResult::text)),
    }
}

fn classify_completed(text: Option<&str>) -> Classification {
    let Some(text) = text else {
        return Classification::new(
            DisplayState::Success,
            BorderTone::Green,
            Banner::Success(None),
        );
    };

    let markers = scan_markers(text);
    if markers.cancelled {
        return Classification::new(
            DisplayState::Cancelled,
            BorderTone::Yellow,
            Banner::Cancelled,
        );
    }
    if let Some(offset) = markers.feedback_at {
        return Classification::new(
            DisplayState::FeedbackGiven,
            BorderTone::Purple,
            Banner::FeedbackProvided(text[offset..].trim().to_string()),
        );
    }
    Classification::new(
        DisplayState::Success,
        BorderTone::Green,
        Banner::Success(Some(text.to_string())),
    )
}
