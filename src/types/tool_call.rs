use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Proposed tool arguments exactly as the agent emitted them.
pub type ProposedArgs = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    EmailMarkedAsRead,
    WriteEmailResponse,
    MessageUser,
    SendCalendarInvite,
    StartNewEmailThread,
    GetEventsForDays,
}

impl ToolKind {
    pub const ALL: [ToolKind; 6] = [
        ToolKind::EmailMarkedAsRead,
        ToolKind::WriteEmailResponse,
        ToolKind::MessageUser,
        ToolKind::SendCalendarInvite,
        ToolKind::StartNewEmailThread,
        ToolKind::GetEventsForDays,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ToolKind::EmailMarkedAsRead => "email_marked_as_read",
            ToolKind::WriteEmailResponse => "write_email_response",
            ToolKind::MessageUser => "message_user",
            ToolKind::SendCalendarInvite => "send_calendar_invite",
            ToolKind::StartNewEmailThread => "start_new_email_thread",
            ToolKind::GetEventsForDays => "get_events_for_days",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }

    pub fn policy(self) -> InterruptPolicy {
        match self {
            ToolKind::WriteEmailResponse
            | ToolKind::StartNewEmailThread
            | ToolKind::SendCalendarInvite => InterruptPolicy {
                allow_accept: true,
                allow_edit: true,
                allow_respond: true,
            },
            ToolKind::MessageUser => InterruptPolicy {
                allow_accept: false,
                allow_edit: false,
                allow_respond: true,
            },
            ToolKind::EmailMarkedAsRead | ToolKind::GetEventsForDays => InterruptPolicy::default(),
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which resume commands the orchestrator accepts for a kind's interrupt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InterruptPolicy {
    pub allow_accept: bool,
    pub allow_edit: bool,
    pub allow_respond: bool,
}

impl InterruptPolicy {
    pub fn is_read_only(&self) -> bool {
        !self.allow_accept && !self.allow_edit && !self.allow_respond
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolStatus {
    #[default]
    Pending,
    Completed,
    Error,
    Interrupted,
}

impl ToolStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ToolStatus::Pending => "pending",
            ToolStatus::Completed => "completed",
            ToolStatus::Error => "error",
            ToolStatus::Interrupted => "interrupted",
        }
    }
}

/// Execution outcome: free text for most tools, a list for calendar queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolResult {
    Text(String),
    Items(Vec<Value>),
}

impl ToolResult {
    pub fn text(&self) -> Option<&str> {
        match self {
            ToolResult::Text(text) => Some(text.as_str()),
            ToolResult::Items(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub kind: ToolKind,
    #[serde(default, rename = "args")]
    pub proposed_args: ProposedArgs,
    #[serde(default)]
    pub status: ToolStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<ToolResult>,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, kind: ToolKind, proposed_args: ProposedArgs) -> Self {
        Self {
            id: id.into(),
            kind,
            proposed_args,
            status: ToolStatus::Pending,
            result: None,
        }
    }

    pub fn with_status(mut self, status: ToolStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_result(mut self, result: impl Into<String>) -> Self {
        self.result = Some(ToolResult::Text(result.into()));
        self
    }

    pub fn result_text(&self) -> Option<&str> {
        self.result.as_ref().and_then(ToolResult::text)
    }

    pub fn arg_str(&self, key: &str) -> Option<&str> {
        self.proposed_args.get(key).and_then(Value::as_str)
    }
}

/// The email the agent is currently handling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailContext {
    pub id: String,
    #[serde(default)]
    pub thread_id: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub from_email: Option<String>,
    #[serde(default)]
    pub to_email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default = "untitled_event")]
    pub summary: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
}

fn untitled_event() -> String {
    "No Title".to_string()
}
