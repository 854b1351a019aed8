use super::tool_call::ToolKind;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Prefix that marks a `response` resume as steering feedback.
pub const FEEDBACK_PREFIX: &str = "User Feedback:";

/// The human's decision on one interrupted tool call.
#[derive(Debug, Clone, PartialEq)]
pub enum ResumeCommand {
    Accept,
    Edit(EditAction),
    Response(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditAction {
    pub action: ToolKind,
    pub args: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResumeType {
    Accept,
    Edit,
    Response,
}

impl ResumeType {
    pub fn as_str(self) -> &'static str {
        match self {
            ResumeType::Accept => "accept",
            ResumeType::Edit => "edit",
            ResumeType::Response => "response",
        }
    }
}

/// One element of the `resume` list on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeEntry {
    #[serde(rename = "type")]
    pub kind: ResumeType,
    pub args: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeBody {
    pub resume: Vec<ResumeEntry>,
}

/// `{command: {resume: [ {type, args} ]}}` as accepted by the orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumePayload {
    pub command: ResumeBody,
}

impl ResumeCommand {
    pub fn resume_type(&self) -> ResumeType {
        match self {
            ResumeCommand::Accept => ResumeType::Accept,
            ResumeCommand::Edit(_) => ResumeType::Edit,
            ResumeCommand::Response(_) => ResumeType::Response,
        }
    }

    pub fn to_entry(&self) -> ResumeEntry {
        let args = match self {
            ResumeCommand::Accept => Value::Null,
            ResumeCommand::Edit(edit) => json!({
                "action": edit.action.as_str(),
                "args": Value::Object(edit.args.clone()),
            }),
            ResumeCommand::Response(text) => Value::String(text.clone()),
        };
        ResumeEntry {
            kind: self.resume_type(),
            args,
        }
    }

    pub fn into_payload(self) -> ResumePayload {
        ResumePayload {
            command: ResumeBody {
                resume: vec![self.to_entry()],
            },
        }
    }
}

impl ResumePayload {
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
