use crate::transport::StreamEvent;
use crate::types::{EmailContext, ToolCall};

/// Model-side events delivered to the active mode, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum UiUpdate {
    ToolCall(ToolCall),
    Email(EmailContext),
    StreamError(String),
    StreamClosed,
}

impl From<StreamEvent> for UiUpdate {
    fn from(event: StreamEvent) -> Self {
        match event {
            StreamEvent::ToolCall(call) => UiUpdate::ToolCall(call),
            StreamEvent::Email(email) => UiUpdate::Email(email),
        }
    }
}
