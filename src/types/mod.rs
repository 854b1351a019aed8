pub mod resume;
pub mod tool_call;

pub use resume::{
    EditAction, ResumeBody, ResumeCommand, ResumeEntry, ResumePayload, ResumeType,
    FEEDBACK_PREFIX,
};
pub use tool_call::{
    CalendarEvent, EmailContext, InterruptPolicy, ProposedArgs, ToolCall, ToolKind, ToolResult,
    ToolStatus,
};
