use crate::draft::EditableDraft;
use crate::types::{
    EditAction, InterruptPolicy, ProposedArgs, ResumeCommand, ResumeType, ToolKind,
    FEEDBACK_PREFIX,
};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResumeError {
    #[error("response text is empty")]
    EmptyResponse,
    #[error("{kind} does not accept a '{}' resume", command.as_str())]
    NotAllowed { kind: ToolKind, command: ResumeType },
}

/// `accept` when the draft still matches the proposal, otherwise `edit`
/// carrying the whole draft.
pub fn decide(draft: &EditableDraft, proposed: &ProposedArgs) -> ResumeCommand {
    if draft.is_dirty(proposed) {
        ResumeCommand::Edit(EditAction {
            action: draft.kind(),
            args: draft.to_args(),
        })
    } else {
        ResumeCommand::Accept
    }
}

/// Steering feedback: asks the agent to revise or do something else.
pub fn feedback(text: &str) -> Result<ResumeCommand, ResumeError> {
    let text = non_empty(text)?;
    Ok(ResumeCommand::Response(format!("{FEEDBACK_PREFIX} {text}")))
}

/// A direct answer to a question the agent asked, sent verbatim.
pub fn answer(text: &str) -> Result<ResumeCommand, ResumeError> {
    non_empty(text)?;
    Ok(ResumeCommand::Response(text.to_string()))
}

pub fn ensure_allowed(kind: ToolKind, command: &ResumeCommand) -> Result<(), ResumeError> {
    let policy: InterruptPolicy = kind.policy();
    let allowed = match command {
        ResumeCommand::Accept => policy.allow_accept,
        ResumeCommand::Edit(_) => policy.allow_edit,
        ResumeCommand::Response(_) => policy.allow_respond,
    };
    if allowed {
        Ok(())
    } else {
        Err(ResumeError::NotAllowed {
            kind,
            command: command.resume_type(),
        })
    }
}

fn non_empty(text: &str) -> Result<&str, ResumeError> {
    if text.trim().is_empty() {
        Err(ResumeError::EmptyResponse)
    } else {
        Ok(text)
    }
}
