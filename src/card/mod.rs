//! One card per tool call: the latest pushed snapshot plus, while the call is
//! interrupted, the human's draft and the submission guard.

mod board;

pub use board::{BoardContext, CardBoard};

use crate::classify::{classify, Classification};
use crate::draft::{DraftError, DraftField, EditableDraft};
use crate::resume::{self, ResumeError};
use crate::transport::ResumeTransport;
use crate::types::{ResumeCommand, ResumeType, ToolCall, ToolKind, ToolStatus};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CardError {
    #[error("{0} is not awaiting input")]
    NotInterrupted(ToolKind),
    #[error("a resume was already submitted for this interrupt")]
    AlreadySubmitted,
    #[error("{0} has nothing to edit")]
    ReadOnly(ToolKind),
    #[error(transparent)]
    Draft(#[from] DraftError),
    #[error(transparent)]
    Resume(#[from] ResumeError),
}

/// What an update did to the card's interrupt session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardTransition {
    Unchanged,
    Opened,
    Reseeded,
    /// The call left `interrupted`; `unsent` is true if nothing was submitted.
    Closed { unsent: bool },
}

/// Live state of one interrupt: created on entry, dropped on exit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterruptSession {
    pub draft: EditableDraft,
    pub feedback: String,
    pub submitted: bool,
}

impl InterruptSession {
    fn open(call: &ToolCall) -> Option<Self> {
        EditableDraft::seed(call.kind, &call.proposed_args).map(|draft| Self {
            draft,
            feedback: String::new(),
            submitted: false,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Card {
    call: ToolCall,
    session: Option<InterruptSession>,
}

impl Card {
    pub fn new(call: ToolCall) -> Self {
        let session = if call.status == ToolStatus::Interrupted {
            InterruptSession::open(&call)
        } else {
            None
        };
        Self { call, session }
    }

    pub fn call(&self) -> &ToolCall {
        &self.call
    }

    pub fn kind(&self) -> ToolKind {
        self.call.kind
    }

    pub fn session(&self) -> Option<&InterruptSession> {
        self.session.as_ref()
    }

    pub fn draft(&self) -> Option<&EditableDraft> {
        self.session.as_ref().map(|session| &session.draft)
    }

    pub fn feedback(&self) -> &str {
        self.session
            .as_ref()
            .map(|session| session.feedback.as_str())
            .unwrap_or("")
    }

    pub fn classification(&self) -> Classification {
        classify(self.call.status, self.call.result.as_ref())
    }

    pub fn is_awaiting_input(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| !session.submitted)
    }

    /// Whether the free-text submit control should be enabled.
    pub fn can_submit_response(&self) -> bool {
        self.kind().policy().allow_respond
            && self.is_awaiting_input()
            && !self.response_text().trim().is_empty()
    }

    /// Apply a pushed snapshot of this call.
    pub fn apply(&mut self, update: ToolCall) -> CardTransition {
        let was_interrupted = self.call.status == ToolStatus::Interrupted;
        let args_changed = update.proposed_args != self.call.proposed_args;
        self.call = update;

        if self.call.status != ToolStatus::Interrupted {
            return match self.session.take() {
                Some(session) => CardTransition::Closed {
                    unsent: !session.submitted,
                },
                None => CardTransition::Unchanged,
            };
        }

        match self.session.take() {
            // The agent asked again after a response resume. Only a changed
            // proposal marks a new question: snapshots carry no interrupt
            // id, so an identical re-send while still interrupted looks like
            // the old one and the card stays submitted without controls
            // until the status moves.
            Some(session) if was_interrupted && session.submitted && args_changed => {
                self.session = InterruptSession::open(&self.call);
                CardTransition::Opened
            }
            Some(mut session) if was_interrupted => {
                let transition = if args_changed {
                    session.draft = session.draft.reseed(&self.call.proposed_args);
                    CardTransition::Reseeded
                } else {
                    CardTransition::Unchanged
                };
                self.session = Some(session);
                transition
            }
            _ => {
                self.session = InterruptSession::open(&self.call);
                if self.session.is_some() {
                    CardTransition::Opened
                } else {
                    CardTransition::Unchanged
                }
            }
        }
    }

    pub fn edit_field(&mut self, field: DraftField, text: &str) -> Result<(), CardError> {
        let session = self.open_session_mut()?;
        session.draft.set_field(field, text)?;
        Ok(())
    }

    pub fn set_feedback(&mut self, text: &str) -> Result<(), CardError> {
        if !self.kind().policy().allow_respond {
            return Err(ResumeError::NotAllowed {
                kind: self.kind(),
                command: ResumeType::Response,
            }
            .into());
        }
        let session = self.open_session_mut()?;
        session.feedback = text.to_string();
        Ok(())
    }

    /// Submit the accept/edit decision for the current draft.
    pub fn submit_decision(
        &mut self,
        transport: &dyn ResumeTransport,
    ) -> Result<ResumeCommand, CardError> {
        let kind = self.kind();
        let session = self.open_session_ref()?;
        let command = resume::decide(&session.draft, &self.call.proposed_args);
        resume::ensure_allowed(kind, &command)?;
        self.dispatch(command, transport)
    }

    /// Submit the free-text path: an answer for questions, feedback otherwise.
    pub fn submit_response(
        &mut self,
        transport: &dyn ResumeTransport,
    ) -> Result<ResumeCommand, CardError> {
        self.open_session_ref()?;
        let text = self.response_text();
        let command = match self.kind() {
            ToolKind::MessageUser => resume::answer(text)?,
            _ => resume::feedback(text)?,
        };
        resume::ensure_allowed(self.kind(), &command)?;
        self.dispatch(command, transport)
    }

    fn response_text(&self) -> &str {
        match self.session.as_ref() {
            Some(InterruptSession {
                draft: EditableDraft::MessageUser(draft),
                ..
            }) => draft.response.as_str(),
            Some(session) => session.feedback.as_str(),
            None => "",
        }
    }

    fn dispatch(
        &mut self,
        command: ResumeCommand,
        transport: &dyn ResumeTransport,
    ) -> Result<ResumeCommand, CardError> {
        let session = self.open_session_mut()?;
        session.submitted = true;
        tracing::info!(
            call_id = %self.call.id,
            kind = %self.call.kind,
            resume = command.resume_type().as_str(),
            "submitting resume"
        );
        transport.submit(command.clone().into_payload());
        Ok(command)
    }

    fn open_session_ref(&self) -> Result<&InterruptSession, CardError> {
        let kind = self.kind();
        if self.call.status != ToolStatus::Interrupted {
            return Err(CardError::NotInterrupted(kind));
        }
        match self.session.as_ref() {
            None => Err(CardError::ReadOnly(kind)),
            Some(session) if session.submitted => Err(CardError::AlreadySubmitted),
            Some(session) => Ok(session),
        }
    }

    fn open_session_mut(&mut self) -> Result<&mut InterruptSession, CardError> {
        self.open_session_ref()?;
        self.session.as_mut().ok_or(CardError::ReadOnly(self.call.kind))
    }
}
