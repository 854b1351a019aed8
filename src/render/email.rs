use super::common::{render_editable, status_banner, EditableCopy};
use super::{CardInput, CardRenderer, CardView, Section};
use crate::types::ToolKind;

const EMAIL_REPLY: EditableCopy = EditableCopy {
    title: "Email Response",
    pending: "Sending Email Response...",
    success: "Email Successfully Sent",
    error: "Could not send email",
    submit: "Send Email",
    feedback_placeholder: "Tell the assistant what to change...",
};

const NEW_THREAD: EditableCopy = EditableCopy {
    title: "New Email",
    pending: "Sending Email...",
    success: "Email Successfully Sent",
    error: "Could not send email",
    submit: "Send Email",
    feedback_placeholder: "Tell the assistant what to change...",
};

pub struct EmailReplyCard;

impl CardRenderer for EmailReplyCard {
    fn kind(&self) -> ToolKind {
        ToolKind::WriteEmailResponse
    }

    fn render(&self, input: &CardInput<'_>) -> CardView {
        render_editable(&EMAIL_REPLY, input)
    }
}

pub struct NewThreadCard;

impl CardRenderer for NewThreadCard {
    fn kind(&self) -> ToolKind {
        ToolKind::StartNewEmailThread
    }

    fn render(&self, input: &CardInput<'_>) -> CardView {
        render_editable(&NEW_THREAD, input)
    }
}

/// Informational: the agent marked the thread read.
pub struct MarkAsReadCard;

impl CardRenderer for MarkAsReadCard {
    fn kind(&self) -> ToolKind {
        ToolKind::EmailMarkedAsRead
    }

    fn render(&self, input: &CardInput<'_>) -> CardView {
        let mut view = CardView::new(self.kind(), "Mark as Read", input.classification.tone);
        let mut banner = status_banner(
            input,
            "Marking email as read...",
            "Email marked as read",
            "Could not mark email as read",
        );
        if banner.detail.is_none() && input.classification.is_editable() {
            banner.detail = Some("Nothing to approve for this step.".to_string());
        }
        view.banner = Some(banner);
        if let Some(subject) = input
            .context
            .email
            .as_ref()
            .and_then(|email| email.subject.as_deref())
            .map(str::trim)
            .filter(|subject| !subject.is_empty())
        {
            view.sections.push(Section::Text {
                label: "Subject",
                text: subject.to_string(),
            });
        }
        view.gmail_link = input.context.gmail_link();
        view
    }
}
