use super::{
    ActionKind, ActionView, BannerView, CardInput, CardView, FieldView, FocusTarget, Section,
    TextBoxView,
};
use crate::classify::{Banner, BorderTone};
use crate::draft::{DraftField, EditableDraft};

pub(super) const AWAITING_INPUT: &str = "Awaiting user input...";
pub(super) const CANCELLED: &str = "Tool Call Cancelled";
pub(super) const FEEDBACK_PROVIDED: &str = "Feedback provided:";

/// Fixed wording for one of the editable approval cards.
pub(super) struct EditableCopy {
    pub title: &'static str,
    pub pending: &'static str,
    pub success: &'static str,
    pub error: &'static str,
    pub submit: &'static str,
    pub feedback_placeholder: &'static str,
}

/// Banner for a card, given the per-kind wording for the pending, success
/// and error states.
pub(super) fn status_banner(
    input: &CardInput<'_>,
    pending: &str,
    success: &str,
    error: &str,
) -> BannerView {
    let tone = input.classification.tone;
    match &input.classification.banner {
        Banner::InProgress => banner(tone, pending, None),
        Banner::AwaitingInput => banner(tone, AWAITING_INPUT, None),
        Banner::Cancelled => banner(tone, CANCELLED, None),
        Banner::FeedbackProvided(text) => banner(tone, FEEDBACK_PROVIDED, Some(text.clone())),
        Banner::Error(message) => banner(tone, error, message.clone()),
        Banner::Success(_) => banner(tone, success, None),
    }
}

pub(super) fn banner(tone: BorderTone, headline: &str, detail: Option<String>) -> BannerView {
    BannerView {
        tone,
        headline: headline.to_string(),
        detail: detail.filter(|text| !text.trim().is_empty()),
    }
}

/// Shared layout for the editable cards: one row per draft field, the
/// feedback box and both submit actions while the call awaits input.
pub(super) fn render_editable(copy: &EditableCopy, input: &CardInput<'_>) -> CardView {
    let kind = input.call.kind;
    let mut view = CardView::new(kind, copy.title, input.classification.tone);
    view.banner = Some(status_banner(input, copy.pending, copy.success, copy.error));
    view.gmail_link = input.context.gmail_link();

    // Outside an interrupt the fields show what the agent proposed.
    let shown = match input.draft {
        Some(draft) => Some(draft.clone()),
        None => EditableDraft::seed(kind, &input.call.proposed_args),
    };
    if let Some(draft) = shown.as_ref() {
        for &field in draft.fields() {
            view.sections.push(Section::Field(field_view(draft, field, input.awaiting_input)));
        }
    }

    if input.awaiting_input {
        view.sections.push(Section::Input(TextBoxView {
            label: "Feedback",
            text: input.feedback.to_string(),
            placeholder: copy.feedback_placeholder,
            target: FocusTarget::Feedback,
        }));
        view.actions.push(ActionView {
            kind: ActionKind::Decide,
            label: copy.submit,
            keys: "Ctrl-S",
            enabled: true,
        });
        view.actions.push(ActionView {
            kind: ActionKind::Respond,
            label: "Send Feedback",
            keys: "Ctrl-R",
            enabled: input.can_submit_response,
        });
    }
    view
}

pub(super) fn field_view(draft: &EditableDraft, field: DraftField, editable: bool) -> FieldView {
    FieldView {
        label: field.label(),
        value: draft.field_text(field).unwrap_or_default(),
        placeholder: placeholder(field),
        target: editable.then_some(FocusTarget::Field(field)),
    }
}

fn placeholder(field: DraftField) -> &'static str {
    match field {
        DraftField::Recipients | DraftField::Emails => "a@example.com, b@example.com",
        DraftField::StartTime | DraftField::EndTime => "2024-07-01T14:00:00",
        DraftField::Timezone => "America/New_York",
        DraftField::Response => "Type your response...",
        _ => "",
    }
}
