use super::common::{banner, field_view, AWAITING_INPUT, CANCELLED};
use super::{
    ActionKind, ActionView, CardInput, CardRenderer, CardView, FocusTarget, Section, TextBoxView,
};
use crate::classify::{Banner, GENERIC_FAILURE};
use crate::draft::DraftField;
use crate::types::ToolKind;

/// A question from the agent. Hidden while pending; answered in free text.
pub struct MessageUserCard;

impl CardRenderer for MessageUserCard {
    fn kind(&self) -> ToolKind {
        ToolKind::MessageUser
    }

    fn render(&self, input: &CardInput<'_>) -> CardView {
        let tone = input.classification.tone;
        let mut view = CardView::new(self.kind(), "Question", tone);
        let question = input
            .call
            .arg_str("question_for_user")
            .unwrap_or_default()
            .to_string();

        match &input.classification.banner {
            Banner::InProgress => {
                view.hidden = true;
                return view;
            }
            Banner::Error(message) => {
                let headline = message.as_deref().unwrap_or(GENERIC_FAILURE);
                view.banner = Some(banner(tone, headline, None));
            }
            Banner::Cancelled => view.banner = Some(banner(tone, CANCELLED, None)),
            Banner::FeedbackProvided(text) => {
                view.banner = Some(banner(tone, "Response received", Some(text.clone())));
            }
            Banner::Success(_) => {
                let result = input.call.result_text().map(str::to_string);
                view.banner = Some(banner(tone, "Response received", result));
            }
            Banner::AwaitingInput => view.banner = Some(banner(tone, AWAITING_INPUT, None)),
        }

        view.sections.push(Section::Text {
            label: "Question",
            text: question,
        });

        if input.awaiting_input {
            if let Some(draft) = input.draft {
                let response = field_view(draft, DraftField::Response, true);
                view.sections.push(Section::Input(TextBoxView {
                    label: response.label,
                    text: response.value,
                    placeholder: response.placeholder,
                    target: FocusTarget::Field(DraftField::Response),
                }));
            }
            view.actions.push(ActionView {
                kind: ActionKind::Respond,
                label: "Submit Response",
                keys: "Ctrl-R",
                enabled: input.can_submit_response,
            });
        }
        view.gmail_link = input.context.gmail_link();
        view
    }
}
