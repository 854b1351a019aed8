use super::mode::RuntimeMode;
use crate::ui::editor::EditKey;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UserInputEvent {
    Edit(EditKey),
    /// Move between editable fields of the selected card.
    Focus(Direction),
    /// Move between cards.
    Select(Direction),
    SubmitDecision,
    SubmitResponse,
    /// Copy the focused field, or the whole selected card.
    Copy,
    Interrupt,
}

pub trait FrontendAdapter<M: RuntimeMode> {
    fn poll_user_input(&mut self, mode: &M) -> Option<UserInputEvent>;
    fn render(&mut self, mode: &M);
    fn should_quit(&self) -> bool;
}
