use crate::card::{BoardContext, Card, CardBoard, CardTransition};
use crate::clipboard::{ClipboardSink, SystemClipboard};
use crate::config::Config;
use crate::render::{CardView, FocusTarget, RendererRegistry, Section};
use crate::runtime::context::RuntimeContext;
use crate::runtime::frontend::{Direction, UserInputEvent};
use crate::runtime::mode::RuntimeMode;
use crate::runtime::r#loop::Runtime;
use crate::runtime::UiUpdate;
use crate::transport::{spawn_update_stream, HttpTransport, StreamEvent};
use crate::types::ToolCall;
use crate::ui::editor::{EditKey, FieldEditor};
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamState {
    Connecting,
    Live,
    Closed,
    Failed(String),
}

impl StreamState {
    fn label(&self) -> &'static str {
        match self {
            StreamState::Connecting => "connecting",
            StreamState::Live => "live",
            StreamState::Closed => "closed",
            StreamState::Failed(_) => "failed",
        }
    }
}

/// Interactive board of approval cards.
pub struct TuiMode {
    board: CardBoard,
    registry: RendererRegistry,
    selected: Option<String>,
    focus: Option<FocusTarget>,
    editor: FieldEditor,
    stream: StreamState,
    status: String,
    clipboard: Box<dyn ClipboardSink>,
    pending_quit: bool,
    quit_requested: bool,
}

impl TuiMode {
    pub fn new(registry: RendererRegistry, context: BoardContext) -> Self {
        Self {
            board: CardBoard::new(context),
            registry,
            selected: None,
            focus: None,
            editor: FieldEditor::new(),
            stream: StreamState::Connecting,
            status: String::new(),
            clipboard: Box::new(SystemClipboard),
            pending_quit: false,
            quit_requested: false,
        }
    }

    pub fn with_clipboard(mut self, clipboard: Box<dyn ClipboardSink>) -> Self {
        self.clipboard = clipboard;
        self
    }

    pub fn board(&self) -> &CardBoard {
        &self.board
    }

    pub fn stream_state(&self) -> &StreamState {
        &self.stream
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn focus(&self) -> Option<FocusTarget> {
        self.focus
    }

    pub fn status_message(&self) -> &str {
        &self.status
    }

    /// Buffer and cursor of the focused field, if any.
    pub fn editing(&self) -> Option<(&str, usize)> {
        self.focus
            .map(|_| (self.editor.buffer(), self.editor.cursor()))
    }

    pub fn input_hint(&self) -> &'static str {
        if self.board.awaiting_input() == 0 {
            "Nothing needs your input. Up/Down to browse, Ctrl-C twice to quit."
        } else {
            "Up/Down pick a card, Tab to edit a field."
        }
    }

    pub fn status_line(&self) -> String {
        let mut line = format!(
            "stream:{} cards:{} awaiting:{}",
            self.stream.label(),
            self.board.len(),
            self.board.awaiting_input()
        );
        if !self.status.is_empty() {
            line.push_str(" | ");
            line.push_str(&self.status);
        }
        line
    }

    /// Keys that do something for the selected card right now.
    pub fn key_legend(&self) -> String {
        let mut keys = vec!["Up/Down card".to_string()];
        if let Some(view) = self.selected_card().and_then(|card| self.view_of(card)) {
            if !view.focus_targets().is_empty() {
                keys.push("Tab field".to_string());
            }
            keys.extend(
                view.actions
                    .iter()
                    .filter(|action| action.enabled)
                    .map(|action| format!("{} {}", action.keys, action.label)),
            );
        }
        if self.copy_text().is_some() {
            keys.push("Ctrl-K copy".to_string());
        }
        keys.push("Ctrl-C twice quit".to_string());
        keys.join("  ")
    }

    /// Views for every card that is currently shown, in arrival order.
    pub fn card_views(&self) -> Vec<CardView> {
        self.board
            .iter()
            .filter_map(|card| self.view_of(card))
            .collect()
    }

    pub fn selected_view_index(&self) -> Option<usize> {
        let selected = self.selected.as_deref()?;
        self.visible_ids().iter().position(|id| id == selected)
    }

    fn view_of(&self, card: &Card) -> Option<CardView> {
        self.registry
            .render(card, self.board.context())
            .ok()
            .filter(|view| !view.hidden)
    }

    fn visible_ids(&self) -> Vec<String> {
        self.board
            .iter()
            .filter(|card| self.view_of(card).is_some())
            .map(|card| card.call().id.clone())
            .collect()
    }

    fn selected_card(&self) -> Option<&Card> {
        let position = self.board.position_of(self.selected.as_deref()?)?;
        self.board.get(position)
    }

    fn selected_card_mut(&mut self) -> Option<&mut Card> {
        let position = self.board.position_of(self.selected.as_deref()?)?;
        self.board.get_mut(position)
    }

    fn selected_targets(&self) -> Vec<FocusTarget> {
        self.selected_card()
            .and_then(|card| self.view_of(card))
            .map(|view| view.focus_targets())
            .unwrap_or_default()
    }

    fn target_text(&self, target: FocusTarget) -> Option<String> {
        let card = self.selected_card()?;
        match target {
            FocusTarget::Field(field) => card.draft()?.field_text(field),
            FocusTarget::Feedback => Some(card.feedback().to_string()),
        }
    }

    /// The focused field's text, or every filled field of the selected card.
    fn copy_text(&self) -> Option<(&'static str, String)> {
        if let Some(target) = self.focus {
            let label = match target {
                FocusTarget::Field(field) => field.label(),
                FocusTarget::Feedback => "Feedback",
            };
            let text = self.editor.buffer();
            return (!text.is_empty()).then(|| (label, text.to_string()));
        }

        let view = self.selected_card().and_then(|card| self.view_of(card))?;
        let lines: Vec<String> = view
            .sections
            .iter()
            .filter_map(|section| match section {
                Section::Field(field) if !field.value.is_empty() => {
                    Some(format!("{}: {}", field.label, field.value))
                }
                Section::Text { label, text } if !text.is_empty() => {
                    Some(format!("{label}: {text}"))
                }
                _ => None,
            })
            .collect();
        (!lines.is_empty()).then(|| ("card", lines.join("\n")))
    }

    fn copy_selection(&mut self) {
        let Some((label, text)) = self.copy_text() else {
            self.status = "nothing to copy".to_string();
            return;
        };
        match self.clipboard.set_text(&text) {
            Ok(()) => self.status = format!("copied {}", label.to_lowercase()),
            Err(error) => {
                tracing::warn!(%error, "copy failed");
                self.status = error.to_string();
            }
        }
    }

    /// Keep focus on a live target and reload the editor from the card.
    fn sync_editor(&mut self) {
        let targets = self.selected_targets();
        if self.focus.is_some_and(|focus| !targets.contains(&focus)) {
            self.focus = None;
        }
        if self.focus.is_none() {
            self.focus = targets.first().copied();
        }
        let text = self
            .focus
            .and_then(|target| self.target_text(target))
            .unwrap_or_default();
        self.editor.load(&text);
    }

    fn select(&mut self, direction: Direction) {
        let ids = self.visible_ids();
        if ids.is_empty() {
            return;
        }
        let current = self.selected_view_index();
        let next = match (direction, current) {
            (_, None) => 0,
            (Direction::Previous, Some(index)) => index.saturating_sub(1),
            (Direction::Next, Some(index)) => (index + 1).min(ids.len() - 1),
        };
        self.selected = ids.get(next).cloned();
        self.focus = None;
        self.sync_editor();
    }

    fn move_focus(&mut self, direction: Direction) {
        let targets = self.selected_targets();
        if targets.is_empty() {
            return;
        }
        let current = self
            .focus
            .and_then(|focus| targets.iter().position(|target| *target == focus));
        let next = match (direction, current) {
            (_, None) => 0,
            (Direction::Next, Some(index)) => (index + 1) % targets.len(),
            (Direction::Previous, Some(0)) => targets.len() - 1,
            (Direction::Previous, Some(index)) => index - 1,
        };
        self.focus = targets.get(next).copied();
        let text = self
            .focus
            .and_then(|target| self.target_text(target))
            .unwrap_or_default();
        self.editor.load(&text);
    }

    fn apply_edit(&mut self, key: EditKey) {
        let Some(target) = self.focus else {
            return;
        };
        let multiline = match target {
            FocusTarget::Field(field) => field.is_multiline(),
            FocusTarget::Feedback => true,
        };
        if !self.editor.apply(key, multiline) {
            return;
        }
        let text = self.editor.buffer().to_string();
        let Some(card) = self.selected_card_mut() else {
            return;
        };
        let result = match target {
            FocusTarget::Field(field) => card.edit_field(field, &text),
            FocusTarget::Feedback => card.set_feedback(&text),
        };
        if let Err(error) = result {
            self.status = error.to_string();
        }
    }

    fn submit(&mut self, ctx: &RuntimeContext, decision: bool) {
        let Some(card) = self.selected_card_mut() else {
            self.status = "no card selected".to_string();
            return;
        };
        let kind = card.kind();
        let outcome = if decision {
            card.submit_decision(ctx.transport())
        } else {
            card.submit_response(ctx.transport())
        };
        self.status = match outcome {
            Ok(command) => format!("{kind}: sent {}", command.resume_type().as_str()),
            Err(error) => {
                tracing::debug!(%kind, %error, "submission refused");
                format!("{kind}: {error}")
            }
        };
        self.sync_editor();
    }

    fn on_tool_call(&mut self, call: ToolCall) {
        let id = call.id.clone();
        let kind = call.kind;
        let transition = self.board.apply(call);
        let is_selected = self.selected.as_deref() == Some(id.as_str());

        match transition {
            CardTransition::Opened => {
                tracing::info!(call_id = %id, %kind, "interrupt opened");
                self.status = format!("{kind} needs your input");
                let selected_waiting = self
                    .selected_card()
                    .is_some_and(|card| card.is_awaiting_input());
                if !selected_waiting {
                    self.selected = Some(id);
                    self.focus = None;
                    self.sync_editor();
                    return;
                }
            }
            CardTransition::Reseeded => {
                tracing::info!(call_id = %id, %kind, "proposal updated");
                self.status = format!("{kind} was updated by the assistant");
            }
            CardTransition::Closed { unsent: true } => {
                tracing::warn!(call_id = %id, %kind, "interrupt resolved before a decision was sent");
                self.status = format!("{kind} resolved elsewhere; draft discarded");
            }
            CardTransition::Closed { unsent: false } | CardTransition::Unchanged => {}
        }

        if self.selected.is_none() && self.visible_ids().contains(&id) {
            self.selected = Some(id);
            self.sync_editor();
        } else if is_selected && transition != CardTransition::Unchanged {
            self.sync_editor();
        }
    }
}

impl RuntimeMode for TuiMode {
    fn on_model_update(&mut self, update: UiUpdate, _ctx: &mut RuntimeContext) {
        match update {
            UiUpdate::ToolCall(call) => {
                self.stream = StreamState::Live;
                self.on_tool_call(call);
            }
            UiUpdate::Email(email) => {
                self.stream = StreamState::Live;
                self.board.set_email(email);
            }
            UiUpdate::StreamError(message) => {
                tracing::warn!(%message, "tool call stream failed");
                self.status = format!("stream error: {message}");
                self.stream = StreamState::Failed(message);
            }
            UiUpdate::StreamClosed => {
                if !matches!(self.stream, StreamState::Failed(_)) {
                    self.stream = StreamState::Closed;
                }
            }
        }
    }

    fn on_interrupt(&mut self, _ctx: &mut RuntimeContext) {
        if self.pending_quit {
            self.quit_requested = true;
        } else {
            self.pending_quit = true;
            self.status = "press Ctrl-C again to quit".to_string();
        }
    }

    fn on_frontend_event(&mut self, event: UserInputEvent, ctx: &mut RuntimeContext) {
        if event == UserInputEvent::Interrupt {
            self.on_interrupt(ctx);
            return;
        }
        self.pending_quit = false;
        match event {
            UserInputEvent::Edit(key) => self.apply_edit(key),
            UserInputEvent::Focus(direction) => self.move_focus(direction),
            UserInputEvent::Select(direction) => self.select(direction),
            UserInputEvent::SubmitDecision => self.submit(ctx, true),
            UserInputEvent::SubmitResponse => self.submit(ctx, false),
            UserInputEvent::Copy => self.copy_selection(),
            UserInputEvent::Interrupt => {}
        }
    }
}

async fn forward_stream_events(
    mut events: mpsc::UnboundedReceiver<Result<StreamEvent, String>>,
    updates: mpsc::UnboundedSender<UiUpdate>,
) {
    while let Some(event) = events.recv().await {
        let update = match event {
            Ok(event) => UiUpdate::from(event),
            Err(message) => UiUpdate::StreamError(message),
        };
        if updates.send(update).is_err() {
            return;
        }
    }
}

/// Wire the HTTP transport, the update stream and the card board together.
/// Must be called inside a tokio runtime. The returned handle is the resume
/// worker; pass it to `finish_resume_worker` once the context is dropped.
pub fn build_runtime(
    config: &Config,
) -> Result<(Runtime<TuiMode>, RuntimeContext, JoinHandle<()>)> {
    let registry = RendererRegistry::standard();
    registry.ensure_exhaustive()?;

    let (transport, worker) = HttpTransport::spawn(config);
    let cancel = CancellationToken::new();

    let (event_tx, event_rx) = mpsc::unbounded_channel::<Result<StreamEvent, String>>();
    let (update_tx, update_rx) = mpsc::unbounded_channel::<UiUpdate>();
    spawn_update_stream(config, event_tx, cancel.clone());
    tokio::spawn(forward_stream_events(event_rx, update_tx));

    let context = BoardContext {
        email: None,
        gmail_url: config.gmail_url.clone(),
    };
    let mode = TuiMode::new(registry, context);
    let ctx = RuntimeContext::new(Arc::new(transport), cancel);
    Ok((Runtime::new(mode, update_rx), ctx, worker))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::ClipboardError;
    use crate::draft::DraftField;
    use crate::transport::ChannelTransport;
    use crate::types::{ResumePayload, ResumeType, ToolKind, ToolStatus};
    use serde_json::{json, Value};

    fn setup() -> (TuiMode, RuntimeContext, mpsc::UnboundedReceiver<ResumePayload>) {
        let (transport, rx) = ChannelTransport::new();
        let ctx = RuntimeContext::new(Arc::new(transport), CancellationToken::new());
        let mode = TuiMode::new(RendererRegistry::standard(), BoardContext::default());
        (mode, ctx, rx)
    }

    fn call(id: &str, kind: ToolKind, args: Value, status: ToolStatus) -> UiUpdate {
        UiUpdate::ToolCall(
            ToolCall::new(id, kind, args.as_object().cloned().unwrap_or_default())
                .with_status(status),
        )
    }

    fn type_text(mode: &mut TuiMode, ctx: &mut RuntimeContext, text: &str) {
        mode.on_frontend_event(UserInputEvent::Edit(EditKey::Insert(text.to_string())), ctx);
    }

    #[test]
    fn test_interrupt_selects_card_and_focuses_first_field() {
        let (mut mode, mut ctx, _rx) = setup();
        mode.on_model_update(
            call(
                "a",
                ToolKind::StartNewEmailThread,
                json!({"recipients": ["a@x.com"], "subject": "Hi", "content": "Body"}),
                ToolStatus::Interrupted,
            ),
            &mut ctx,
        );

        assert_eq!(mode.selected_view_index(), Some(0));
        assert_eq!(mode.focus(), Some(FocusTarget::Field(DraftField::Recipients)));
        assert_eq!(mode.editing().map(|(text, _)| text), Some("a@x.com"));
        assert_eq!(mode.stream_state(), &StreamState::Live);
        assert_eq!(
            mode.key_legend(),
            "Up/Down card  Tab field  Ctrl-S Send Email  Ctrl-K copy  Ctrl-C twice quit"
        );
    }

    #[test]
    fn test_editing_then_submitting_sends_edit() {
        let (mut mode, mut ctx, mut rx) = setup();
        mode.on_model_update(
            call(
                "a",
                ToolKind::StartNewEmailThread,
                json!({"recipients": ["a@x.com"], "subject": "Hi", "content": "Body"}),
                ToolStatus::Interrupted,
            ),
            &mut ctx,
        );
        mode.on_frontend_event(UserInputEvent::Focus(Direction::Next), &mut ctx);
        assert_eq!(mode.focus(), Some(FocusTarget::Field(DraftField::Subject)));
        type_text(&mut mode, &mut ctx, " there");

        mode.on_frontend_event(UserInputEvent::SubmitDecision, &mut ctx);
        let payload = rx.try_recv().expect("payload");
        let entry = &payload.command.resume[0];
        assert_eq!(entry.kind, ResumeType::Edit);
        assert_eq!(entry.args["args"]["subject"], json!("Hi there"));
        assert_eq!(mode.focus(), None);
        assert!(mode.status_message().contains("sent edit"));
    }

    #[test]
    fn test_question_answer_goes_out_raw() {
        let (mut mode, mut ctx, mut rx) = setup();
        mode.on_model_update(
            call(
                "q",
                ToolKind::MessageUser,
                json!({"question_for_user": "Confirm send?"}),
                ToolStatus::Interrupted,
            ),
            &mut ctx,
        );
        assert_eq!(mode.focus(), Some(FocusTarget::Field(DraftField::Response)));
        type_text(&mut mode, &mut ctx, "Yes");
        mode.on_frontend_event(UserInputEvent::SubmitResponse, &mut ctx);

        let payload = rx.try_recv().expect("payload");
        assert_eq!(
            payload.to_value(),
            json!({"command": {"resume": [{"type": "response", "args": "Yes"}]}})
        );
    }

    #[test]
    fn test_pending_questions_are_not_selectable() {
        let (mut mode, mut ctx, _rx) = setup();
        mode.on_model_update(
            call("q", ToolKind::MessageUser, json!({}), ToolStatus::Pending),
            &mut ctx,
        );
        assert!(mode.card_views().is_empty());
        assert_eq!(mode.selected_view_index(), None);
    }

    #[test]
    fn test_second_interrupt_waits_behind_the_first() {
        let (mut mode, mut ctx, _rx) = setup();
        mode.on_model_update(
            call("a", ToolKind::WriteEmailResponse, json!({}), ToolStatus::Interrupted),
            &mut ctx,
        );
        mode.on_model_update(
            call("b", ToolKind::SendCalendarInvite, json!({}), ToolStatus::Interrupted),
            &mut ctx,
        );
        assert_eq!(mode.selected_view_index(), Some(0));

        mode.on_frontend_event(UserInputEvent::Select(Direction::Next), &mut ctx);
        assert_eq!(mode.selected_view_index(), Some(1));
        assert_eq!(mode.focus(), Some(FocusTarget::Field(DraftField::EventTitle)));
    }

    #[derive(Clone, Default)]
    struct RecordingClipboard(Arc<std::sync::Mutex<Vec<String>>>);

    impl ClipboardSink for RecordingClipboard {
        fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
            self.0.lock().expect("clipboard lock").push(text.to_string());
            Ok(())
        }
    }

    struct NoDisplay;

    impl ClipboardSink for NoDisplay {
        fn set_text(&mut self, _text: &str) -> Result<(), ClipboardError> {
            Err(ClipboardError::Unavailable("no display".to_string()))
        }
    }

    fn new_thread(status: ToolStatus) -> UiUpdate {
        call(
            "a",
            ToolKind::StartNewEmailThread,
            json!({"recipients": ["a@x.com"], "subject": "Hi", "content": "Body"}),
            status,
        )
    }

    #[test]
    fn test_copy_takes_the_focused_field() {
        let clipboard = RecordingClipboard::default();
        let (mode, mut ctx, _rx) = setup();
        let mut mode = mode.with_clipboard(Box::new(clipboard.clone()));
        mode.on_model_update(new_thread(ToolStatus::Interrupted), &mut ctx);
        mode.on_frontend_event(UserInputEvent::Focus(Direction::Next), &mut ctx);

        mode.on_frontend_event(UserInputEvent::Copy, &mut ctx);

        assert_eq!(*clipboard.0.lock().expect("lock"), vec!["Hi".to_string()]);
        assert_eq!(mode.status_message(), "copied subject");
    }

    #[test]
    fn test_copy_without_focus_takes_the_whole_card() {
        let clipboard = RecordingClipboard::default();
        let (mode, mut ctx, _rx) = setup();
        let mut mode = mode.with_clipboard(Box::new(clipboard.clone()));
        mode.on_model_update(new_thread(ToolStatus::Interrupted), &mut ctx);
        mode.on_model_update(new_thread(ToolStatus::Completed), &mut ctx);
        assert_eq!(mode.focus(), None);

        mode.on_frontend_event(UserInputEvent::Copy, &mut ctx);

        let copied = clipboard.0.lock().expect("lock").clone();
        assert_eq!(copied.len(), 1);
        assert!(copied[0].starts_with("Recipients: a@x.com"));
        assert!(copied[0].contains("Subject: Hi"));
        assert!(copied[0].contains("Content: Body"));
    }

    #[test]
    fn test_copy_failure_lands_in_the_status_line() {
        let (mode, mut ctx, _rx) = setup();
        let mut mode = mode.with_clipboard(Box::new(NoDisplay));
        mode.on_frontend_event(UserInputEvent::Copy, &mut ctx);
        assert_eq!(mode.status_message(), "nothing to copy");

        mode.on_model_update(new_thread(ToolStatus::Interrupted), &mut ctx);
        mode.on_frontend_event(UserInputEvent::Copy, &mut ctx);
        assert_eq!(mode.status_message(), "clipboard unavailable: no display");
    }

    #[test]
    fn test_unsent_draft_discard_is_reported() {
        let (mut mode, mut ctx, _rx) = setup();
        mode.on_model_update(
            call("a", ToolKind::WriteEmailResponse, json!({}), ToolStatus::Interrupted),
            &mut ctx,
        );
        mode.on_model_update(
            call("a", ToolKind::WriteEmailResponse, json!({}), ToolStatus::Completed),
            &mut ctx,
        );
        assert!(mode.status_message().contains("draft discarded"));
        assert_eq!(mode.editing(), None);
    }

    #[test]
    fn test_ctrl_c_twice_quits_and_other_input_disarms() {
        let (mut mode, mut ctx, _rx) = setup();
        mode.on_interrupt(&mut ctx);
        mode.on_frontend_event(UserInputEvent::Select(Direction::Next), &mut ctx);
        mode.on_interrupt(&mut ctx);
        assert!(!mode.quit_requested());
        mode.on_interrupt(&mut ctx);
        assert!(mode.quit_requested());
    }

    #[test]
    fn test_stream_failure_sticks_after_close() {
        let (mut mode, mut ctx, _rx) = setup();
        mode.on_model_update(UiUpdate::StreamError("refused".to_string()), &mut ctx);
        mode.on_model_update(UiUpdate::StreamClosed, &mut ctx);
        assert_eq!(mode.stream_state(), &StreamState::Failed("refused".to_string()));
        assert!(mode.status_line().starts_with("stream:failed cards:0 awaiting:0"));
    }

    #[tokio::test]
    async fn test_forwarder_maps_stream_results() {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (update_tx, mut update_rx) = mpsc::unbounded_channel();
        event_tx.send(Err("lost".to_string())).expect("send");
        drop(event_tx);

        forward_stream_events(event_rx, update_tx).await;
        assert_eq!(
            update_rx.recv().await,
            Some(UiUpdate::StreamError("lost".to_string()))
        );
        assert_eq!(update_rx.recv().await, None);
    }
}
