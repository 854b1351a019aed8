use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use mailcards::app::{build_runtime, TuiMode};
use mailcards::config::Config;
use mailcards::runtime::frontend::{Direction, FrontendAdapter, UserInputEvent};
use mailcards::terminal::TerminalSession;
use mailcards::transport::finish_resume_worker;
use mailcards::transport::logging::init_tracing;
use mailcards::ui::editor::EditKey;
use mailcards::ui::layout::split_board_layout;
use mailcards::ui::render::{input_visual_rows, render_cards, render_input, render_status_line};
use ratatui::widgets::Clear;
use std::time::Duration;

const MAX_INPUT_PANE_ROWS: usize = 6;
const RESUME_FLUSH_GRACE: Duration = Duration::from_secs(3);

struct ManagedTuiFrontend {
    session: TerminalSession,
    quit: bool,
}

impl ManagedTuiFrontend {
    fn new() -> Result<Self> {
        let session = TerminalSession::enter()?;
        Self::drain_startup_events();
        Ok(Self {
            session,
            quit: false,
        })
    }

    fn drain_startup_events() {
        for _ in 0..1024 {
            match event::poll(Duration::from_millis(0)) {
                Ok(true) => {
                    if event::read().is_err() {
                        break;
                    }
                }
                Ok(false) | Err(_) => break,
            }
        }
    }
}

fn map_key(key: KeyEvent) -> Option<UserInputEvent> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let edit = |edit_key: EditKey| Some(UserInputEvent::Edit(edit_key));
    match key.code {
        KeyCode::Char('c') if ctrl => Some(UserInputEvent::Interrupt),
        KeyCode::Char('s') if ctrl => Some(UserInputEvent::SubmitDecision),
        KeyCode::Char('r') if ctrl => Some(UserInputEvent::SubmitResponse),
        KeyCode::Char('z') if ctrl => edit(EditKey::Undo),
        KeyCode::Char('y') if ctrl => edit(EditKey::Redo),
        KeyCode::Char('k') if ctrl => Some(UserInputEvent::Copy),
        KeyCode::Char('j') if ctrl => edit(EditKey::Newline),
        KeyCode::Enter => edit(EditKey::Newline),
        KeyCode::Tab => Some(UserInputEvent::Focus(Direction::Next)),
        KeyCode::BackTab => Some(UserInputEvent::Focus(Direction::Previous)),
        KeyCode::Up | KeyCode::PageUp => Some(UserInputEvent::Select(Direction::Previous)),
        KeyCode::Down | KeyCode::PageDown => Some(UserInputEvent::Select(Direction::Next)),
        KeyCode::Left => edit(EditKey::Left),
        KeyCode::Right => edit(EditKey::Right),
        KeyCode::Home => edit(EditKey::Home),
        KeyCode::End => edit(EditKey::End),
        KeyCode::Backspace => edit(EditKey::Backspace),
        KeyCode::Delete => edit(EditKey::Delete),
        KeyCode::Char(ch) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
            edit(EditKey::Insert(ch.to_string()))
        }
        _ => None,
    }
}

impl FrontendAdapter<TuiMode> for ManagedTuiFrontend {
    fn poll_user_input(&mut self, mode: &TuiMode) -> Option<UserInputEvent> {
        if mode.quit_requested() {
            self.quit = true;
            return None;
        }

        let Ok(has_event) = event::poll(Duration::from_millis(16)) else {
            self.quit = true;
            return None;
        };
        if !has_event {
            return None;
        }

        let Ok(ev) = event::read() else {
            self.quit = true;
            return None;
        };

        match ev {
            Event::Key(key) if key.kind != KeyEventKind::Release => map_key(key),
            Event::Paste(text) if !text.contains('\u{1b}') => {
                Some(UserInputEvent::Edit(EditKey::Insert(text)))
            }
            _ => None,
        }
    }

    fn render(&mut self, mode: &TuiMode) {
        let status = mode.status_line();
        let views = mode.card_views();
        let selected = mode.selected_view_index();
        let focus = mode.focus();
        let editing = mode.editing();
        let hint = mode.input_hint();
        let legend = mode.key_legend();

        let _ = self.session.terminal_mut().draw(|frame| {
            let area = frame.area();
            frame.render_widget(Clear, area);
            let input_width = area.width.saturating_sub(2).max(1) as usize;
            let input_rows = editing
                .map(|(text, _)| input_visual_rows(text, input_width).min(MAX_INPUT_PANE_ROWS))
                .unwrap_or(1) as u16;
            let panes = split_board_layout(area, input_rows);

            render_status_line(frame, panes.status, &status);
            render_cards(frame, panes.cards, &views, selected, focus);
            render_input(frame, panes.editor, editing, hint);
            render_status_line(frame, panes.legend, &legend);
        });
    }

    fn should_quit(&self) -> bool {
        self.quit
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    config.validate()?;
    init_tracing()?;

    let (mut runtime, mut ctx, worker) = build_runtime(&config)?;
    let mut frontend = ManagedTuiFrontend::new()?;
    runtime.run(&mut frontend, &mut ctx).await;
    drop(frontend);

    drop(runtime);
    drop(ctx);
    finish_resume_worker(worker, RESUME_FLUSH_GRACE).await;
    Ok(())
}
