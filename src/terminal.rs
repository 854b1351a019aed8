use crossterm::{
    cursor::Show,
    event::{
        DisableBracketedPaste, EnableBracketedPaste, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, BufWriter, Stdout};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Once;

pub type BoardTerminal = Terminal<CrosstermBackend<BufWriter<Stdout>>>;

static PANIC_HOOK_INSTALLED: Once = Once::new();
static KEYBOARD_FLAGS_PUSHED: AtomicBool = AtomicBool::new(false);

/// Owns the alternate screen for the lifetime of the card board and puts
/// the shell back when dropped, on panic as well as on quit.
pub struct TerminalSession {
    terminal: BoardTerminal,
}

impl TerminalSession {
    pub fn enter() -> anyhow::Result<Self> {
        install_panic_hook_once();

        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, EnableBracketedPaste)?;
        push_keyboard_flags();

        let mut terminal = Terminal::new(CrosstermBackend::new(BufWriter::new(io::stdout())))?;
        terminal.clear()?;
        tracing::debug!(
            keyboard_flags = KEYBOARD_FLAGS_PUSHED.load(Ordering::Relaxed),
            "terminal entered alternate screen"
        );
        Ok(Self { terminal })
    }

    pub fn terminal_mut(&mut self) -> &mut BoardTerminal {
        &mut self.terminal
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        restore();
    }
}

/// Ctrl-J and Enter only arrive as distinct keys on terminals that take the
/// disambiguation flag; elsewhere both read as Enter.
fn push_keyboard_flags() {
    if !matches!(crossterm::terminal::supports_keyboard_enhancement(), Ok(true)) {
        return;
    }
    let pushed = execute!(
        io::stdout(),
        PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
    )
    .is_ok();
    KEYBOARD_FLAGS_PUSHED.store(pushed, Ordering::Relaxed);
}

fn install_panic_hook_once() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            restore();
            original_hook(panic_info);
        }));
    });
}

/// Best effort; safe to call more than once.
pub fn restore() {
    if KEYBOARD_FLAGS_PUSHED.swap(false, Ordering::Relaxed) {
        let _ = execute!(io::stdout(), PopKeyboardEnhancementFlags);
    }
    let _ = disable_raw_mode();
    let _ = execute!(
        io::stdout(),
        LeaveAlternateScreen,
        DisableBracketedPaste,
        Show
    );
}
