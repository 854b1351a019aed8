use super::context::RuntimeContext;
use super::frontend::UserInputEvent;
use super::update::UiUpdate;

/// Board state driven by the runtime loop. Stream updates and key events
/// arrive on the same thread, so implementations need no locking.
pub trait RuntimeMode {
    /// A tool-call snapshot, email context, or stream lifecycle change.
    fn on_model_update(&mut self, update: UiUpdate, ctx: &mut RuntimeContext);

    /// Ctrl-C. The default ignores it.
    fn on_interrupt(&mut self, _ctx: &mut RuntimeContext) {}

    fn on_frontend_event(&mut self, event: UserInputEvent, ctx: &mut RuntimeContext);
}
