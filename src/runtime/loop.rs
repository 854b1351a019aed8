use crate::runtime::UiUpdate;
use tokio::sync::mpsc::{self, error::TryRecvError};

use super::{
    context::RuntimeContext,
    frontend::{FrontendAdapter, UserInputEvent},
    mode::RuntimeMode,
};

pub struct Runtime<M: RuntimeMode> {
    pub mode: M,
    update_rx: mpsc::UnboundedReceiver<UiUpdate>,
    updates_closed: bool,
}

impl<M: RuntimeMode> Runtime<M> {
    pub fn new(mode: M, update_rx: mpsc::UnboundedReceiver<UiUpdate>) -> Self {
        Self {
            mode,
            update_rx,
            updates_closed: false,
        }
    }

    /// Hand every queued update to the mode without blocking.
    pub fn drain_updates(&mut self, ctx: &mut RuntimeContext) {
        while !self.updates_closed {
            match self.update_rx.try_recv() {
                Ok(update) => self.mode.on_model_update(update, ctx),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.updates_closed = true;
                    self.mode.on_model_update(UiUpdate::StreamClosed, ctx);
                }
            }
        }
    }

    pub fn dispatch(&mut self, event: UserInputEvent, ctx: &mut RuntimeContext) {
        match event {
            UserInputEvent::Interrupt => self.mode.on_interrupt(ctx),
            other => self.mode.on_frontend_event(other, ctx),
        }
    }

    pub async fn run<F: FrontendAdapter<M>>(&mut self, frontend: &mut F, ctx: &mut RuntimeContext) {
        loop {
            self.drain_updates(ctx);
            if let Some(event) = frontend.poll_user_input(&self.mode) {
                self.dispatch(event, ctx);
            }
            if frontend.should_quit() {
                break;
            }
            frontend.render(&self.mode);
            tokio::task::yield_now().await;
        }
        ctx.shutdown();
    }
}
