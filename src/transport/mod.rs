pub mod client;
pub mod logging;
pub mod stream;

pub use client::{finish_resume_worker, spawn_update_stream, HttpTransport};
pub use stream::{StreamEvent, StreamParser};

use crate::types::ResumePayload;
use tokio::sync::mpsc;

/// Outbound half of the orchestrator connection.
///
/// `submit` is fire-and-forget: completion only becomes visible through the
/// next pushed tool-call state.
pub trait ResumeTransport: Send + Sync {
    fn submit(&self, payload: ResumePayload);
}

/// Hands payloads to an in-process receiver.
#[derive(Clone)]
pub struct ChannelTransport {
    tx: mpsc::UnboundedSender<ResumePayload>,
}

impl ChannelTransport {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ResumePayload>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl ResumeTransport for ChannelTransport {
    fn submit(&self, payload: ResumePayload) {
        if self.tx.send(payload).is_err() {
            tracing::warn!("resume receiver dropped; payload discarded");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ResumeCommand;

    #[test]
    fn test_channel_transport_delivers_each_payload_separately() {
        let (transport, mut rx) = ChannelTransport::new();
        transport.submit(ResumeCommand::Accept.into_payload());
        transport.submit(ResumeCommand::Response("later".to_string()).into_payload());

        let first = rx.try_recv().expect("first payload");
        let second = rx.try_recv().expect("second payload");
        assert_eq!(first.command.resume.len(), 1);
        assert_eq!(second.command.resume.len(), 1);
        assert!(rx.try_recv().is_err());
    }
}
