use crate::transport::ResumeTransport;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Per-session handles passed into every `RuntimeMode` callback.
pub struct RuntimeContext {
    transport: Arc<dyn ResumeTransport>,
    cancel: CancellationToken,
}

impl RuntimeContext {
    pub fn new(transport: Arc<dyn ResumeTransport>, cancel: CancellationToken) -> Self {
        Self { transport, cancel }
    }

    pub fn transport(&self) -> &dyn ResumeTransport {
        self.transport.as_ref()
    }

    /// Stops background stream work tied to this session.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    pub fn is_shut_down(&self) -> bool {
        self.cancel.is_cancelled()
    }
}
