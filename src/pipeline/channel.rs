//! Unbounded status channel between a producer task and one renderer.
//!
//! Closing happens when the last [`StatusSender`] is dropped. The receiver
//! sees `None` only after every event sent before that point.

use tokio::sync::mpsc;

use crate::common::StatusEvent;

/// Create a fresh channel for one pipeline pass.
pub fn status_channel() -> (StatusSender, StatusReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (StatusSender { inner: tx }, StatusReceiver { inner: rx })
}

/// Producer half. Never blocks.
#[derive(Clone, Debug)]
pub struct StatusSender {
    inner: mpsc::UnboundedSender<StatusEvent>,
}

impl StatusSender {
    /// Queue an event. Returns false if the receiver is already gone.
    pub fn send(&self, event: StatusEvent) -> bool {
        match self.inner.send(event) {
            Ok(()) => true,
            Err(mpsc::error::SendError(event)) => {
                tracing::debug!(file = %event.file_name, "Status receiver dropped, event discarded");
                false
            }
        }
    }
}

/// Consumer half. Single reader.
#[derive(Debug)]
pub struct StatusReceiver {
    inner: mpsc::UnboundedReceiver<StatusEvent>,
}

impl StatusReceiver {
    /// Next event in producer order, or `None` once the producer closed.
    pub async fn recv(&mut self) -> Option<StatusEvent> {
        self.inner.recv().await
    }
}
