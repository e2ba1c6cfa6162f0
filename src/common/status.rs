//! Per-file status events emitted by transfer operations.

use serde::{Deserialize, Serialize};

/// Progress token that marks a file operation as finished.
pub const COMPLETE: &str = "100%";

/// One progress update for one file in one operation.
///
/// Events are built by a producer, sent once over the status channel, and
/// never touched again by the producer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusEvent {
    pub file_name: String,
    pub state: String,
    pub progress: String,
    pub rate: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub err: Option<String>,
}

impl StatusEvent {
    /// In-flight progress update.
    pub fn progress(
        file_name: impl Into<String>,
        state: impl Into<String>,
        progress: impl Into<String>,
        rate: impl Into<String>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            state: state.into(),
            progress: progress.into(),
            rate: rate.into(),
            err: None,
        }
    }

    /// Successful completion.
    pub fn complete(file_name: impl Into<String>, state: impl Into<String>) -> Self {
        Self::progress(file_name, state, COMPLETE, "")
    }

    /// Failed operation. Any progress value is dropped.
    pub fn failed(
        file_name: impl Into<String>,
        state: impl Into<String>,
        err: impl Into<String>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            state: state.into(),
            progress: String::new(),
            rate: String::new(),
            err: Some(err.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.err.is_some()
    }

    /// True when this event reports the file as done without error.
    pub fn is_success(&self) -> bool {
        self.err.is_none() && self.progress == COMPLETE
    }
}
