//! Transfer-status pipeline: producer task -> status channel -> renderer ->
//! per-file outcomes -> verdict.

pub mod channel;
pub mod outcome;

pub use channel::{status_channel, StatusReceiver, StatusSender};
pub use outcome::FileOutcomes;

use std::sync::Arc;

use crate::common::AppError;
use crate::producer::Producer;
use crate::ui::{bar, json, plain, RenderStyle, Terminal};

/// Which renderer consumes the stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputMode {
    Structured,
    ProgressBar { nitems: usize },
    Plain,
}

impl OutputMode {
    /// `--json` wins, then a known item count, then the plain log.
    pub fn select(json: bool, nitems: usize) -> Self {
        if json {
            OutputMode::Structured
        } else if nitems > 0 {
            OutputMode::ProgressBar { nitems }
        } else {
            OutputMode::Plain
        }
    }
}

/// Drain the channel through the chosen renderer.
pub async fn render(
    receiver: StatusReceiver,
    mode: OutputMode,
    term: &mut dyn Terminal,
    style: RenderStyle,
) -> FileOutcomes {
    match mode {
        OutputMode::Structured => json::render(receiver, term).await,
        OutputMode::ProgressBar { nitems } => bar::render(receiver, nitems, term, style).await,
        OutputMode::Plain => plain::render(receiver, term, style).await,
    }
}

/// Render the whole stream, then turn the outcomes into the command verdict.
///
/// Returns only after the producer has closed the channel.
pub async fn format_output(
    receiver: StatusReceiver,
    nitems: usize,
    json: bool,
    term: &mut dyn Terminal,
    style: RenderStyle,
) -> Result<(), AppError> {
    let mode = OutputMode::select(json, nitems);
    let outcomes = render(receiver, mode, term, style).await;

    for file in outcomes.failed_files() {
        tracing::debug!(file, "Operation did not complete");
    }
    tracing::info!(
        files = outcomes.len(),
        failed = outcomes.failures(),
        "Pipeline finished"
    );

    outcomes.verdict()
}

/// One pipeline pass: spawn the producer on a fresh channel and render it.
pub async fn run<P: Producer>(
    producer: Arc<P>,
    paths: Vec<String>,
    nitems: usize,
    json: bool,
    term: &mut dyn Terminal,
    style: RenderStyle,
) -> Result<(), AppError> {
    let (sender, receiver) = status_channel();
    let task = tokio::spawn(async move { producer.produce(paths, sender).await });

    let verdict = format_output(receiver, nitems, json, term, style).await;

    if let Err(err) = task.await {
        tracing::error!("Producer task ended abnormally: {}", err);
    }
    verdict
}
