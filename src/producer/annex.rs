//! git-annex backed producer.
//!
//! Runs `git annex <op> --json [--json-progress]` and turns each JSON line
//! into a [`StatusEvent`].

use std::collections::HashMap;
use std::process::Stdio;
use std::time::Instant;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

use super::git::{args, spawn_error, with_paths, Git};
use super::Producer;
use crate::common::status::COMPLETE;
use crate::common::StatusEvent;
use crate::pipeline::StatusSender;

/// File operations driven through git-annex.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnnexOp {
    Lock,
    Unlock,
    Get,
    Upload,
    RemoveContent,
}

impl AnnexOp {
    /// Label shown in front of each file.
    pub fn state(self) -> &'static str {
        match self {
            AnnexOp::Lock => "Locking",
            AnnexOp::Unlock => "Unlocking",
            AnnexOp::Get => "Downloading",
            AnnexOp::Upload => "Uploading",
            AnnexOp::RemoveContent => "Removing content",
        }
    }

    fn argv(self, remote: &str, paths: &[String]) -> Vec<String> {
        let mut argv = match self {
            AnnexOp::Lock => args(&["annex", "lock", "--json"]),
            AnnexOp::Unlock => args(&["annex", "unlock", "--json"]),
            AnnexOp::Get => args(&["annex", "get", "--json", "--json-progress"]),
            AnnexOp::Upload => args(&[
                "annex",
                "copy",
                "--json",
                "--json-progress",
                "--to",
                remote,
            ]),
            AnnexOp::RemoveContent => args(&["annex", "drop", "--json"]),
        };
        with_paths(&mut argv, paths);
        argv
    }
}

pub struct AnnexProducer {
    git: Git,
    op: AnnexOp,
    remote: String,
}

impl AnnexProducer {
    pub fn new(git: Git, op: AnnexOp, remote: impl Into<String>) -> Self {
        Self {
            git,
            op,
            remote: remote.into(),
        }
    }
}

#[async_trait]
impl Producer for AnnexProducer {
    async fn produce(&self, paths: Vec<String>, status: StatusSender) {
        let argv = self.op.argv(&self.remote, &paths);
        let command = self.git.describe(&argv);
        tracing::debug!(%command, files = paths.len(), "Starting annex operation");

        let mut child = match self
            .git
            .command(&argv)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(err) => {
                let err = spawn_error(&command, &err);
                fail_all(&status, &paths, self.op.state(), &err.to_string());
                return;
            }
        };

        let stderr_task = child.stderr.take().map(|stderr| tokio::spawn(read_all(stderr)));

        let mut reporter = AnnexReporter::new(self.op.state());
        let mut failures = 0usize;
        if let Some(stdout) = child.stdout.take() {
            let mut lines = BufReader::new(stdout).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        if let Some(event) = reporter.parse_line(&line) {
                            if event.is_error() {
                                failures += 1;
                            }
                            status.send(event);
                        }
                    }
                    Ok(None) => break,
                    Err(err) => {
                        tracing::warn!(%command, "Failed reading annex output: {}", err);
                        break;
                    }
                }
            }
        }

        let stderr = match stderr_task {
            Some(task) => task.await.unwrap_or_default(),
            None => String::new(),
        };

        match child.wait().await {
            Ok(exit) if !exit.success() && failures == 0 => {
                // no per-file record said why, so every requested path fails
                tracing::warn!(%command, %exit, stderr = %stderr.trim(), "Annex operation failed");
                let message = match stderr.trim() {
                    "" => format!("exited with {exit}"),
                    text => text.to_string(),
                };
                fail_all(&status, &paths, self.op.state(), &message);
            }
            Ok(exit) => {
                tracing::debug!(%command, %exit, failures, "Annex operation finished");
            }
            Err(err) => {
                tracing::warn!(%command, "Failed to wait for annex: {}", err);
            }
        }
        // `status` drops here and closes the channel
    }
}

/// Report `message` for every requested path, or once for the working
/// directory when no paths were given.
fn fail_all(status: &StatusSender, paths: &[String], state: &str, message: &str) {
    if paths.is_empty() {
        status.send(StatusEvent::failed(".", state, message));
        return;
    }
    for path in paths {
        status.send(StatusEvent::failed(path.as_str(), state, message));
    }
}

async fn read_all<R: AsyncRead + Unpin>(reader: R) -> String {
    let mut text = String::new();
    let mut lines = BufReader::new(reader).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        tracing::trace!(target: "gin_sync::annex::stderr", "{}", line);
        text.push_str(&line);
        text.push('\n');
    }
    text
}

#[derive(Debug, Deserialize)]
struct AnnexRecord {
    #[serde(default)]
    file: Option<String>,
    #[serde(default)]
    success: Option<bool>,
    #[serde(default, rename = "error-messages")]
    error_messages: Vec<String>,
    #[serde(default)]
    note: Option<String>,
    #[serde(default)]
    action: Option<AnnexAction>,
    #[serde(default, rename = "byte-progress")]
    byte_progress: Option<u64>,
    #[serde(default, rename = "percent-progress")]
    percent_progress: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnnexAction {
    #[serde(default)]
    file: Option<String>,
}

/// Converts annex JSON output lines into status events for one operation.
pub struct AnnexReporter {
    state: &'static str,
    started: HashMap<String, Instant>,
}

impl AnnexReporter {
    pub fn new(state: &'static str) -> Self {
        Self {
            state,
            started: HashMap::new(),
        }
    }

    /// `None` for blank, unrecognised, or uninteresting lines.
    pub fn parse_line(&mut self, line: &str) -> Option<StatusEvent> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let record: AnnexRecord = match serde_json::from_str(line) {
            Ok(record) => record,
            Err(err) => {
                tracing::warn!(line, "Unrecognised annex output: {}", err);
                return None;
            }
        };

        if let Some(action) = record.action {
            let file = action.file?;
            let percent = record.percent_progress.unwrap_or_default();
            // the completion record reports the result
            if percent == COMPLETE {
                return None;
            }
            let rate = record
                .byte_progress
                .map(|bytes| self.rate(&file, bytes))
                .unwrap_or_default();
            return Some(StatusEvent::progress(file, self.state, percent, rate));
        }

        let file = record.file?;
        self.started.remove(&file);
        match record.success? {
            true => Some(StatusEvent::complete(file, self.state)),
            false => {
                let message = if record.error_messages.is_empty() {
                    record
                        .note
                        .map(|note| note.trim().to_string())
                        .filter(|note| !note.is_empty())
                        .unwrap_or_else(|| "failed".to_string())
                } else {
                    record
                        .error_messages
                        .iter()
                        .map(|msg| msg.trim())
                        .collect::<Vec<_>>()
                        .join("; ")
                };
                Some(StatusEvent::failed(file, self.state, message))
            }
        }
    }

    fn rate(&mut self, file: &str, bytes: u64) -> String {
        let started = *self
            .started
            .entry(file.to_string())
            .or_insert_with(Instant::now);
        let elapsed = started.elapsed().as_secs_f64();
        if elapsed < 0.001 || bytes == 0 {
            return String::new();
        }
        format_rate(bytes as f64 / elapsed)
    }
}

/// Human readable transfer rate, binary units.
pub fn format_rate(bytes_per_sec: f64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    let mut value = bytes_per_sec.max(0.0);
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{value:.0} {}/s", UNITS[unit])
    } else {
        format!("{value:.1} {}/s", UNITS[unit])
    }
}
