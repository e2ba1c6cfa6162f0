//! Command handlers. Each command is a sequence of pipeline passes and
//! plain git steps, run strictly one after another.

mod download;
mod transfer;

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

use crate::common::{AppConfig, AppError};
use crate::pipeline;
use crate::producer::{AnnexOp, AnnexProducer, Git};
use crate::ui::format::{failed_label, ok_label};
use crate::ui::{RenderStyle, Terminal};

const SPINNER_TICK: Duration = Duration::from_millis(80);

/// Everything a transfer command needs for one invocation.
pub struct CommandContext<T: Terminal> {
    config: AppConfig,
    git: Git,
    json: bool,
    term: T,
    style: RenderStyle,
}

impl<T: Terminal> CommandContext<T> {
    pub fn new(config: AppConfig, json: bool, term: T) -> Self {
        let style = RenderStyle {
            color: config.output.color.enabled(term.is_tty()),
            max_width: config.output.max_width,
        };
        let git = Git::new(config.git.binary.clone());
        Self {
            config,
            git,
            json,
            term,
            style,
        }
    }

    /// Run git from `dir` rather than the process working directory.
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.git = self.git.in_dir(dir);
        self
    }

    pub fn terminal(&self) -> &T {
        &self.term
    }

    async fn require_repo(&self) -> Result<PathBuf, AppError> {
        self.git.repo_root().await
    }

    /// Item count for the progress bar. Zero (plain log) when listing fails.
    async fn count_files(&self, paths: &[String]) -> usize {
        match self.git.list_files(paths).await {
            Ok(files) => files.len(),
            Err(err) => {
                tracing::debug!("Could not list files, progress bar disabled: {}", err);
                0
            }
        }
    }

    /// One pipeline pass for `op` over `paths` on a fresh channel.
    async fn pass(
        &mut self,
        op: AnnexOp,
        paths: Vec<String>,
        nitems: usize,
    ) -> Result<(), AppError> {
        tracing::info!(operation = op.state(), files = paths.len(), nitems, "Starting pass");
        let producer = Arc::new(AnnexProducer::new(
            self.git.clone(),
            op,
            self.config.remote.clone(),
        ));
        pipeline::run(producer, paths, nitems, self.json, &mut self.term, self.style).await
    }

    /// A sequential git step. Outside JSON mode a stderr spinner shows
    /// `label` and ends in OK or failed.
    async fn step<F>(&self, label: &str, work: F) -> Result<(), AppError>
    where
        F: Future<Output = Result<(), AppError>>,
    {
        if self.json {
            return work.await;
        }

        let spinner = ProgressBar::new_spinner().with_message(label.to_string());
        if let Ok(template) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            spinner.set_style(template);
        }
        spinner.enable_steady_tick(SPINNER_TICK);

        let result = work.await;
        let verdict = match &result {
            Ok(()) => ok_label(self.style.color),
            Err(err) => {
                tracing::debug!(step = label, "Step failed: {}", err);
                failed_label(self.style.color)
            }
        };
        spinner.finish_with_message(format!("{label} {verdict}"));
        result
    }
}
