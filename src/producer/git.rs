//! Sequential git / git-annex invocations used around the pipeline passes.

use std::path::PathBuf;
use std::process::Stdio;

use tokio::process::Command;

use crate::common::AppError;

/// A git executable bound to an optional working directory.
#[derive(Clone, Debug)]
pub struct Git {
    binary: String,
    workdir: Option<PathBuf>,
}

impl Git {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            workdir: None,
        }
    }

    /// Run every command from `dir` instead of the process working directory.
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.workdir = Some(dir.into());
        self
    }

    pub fn command<I, S>(&self, args: I) -> Command
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        let mut cmd = Command::new(&self.binary);
        cmd.args(args).stdin(Stdio::null()).kill_on_drop(true);
        if let Some(dir) = &self.workdir {
            cmd.current_dir(dir);
        }
        cmd
    }

    pub(crate) fn describe(&self, args: &[String]) -> String {
        let mut text = self.binary.clone();
        for arg in args {
            text.push(' ');
            text.push_str(arg);
        }
        text
    }

    /// Run to completion and return stdout, or the stderr text on failure.
    pub async fn output(&self, args: &[String]) -> Result<String, AppError> {
        let command = self.describe(args);
        tracing::debug!(%command, "Running");

        let output = self
            .command(args)
            .output()
            .await
            .map_err(|err| spawn_error(&command, &err))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                format!("exited with {}", output.status)
            } else {
                stderr
            };
            return Err(AppError::Subprocess { command, message });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// Top-level directory of the enclosing repository.
    pub async fn repo_root(&self) -> Result<PathBuf, AppError> {
        match self.output(&args(&["rev-parse", "--show-toplevel"])).await {
            Ok(out) => Ok(PathBuf::from(out.trim())),
            Err(err) => {
                tracing::debug!("Not inside a repository: {}", err);
                Err(AppError::NotInRepo)
            }
        }
    }

    /// Annexed files under `paths` (everything when empty), with or without
    /// local content.
    pub async fn list_files(&self, paths: &[String]) -> Result<Vec<String>, AppError> {
        let mut argv = args(&["annex", "find", "--include=*"]);
        with_paths(&mut argv, paths);
        let out = self.output(&argv).await?;
        Ok(out
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Push committed changes to `remote`.
    pub async fn push(&self, remote: &str) -> Result<(), AppError> {
        self.output(&args(&["push", remote])).await.map(|_| ())
    }

    /// Fetch and merge remote changes without transferring file content.
    pub async fn sync_changes(&self, remote: &str) -> Result<(), AppError> {
        self.output(&args(&[
            "annex",
            "sync",
            "--no-push",
            "--no-content",
            remote,
        ]))
        .await
        .map(|_| ())
    }
}

pub(crate) fn args(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|part| part.to_string()).collect()
}

/// Append `-- <paths>`. No paths means the whole working directory.
pub(crate) fn with_paths(argv: &mut Vec<String>, paths: &[String]) {
    if !paths.is_empty() {
        argv.push("--".to_string());
        argv.extend(paths.iter().cloned());
    }
}

pub(crate) fn spawn_error(command: &str, err: &std::io::Error) -> AppError {
    let message = if err.kind() == std::io::ErrorKind::NotFound {
        "executable not found".to_string()
    } else {
        err.to_string()
    };
    AppError::Subprocess {
        command: command.to_string(),
        message,
    }
}
