use thiserror::Error;

/// Errors that decide how a command ends.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AppError {
    #[error("This command must be run from inside a gin repository.")]
    NotInRepo,
    #[error("{} operation{} failed", .count, plural(*.count))]
    OperationsFailed { count: usize },
    #[error("`{command}` failed: {message}")]
    Subprocess { command: String, message: String },
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}
