use std::path::PathBuf;
use thiserror::Error;

/// Errors a single command can end with.
#[derive(Debug, Error)]
pub enum TodoError {
    #[error("Invalid task number: {0}.")]
    InvalidNumber(usize),

    #[error("Invalid input: {0}.")]
    InvalidInput(String),

    /// Carries the prompt shown to the user.
    #[error("{0}")]
    MissingArgument(&'static str),

    #[error("Unknown command: {0}.")]
    UnknownCommand(String),

    #[error("Failed to read tasks from {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to save tasks to {}: {source}", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TodoError {
    pub fn invalid_input(detail: impl Into<String>) -> Self {
        TodoError::InvalidInput(detail.into())
    }

    /// Validation errors are answered with a message and a normal exit.
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, TodoError::Read { .. } | TodoError::Save { .. })
    }
}

pub type Result<T> = std::result::Result<T, TodoError>;
