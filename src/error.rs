use crate::command::ExitCode;
use std::path::PathBuf;
use thiserror::Error;

/// Failures the read-eval loop has to tell apart, each carrying the exit
/// status it maps to.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("command not found")]
    CommandNotFound,
    #[error("access denied")]
    PermissionDenied,
    #[error("Invalid number: {0}")]
    InvalidExitArgument(String),
    #[error("Cannot access {}", .0.display())]
    ScriptNotFound(PathBuf),
    #[error("Permission denied: {}", .0.display())]
    ScriptPermission(PathBuf),
    #[error("Cannot open {}: {}", .0.display(), .1)]
    ScriptOpen(PathBuf, #[source] std::io::Error),
    #[error("cannot create process: {0}")]
    Spawn(#[source] std::io::Error),
}

impl ShellError {
    /// Exit status associated with the failure.
    pub fn status(&self) -> ExitCode {
        match self {
            ShellError::CommandNotFound | ShellError::ScriptNotFound(_) => 127,
            ShellError::PermissionDenied | ShellError::ScriptPermission(_) => 126,
            ShellError::InvalidExitArgument(_) => 2,
            ShellError::ScriptOpen(..) | ShellError::Spawn(_) => 1,
        }
    }
}
