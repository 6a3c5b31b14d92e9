//! Tunables of the shell.

/// Name of the history file, relative to `$HOME`.
pub const HISTORY_FILE_NAME: &str = ".simple_shell_history";

/// Maximum number of entries kept in the history store and on disk.
pub const MAX_HISTORY_SIZE: usize = 4096;

/// Upper bound on alias-to-alias resolutions for a single command name.
pub const MAX_ALIAS_DEPTH: usize = 10;

/// Prompt printed before each interactive read.
pub const PROMPT: &str = "$ ";

/// Runtime configuration of a [`Session`](crate::session::Session).
///
/// `Default` yields the values the shell ships with; tests shrink the limits
/// to exercise trimming without generating thousands of lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    pub prompt: String,
    pub history_file_name: String,
    pub max_history: usize,
    pub max_alias_depth: usize,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: PROMPT.to_string(),
            history_file_name: HISTORY_FILE_NAME.to_string(),
            max_history: MAX_HISTORY_SIZE,
            max_alias_depth: MAX_ALIAS_DEPTH,
        }
    }
}
