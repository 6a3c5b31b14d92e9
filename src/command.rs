use crate::session::Session;
use anyhow::Result;
use std::io::Write;

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
/// This mirrors the convention used by POSIX shells and many command-line tools.
pub type ExitCode = i32;

/// Object-safe trait for anything the dispatcher can run once the argument
/// vector has been expanded.
///
/// Implemented by every builtin handler and by
/// [`ExternalCommand`](crate::external::ExternalCommand).
pub trait ShellCommand {
    /// Run with the full argument vector (`argv[0]` is the command name).
    ///
    /// Output meant for the user goes to `out`. An `Err` is reported on
    /// standard error by the caller; if it wraps a
    /// [`ShellError`](crate::error::ShellError) its status becomes the exit
    /// status, otherwise 1.
    fn execute(&self, argv: &[String], session: &mut Session, out: &mut dyn Write) -> Result<ExitCode>;
}
