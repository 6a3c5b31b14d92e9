use crate::command::{ExitCode, ShellCommand};
use crate::error::ShellError;
use crate::session::Session;
use anyhow::Result;
use std::fs;
use std::io::{self, Write};
use std::os::unix::process::CommandExt;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

/// Command that is not a builtin, run as a child process.
pub struct ExternalCommand {
    path: PathBuf,
}

impl ExternalCommand {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl ShellCommand for ExternalCommand {
    /// Spawn the resolved executable and block until it terminates.
    ///
    /// The child sees `argv[0]` as typed, the remaining words as arguments and
    /// the session's environment snapshot as its whole environment.
    fn execute(&self, argv: &[String], session: &mut Session, out: &mut dyn Write) -> Result<ExitCode> {
        out.flush()?;
        let mut command = Command::new(&self.path);
        if let Some((name, args)) = argv.split_first() {
            command.arg0(name).args(args);
        }
        command.env_clear().envs(
            session
                .env
                .snapshot()
                .iter()
                .map(|(name, value)| (name.as_str(), value.as_str())),
        );

        let status = command.status().map_err(|e| match e.kind() {
            io::ErrorKind::PermissionDenied => ShellError::PermissionDenied,
            _ => ShellError::Spawn(e),
        })?;
        let code = match status.code() {
            Some(code) => code,
            None => terminated_by_signal(status),
        };
        log::debug!("{} exited with {code}", self.path.display());
        if code == 126 {
            return Err(ShellError::PermissionDenied.into());
        }
        Ok(code)
    }
}

fn terminated_by_signal(exit_status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    if let Some(signal) = ExitStatusExt::signal(&exit_status) {
        128 + signal
    } else if ExitStatusExt::core_dumped(&exit_status) {
        255
    } else {
        -1
    }
}

/// Resolve a command name to an executable path.
///
/// Behavior:
/// - `./foo`: returned as-is if it is a regular file.
/// - Otherwise each `:`-separated directory of `search_paths` is tried in
///   order as `dir/name`; an empty directory means `./name`. The first
///   regular file wins.
/// - No `PATH` at all, or no match: `None`.
///
/// Only the regular-file status is checked, not the execute permission bit.
/// A non-executable match is still returned and fails at spawn time with
/// status 126.
pub fn find_command_path(search_paths: Option<&str>, name: &str) -> Option<PathBuf> {
    if name.is_empty() {
        return None;
    }
    if name.len() > 2 && name.starts_with("./") && is_regular_file(Path::new(name)) {
        return Some(PathBuf::from(name));
    }
    for dir in search_paths?.split(':') {
        let candidate = if dir.is_empty() {
            Path::new(".").join(name)
        } else {
            PathBuf::from(format!("{dir}/{name}"))
        };
        if is_regular_file(&candidate) {
            return Some(candidate);
        }
    }
    None
}

/// [`find_command_path`], falling back to the name itself when it names a
/// regular file and the session is interactive, `PATH` is set, or the name is
/// absolute.
///
/// A resolved path always contains a `/`, so spawning it never triggers a
/// second `PATH` search in the child.
pub fn resolve_command(search_paths: Option<&str>, name: &str, interactive: bool) -> Option<PathBuf> {
    if let Some(path) = find_command_path(search_paths, name) {
        return Some(path);
    }
    let direct = Path::new(name);
    let allowed = interactive || search_paths.is_some() || direct.is_absolute();
    if !allowed || name.is_empty() || !is_regular_file(direct) {
        return None;
    }
    if name.contains('/') {
        Some(direct.to_path_buf())
    } else {
        Some(Path::new(".").join(name))
    }
}

fn is_regular_file(path: &Path) -> bool {
    fs::metadata(path).map(|meta| meta.is_file()).unwrap_or(false)
}
