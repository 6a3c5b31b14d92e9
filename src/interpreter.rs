use crate::builtin::BuiltinKind;
use crate::command::{ExitCode, ShellCommand};
use crate::error::ShellError;
use crate::external::{self, ExternalCommand};
use crate::input::{LineSource, ReadOutcome};
use crate::io_adapters::Output;
use crate::session::Session;
use crate::signal;
use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// The read-eval loop.
///
/// Reads raw lines from a [`LineSource`], walks their chained segments and
/// runs each one as a builtin or an external program, feeding the resulting
/// status back into the chain. Regular output and error reports go through
/// [`Output`].
///
/// Example
/// ```
/// use simple_shell::config::ShellConfig;
/// use simple_shell::env::Environment;
/// use simple_shell::input::LineSource;
/// use simple_shell::io_adapters::{MemWriter, Output};
/// use simple_shell::session::Session;
/// use simple_shell::Interpreter;
///
/// let session = Session::new("hsh", ShellConfig::default(), Environment::new());
/// let source = LineSource::from_reader(std::io::Cursor::new("alias ll=ls\nalias\nexit 3\n"));
/// let out = MemWriter::new();
/// let output = Output::new(Box::new(out.clone()), Box::new(MemWriter::new()));
/// let code = Interpreter::new(session, source, output).run();
/// assert_eq!(code, 3);
/// assert_eq!(out.contents(), "ll='ls'\n");
/// ```
pub struct Interpreter {
    session: Session,
    source: LineSource,
    output: Output,
}

impl Interpreter {
    pub fn new(session: Session, source: LineSource, output: Output) -> Self {
        Self {
            session,
            source,
            output,
        }
    }

    /// Run until `exit` or end of input and return the status the process
    /// should exit with. History is loaded first and saved last.
    pub fn run(&mut self) -> ExitCode {
        self.session.load_history();

        let at_prompt = Arc::new(AtomicBool::new(false));
        let _interrupt_guard = if self.session.interactive {
            let on_interrupt =
                signal::reprint_prompt(self.session.config.prompt.clone(), Arc::clone(&at_prompt));
            match signal::install_interrupt_handler(on_interrupt) {
                Ok(guard) => Some(guard),
                Err(e) => {
                    log::warn!("cannot install SIGINT handler: {e}");
                    None
                }
            }
        } else {
            None
        };

        while !self.session.should_exit {
            match self.session.next_segment() {
                Some(segment) => self.execute_segment(&segment),
                None => {
                    if !self.acquire_line(&at_prompt) {
                        break;
                    }
                }
            }
        }

        self.session.save_history();
        if let Err(e) = self.output.flush() {
            log::warn!("cannot flush standard output: {e}");
        }
        self.session.final_status()
    }

    /// Read the next raw line into the session. Returns `false` at end of
    /// input or on an unrecoverable read error.
    fn acquire_line(&mut self, at_prompt: &AtomicBool) -> bool {
        let interactive = self.session.interactive;
        loop {
            let prompt = if interactive {
                self.session.config.prompt.as_str()
            } else {
                ""
            };
            if interactive && !self.source.draws_prompt() {
                let _ = write!(self.output.scope(), "{prompt}");
            } else {
                let _ = self.output.flush();
            }

            at_prompt.store(true, Ordering::SeqCst);
            let outcome = self.source.read_line(prompt);
            at_prompt.store(false, Ordering::SeqCst);

            match outcome {
                Ok(ReadOutcome::Line(line)) => {
                    self.session.accept_line(&line);
                    return true;
                }
                Ok(ReadOutcome::Interrupted) => continue,
                Ok(ReadOutcome::Eof) => {
                    if interactive {
                        let _ = writeln!(self.output.scope());
                    }
                    return false;
                }
                Err(e) => {
                    let message = format!("{}: {e}", self.session.program);
                    self.output.report(&message);
                    return false;
                }
            }
        }
    }

    /// Expand one segment and dispatch it: builtins first, then a `PATH`
    /// search. The outcome becomes the session's last status.
    fn execute_segment(&mut self, segment: &str) {
        self.session.prepare_argv(segment);
        let argv = std::mem::take(&mut self.session.argv);
        let Some(name) = argv.first() else {
            self.session.count_pending_line();
            return;
        };

        let result = match BuiltinKind::lookup(name) {
            Some(kind) => {
                self.session.count_line();
                kind.handler()
                    .execute(&argv, &mut self.session, &mut self.output.scope())
            }
            None => {
                self.session.count_pending_line();
                self.run_external(&argv)
            }
        };

        self.session.last_status = match result {
            Ok(code) => code,
            Err(e) => {
                let status = e.downcast_ref::<ShellError>().map_or(1, ShellError::status);
                let message = format!("{}{e}", self.session.error_prefix(name));
                self.output.report(&message);
                status
            }
        };
        log::trace!("{name} -> {}", self.session.last_status);
        self.session.argv = argv;
    }

    fn run_external(&mut self, argv: &[String]) -> anyhow::Result<ExitCode> {
        let path = external::resolve_command(
            self.session.env.get_var("PATH"),
            &argv[0],
            self.session.interactive,
        )
        .ok_or(ShellError::CommandNotFound)?;
        log::debug!("{} resolved to {}", argv[0], path.display());
        ExternalCommand::new(path).execute(argv, &mut self.session, &mut self.output.scope())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShellConfig;
    use crate::env::Environment;
    use crate::io_adapters::MemWriter;
    use std::fs;
    use std::io::Cursor;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    struct Run {
        code: ExitCode,
        out: String,
        err: String,
        session: Session,
    }

    fn base_session(home: &TempDir) -> Session {
        let mut env = Environment::new();
        env.set_var("PATH", "/bin:/usr/bin");
        env.set_var("HOME", &home.path().to_string_lossy());
        Session::new("hsh", ShellConfig::default(), env)
    }

    fn run_session(session: Session, script: &str) -> Run {
        let out = MemWriter::new();
        let err = MemWriter::new();
        let output = Output::new(Box::new(out.clone()), Box::new(err.clone()));
        let source = LineSource::from_reader(Cursor::new(script.to_string()));
        let mut interpreter = Interpreter::new(session, source, output);
        let code = interpreter.run();
        let Interpreter { session, .. } = interpreter;
        Run {
            code,
            out: out.contents(),
            err: err.contents(),
            session,
        }
    }

    fn run_script(script: &str) -> Run {
        let home = tempfile::tempdir().unwrap();
        run_session(base_session(&home), script)
    }

    #[test]
    fn test_and_or_chains_follow_status() {
        let run = run_script("false && setenv X 1\ntrue && setenv Y 1\nfalse || setenv Z 1\ntrue || setenv W 1\n");
        assert_eq!(run.code, 0);
        assert_eq!(run.session.env.get_var("X"), None);
        assert_eq!(run.session.env.get_var("Y"), Some("1"));
        assert_eq!(run.session.env.get_var("Z"), Some("1"));
        assert_eq!(run.session.env.get_var("W"), None);
        assert_eq!(run.err, "");
    }

    #[test]
    fn test_sequence_runs_every_segment() {
        let run = run_script("false; setenv A 1; setenv B 2\n");
        assert_eq!(run.session.env.get_var("A"), Some("1"));
        assert_eq!(run.session.env.get_var("B"), Some("2"));
    }

    #[test]
    fn test_failed_and_skips_rest_of_line_only() {
        let run = run_script("false && setenv A 1; setenv B 1\nsetenv C 1\n");
        assert_eq!(run.session.env.get_var("A"), None);
        assert_eq!(run.session.env.get_var("B"), None);
        assert_eq!(run.session.env.get_var("C"), Some("1"));
    }

    #[test]
    fn test_exit_with_code_stops_loop() {
        let run = run_script("exit 42\nsetenv AFTER 1\n");
        assert_eq!(run.code, 42);
        assert_eq!(run.session.env.get_var("AFTER"), None);
    }

    #[test]
    fn test_exit_without_code_uses_last_status() {
        let run = run_script("false\nexit\n");
        assert_eq!(run.code, 1);
    }

    #[test]
    fn test_invalid_exit_reports_and_continues() {
        let run = run_script("exit abc\nsetenv AFTER 1\n");
        assert_eq!(run.err, "hsh: 1: exit: Invalid number: abc\n");
        assert_eq!(run.session.env.get_var("AFTER"), Some("1"));
        assert_eq!(run.code, 0);

        let run = run_script("exit abc\n");
        assert_eq!(run.code, 2);
    }

    #[test]
    fn test_command_not_found() {
        let run = run_script("nonexisting_cmd_zz arg\n");
        assert_eq!(run.code, 127);
        assert_eq!(run.err, "hsh: 1: nonexisting_cmd_zz: command not found\n");
    }

    #[test]
    fn test_status_variable_after_external() {
        let run = run_script("false\nsetenv S $?\ntrue\nsetenv T $?\n");
        assert_eq!(run.session.env.get_var("S"), Some("1"));
        assert_eq!(run.session.env.get_var("T"), Some("0"));
    }

    #[test]
    fn test_builtin_errors_use_line_counter() {
        let run = run_script("setenv ONLY\nunsetenv\n");
        assert_eq!(
            run.err,
            "hsh: 1: setenv: Number of arguments provided is not correct\n\
             hsh: 2: unsetenv: Incorrect number of arguments provided.\n"
        );
        assert_eq!(run.code, 1);
    }

    #[test]
    fn test_external_counts_once_per_line() {
        let run = run_script("true; true; nonexisting_cmd_zz\nnonexisting_cmd_zz\n");
        assert_eq!(
            run.err,
            "hsh: 1: nonexisting_cmd_zz: command not found\n\
             hsh: 2: nonexisting_cmd_zz: command not found\n"
        );
    }

    #[test]
    fn test_alias_cycle_terminates() {
        let run = run_script("alias a=b b=a\na\n");
        assert_eq!(run.code, 127);
        assert_eq!(run.err, "hsh: 2: a: command not found\n");
    }

    #[test]
    fn test_alias_resolves_to_external() {
        let run = run_script("alias t=true\nfalse\nt\nsetenv S $?\n");
        assert_eq!(run.session.env.get_var("S"), Some("0"));
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let run = run_script("# only a comment\n\n   \nsetenv A 1 # trailing\nhistory\n");
        assert_eq!(run.session.env.get_var("A"), Some("1"));
        assert_eq!(run.out, "0: setenv A 1 \n1: history\n");
    }

    #[test]
    fn test_history_is_persisted_under_home() {
        let home = tempfile::tempdir().unwrap();
        run_session(base_session(&home), "setenv A 1\ntrue\n");
        let saved = fs::read_to_string(home.path().join(".simple_shell_history")).unwrap();
        assert_eq!(saved, "setenv A 1\ntrue\n");

        let run = run_session(base_session(&home), "history\n");
        assert_eq!(run.out, "0: setenv A 1\n1: true\n2: history\n");
    }

    #[test]
    fn test_unset_path_means_not_found() {
        let run = run_script("unsetenv PATH\ntrue\n");
        assert_eq!(run.code, 127);
        assert_eq!(run.err, "hsh: 2: true: command not found\n");
    }

    #[test]
    fn test_absolute_path_runs_without_path() {
        let run = run_script("unsetenv PATH\n/bin/sh -c true\n");
        assert_eq!(run.code, 0);
        assert_eq!(run.err, "");
    }

    fn run_in_dir_with_tool(session: Session, script: &str) -> Run {
        let _lock = crate::lock_current_dir();
        let dir = tempfile::tempdir().unwrap();
        let tool = dir.path().join("local_tool_zz");
        fs::write(&tool, "#!/bin/sh\nexit 7\n").unwrap();
        fs::set_permissions(&tool, fs::Permissions::from_mode(0o755)).unwrap();
        let cwd_before = std::env::current_dir().unwrap();
        std::env::set_current_dir(dir.path()).unwrap();
        let run = run_session(session, script);
        std::env::set_current_dir(&cwd_before).unwrap();
        run
    }

    #[test]
    fn test_runs_file_in_current_dir_by_bare_name() {
        let home = tempfile::tempdir().unwrap();
        let run = run_in_dir_with_tool(base_session(&home), "local_tool_zz\n");
        assert_eq!(run.err, "");
        assert_eq!(run.code, 7);
    }

    #[test]
    fn test_interactive_without_path_runs_local_file() {
        let home = tempfile::tempdir().unwrap();
        let mut session = base_session(&home);
        session.interactive = true;
        let run = run_in_dir_with_tool(session, "unsetenv PATH\nlocal_tool_zz\n");
        assert_eq!(run.err, "");
        assert_eq!(run.code, 7);
    }

    #[test]
    fn test_trailing_operator_is_noop() {
        let run = run_script("setenv A 1 &&\n");
        assert_eq!(run.session.env.get_var("A"), Some("1"));
        assert_eq!(run.code, 0);
        assert_eq!(run.err, "");
    }

    #[test]
    fn test_interactive_stream_prints_prompts() {
        let home = tempfile::tempdir().unwrap();
        let mut session = base_session(&home);
        session.interactive = true;
        let run = run_session(session, "alias x=y\n");
        assert_eq!(run.out, "$ $ \n");
    }
}
