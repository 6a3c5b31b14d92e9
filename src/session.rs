use crate::alias::AliasTable;
use crate::chain::LineCursor;
use crate::command::ExitCode;
use crate::config::ShellConfig;
use crate::env::Environment;
use crate::expand;
use crate::history::History;
use crate::input::strip_comment;
use crate::lexer;
use std::path::PathBuf;

/// All per-run mutable shell state.
///
/// Fields are public for the builtins that manipulate them directly.
#[derive(Debug)]
pub struct Session {
    pub config: ShellConfig,
    /// Name the shell was started as, first part of every error message.
    pub program: String,
    /// Interactive sessions read from a terminal and print a prompt.
    pub interactive: bool,
    /// Argument vector of the segment being executed.
    pub argv: Vec<String>,
    /// Position in the current raw line.
    pub cursor: LineCursor,
    /// Status of the last executed command, `$?`.
    pub last_status: ExitCode,
    /// Cumulative line counter shown in error messages.
    pub line_count: u64,
    /// Set for each new raw line until an external or empty segment counts it.
    line_pending: bool,
    /// Code recorded by `exit N`.
    pub exit_code: Option<ExitCode>,
    /// Set by `exit`; stops the read-eval loop.
    pub should_exit: bool,
    /// Cleared when the history file exists but could not be read, so that
    /// saving does not overwrite it.
    history_writable: bool,
    pub env: Environment,
    pub aliases: AliasTable,
    pub history: History,
}

impl Session {
    pub fn new(program: impl Into<String>, config: ShellConfig, env: Environment) -> Self {
        let history = History::new(config.max_history);
        Self {
            config,
            program: program.into(),
            interactive: false,
            argv: Vec::new(),
            cursor: LineCursor::new(),
            last_status: 0,
            line_count: 0,
            line_pending: false,
            exit_code: None,
            should_exit: false,
            history_writable: true,
            env,
            aliases: AliasTable::new(),
            history,
        }
    }

    /// Location of the history file, derived from the current `HOME`.
    pub fn history_path(&self) -> Option<PathBuf> {
        History::file_path(self.env.get_var("HOME"), &self.config.history_file_name)
    }

    pub fn load_history(&mut self) {
        let Some(path) = self.history_path() else {
            log::debug!("HOME is not set, history is not loaded");
            return;
        };
        match self.history.load_from(&path) {
            Ok(count) => log::debug!("loaded {count} history entries from {}", path.display()),
            Err(e) => {
                log::warn!("cannot read history file {}: {e}", path.display());
                self.history_writable = false;
            }
        }
    }

    pub fn save_history(&self) {
        let Some(path) = self.history_path() else {
            return;
        };
        if !self.history_writable {
            log::warn!("not saving history to {}, it could not be loaded", path.display());
            return;
        }
        if let Err(e) = self.history.save_to(&path) {
            log::warn!("cannot write history file {}: {e}", path.display());
        }
    }

    /// Take a freshly read raw line: drop its comment, record it in history
    /// and make it the line the cursor walks through.
    pub fn accept_line(&mut self, raw: &str) {
        let line = strip_comment(raw);
        if !line.trim().is_empty() {
            self.history.add(line);
        }
        self.line_pending = true;
        self.cursor.load(line);
    }

    /// Next chained segment of the current line, honouring `&&`/`||` gates.
    pub fn next_segment(&mut self) -> Option<String> {
        self.cursor.next_segment(self.last_status)
    }

    /// Tokenize `segment` into `argv`, then expand aliases and variables.
    pub fn prepare_argv(&mut self, segment: &str) {
        self.argv = lexer::split_args(segment);
        expand::expand_alias(&mut self.argv, &self.aliases, self.config.max_alias_depth);
        expand::expand_variables(
            &mut self.argv,
            &self.env,
            self.last_status,
            std::process::id(),
        );
    }

    /// Builtins count every invocation.
    pub fn count_line(&mut self) {
        self.line_count += 1;
    }

    /// External and empty segments count once per raw line.
    pub fn count_pending_line(&mut self) {
        if self.line_pending {
            self.line_count += 1;
            self.line_pending = false;
        }
    }

    /// `<program>: <line>: <command>: ` prefix of error messages.
    pub fn error_prefix(&self, command: &str) -> String {
        format!("{}: {}: {}: ", self.program, self.line_count, command)
    }

    /// Status the process exits with once the loop ends.
    pub fn final_status(&self) -> ExitCode {
        self.exit_code.unwrap_or(self.last_status)
    }
}
