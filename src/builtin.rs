use crate::command::{ExitCode, ShellCommand};
use crate::error::ShellError;
use crate::session::Session;
use anyhow::{Context, Result, bail};
use std::env;
use std::io::Write;

/// Commands implemented inside the shell, tried before any `PATH` search.
///
/// The order of [`BuiltinKind::ALL`] is the lookup order; the first name that
/// matches `argv[0]` exactly wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinKind {
    Exit,
    Env,
    Help,
    History,
    Setenv,
    Unsetenv,
    Cd,
    Alias,
}

impl BuiltinKind {
    pub const ALL: [BuiltinKind; 8] = [
        BuiltinKind::Exit,
        BuiltinKind::Env,
        BuiltinKind::Help,
        BuiltinKind::History,
        BuiltinKind::Setenv,
        BuiltinKind::Unsetenv,
        BuiltinKind::Cd,
        BuiltinKind::Alias,
    ];

    /// Canonical name of the command, e.g. "exit" or "cd".
    pub fn name(self) -> &'static str {
        match self {
            BuiltinKind::Exit => "exit",
            BuiltinKind::Env => "env",
            BuiltinKind::Help => "help",
            BuiltinKind::History => "history",
            BuiltinKind::Setenv => "setenv",
            BuiltinKind::Unsetenv => "unsetenv",
            BuiltinKind::Cd => "cd",
            BuiltinKind::Alias => "alias",
        }
    }

    pub fn lookup(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    pub fn handler(self) -> &'static dyn ShellCommand {
        match self {
            BuiltinKind::Exit => &Exit,
            BuiltinKind::Env => &PrintEnv,
            BuiltinKind::Help => &Help,
            BuiltinKind::History => &ShowHistory,
            BuiltinKind::Setenv => &SetEnv,
            BuiltinKind::Unsetenv => &UnsetEnv,
            BuiltinKind::Cd => &Cd,
            BuiltinKind::Alias => &Alias,
        }
    }
}

/// `exit [N]`: stop the read-eval loop, optionally fixing the exit code.
pub struct Exit;

impl ShellCommand for Exit {
    fn execute(&self, argv: &[String], session: &mut Session, _out: &mut dyn Write) -> Result<ExitCode> {
        let code = argv.get(1).map(|arg| parse_exit_code(arg)).transpose()?;
        session.exit_code = code;
        session.should_exit = true;
        Ok(code.unwrap_or(session.last_status))
    }
}

/// Digits with an optional leading `+`, within `i32` range.
fn parse_exit_code(arg: &str) -> Result<ExitCode, ShellError> {
    let digits = arg.strip_prefix('+').unwrap_or(arg);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ShellError::InvalidExitArgument(arg.to_string()));
    }
    digits
        .parse()
        .map_err(|_| ShellError::InvalidExitArgument(arg.to_string()))
}

/// `env`: print every variable as `NAME=VALUE`.
pub struct PrintEnv;

impl ShellCommand for PrintEnv {
    fn execute(&self, _argv: &[String], session: &mut Session, out: &mut dyn Write) -> Result<ExitCode> {
        for entry in session.env.entries() {
            writeln!(out, "{}", entry.text)?;
        }
        Ok(0)
    }
}

pub struct Help;

impl ShellCommand for Help {
    fn execute(&self, _argv: &[String], _session: &mut Session, out: &mut dyn Write) -> Result<ExitCode> {
        writeln!(out, "This function has not been implemented yet.")?;
        Ok(0)
    }
}

/// `history`: print `<n>: <text>` for each recorded line.
pub struct ShowHistory;

impl ShellCommand for ShowHistory {
    fn execute(&self, _argv: &[String], session: &mut Session, out: &mut dyn Write) -> Result<ExitCode> {
        for entry in session.history.entries() {
            writeln!(out, "{}: {}", entry.number, entry.text)?;
        }
        Ok(0)
    }
}

/// `setenv NAME VALUE`
pub struct SetEnv;

impl ShellCommand for SetEnv {
    fn execute(&self, argv: &[String], session: &mut Session, _out: &mut dyn Write) -> Result<ExitCode> {
        let [_, name, value] = argv else {
            bail!("Number of arguments provided is not correct");
        };
        if name.is_empty() || name.contains('=') {
            bail!("Invalid variable name: {name}");
        }
        session.env.set_var(name, value);
        Ok(0)
    }
}

/// `unsetenv NAME...`
pub struct UnsetEnv;

impl ShellCommand for UnsetEnv {
    fn execute(&self, argv: &[String], session: &mut Session, _out: &mut dyn Write) -> Result<ExitCode> {
        if argv.len() < 2 {
            bail!("Incorrect number of arguments provided.");
        }
        for name in &argv[1..] {
            if !session.env.unset_var(name) {
                log::debug!("unsetenv: {name} was not set");
            }
        }
        Ok(0)
    }
}

/// Change the current working directory.
///
/// Without a target, changes to `HOME`, then `PWD`, then `/`, whichever is
/// set first. `cd -` prints and switches to `OLDPWD`. On success `OLDPWD`
/// takes the previous `PWD` and `PWD` the directory reported by the OS.
pub struct Cd;

impl ShellCommand for Cd {
    fn execute(&self, argv: &[String], session: &mut Session, out: &mut dyn Write) -> Result<ExitCode> {
        let previous = env::current_dir().ok();
        let target = match argv.get(1).map(String::as_str) {
            None => session
                .env
                .get_var("HOME")
                .or_else(|| session.env.get_var("PWD"))
                .unwrap_or("/")
                .to_string(),
            Some("-") => match session.env.get_var("OLDPWD") {
                Some(old) => {
                    let old = old.to_string();
                    writeln!(out, "{old}")?;
                    old
                }
                None => {
                    if let Some(dir) = &previous {
                        writeln!(out, "{}", dir.display())?;
                    }
                    return Ok(1);
                }
            },
            Some(dir) => dir.to_string(),
        };

        env::set_current_dir(&target).with_context(|| format!("Cannot cd to {target}"))?;

        let old_pwd = session
            .env
            .get_var("PWD")
            .map(str::to_string)
            .or_else(|| previous.map(|dir| dir.to_string_lossy().into_owned()));
        if let Some(old_pwd) = old_pwd {
            session.env.set_var("OLDPWD", &old_pwd);
        }
        let now = env::current_dir().context("cannot read the new working directory")?;
        session.env.set_var("PWD", &now.to_string_lossy());
        Ok(0)
    }
}

/// `alias [NAME[=VALUE] ...]`
pub struct Alias;

impl ShellCommand for Alias {
    fn execute(&self, argv: &[String], session: &mut Session, out: &mut dyn Write) -> Result<ExitCode> {
        if argv.len() < 2 {
            for line in session.aliases.render_all() {
                writeln!(out, "{line}")?;
            }
            return Ok(0);
        }
        for arg in &argv[1..] {
            if session.aliases.define(arg) {
                continue;
            }
            if let Some(line) = session.aliases.render(arg) {
                writeln!(out, "{line}")?;
            }
        }
        Ok(0)
    }
}
