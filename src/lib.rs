//! A small line-oriented command interpreter.
//!
//! Input lines are split into segments chained with `;`, `&&` and `||`. Each
//! segment is tokenized on blanks, its command name is alias-expanded, `$?`,
//! `$$` and `$NAME` words are substituted, and the result runs either as one of
//! the builtins (`exit`, `env`, `help`, `history`, `setenv`, `unsetenv`, `cd`,
//! `alias`) or as an external program found through `PATH`.
//!
//! | Module | Role |
//! |---|---|
//! | [`store`] | ordered entry store backing the three tables |
//! | [`env`], [`alias`], [`history`] | environment, alias table, command history |
//! | [`input`], [`chain`], [`lexer`] | line acquisition, `;`/`&&`/`||` splitting, tokenizing |
//! | [`expand`] | alias and variable expansion |
//! | [`builtin`], [`external`] | builtin dispatch, `PATH` resolution and process execution |
//! | [`session`], [`interpreter`] | per-run state and the read-eval loop |
//!
//! The main entry point is [`Interpreter`].

pub mod alias;
pub mod builtin;
pub mod chain;
pub mod command;
pub mod config;
pub mod env;
pub mod error;
pub mod expand;
pub mod external;
pub mod history;
pub mod input;
mod interpreter;
pub mod io_adapters;
pub mod lexer;
pub mod session;
pub mod signal;
pub mod store;

pub use interpreter::Interpreter;

/// Serializes tests that change the process working directory.
#[cfg(test)]
pub(crate) fn lock_current_dir() -> std::sync::MutexGuard<'static, ()> {
    use std::sync::{Mutex, OnceLock};
    static MUTEX: OnceLock<Mutex<()>> = OnceLock::new();
    MUTEX
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}
