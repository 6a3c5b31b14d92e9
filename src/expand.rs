//! Alias and variable expansion of an argument vector.
//!
//! Both passes rewrite whole words only. Alias expansion touches `argv[0]`
//! and runs first; variable expansion then sees every word, the command name
//! included.

use crate::alias::AliasTable;
use crate::command::ExitCode;
use crate::env::Environment;

/// Replace `argv[0]` by its alias value, following alias-to-alias chains for
/// at most `max_depth` resolutions.
///
/// A cycle such as `a=b`, `b=a` is not an error: expansion stops after
/// `max_depth` steps and keeps whatever name it reached. Returns the number of
/// resolutions performed.
pub fn expand_alias(argv: &mut [String], aliases: &AliasTable, max_depth: usize) -> usize {
    let Some(name) = argv.first_mut() else {
        return 0;
    };
    let mut resolved = 0;
    while resolved < max_depth {
        let Some(value) = aliases.lookup(name) else {
            break;
        };
        log::debug!("alias {name} -> {value}");
        *name = value.to_string();
        resolved += 1;
    }
    resolved
}

/// Rewrite `$?`, `$$` and `$NAME` words.
///
/// `$?` becomes `last_status`, `$$` becomes `pid` and `$NAME` the value of
/// `NAME` in `env`, or the empty string when it is unset. A lone `$` and any
/// word not starting with `$` are left alone.
pub fn expand_variables(argv: &mut [String], env: &Environment, last_status: ExitCode, pid: u32) {
    for word in argv.iter_mut() {
        let Some(name) = word.strip_prefix('$').filter(|name| !name.is_empty()) else {
            continue;
        };
        let value = match name {
            "?" => last_status.to_string(),
            "$" => pid.to_string(),
            name => env.get_var(name).unwrap_or_default().to_string(),
        };
        *word = value;
    }
}
