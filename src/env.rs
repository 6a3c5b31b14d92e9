use crate::store::{Entry, EntryStore};
use std::env as stdenv;

/// The shell's own copy of the process environment.
///
/// Variables are kept as `NAME=VALUE` entries in insertion order, at most one
/// entry per `NAME`. Child processes do not see `std::env`; they receive the
/// materialized [`snapshot`](Environment::snapshot), which is rebuilt lazily
/// after any mutation.
#[derive(Debug, Clone)]
pub struct Environment {
    vars: EntryStore,
    snapshot: Vec<(String, String)>,
    dirty: bool,
}

impl Environment {
    /// Empty environment, used by tests and as the seed before import.
    pub fn new() -> Self {
        Self {
            vars: EntryStore::new(),
            snapshot: Vec::new(),
            dirty: true,
        }
    }

    /// Capture the variables inherited by this process.
    ///
    /// Variables whose name or value is not valid UTF-8 are skipped.
    pub fn from_process() -> Self {
        let mut env = Self::new();
        for (key, value) in stdenv::vars_os() {
            match (key.into_string(), value.into_string()) {
                (Ok(key), Ok(value)) => env.vars.push(0, format!("{key}={value}")),
                (key, _) => log::warn!("skipping non UTF-8 environment entry {key:?}"),
            }
        }
        env
    }

    /// Value of the first entry named exactly `name`.
    pub fn get_var(&self, name: &str) -> Option<&str> {
        self.vars.find_by_name(name).and_then(Entry::value)
    }

    /// Replace the entry named `name` in place, or append a new one.
    pub fn set_var(&mut self, name: &str, value: &str) {
        let text = format!("{name}={value}");
        match self.vars.position_by_name(name) {
            Some(index) => {
                if let Some(entry) = self.vars.get_mut(index) {
                    entry.text = text;
                }
            }
            None => self.vars.push(0, text),
        }
        self.dirty = true;
    }

    /// Remove every entry named `name`. Returns whether anything was removed.
    pub fn unset_var(&mut self, name: &str) -> bool {
        let removed = self.vars.remove_where(|entry| entry.has_name(name)) > 0;
        if removed {
            self.dirty = true;
        }
        removed
    }

    pub fn entries(&self) -> &EntryStore {
        &self.vars
    }

    /// Whether the cached snapshot is stale.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// The `(name, value)` pairs handed to child processes, rebuilt first if
    /// the store changed since the last call.
    pub fn snapshot(&mut self) -> &[(String, String)] {
        if self.dirty {
            self.snapshot = self
                .vars
                .iter()
                .filter_map(|entry| entry.text.split_once('='))
                .filter(|(name, _)| !name.is_empty())
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect();
            self.dirty = false;
            log::debug!("rebuilt environment snapshot ({} entries)", self.snapshot.len());
        }
        &self.snapshot
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use crate::env::Environment;

    #[test]
    fn test_env_set_and_get_var() {
        let mut env = Environment::new();

        assert_eq!(env.get_var("SOME_RANDOM_ENV_VAR_12345"), None);

        env.set_var("KEY", "VALUE");
        assert_eq!(env.get_var("KEY"), Some("VALUE"));

        env.set_var("KEY", "OTHER");
        assert_eq!(env.get_var("KEY"), Some("OTHER"));
        assert_eq!(env.entries().len(), 1);
    }

    #[test]
    fn test_update_keeps_position() {
        let mut env = Environment::new();
        env.set_var("A", "1");
        env.set_var("B", "2");
        env.set_var("A", "3");
        assert_eq!(env.entries().texts(), vec!["A=3", "B=2"]);
    }

    #[test]
    fn test_unset_round_trip() {
        let mut env = Environment::new();
        env.set_var("FOO", "bar");
        assert_eq!(env.get_var("FOO"), Some("bar"));

        assert!(env.unset_var("FOO"));
        assert_eq!(env.get_var("FOO"), None);
        assert!(!env.unset_var("FOO"));
    }

    #[test]
    fn test_prefix_names_are_distinct() {
        let mut env = Environment::new();
        env.set_var("VARIABLE", "long");
        env.set_var("VAR", "short");
        assert_eq!(env.get_var("VAR"), Some("short"));
        assert_eq!(env.get_var("VARIABLE"), Some("long"));

        env.unset_var("VAR");
        assert_eq!(env.get_var("VARIABLE"), Some("long"));
    }

    #[test]
    fn test_snapshot_rebuilt_only_when_dirty() {
        let mut env = Environment::new();
        env.set_var("A", "1");
        assert!(env.is_dirty());
        assert_eq!(env.snapshot(), &[("A".to_string(), "1".to_string())]);
        assert!(!env.is_dirty());

        env.set_var("B", "x=y");
        assert!(env.is_dirty());
        assert_eq!(env.snapshot().len(), 2);
        assert_eq!(env.snapshot()[1], ("B".to_string(), "x=y".to_string()));

        assert!(!env.unset_var("MISSING"));
        assert!(!env.is_dirty());
    }

    #[test]
    fn test_default_matches_new() {
        let mut env = Environment::default();
        assert!(env.is_dirty());
        assert!(env.snapshot().is_empty());
        assert!(!env.is_dirty());
    }

    #[test]
    fn test_env_reads_from_process_env() {
        let env = Environment::from_process();
        assert!(env.get_var("PATH").is_some());
    }
}
