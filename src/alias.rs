use crate::store::{Entry, EntryStore};

/// Aliases defined with the `alias` builtin, kept as `NAME=VALUE` entries in
/// definition order. At most one entry exists per `NAME`.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    aliases: EntryStore,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of the alias named exactly `name`.
    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.aliases.find_by_name(name).and_then(Entry::value)
    }

    /// Apply a `NAME=VALUE` definition.
    ///
    /// An empty `VALUE` removes the alias. A redefinition moves the alias to
    /// the end of the table. Returns `false` when `definition` has no `=`.
    pub fn define(&mut self, definition: &str) -> bool {
        let Some((name, value)) = definition.split_once('=') else {
            return false;
        };
        self.remove(name);
        if !value.is_empty() {
            self.aliases.push(0, definition);
        }
        true
    }

    /// Remove the alias named `name`. Returns whether it existed.
    pub fn remove(&mut self, name: &str) -> bool {
        self.aliases.remove_where(|entry| entry.has_name(name)) > 0
    }

    /// `NAME='VALUE'` rendering of the alias named `name`.
    pub fn render(&self, name: &str) -> Option<String> {
        self.aliases.find_by_name(name).map(render_entry)
    }

    /// Every alias in definition order, rendered as `NAME='VALUE'`.
    pub fn render_all(&self) -> impl Iterator<Item = String> + '_ {
        self.aliases.iter().map(render_entry)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

fn render_entry(entry: &Entry) -> String {
    match entry.text.split_once('=') {
        Some((name, value)) => format!("{name}='{value}'"),
        None => entry.text.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn define_lookup_and_render() {
        let mut aliases = AliasTable::new();
        assert!(aliases.define("ll=ls"));
        assert_eq!(aliases.lookup("ll"), Some("ls"));
        assert_eq!(aliases.render("ll").as_deref(), Some("ll='ls'"));
        assert_eq!(aliases.lookup("l"), None);
    }

    #[test]
    fn redefinition_replaces_and_moves_to_end() {
        let mut aliases = AliasTable::new();
        aliases.define("a=1");
        aliases.define("b=2");
        aliases.define("a=3");
        assert_eq!(aliases.len(), 2);
        let all: Vec<String> = aliases.render_all().collect();
        assert_eq!(all, vec!["b='2'", "a='3'"]);
    }

    #[test]
    fn empty_value_deletes() {
        let mut aliases = AliasTable::new();
        aliases.define("gs=git");
        assert!(aliases.define("gs="));
        assert!(aliases.is_empty());
        assert!(aliases.render("gs").is_none());
    }

    #[test]
    fn definition_without_equals_is_rejected() {
        let mut aliases = AliasTable::new();
        assert!(!aliases.define("nothing"));
        assert!(aliases.is_empty());
    }

    #[test]
    fn value_may_contain_equals() {
        let mut aliases = AliasTable::new();
        aliases.define("e=env=1");
        assert_eq!(aliases.lookup("e"), Some("env=1"));
    }
}
