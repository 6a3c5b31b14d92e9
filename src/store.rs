//! Ordered entry store shared by the environment, alias and history tables.
//!
//! The store is a plain insertion-ordered sequence. It does not enforce any
//! uniqueness of its texts: the tables built on top of it decide what a
//! duplicate means (one `NAME=` per environment variable or alias, none at all
//! for history).

/// One record of an [`EntryStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Sequence number. Only history keeps it meaningful (renumbered `0..N`).
    pub number: usize,
    /// Raw text, `NAME=VALUE` for the keyed tables.
    pub text: String,
}

impl Entry {
    pub fn new(number: usize, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }

    /// True when the text is exactly `name` followed by `=`.
    ///
    /// `VAR` matches `VAR=1` but neither `VARIABLE=1` nor `VA=1`.
    pub fn has_name(&self, name: &str) -> bool {
        self.text
            .strip_prefix(name)
            .is_some_and(|rest| rest.starts_with('='))
    }

    /// Text after the first `=`, if any.
    pub fn value(&self) -> Option<&str> {
        self.text.split_once('=').map(|(_, value)| value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryStore {
    entries: Vec<Entry>,
}

impl EntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Entry> {
        self.entries.get_mut(index)
    }

    /// Appends an entry at the end of the sequence.
    pub fn push(&mut self, number: usize, text: impl Into<String>) {
        self.entries.push(Entry::new(number, text));
    }

    /// Removes every entry for which `predicate` holds and returns how many
    /// were dropped. Surviving entries keep their relative order.
    pub fn remove_where<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&Entry) -> bool,
    {
        let before = self.entries.len();
        self.entries.retain(|entry| !predicate(entry));
        before - self.entries.len()
    }

    /// Drops the `count` oldest entries.
    pub fn drop_front(&mut self, count: usize) {
        let count = count.min(self.entries.len());
        self.entries.drain(..count);
    }

    /// First entry whose text is `name=...`.
    pub fn find_by_name(&self, name: &str) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.has_name(name))
    }

    pub fn position_by_name(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.has_name(name))
    }

    /// Rewrites sequence numbers to `0..len`.
    pub fn renumber(&mut self) {
        for (number, entry) in self.entries.iter_mut().enumerate() {
            entry.number = number;
        }
    }

    /// Copies every text into a fresh vector.
    pub fn texts(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.text.clone()).collect()
    }
}

impl<'a> IntoIterator for &'a EntryStore {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_of(texts: &[&str]) -> EntryStore {
        let mut store = EntryStore::new();
        for text in texts {
            store.push(0, *text);
        }
        store
    }

    #[test]
    fn name_match_requires_equals_boundary() {
        let store = store_of(&["VARIABLE=long", "VAR=short", "VA=tiny"]);
        assert_eq!(store.find_by_name("VAR").map(|e| e.text.as_str()), Some("VAR=short"));
        assert_eq!(store.find_by_name("VA").and_then(Entry::value), Some("tiny"));
        assert!(store.find_by_name("V").is_none());
        assert!(store.find_by_name("VARIABLES").is_none());
    }

    #[test]
    fn remove_where_keeps_relative_order() {
        let mut store = store_of(&["A=1", "B=2", "A=3", "C=4", "A=5"]);
        let removed = store.remove_where(|e| e.has_name("A"));
        assert_eq!(removed, 3);
        assert_eq!(store.texts(), vec!["B=2", "C=4"]);
    }

    #[test]
    fn renumber_and_drop_front() {
        let mut store = store_of(&["a", "b", "c", "d"]);
        store.drop_front(2);
        store.renumber();
        let numbered: Vec<(usize, &str)> =
            store.iter().map(|e| (e.number, e.text.as_str())).collect();
        assert_eq!(numbered, vec![(0, "c"), (1, "d")]);

        store.drop_front(10);
        assert!(store.is_empty());
    }

    #[test]
    fn entry_splits_on_first_equals() {
        let entry = Entry::new(0, "K=a=b");
        assert!(entry.has_name("K"));
        assert_eq!(entry.value(), Some("a=b"));
        assert_eq!(Entry::new(0, "plain").value(), None);
    }
}
