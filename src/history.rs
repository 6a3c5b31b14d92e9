//! Command history.
//!
//! Every non-blank input line is appended to the history store. The store is
//! persisted as plain text, one command per line, at `$HOME/<history file>`:
//! loaded once at startup and rewritten in full (create or truncate) when the
//! session ends. Only the most recent `max_size` commands are kept, both in
//! memory and on disk, and entries are numbered `0..N` after every trim.

use crate::store::EntryStore;
use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct History {
    entries: EntryStore,
    max_size: usize,
}

impl History {
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: EntryStore::new(),
            max_size,
        }
    }

    /// `<home>/<file_name>`, or `None` when there is no home directory.
    pub fn file_path(home: Option<&str>, file_name: &str) -> Option<PathBuf> {
        home.filter(|home| !home.is_empty())
            .map(|home| Path::new(home).join(file_name))
    }

    /// Append a command, dropping the oldest one if the cap is exceeded.
    pub fn add(&mut self, command: &str) {
        let number = self.entries.len();
        self.entries.push(number, command);
        if self.entries.len() > self.max_size {
            self.trim();
        }
    }

    /// Replace the in-memory history with the contents of `path`.
    ///
    /// A missing file is not an error and leaves the history empty. Lines that
    /// are not valid UTF-8 are kept, decoded lossily. On a read error the
    /// current history is left untouched. Returns the number of entries kept.
    pub fn load_from(&mut self, path: &Path) -> io::Result<usize> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e),
        };
        let mut reader = BufReader::new(file);
        let mut loaded = EntryStore::new();
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            if buf.last() == Some(&b'\n') {
                buf.pop();
            }
            let line = String::from_utf8_lossy(&buf);
            if let Cow::Owned(_) = line {
                log::warn!("history line {} is not valid UTF-8", loaded.len() + 1);
            }
            loaded.push(loaded.len(), line);
        }
        self.entries = loaded;
        self.trim();
        Ok(self.entries.len())
    }

    /// Write every entry to `path`, one per line, truncating the file.
    pub fn save_to(&self, path: &Path) -> io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        for entry in &self.entries {
            writeln!(writer, "{}", entry.text)?;
        }
        writer.flush()
    }

    pub fn entries(&self) -> &EntryStore {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn trim(&mut self) {
        let excess = self.entries.len().saturating_sub(self.max_size);
        self.entries.drop_front(excess);
        self.entries.renumber();
    }
}
