//! Splitting of a raw input line into chained command segments.
//!
//! A line such as `make && ./run || echo failed; echo done` is consumed one
//! segment at a time. Each operator terminates the segment before it and
//! records how the *next* segment is gated:
//!
//! | operator | next segment runs when      |
//! |----------|-----------------------------|
//! | `;`      | always                      |
//! | `&&`     | the last status is zero     |
//! | `\|\|`   | the last status is non-zero |
//!
//! When the gate fails, the rest of the line is dropped: no further segments
//! are produced, whatever operators follow.

use crate::command::ExitCode;

/// Operator that preceded the segment about to be produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChainType {
    /// First segment of a line.
    #[default]
    None,
    /// `;`
    Sequence,
    /// `&&`
    And,
    /// `||`
    Or,
}

impl ChainType {
    /// Whether a segment gated by this operator runs after `last_status`.
    pub fn allows(self, last_status: ExitCode) -> bool {
        match self {
            ChainType::And => last_status == 0,
            ChainType::Or => last_status != 0,
            ChainType::None | ChainType::Sequence => true,
        }
    }
}

/// Resumable position inside the current raw line.
#[derive(Debug, Default)]
pub struct LineCursor {
    input: Vec<char>,
    pos: usize,
    chain: ChainType,
    pending: bool,
}

impl LineCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start consuming a new raw line. The chain type resets to
    /// [`ChainType::None`]; a blank line yields no segments at all.
    pub fn load(&mut self, line: &str) {
        self.input = line.chars().collect();
        self.pos = 0;
        self.chain = ChainType::None;
        self.pending = !line.trim().is_empty();
    }

    /// True once every segment of the current line has been produced or
    /// discarded.
    pub fn is_exhausted(&self) -> bool {
        !self.pending
    }

    /// Operator recorded for the next segment.
    pub fn chain(&self) -> ChainType {
        self.chain
    }

    /// Produce the next segment, applying the short-circuit gate of the
    /// previously recorded operator against `last_status` first.
    ///
    /// An operator at the start or end of the line delimits an empty segment,
    /// which is returned as an empty string.
    pub fn next_segment(&mut self, last_status: ExitCode) -> Option<String> {
        if !self.pending {
            return None;
        }
        if !self.chain.allows(last_status) {
            log::debug!("{:?} chain short-circuited by status {last_status}", self.chain);
            self.discard();
            return None;
        }

        let start = self.pos;
        while let Some(ch) = self.read_char() {
            let operator = match (ch, self.peek_char()) {
                ('&', Some('&')) => Some((ChainType::And, 2)),
                ('|', Some('|')) => Some((ChainType::Or, 2)),
                (';', _) => Some((ChainType::Sequence, 1)),
                _ => None,
            };
            if let Some((chain, width)) = operator {
                let end = self.pos - 1;
                self.pos = end + width;
                self.chain = chain;
                return Some(self.input[start..end].iter().collect());
            }
        }

        self.pending = false;
        self.chain = ChainType::None;
        Some(self.input[start..].iter().collect())
    }

    /// Drop whatever remains of the current line.
    pub fn discard(&mut self) {
        self.pos = self.input.len();
        self.pending = false;
        self.chain = ChainType::None;
    }

    fn read_char(&mut self) -> Option<char> {
        let ch = self.input.get(self.pos).copied();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    fn peek_char(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }
}
