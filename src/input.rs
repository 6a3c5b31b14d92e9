//! Line acquisition: one raw line per read, from a terminal editor or from a
//! buffered stream (piped standard input or a script file).

use crate::error::ShellError;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Result of a single read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// A line with its trailing newline removed.
    Line(String),
    /// Ctrl-C at the prompt; the caller prompts again.
    Interrupted,
    Eof,
}

pub enum LineSource {
    /// Interactive terminal with line editing.
    Editor(DefaultEditor),
    /// Anything else; no prompt is drawn by the source itself.
    Stream(Box<dyn BufRead>),
}

impl LineSource {
    pub fn terminal() -> rustyline::Result<Self> {
        Ok(LineSource::Editor(DefaultEditor::new()?))
    }

    pub fn stdin() -> Self {
        LineSource::Stream(Box::new(BufReader::new(io::stdin())))
    }

    pub fn from_reader(reader: impl BufRead + 'static) -> Self {
        LineSource::Stream(Box::new(reader))
    }

    /// Open a script file for batch execution.
    pub fn script(path: &Path) -> Result<Self, ShellError> {
        match File::open(path) {
            Ok(file) => Ok(Self::from_reader(BufReader::new(file))),
            Err(e) => Err(match e.kind() {
                io::ErrorKind::NotFound => ShellError::ScriptNotFound(path.to_path_buf()),
                io::ErrorKind::PermissionDenied => ShellError::ScriptPermission(path.to_path_buf()),
                _ => ShellError::ScriptOpen(path.to_path_buf(), e),
            }),
        }
    }

    /// Whether this source draws its own prompt.
    pub fn draws_prompt(&self) -> bool {
        matches!(self, LineSource::Editor(_))
    }

    /// Block until one line is available.
    pub fn read_line(&mut self, prompt: &str) -> anyhow::Result<ReadOutcome> {
        match self {
            LineSource::Editor(editor) => match editor.readline(prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        editor.add_history_entry(line.as_str())?;
                    }
                    Ok(ReadOutcome::Line(line))
                }
                Err(ReadlineError::Interrupted) => Ok(ReadOutcome::Interrupted),
                Err(ReadlineError::Eof) => Ok(ReadOutcome::Eof),
                Err(err) => Err(err.into()),
            },
            LineSource::Stream(reader) => {
                let mut buf = Vec::new();
                if reader.read_until(b'\n', &mut buf)? == 0 {
                    return Ok(ReadOutcome::Eof);
                }
                if buf.last() == Some(&b'\n') {
                    buf.pop();
                }
                Ok(ReadOutcome::Line(String::from_utf8_lossy(&buf).into_owned()))
            }
        }
    }
}

/// Cut the line at the first `#` that starts the line or follows a space.
pub fn strip_comment(line: &str) -> &str {
    let bytes = line.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b == b'#' && (i == 0 || bytes[i - 1] == b' ') {
            return &line[..i];
        }
    }
    line
}
