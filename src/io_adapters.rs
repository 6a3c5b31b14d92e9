use std::cell::RefCell;
use std::io::{self, BufWriter, Result as IoResult, Write};
use std::rc::Rc;

/// Buffered standard output and unbuffered error stream owned by the
/// interpreter.
///
/// Regular output is only reachable through [`Output::scope`], whose guard
/// flushes when it goes out of scope, so nothing is left sitting in the
/// buffer when a child process starts writing to the same terminal. The
/// buffer is flushed once more when the `Output` itself is dropped.
pub struct Output {
    out: BufWriter<Box<dyn Write>>,
    err: Box<dyn Write>,
}

impl Output {
    pub fn new(out: Box<dyn Write>, err: Box<dyn Write>) -> Self {
        Self {
            out: BufWriter::new(out),
            err,
        }
    }

    /// Process standard output and standard error.
    pub fn stdio() -> Self {
        Self::new(Box::new(io::stdout()), Box::new(io::stderr()))
    }

    /// Borrow the output stream; it is flushed when the scope ends.
    pub fn scope(&mut self) -> OutputScope<'_> {
        OutputScope { out: &mut self.out }
    }

    pub fn flush(&mut self) -> IoResult<()> {
        self.out.flush()
    }

    /// Write one line to the error stream, after pending regular output.
    pub fn report(&mut self, message: &str) {
        let _ = self.out.flush();
        let _ = writeln!(self.err, "{message}");
        let _ = self.err.flush();
    }
}

impl Drop for Output {
    fn drop(&mut self) {
        let _ = self.out.flush();
    }
}

/// Scoped access to [`Output`]'s buffered stream.
pub struct OutputScope<'a> {
    out: &'a mut BufWriter<Box<dyn Write>>,
}

impl Write for OutputScope<'_> {
    fn write(&mut self, data: &[u8]) -> IoResult<usize> {
        self.out.write(data)
    }

    fn flush(&mut self) -> IoResult<()> {
        self.out.flush()
    }
}

impl Drop for OutputScope<'_> {
    fn drop(&mut self) {
        let _ = self.out.flush();
    }
}

/// Memory-backed writer for capturing output in tests.
#[derive(Clone, Default)]
pub struct MemWriter {
    buf: Rc<RefCell<Vec<u8>>>,
}

impl MemWriter {
    /// Public constructor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.borrow()).into_owned()
    }
}

impl Write for MemWriter {
    fn write(&mut self, data: &[u8]) -> IoResult<usize> {
        self.buf.borrow_mut().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> IoResult<()> {
        Ok(())
    }
}
