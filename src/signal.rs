//! SIGINT handling for the interactive loop.
//!
//! While the guard is alive the shell itself no longer dies on Ctrl-C: the
//! signal is delivered to a watcher thread which runs the installed callback.
//! Child processes are unaffected since caught signals revert to their default
//! disposition on exec.

use signal_hook::consts::SIGINT;
use signal_hook::iterator::{Handle, Signals};
use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

/// Keeps the SIGINT watcher installed. Dropping it unregisters the handler
/// and joins the watcher thread.
pub struct InterruptGuard {
    handle: Handle,
    thread: Option<JoinHandle<()>>,
}

impl Drop for InterruptGuard {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// Run `on_interrupt` on every SIGINT until the returned guard is dropped.
pub fn install_interrupt_handler<F>(on_interrupt: F) -> io::Result<InterruptGuard>
where
    F: Fn() + Send + 'static,
{
    let mut signals = Signals::new([SIGINT])?;
    let handle = signals.handle();
    let thread = thread::spawn(move || {
        for _ in signals.forever() {
            on_interrupt();
        }
    });
    Ok(InterruptGuard {
        handle,
        thread: Some(thread),
    })
}

/// Callback that redraws `prompt` on a fresh line, but only while
/// `at_prompt` says the loop is blocked reading input.
pub fn reprint_prompt(prompt: String, at_prompt: Arc<AtomicBool>) -> impl Fn() + Send + 'static {
    move || {
        if at_prompt.load(Ordering::SeqCst) {
            let mut stdout = io::stdout().lock();
            let _ = write!(stdout, "\n{prompt}");
            let _ = stdout.flush();
        }
    }
}
