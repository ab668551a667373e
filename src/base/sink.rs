//! Pluggable destination for handler and outbound-call failures.

use std::{error::Error, fmt::Display, io::Write, sync::Arc};

use parking_lot::Mutex;

/// Line-oriented diagnostic writer shared by every in-flight dispatch.
///
/// Each report is written and flushed while holding the lock, so concurrent
/// reports never interleave within a line.
#[derive(Clone)]
pub struct DiagnosticSink {
    writer: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl Default for DiagnosticSink {
    fn default() -> Self {
        Self::stdout()
    }
}

impl DiagnosticSink {
    pub fn new<W>(writer: W) -> Self
    where
        W: Write + Send + 'static,
    {
        Self {
            writer: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }

    /// Swap the destination; clones of this sink see the new writer too.
    pub fn set_writer<W>(&self, writer: W)
    where
        W: Write + Send + 'static,
    {
        *self.writer.lock() = Box::new(writer);
    }

    /// Write `message` as a single line.
    pub fn report(&self, message: impl Display) {
        let line = format!("{message}\n");
        let mut writer = self.writer.lock();

        // A broken sink must not take dispatch down with it.
        let _ = writer.write_all(line.as_bytes());
        let _ = writer.flush();
    }

    /// Write `err` and its causes as one `outer: inner: ...` line.
    pub fn report_error(&self, err: &(dyn Error + 'static)) {
        let mut line = err.to_string();
        let mut source = err.source();

        while let Some(cause) = source {
            line.push_str(": ");
            line.push_str(&cause.to_string());
            source = cause.source();
        }

        self.report(line);
    }
}
