//! Shared build log that stdout and stderr of a build are forwarded to.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

/// A cloneable handle to the writer a build step logs into.
///
/// Clones write to the same underlying writer; each line is written and
/// flushed under one lock so lines from stdout and stderr never interleave.
#[derive(Clone)]
pub struct BuildLog {
    writer: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl fmt::Debug for BuildLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildLog").finish_non_exhaustive()
    }
}

impl BuildLog {
    /// Log into the given writer.
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    /// Log into the process's standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// Write raw bytes (normally one line of build output) and flush.
    ///
    /// # Errors
    /// Returns an error if the underlying writer fails.
    pub fn write_line(&self, bytes: &[u8]) -> io::Result<()> {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writer.write_all(bytes)?;
        writer.flush()
    }

    /// Write a message followed by a newline.
    ///
    /// # Errors
    /// Returns an error if the underlying writer fails.
    pub fn message(&self, message: &str) -> io::Result<()> {
        self.write_line(format!("{message}\n").as_bytes())
    }
}
