//! In-memory sink that records each write

use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Sink that keeps every write as a separate entry.
///
/// Clones share the same record, so a test can hand one clone to a
/// `Notifier` and inspect another.
#[derive(Clone, Debug, Default)]
pub struct CapturingSink {
    writes: Arc<Mutex<Vec<Vec<u8>>>>,
    failure_message: Option<String>,
}

impl CapturingSink {
    /// Create a new capturing sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sink that rejects every write
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            writes: Arc::default(),
            failure_message: Some(message.into()),
        }
    }

    /// Raw bytes of every write so far
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.lock().clone()
    }

    /// Get the count of writes
    pub fn write_count(&self) -> usize {
        self.lock().len()
    }

    /// Every write decoded as UTF-8 (lossy)
    pub fn messages(&self) -> Vec<String> {
        self.lock()
            .iter()
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
            .collect()
    }

    /// Check if a message was written for a specific recipient
    pub fn was_sent_to(&self, address: &str) -> bool {
        let header = format!("Recipient: {}\n", address);
        self.messages().iter().any(|m| m.starts_with(&header))
    }

    /// Clear all recorded writes
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Vec<u8>>> {
        self.writes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Write for CapturingSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Some(message) = &self.failure_message {
            return Err(io::Error::other(message.clone()));
        }

        self.lock().push(buf.to_vec());
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
