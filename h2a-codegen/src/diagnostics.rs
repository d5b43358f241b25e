//! Append-only log of constructs that could not be translated.
//!
//! A single [`Diagnostics`] value is created per run and passed by reference
//! through every emitter. Appends are serialized by a mutex so independent
//! aggregates can be emitted from separate threads.

use parking_lot::Mutex;

/// Shared conversion notes.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Mutex<Vec<String>>,
}

impl Diagnostics {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one note.
    pub fn note(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{}", message);
        self.entries.lock().push(message);
    }

    /// Number of notes recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Snapshot of all notes in append order.
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().clone()
    }

    /// Renders the conversion log for `source` converted to `destination`.
    #[must_use]
    pub fn render_log(&self, source: &str, destination: &str) -> String {
        let mut out = format!(
            "Notes relating to hidl2aidl conversion of {source} to {destination} (if any) follow:\n"
        );
        for entry in self.entries.lock().iter() {
            out.push_str(entry);
            out.push('\n');
        }
        out.push_str("END OF LOG\n");
        out
    }
}
