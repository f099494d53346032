use anyhow::Result;
use std::sync::{Arc, Mutex};

use super::backend::ClipboardBackend;

/// In-process clipboard backend
/// Records writes in shared memory instead of the system clipboard, so
/// headless runs and tests can observe copy and clear traffic
#[derive(Clone, Default)]
pub struct MemoryBackend {
    writes: Arc<Mutex<Vec<String>>>,
}

impl MemoryBackend {
    /// Create a new in-process backend
    pub fn new() -> Self {
        MemoryBackend::default()
    }

    /// Every write so far, oldest first
    pub fn writes(&self) -> Vec<String> {
        self.writes
            .lock()
            .map(|writes| writes.clone())
            .unwrap_or_default()
    }

    /// The most recent write, if any
    pub fn last(&self) -> Option<String> {
        self.writes
            .lock()
            .ok()
            .and_then(|writes| writes.last().cloned())
    }
}

impl ClipboardBackend for MemoryBackend {
    fn write_text(&mut self, text: &str) -> Result<()> {
        if let Ok(mut writes) = self.writes.lock() {
            writes.push(text.to_string());
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_writes_in_order() {
        let mut backend = MemoryBackend::new();
        backend.write_text("first").unwrap();
        backend.write_text("second").unwrap();
        backend.clear().unwrap();

        assert_eq!(backend.writes(), vec!["first", "second", ""]);
        assert_eq!(backend.last(), Some(String::new()));
    }

    #[test]
    fn test_clones_share_the_record() {
        let mut backend = MemoryBackend::new();
        let observer = backend.clone();

        backend.write_text("shared").unwrap();
        assert_eq!(observer.last(), Some("shared".to_string()));
    }
}
