use anyhow::{Context, Result};

use super::backend::ClipboardBackend;

/// System clipboard backend using arboard
/// Opens a fresh clipboard handle per write; handles are not held across
/// calls or threads
pub struct SystemBackend;

impl SystemBackend {
    /// Create a new system clipboard backend
    pub fn new() -> Result<Self> {
        // Verify the platform clipboard is reachable before first use
        arboard::Clipboard::new().context("Failed to initialize system clipboard")?;

        log::debug!("System clipboard backend initialized");
        Ok(SystemBackend)
    }
}

impl ClipboardBackend for SystemBackend {
    fn write_text(&mut self, text: &str) -> Result<()> {
        let mut clipboard = arboard::Clipboard::new().context("Failed to access clipboard")?;
        clipboard
            .set_text(text.to_string())
            .context("Failed to write text to clipboard")?;

        log::debug!("Wrote {} bytes text to clipboard", text.len());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "arboard"
    }
}
