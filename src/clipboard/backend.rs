use anyhow::Result;

/// Trait for clipboard backend abstraction
/// Write-only: prompt content is copied out, never read back
/// Implementations must be sendable to the clear timer's worker thread
pub trait ClipboardBackend: Send {
    /// Write text to clipboard
    fn write_text(&mut self, text: &str) -> Result<()>;

    /// Clear the clipboard (write the empty string)
    fn clear(&mut self) -> Result<()> {
        self.write_text("")
    }

    /// Get the backend name (for logging/debugging)
    fn name(&self) -> &'static str;
}
