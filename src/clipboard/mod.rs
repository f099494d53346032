pub mod backend;
pub mod memory;
pub mod system;
pub mod timer;

use anyhow::Result;

pub use backend::ClipboardBackend;
pub use memory::MemoryBackend;
pub use system::SystemBackend;
pub use timer::{CLEAR_DELAY, ClearTimer};

/// Create the clipboard backend for this process
/// Fails if the platform clipboard is unreachable (e.g. no display)
pub fn create_backend() -> Result<Box<dyn ClipboardBackend>> {
    let backend = SystemBackend::new()?;
    Ok(Box::new(backend))
}
