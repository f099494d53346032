pub mod document;

use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::path::PathBuf;

pub use document::{DocumentStorage, JsonDocumentStorage};

/// File name of the store document inside the data directory
pub const DOCUMENT_FILE: &str = "prompts.json";

/// Ensure the XDG data directory exists
/// Returns the data directory path
///
/// XDG Base Directory Specification:
/// - Data: $XDG_DATA_HOME/promptr (default: ~/.local/share/promptr)
pub fn ensure_directories() -> Result<PathBuf> {
    let home = env::var("HOME").context("HOME environment variable not set")?;
    let home_path = PathBuf::from(home);

    // Get XDG data directory
    let data_dir = if let Ok(xdg_data) = env::var("XDG_DATA_HOME") {
        PathBuf::from(xdg_data).join("promptr")
    } else {
        home_path.join(".local/share/promptr")
    };

    fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory {:?}", data_dir))?;

    log::debug!("Data directory: {:?}", data_dir);

    Ok(data_dir)
}

/// Fixed path of the store document under the per-user data directory
pub fn document_path() -> Result<PathBuf> {
    Ok(ensure_directories()?.join(DOCUMENT_FILE))
}
