use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::models::StoreDocument;

/// Trait for store document persistence
pub trait DocumentStorage: Send + Sync {
    /// Load the store document from storage
    fn load(&self) -> Result<StoreDocument>;

    /// Save the store document to storage
    fn save(&self, document: &StoreDocument) -> Result<()>;

    /// Get the storage file path
    fn path(&self) -> &PathBuf;
}

/// JSON-based implementation of DocumentStorage
/// Uses atomic write pattern with .tmp file for safety
///
/// A missing file is an empty store; an unreadable or unparseable file is
/// an error and the file is left in place for the user to repair.
pub struct JsonDocumentStorage {
    path: PathBuf,
}

impl JsonDocumentStorage {
    /// Create a new JsonDocumentStorage with the given path
    pub fn new(path: PathBuf) -> Self {
        JsonDocumentStorage { path }
    }
}

impl DocumentStorage for JsonDocumentStorage {
    fn load(&self) -> Result<StoreDocument> {
        // If file doesn't exist, return an empty document
        if !self.path.exists() {
            log::info!(
                "Store document not found at {:?}, starting with an empty store",
                self.path
            );
            return Ok(StoreDocument::default());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read store document from {:?}", self.path))?;

        let document: StoreDocument = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse store document {:?}", self.path))?;

        log::info!(
            "Loaded {} prompts from {:?}",
            document.prompts.len(),
            self.path
        );

        Ok(document)
    }

    fn save(&self, document: &StoreDocument) -> Result<()> {
        let json = serde_json::to_string_pretty(document)
            .context("Failed to serialize store document")?;

        // Atomic write pattern: write to .tmp, then rename
        let tmp_path = self.path.with_extension("json.tmp");

        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }

        fs::write(&tmp_path, json)
            .with_context(|| format!("Failed to write to temporary file {:?}", tmp_path))?;

        fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("Failed to rename {:?} to {:?}", tmp_path, self.path))?;

        log::debug!(
            "Saved {} prompts to {:?}",
            document.prompts.len(),
            self.path
        );

        Ok(())
    }

    fn path(&self) -> &PathBuf {
        &self.path
    }
}
