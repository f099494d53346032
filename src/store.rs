use std::fs;
use std::path::{Path, PathBuf};

use crate::models::{Language, Prompt, Settings, StoreDocument, Theme};
use crate::storage::DocumentStorage;

/// Maximum size of a single prompt's content in bytes (1MiB)
pub const MAX_PROMPT_BYTES: usize = 1024 * 1024;

/// Maximum aggregate content size across all prompts in bytes (10MiB)
pub const MAX_DOCUMENT_BYTES: usize = 10 * 1024 * 1024;

/// Store errors
///
/// Every failure in the store surfaces as one of these symbolic results;
/// nothing here aborts the process. The shell maps variants to user-facing
/// text via [`StoreError::key`] or the Display impl.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to load store document: {0}")]
    Load(String),

    #[error("Failed to save store document: {0}")]
    Save(String),

    #[error("Store content is {size} bytes, over the {limit} byte limit")]
    FileTooLarge { size: usize, limit: usize },

    #[error("Prompt content is {size} bytes, over the {limit} byte limit")]
    PromptTooLarge { size: usize, limit: usize },

    #[error("Not a valid prompt collection: {0}")]
    InvalidFormat(String),

    #[error("No prompt at index {0}")]
    IndexOutOfRange(usize),

    #[error("Failed to export prompts: {0}")]
    ExportFailed(String),
}

impl StoreError {
    /// Stable symbolic key for this error, for shells that map errors to
    /// their own message tables
    pub fn key(&self) -> &'static str {
        match self {
            StoreError::Load(_) => "load_error",
            StoreError::Save(_) => "save_error",
            StoreError::FileTooLarge { .. } => "file_too_large",
            StoreError::PromptTooLarge { .. } => "prompt_too_large",
            StoreError::InvalidFormat(_) => "invalid_format",
            StoreError::IndexOutOfRange(_) => "index_out_of_range",
            StoreError::ExportFailed(_) => "export_failed",
        }
    }
}

/// Size ceilings enforced by the store
///
/// Production stores use the defaults; tests substitute smaller values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Per-prompt content ceiling in bytes
    pub max_prompt_bytes: usize,
    /// Aggregate content ceiling across all prompts in bytes
    pub max_document_bytes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_prompt_bytes: MAX_PROMPT_BYTES,
            max_document_bytes: MAX_DOCUMENT_BYTES,
        }
    }
}

/// The prompt store: sole owner of the persisted document
///
/// Every mutating operation validates, applies the change in memory,
/// and synchronously rewrites the whole document before returning
/// success. A failed write rolls the in-memory change back, so memory
/// never drifts ahead of disk. All mutation must happen on one logical
/// context; the store itself carries no locking.
pub struct PromptStore {
    storage: Box<dyn DocumentStorage>,
    limits: Limits,
    document: StoreDocument,
}

impl PromptStore {
    /// Create a store with the default size limits
    ///
    /// The store starts empty; call [`PromptStore::load`] to read the
    /// persisted document.
    pub fn new(storage: Box<dyn DocumentStorage>) -> Self {
        Self::with_limits(storage, Limits::default())
    }

    /// Create a store with explicit size limits
    pub fn with_limits(storage: Box<dyn DocumentStorage>, limits: Limits) -> Self {
        PromptStore {
            storage,
            limits,
            document: StoreDocument::default(),
        }
    }

    /// Load (or re-load) the document from disk
    ///
    /// A missing file is an empty store. An unreadable or unparseable
    /// file is reported as `LoadError` and the in-memory state keeps its
    /// prior (default or last-good) value. Persisted prompts over the
    /// per-item limit are dropped with a warning rather than failing the
    /// whole document.
    pub fn load(&mut self) -> Result<(), StoreError> {
        let mut document = self
            .storage
            .load()
            .map_err(|e| StoreError::Load(format!("{:#}", e)))?;

        let before = document.prompts.len();
        document
            .prompts
            .retain(|p| p.content_len() <= self.limits.max_prompt_bytes);
        let dropped = before - document.prompts.len();
        if dropped > 0 {
            log::warn!(
                "Dropped {} oversized prompts while loading {:?}",
                dropped,
                self.storage.path()
            );
        }

        self.document = document;
        Ok(())
    }

    /// Persist the current document
    ///
    /// Computes the aggregate content size first and fails with
    /// `FileTooLarge` without touching the file if the ceiling is
    /// exceeded.
    pub fn save(&self) -> Result<(), StoreError> {
        let size = self.document.content_bytes();
        if size > self.limits.max_document_bytes {
            return Err(StoreError::FileTooLarge {
                size,
                limit: self.limits.max_document_bytes,
            });
        }

        self.storage
            .save(&self.document)
            .map_err(|e| StoreError::Save(format!("{:#}", e)))
    }

    /// Append a new unpinned prompt and persist
    /// Returns the index of the new prompt
    pub fn add(
        &mut self,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<usize, StoreError> {
        let content = content.into();
        self.check_prompt_size(&content)?;

        self.document.prompts.push(Prompt::new(title, content));

        if let Err(e) = self.save() {
            self.document.prompts.pop();
            return Err(e);
        }

        let index = self.document.prompts.len() - 1;
        log::info!("Added prompt at index {}", index);
        Ok(index)
    }

    /// Replace title and content of the prompt at `index` and persist
    /// Pin state is untouched unless `pinned` is passed explicitly
    pub fn update(
        &mut self,
        index: usize,
        title: impl Into<String>,
        content: impl Into<String>,
        pinned: Option<bool>,
    ) -> Result<(), StoreError> {
        if index >= self.document.prompts.len() {
            return Err(StoreError::IndexOutOfRange(index));
        }

        let content = content.into();
        self.check_prompt_size(&content)?;

        let replacement = Prompt {
            title: title.into(),
            content,
            pinned: pinned.unwrap_or(self.document.prompts[index].pinned),
        };
        let previous = std::mem::replace(&mut self.document.prompts[index], replacement);

        if let Err(e) = self.save() {
            self.document.prompts[index] = previous;
            return Err(e);
        }

        log::info!("Updated prompt at index {}", index);
        Ok(())
    }

    /// Remove the prompt at `index` and persist
    ///
    /// A stale index is a silent no-op (`Ok(false)`). Removal shifts every
    /// subsequent index.
    pub fn delete(&mut self, index: usize) -> Result<bool, StoreError> {
        if index >= self.document.prompts.len() {
            log::debug!("Delete ignored, no prompt at index {}", index);
            return Ok(false);
        }

        let removed = self.document.prompts.remove(index);

        if let Err(e) = self.save() {
            self.document.prompts.insert(index, removed);
            return Err(e);
        }

        log::info!("Deleted prompt at index {}", index);
        Ok(true)
    }

    /// Flip the pinned flag of the prompt at `index` and persist
    ///
    /// Does not enforce the pin ceiling; that is the pin policy's job,
    /// composed on top. A stale index is a silent no-op (`Ok(None)`);
    /// otherwise returns the new pinned state.
    pub fn toggle_pin(&mut self, index: usize) -> Result<Option<bool>, StoreError> {
        let Some(prompt) = self.document.prompts.get_mut(index) else {
            log::debug!("Toggle pin ignored, no prompt at index {}", index);
            return Ok(None);
        };

        prompt.toggle_pin();
        let pinned = prompt.pinned;

        if let Err(e) = self.save() {
            self.document.prompts[index].toggle_pin();
            return Err(e);
        }

        Ok(Some(pinned))
    }

    /// Unpin the prompt at `unpin_index` and pin the one at `pin_index`
    /// as one composite operation with a single persist
    ///
    /// Both flags flip together or not at all: a failed persist restores
    /// both. Callers pass two distinct, valid indices; the pin policy's
    /// replacement flow is the intended caller.
    pub fn replace_pin(&mut self, unpin_index: usize, pin_index: usize) -> Result<(), StoreError> {
        if unpin_index >= self.document.prompts.len() {
            return Err(StoreError::IndexOutOfRange(unpin_index));
        }
        if pin_index >= self.document.prompts.len() {
            return Err(StoreError::IndexOutOfRange(pin_index));
        }

        let previous_unpin = self.document.prompts[unpin_index].pinned;
        let previous_pin = self.document.prompts[pin_index].pinned;

        self.document.prompts[unpin_index].pinned = false;
        self.document.prompts[pin_index].pinned = true;

        if let Err(e) = self.save() {
            self.document.prompts[unpin_index].pinned = previous_unpin;
            self.document.prompts[pin_index].pinned = previous_pin;
            return Err(e);
        }

        log::info!(
            "Replaced pin: unpinned index {}, pinned index {}",
            unpin_index,
            pin_index
        );
        Ok(())
    }

    /// Import prompts from a file using the store document schema
    ///
    /// The whole import is validated before anything is appended: an
    /// oversized source file, a schema violation, or a single oversized
    /// item rejects the entire import and leaves the store untouched. On
    /// success every item is appended (no merging) and the store persists
    /// once. Returns the number of imported prompts.
    pub fn import_from(&mut self, path: &Path) -> Result<usize, StoreError> {
        let metadata =
            fs::metadata(path).map_err(|e| StoreError::Load(format!("{:?}: {}", path, e)))?;
        if metadata.len() > self.limits.max_document_bytes as u64 {
            return Err(StoreError::FileTooLarge {
                size: metadata.len() as usize,
                limit: self.limits.max_document_bytes,
            });
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| StoreError::Load(format!("{:?}: {}", path, e)))?;
        let incoming = self.validate_import(&contents)?;
        let count = incoming.len();

        let previous_len = self.document.prompts.len();
        self.document.prompts.extend(incoming);

        if let Err(e) = self.save() {
            self.document.prompts.truncate(previous_len);
            return Err(e);
        }

        log::info!("Imported {} prompts from {:?}", count, path);
        Ok(count)
    }

    /// Validate an import payload into a list of prompts without touching
    /// the store
    fn validate_import(&self, contents: &str) -> Result<Vec<Prompt>, StoreError> {
        let value: serde_json::Value = serde_json::from_str(contents)
            .map_err(|e| StoreError::InvalidFormat(e.to_string()))?;

        let Some(object) = value.as_object() else {
            return Err(StoreError::InvalidFormat(
                "top level is not an object".to_string(),
            ));
        };
        let Some(items) = object.get("prompts").and_then(|v| v.as_array()) else {
            return Err(StoreError::InvalidFormat(
                "missing \"prompts\" array".to_string(),
            ));
        };

        let mut prompts = Vec::with_capacity(items.len());
        for (position, item) in items.iter().enumerate() {
            let Some(entry) = item.as_object() else {
                return Err(StoreError::InvalidFormat(format!(
                    "prompt {} is not an object",
                    position
                )));
            };
            let Some(title) = entry.get("title").and_then(|v| v.as_str()) else {
                return Err(StoreError::InvalidFormat(format!(
                    "prompt {} has no string \"title\"",
                    position
                )));
            };
            let Some(content) = entry.get("content").and_then(|v| v.as_str()) else {
                return Err(StoreError::InvalidFormat(format!(
                    "prompt {} has no string \"content\"",
                    position
                )));
            };
            self.check_prompt_size(content)?;

            prompts.push(Prompt {
                title: title.to_string(),
                content: content.to_string(),
                pinned: entry.get("pinned").and_then(|v| v.as_bool()).unwrap_or(false),
            });
        }

        Ok(prompts)
    }

    /// Export the current document verbatim to `path`
    ///
    /// The export is a superset write of already-valid state, so failure
    /// is I/O-only.
    pub fn export_to(&self, path: &Path) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.document)
            .map_err(|e| StoreError::ExportFailed(e.to_string()))?;

        fs::write(path, json).map_err(|e| StoreError::ExportFailed(format!("{:?}: {}", path, e)))?;

        log::info!(
            "Exported {} prompts to {:?}",
            self.document.prompts.len(),
            path
        );
        Ok(())
    }

    /// Toggle the display language and persist
    pub fn switch_language(&mut self) -> Result<Language, StoreError> {
        let previous = self.document.settings.language;
        self.document.settings.language = previous.toggled();

        if let Err(e) = self.save() {
            self.document.settings.language = previous;
            return Err(e);
        }

        Ok(self.document.settings.language)
    }

    /// Toggle the display theme and persist
    pub fn switch_theme(&mut self) -> Result<Theme, StoreError> {
        let previous = self.document.settings.theme;
        self.document.settings.theme = previous.toggled();

        if let Err(e) = self.save() {
            self.document.settings.theme = previous;
            return Err(e);
        }

        Ok(self.document.settings.theme)
    }

    fn check_prompt_size(&self, content: &str) -> Result<(), StoreError> {
        if content.len() > self.limits.max_prompt_bytes {
            return Err(StoreError::PromptTooLarge {
                size: content.len(),
                limit: self.limits.max_prompt_bytes,
            });
        }
        Ok(())
    }

    /// All prompts in store order
    pub fn prompts(&self) -> &[Prompt] {
        &self.document.prompts
    }

    /// The prompt at `index`, if any
    pub fn get(&self, index: usize) -> Option<&Prompt> {
        self.document.prompts.get(index)
    }

    /// Current settings
    pub fn settings(&self) -> &Settings {
        &self.document.settings
    }

    /// Number of prompts
    pub fn len(&self) -> usize {
        self.document.prompts.len()
    }

    /// Check if the store holds no prompts
    pub fn is_empty(&self) -> bool {
        self.document.prompts.is_empty()
    }

    /// Aggregate content size in bytes
    pub fn content_bytes(&self) -> usize {
        self.document.content_bytes()
    }

    /// Number of currently pinned prompts
    pub fn pinned_count(&self) -> usize {
        self.document.pinned_count()
    }

    /// Indices of currently pinned prompts, in store order
    pub fn pinned_indices(&self) -> Vec<usize> {
        self.document.pinned_indices()
    }

    /// The size limits this store enforces
    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// Path of the persisted document
    pub fn path(&self) -> &PathBuf {
        self.storage.path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::JsonDocumentStorage;
    use tempfile::{TempDir, tempdir};

    const TEST_LIMITS: Limits = Limits {
        max_prompt_bytes: 100,
        max_document_bytes: 300,
    };

    fn test_store(dir: &TempDir) -> PromptStore {
        let storage = JsonDocumentStorage::new(dir.path().join("prompts.json"));
        PromptStore::with_limits(Box::new(storage), TEST_LIMITS)
    }

    #[test]
    fn test_round_trip() {
        let dir = tempdir().unwrap();

        let mut store = test_store(&dir);
        store.load().unwrap();
        store.add("a", "alpha").unwrap();
        store.add("b", "beta").unwrap();
        store.toggle_pin(1).unwrap();
        store.switch_language().unwrap();

        let mut reopened = test_store(&dir);
        reopened.load().unwrap();
        assert_eq!(reopened.prompts(), store.prompts());
        assert_eq!(reopened.settings(), store.settings());
        assert!(reopened.prompts()[1].pinned);
        assert_eq!(reopened.settings().language, Language::Zh);
    }

    #[test]
    fn test_add_rejects_oversized_prompt() {
        let dir = tempdir().unwrap();
        let mut store = test_store(&dir);

        let err = store.add("big", "x".repeat(101)).unwrap_err();
        assert!(matches!(
            err,
            StoreError::PromptTooLarge { size: 101, limit: 100 }
        ));
        assert!(store.is_empty());
        // Nothing was written
        assert!(!store.path().exists());
    }

    #[test]
    fn test_aggregate_limit_rolls_back_add() {
        let dir = tempdir().unwrap();
        let mut store = test_store(&dir);

        store.add("a", "x".repeat(100)).unwrap();
        store.add("b", "x".repeat(100)).unwrap();
        store.add("c", "x".repeat(100)).unwrap();

        // One more byte pushes the aggregate over 300
        let err = store.add("d", "x").unwrap_err();
        assert!(matches!(err, StoreError::FileTooLarge { size: 301, .. }));
        assert_eq!(store.len(), 3);

        // Disk still holds the last good state
        let mut reopened = test_store(&dir);
        reopened.load().unwrap();
        assert_eq!(reopened.len(), 3);
    }

    #[test]
    fn test_update_semantics() {
        let dir = tempdir().unwrap();
        let mut store = test_store(&dir);
        store.add("a", "alpha").unwrap();
        store.toggle_pin(0).unwrap();

        // Stale index is a reported error for update
        let err = store.update(5, "x", "y", None).unwrap_err();
        assert!(matches!(err, StoreError::IndexOutOfRange(5)));

        // Pin state survives an update that doesn't pass it
        store.update(0, "a2", "alpha2", None).unwrap();
        assert_eq!(store.get(0).unwrap().title, "a2");
        assert!(store.get(0).unwrap().pinned);

        // And changes when passed explicitly
        store.update(0, "a3", "alpha3", Some(false)).unwrap();
        assert!(!store.get(0).unwrap().pinned);

        // Oversized replacement content is rejected before mutation
        let err = store.update(0, "a4", "x".repeat(101), None).unwrap_err();
        assert!(matches!(err, StoreError::PromptTooLarge { .. }));
        assert_eq!(store.get(0).unwrap().title, "a3");
    }

    #[test]
    fn test_delete_shifts_and_ignores_stale() {
        let dir = tempdir().unwrap();
        let mut store = test_store(&dir);
        store.add("a", "1").unwrap();
        store.add("b", "2").unwrap();
        store.add("c", "3").unwrap();

        assert!(store.delete(1).unwrap());
        let titles: Vec<&str> = store.prompts().iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "c"]);

        // Stale index: silent no-op
        assert!(!store.delete(7).unwrap());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_toggle_pin_stale_is_noop() {
        let dir = tempdir().unwrap();
        let mut store = test_store(&dir);
        store.add("a", "1").unwrap();

        assert_eq!(store.toggle_pin(0).unwrap(), Some(true));
        assert_eq!(store.toggle_pin(0).unwrap(), Some(false));
        assert_eq!(store.toggle_pin(9).unwrap(), None);
    }

    #[test]
    fn test_replace_pin_is_composite() {
        let dir = tempdir().unwrap();
        let mut store = test_store(&dir);
        store.add("a", "1").unwrap();
        store.add("b", "2").unwrap();
        store.toggle_pin(0).unwrap();

        store.replace_pin(0, 1).unwrap();
        assert!(!store.get(0).unwrap().pinned);
        assert!(store.get(1).unwrap().pinned);
        assert_eq!(store.pinned_count(), 1);

        let err = store.replace_pin(0, 9).unwrap_err();
        assert!(matches!(err, StoreError::IndexOutOfRange(9)));
    }

    #[test]
    fn test_import_appends_and_persists_once() {
        let dir = tempdir().unwrap();
        let mut store = test_store(&dir);
        store.add("existing", "0").unwrap();

        let import_path = dir.path().join("import.json");
        fs::write(
            &import_path,
            r#"{"prompts":[{"title":"T","content":"C"},{"title":"U","content":"D","pinned":true}]}"#,
        )
        .unwrap();

        let count = store.import_from(&import_path).unwrap();
        assert_eq!(count, 2);
        assert_eq!(store.len(), 3);
        assert_eq!(store.get(1).unwrap().title, "T");
        assert!(!store.get(1).unwrap().pinned);
        assert!(store.get(2).unwrap().pinned);
    }

    #[test]
    fn test_import_rejects_invalid_format() {
        let dir = tempdir().unwrap();
        let mut store = test_store(&dir);
        store.add("existing", "0").unwrap();

        for payload in [
            "[]",
            r#"{"settings":{}}"#,
            r#"{"prompts":"nope"}"#,
            r#"{"prompts":[42]}"#,
            r#"{"prompts":[{"content":"C"}]}"#,
            r#"{"prompts":[{"title":"T","content":7}]}"#,
            "not json at all",
        ] {
            let import_path = dir.path().join("import.json");
            fs::write(&import_path, payload).unwrap();

            let err = store.import_from(&import_path).unwrap_err();
            assert!(
                matches!(err, StoreError::InvalidFormat(_)),
                "payload {:?} gave {:?}",
                payload,
                err
            );
            assert_eq!(store.len(), 1);
        }
    }

    #[test]
    fn test_import_oversized_item_is_atomic() {
        let dir = tempdir().unwrap();
        let mut store = test_store(&dir);
        store.add("existing", "0").unwrap();

        // Item 3 of 5 is over the per-item limit; nothing may be appended.
        // The payload must stay within max_document_bytes so the per-item
        // check, not the file-size check, is what rejects it.
        let big = "x".repeat(101);
        let payload = format!(
            r#"{{"prompts":[{{"title":"1","content":"a"}},{{"title":"2","content":"b"}},{{"title":"3","content":"{}"}},{{"title":"4","content":"d"}},{{"title":"5","content":"e"}}]}}"#,
            big
        );
        let import_path = dir.path().join("import.json");
        fs::write(&import_path, payload).unwrap();

        let err = store.import_from(&import_path).unwrap_err();
        assert!(matches!(err, StoreError::PromptTooLarge { .. }));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(0).unwrap().title, "existing");
    }

    #[test]
    fn test_import_rejects_oversized_file() {
        let dir = tempdir().unwrap();
        let mut store = test_store(&dir);

        let import_path = dir.path().join("import.json");
        fs::write(&import_path, "x".repeat(301)).unwrap();

        let err = store.import_from(&import_path).unwrap_err();
        assert!(matches!(err, StoreError::FileTooLarge { .. }));
    }

    #[test]
    fn test_import_missing_file_is_load_error() {
        let dir = tempdir().unwrap();
        let mut store = test_store(&dir);

        let err = store
            .import_from(&dir.path().join("nowhere.json"))
            .unwrap_err();
        assert!(matches!(err, StoreError::Load(_)));
    }

    #[test]
    fn test_import_then_export_scenario() {
        let dir = tempdir().unwrap();
        let mut store = test_store(&dir);
        store.load().unwrap();

        let import_path = dir.path().join("import.json");
        fs::write(&import_path, r#"{"prompts":[{"title":"T","content":"C"}]}"#).unwrap();
        store.import_from(&import_path).unwrap();

        assert_eq!(store.len(), 1);
        let prompt = store.get(0).unwrap();
        assert_eq!(prompt.title, "T");
        assert_eq!(prompt.content, "C");
        assert!(!prompt.pinned);

        let export_path = dir.path().join("export.json");
        store.export_to(&export_path).unwrap();

        let exported: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&export_path).unwrap()).unwrap();
        assert_eq!(exported["settings"]["language"], "en");
        assert_eq!(exported["settings"]["theme"], "dark");
        assert_eq!(
            exported["prompts"],
            serde_json::json!([{"title": "T", "content": "C", "pinned": false}])
        );
    }

    #[test]
    fn test_export_failure_is_io_only() {
        let dir = tempdir().unwrap();
        let store = test_store(&dir);

        let err = store
            .export_to(&dir.path().join("missing").join("export.json"))
            .unwrap_err();
        assert!(matches!(err, StoreError::ExportFailed(_)));
    }

    #[test]
    fn test_switch_settings_persist() {
        let dir = tempdir().unwrap();
        let mut store = test_store(&dir);

        assert_eq!(store.switch_language().unwrap(), Language::Zh);
        assert_eq!(store.switch_theme().unwrap(), Theme::Light);
        assert_eq!(store.switch_theme().unwrap(), Theme::Dark);

        let mut reopened = test_store(&dir);
        reopened.load().unwrap();
        assert_eq!(reopened.settings().language, Language::Zh);
        assert_eq!(reopened.settings().theme, Theme::Dark);
    }

    #[test]
    fn test_load_failure_keeps_last_good_state() {
        let dir = tempdir().unwrap();
        let mut store = test_store(&dir);
        store.add("keep", "me").unwrap();

        fs::write(dir.path().join("prompts.json"), "{ broken").unwrap();

        let err = store.load().unwrap_err();
        assert!(matches!(err, StoreError::Load(_)));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(0).unwrap().title, "keep");
    }

    #[test]
    fn test_load_drops_oversized_prompts() {
        let dir = tempdir().unwrap();

        // Write a document with an oversized entry directly, bypassing the
        // store's own ceilings
        let storage = JsonDocumentStorage::new(dir.path().join("prompts.json"));
        let mut document = StoreDocument::default();
        document.prompts.push(Prompt::new("ok", "small"));
        document.prompts.push(Prompt::new("too big", "x".repeat(200)));
        storage.save(&document).unwrap();

        let mut store = test_store(&dir);
        store.load().unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(0).unwrap().title, "ok");
    }

    #[test]
    fn test_error_keys_are_stable() {
        assert_eq!(StoreError::Load("x".into()).key(), "load_error");
        assert_eq!(
            StoreError::FileTooLarge { size: 1, limit: 0 }.key(),
            "file_too_large"
        );
        assert_eq!(StoreError::IndexOutOfRange(3).key(), "index_out_of_range");
    }
}
