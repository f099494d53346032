use std::path::Path;
use std::sync::mpsc::Sender;
use std::time::Duration;

use crate::clipboard::{ClearTimer, ClipboardBackend};
use crate::models::{Language, SearchIndex, Theme};
use crate::notices::Notice;
use crate::pins::{PinFlow, PinRequest};
use crate::store::{PromptStore, StoreError};

/// Title preview length used for copy notices
pub const TITLE_PREVIEW_CHARS: usize = 40;

/// Coordinator state owned by the GUI-owning context
///
/// One App instance is the sole mutator of the store. Other execution
/// contexts never touch it directly; they enqueue deferred calls on the
/// dispatcher, and the owning loop drains the queue into these methods.
/// The shell renders from accessors and from the notice channel.
pub struct App {
    store: PromptStore,
    pin_flow: PinFlow,
    search_index: SearchIndex,
    backend: Box<dyn ClipboardBackend>,
    timer: ClearTimer,
    clear_delay: Duration,
    notices: Sender<Notice>,
    should_quit: bool,
}

impl App {
    /// Create the coordinator
    ///
    /// `store` is loaded by the caller beforehand; `timer` clears through
    /// its own backend while `backend` serves the copy path. `clear_delay`
    /// is how long a copy stays on the clipboard.
    pub fn new(
        store: PromptStore,
        backend: Box<dyn ClipboardBackend>,
        timer: ClearTimer,
        clear_delay: Duration,
        notices: Sender<Notice>,
    ) -> Self {
        App {
            store,
            pin_flow: PinFlow::new(),
            search_index: SearchIndex::new(),
            backend,
            timer,
            clear_delay,
            notices,
            should_quit: false,
        }
    }

    /// Read access to the store for rendering
    pub fn store(&self) -> &PromptStore {
        &self.store
    }

    /// Mutable store access for shell-driven operations that need no
    /// composite flow (delete and friends)
    pub fn store_mut(&mut self) -> &mut PromptStore {
        &mut self.store
    }

    /// Copy the prompt at `index` to the clipboard and arm the clear
    /// timer, superseding any pending clear
    ///
    /// A stale index is a silent no-op; a clipboard failure is logged and
    /// surfaced as a warning, never a fault.
    pub fn copy(&mut self, index: usize) {
        let (title, content) = match self.store.get(index) {
            Some(prompt) => (prompt.preview(TITLE_PREVIEW_CHARS), prompt.content.clone()),
            None => {
                log::debug!("Copy ignored, no prompt at index {}", index);
                return;
            }
        };

        match self.backend.write_text(&content) {
            Ok(()) => {
                log::info!("Copied prompt {} to clipboard", index);
                let _ = self.notices.send(Notice::Copied { title });
                self.timer.arm(self.clear_delay);
            }
            Err(e) => log::warn!("Copy failed for prompt {}: {:#}", index, e),
        }
    }

    /// Request a pin toggle through the pin policy
    pub fn request_pin(&mut self, index: usize) -> Result<PinRequest, StoreError> {
        self.pin_flow.request_toggle(&mut self.store, index)
    }

    /// Commit a pending replacement choice
    pub fn commit_replacement(&mut self, chosen: usize) -> Result<(), StoreError> {
        self.pin_flow.commit(&mut self.store, chosen)
    }

    /// Cancel a pending replacement choice
    pub fn cancel_replacement(&mut self) {
        self.pin_flow.cancel();
    }

    /// Whether the pin policy is waiting for a replacement choice
    pub fn awaiting_replacement(&self) -> bool {
        self.pin_flow.is_awaiting()
    }

    /// Fuzzy-search prompts; results are (store index, score) pairs
    pub fn search(&mut self, query: &str) -> Vec<(usize, u32)> {
        self.search_index.search(self.store.prompts(), query)
    }

    /// Re-read the document from disk
    ///
    /// Disk is the authority: the watcher enqueues this on external
    /// edits, and the shell calls it before render passes. Failure keeps
    /// the last-good state and is logged, not fatal.
    pub fn reload(&mut self) {
        if let Err(e) = self.store.load() {
            log::warn!("Reload failed, keeping current state: {}", e);
        }
    }

    /// Import prompts from a file and announce the result
    pub fn import_from(&mut self, path: &Path) -> Result<usize, StoreError> {
        let count = self.store.import_from(path)?;
        let _ = self.notices.send(Notice::Imported { count });
        Ok(count)
    }

    /// Export the document to a file and announce the result
    pub fn export_to(&self, path: &Path) -> Result<(), StoreError> {
        self.store.export_to(path)?;
        let _ = self.notices.send(Notice::Exported);
        Ok(())
    }

    /// Toggle the display language
    pub fn switch_language(&mut self) -> Result<Language, StoreError> {
        let language = self.store.switch_language()?;
        let _ = self.notices.send(Notice::LanguageSwitched(language));
        Ok(language)
    }

    /// Toggle the display theme
    pub fn switch_theme(&mut self) -> Result<Theme, StoreError> {
        let theme = self.store.switch_theme()?;
        let _ = self.notices.send(Notice::ThemeSwitched(theme));
        Ok(theme)
    }

    /// Ask the owning loop to exit
    pub fn request_quit(&mut self) {
        self.should_quit = true;
    }

    /// Whether an exit was requested
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Cancel the clear timer unconditionally; never blocks
    /// Called on the way out of the owning loop
    pub fn shutdown(&self) {
        self.timer.cancel();
    }
}
