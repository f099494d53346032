use crate::models::{Language, Theme};

/// Symbolic notification events emitted by the coordinator
///
/// The core never formats user-facing text. Notices travel over an mpsc
/// channel to the shell, which maps them (and error keys) to its own
/// strings; localization lives entirely on that side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A prompt's content was copied to the clipboard
    Copied { title: String },
    /// The clear timer fired and emptied the clipboard
    ClipboardCleared,
    /// An import appended `count` prompts
    Imported { count: usize },
    /// The document was exported
    Exported,
    /// The display language changed
    LanguageSwitched(Language),
    /// The display theme changed
    ThemeSwitched(Theme),
}
