pub mod prompt;
pub mod search_index;

pub use prompt::{Language, Prompt, Settings, StoreDocument, Theme};
pub use search_index::SearchIndex;
