use serde::{Deserialize, Serialize};

/// A single stored prompt
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Prompt {
    /// Human-readable title shown in lists
    #[serde(default)]
    pub title: String,
    /// The reusable text content
    #[serde(default)]
    pub content: String,
    /// Whether this prompt is pinned
    #[serde(default)]
    pub pinned: bool,
}

impl Prompt {
    /// Create a new unpinned prompt
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Prompt {
            title: title.into(),
            content: content.into(),
            pinned: false,
        }
    }

    /// Content size in bytes (the unit all store limits are measured in)
    pub fn content_len(&self) -> usize {
        self.content.len()
    }

    /// Toggle pinned status
    pub fn toggle_pin(&mut self) {
        self.pinned = !self.pinned;
    }

    /// Get a preview of the title (first line, truncated for display)
    pub fn preview(&self, max_chars: usize) -> String {
        let line = self.title.lines().next().unwrap_or("");
        if line.chars().count() > max_chars {
            let truncated: String = line.chars().take(max_chars).collect();
            format!("{}...", truncated)
        } else {
            line.to_string()
        }
    }
}

/// Display language
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Zh,
}

impl Language {
    /// The other supported language (used by the language toggle)
    pub fn toggled(self) -> Self {
        match self {
            Language::En => Language::Zh,
            Language::Zh => Language::En,
        }
    }

    /// Serialized form, also used for display
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Zh => "zh",
        }
    }
}

/// Display theme
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// The other supported theme (used by the theme toggle)
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    /// Serialized form, also used for display
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }
}

/// User settings, persisted alongside the prompts
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Settings {
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub theme: Theme,
}

/// The persisted unit: settings plus the ordered prompt list
///
/// Prompt identity is positional. Deleting an entry shifts every later
/// index, so indices held across mutations must be re-resolved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct StoreDocument {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub prompts: Vec<Prompt>,
}

impl StoreDocument {
    /// Sum of all prompt content lengths in bytes
    pub fn content_bytes(&self) -> usize {
        self.prompts.iter().map(|p| p.content_len()).sum()
    }

    /// Number of currently pinned prompts
    pub fn pinned_count(&self) -> usize {
        self.prompts.iter().filter(|p| p.pinned).count()
    }

    /// Indices of currently pinned prompts, in store order
    pub fn pinned_indices(&self) -> Vec<usize> {
        self.prompts
            .iter()
            .enumerate()
            .filter(|(_, p)| p.pinned)
            .map(|(i, _)| i)
            .collect()
    }
}
