use nucleo_matcher::pattern::{CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config, Matcher, Utf32String};

use super::prompt::Prompt;

/// Wrapper around nucleo for fuzzy searching prompts
pub struct SearchIndex {
    matcher: Matcher,
}

impl SearchIndex {
    pub fn new() -> Self {
        SearchIndex {
            matcher: Matcher::new(Config::DEFAULT),
        }
    }

    /// Search prompts by query string
    /// Returns (store index, score) tuples sorted by score descending;
    /// an empty query returns every prompt in store order
    pub fn search(&mut self, prompts: &[Prompt], query: &str) -> Vec<(usize, u32)> {
        if query.is_empty() {
            return prompts.iter().enumerate().map(|(i, _)| (i, u32::MAX)).collect();
        }

        let pattern = Pattern::parse(query, CaseMatching::Smart, Normalization::Smart);

        let mut results: Vec<(usize, u32)> = prompts
            .iter()
            .enumerate()
            .filter_map(|(index, prompt)| {
                // Title first so title hits outscore content hits
                let haystack = searchable_text(prompt);
                let utf32_text = Utf32String::from(haystack.as_str());

                pattern
                    .score(utf32_text.slice(..), &mut self.matcher)
                    .map(|score| (index, score))
            })
            .collect();

        results.sort_by(|a, b| b.1.cmp(&a.1));

        results
    }
}

impl Default for SearchIndex {
    fn default() -> Self {
        Self::new()
    }
}

/// Text representation a prompt is matched against
fn searchable_text(prompt: &Prompt) -> String {
    let mut text = String::with_capacity(prompt.title.len() + prompt.content.len() + 1);
    text.push_str(&prompt.title);
    text.push(' ');
    text.push_str(&prompt.content);
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_prompts() -> Vec<Prompt> {
        vec![
            Prompt::new("greeting", "hello world"),
            Prompt::new("farewell", "goodbye world"),
            Prompt::new("unrelated", "lorem ipsum"),
        ]
    }

    #[test]
    fn test_search_empty_query() {
        let mut index = SearchIndex::new();
        let prompts = sample_prompts();

        let results = index.search(&prompts, "");
        assert_eq!(results.len(), 3);
        // Store order is preserved for the empty query
        assert_eq!(results[0].0, 0);
        assert_eq!(results[2].0, 2);
    }

    #[test]
    fn test_search_matches_title_and_content() {
        let mut index = SearchIndex::new();
        let prompts = sample_prompts();

        let results = index.search(&prompts, "hello");
        assert!(!results.is_empty());
        assert_eq!(results[0].0, 0);

        let results = index.search(&prompts, "farewell");
        assert!(!results.is_empty());
        assert_eq!(results[0].0, 1);
    }

    #[test]
    fn test_search_smart_case() {
        let mut index = SearchIndex::new();
        let prompts = vec![Prompt::new("Hello World", "")];

        // Lowercase query matches case-insensitively
        let results = index.search(&prompts, "hello");
        assert_eq!(results.len(), 1);

        // An uppercase letter in the query makes the match case-sensitive
        let results = index.search(&prompts, "HELLO");
        assert!(results.is_empty());
        let results = index.search(&prompts, "Hello");
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_search_no_match() {
        let mut index = SearchIndex::new();
        let prompts = sample_prompts();

        let results = index.search(&prompts, "zzzzqqqq");
        assert!(results.is_empty());
    }
}
