//! Stop-word filtering for token streams.
//!
//! Stop words are common words ("the", "is", "at") that carry little signal
//! for classification and inflate the vocabulary. Matching is
//! case-insensitive; lookups use a `HashSet`.

use crate::error::Result;
use std::collections::HashSet;

/// Default English stop words (common words from the NLTK/sklearn lists).
const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "all", "an", "and", "any", "are", "as", "at", "be",
    "because", "been", "before", "being", "below", "between", "both", "but", "by", "can", "did",
    "do", "does", "doing", "down", "during", "each", "few", "for", "from", "further", "had",
    "has", "have", "having", "he", "her", "here", "hers", "him", "his", "how", "i", "if", "in",
    "into", "is", "it", "its", "just", "me", "more", "most", "my", "no", "nor", "not", "now",
    "of", "off", "on", "once", "only", "or", "other", "our", "out", "over", "own", "same", "she",
    "so", "some", "such", "than", "that", "the", "their", "them", "then", "there", "these",
    "they", "this", "those", "through", "to", "too", "under", "until", "up", "very", "was", "we",
    "were", "what", "when", "where", "which", "while", "who", "why", "will", "with", "you",
    "your",
];

/// Stop words filter that removes common words from token lists.
///
/// # Examples
///
/// ```
/// use clasificar::text::stopwords::StopWordsFilter;
///
/// let filter = StopWordsFilter::english();
/// let tokens = vec!["the".to_string(), "cat".to_string(), "is".to_string()];
/// let filtered = filter.filter(&tokens).expect("filter should succeed");
/// assert_eq!(filtered, vec!["cat"]);
/// ```
#[derive(Debug, Clone)]
pub struct StopWordsFilter {
    /// Stored lowercase for case-insensitive matching
    stop_words: HashSet<String>,
}

impl StopWordsFilter {
    /// Create a filter with custom stop words (converted to lowercase).
    #[must_use]
    pub fn new<S: AsRef<str>>(words: &[S]) -> Self {
        Self {
            stop_words: words
                .iter()
                .map(|w| w.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Create a filter with the default English stop words.
    #[must_use]
    pub fn english() -> Self {
        Self::new(ENGLISH_STOP_WORDS)
    }

    /// True if `word` is a stop word (case-insensitive).
    #[must_use]
    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(&word.to_lowercase())
    }

    /// Remove stop words from `tokens`, preserving order.
    ///
    /// # Errors
    ///
    /// Currently infallible; returns `Result` for trait-level uniformity
    /// with the other preprocessing stages.
    pub fn filter<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Vec<String>> {
        Ok(tokens
            .iter()
            .map(|t| t.as_ref().to_string())
            .filter(|t| !self.is_stop_word(t))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_filter_removes_common_words() {
        let filter = StopWordsFilter::english();
        let filtered = filter.filter(&["the", "quick", "brown", "fox"]).unwrap();
        assert_eq!(filtered, vec!["quick", "brown", "fox"]);
    }

    #[test]
    fn test_case_insensitive() {
        let filter = StopWordsFilter::english();
        assert!(filter.is_stop_word("The"));
        assert!(filter.is_stop_word("THE"));
        assert!(!filter.is_stop_word("Fox"));
    }

    #[test]
    fn test_custom_stop_words() {
        let filter = StopWordsFilter::new(&["foo", "bar"]);
        let filtered = filter.filter(&["foo", "test", "bar", "data"]).unwrap();
        assert_eq!(filtered, vec!["test", "data"]);
    }

    #[test]
    fn test_filter_preserves_order() {
        let filter = StopWordsFilter::english();
        let filtered = filter.filter(&["zebra", "the", "apple"]).unwrap();
        assert_eq!(filtered, vec!["zebra", "apple"]);
    }

    #[test]
    fn test_empty_input() {
        let filter = StopWordsFilter::english();
        let filtered = filter.filter::<&str>(&[]).unwrap();
        assert!(filtered.is_empty());
    }
}
