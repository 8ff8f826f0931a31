//! Text preprocessing for the training pipeline.
//!
//! This module is the preprocessor collaborator: given raw document text it
//! produces the ordered token sequence the vocabulary and encoder consume.
//!
//! - [`Tokenizer`] trait with a word tokenizer that lowercases and strips
//!   non-alphanumeric characters
//! - [`StopWordsFilter`] for removing common words
//! - [`PorterStemmer`] simplified suffix stripping
//! - [`Preprocessor`] composing the three behind toggles
//!
//! # Examples
//!
//! ```
//! use clasificar::text::Preprocessor;
//!
//! let pre = Preprocessor::new();
//! let tokens = pre.process("The Quick, Brown Fox!").expect("process should succeed");
//! assert_eq!(tokens, vec!["the", "quick", "brown", "fox"]);
//! ```

pub mod stem;
pub mod stopwords;

use crate::error::Result;
use stem::{PorterStemmer, Stemmer};
use stopwords::StopWordsFilter;

/// Trait for tokenization strategies.
pub trait Tokenizer {
    /// Split raw text into an ordered token sequence.
    ///
    /// # Errors
    ///
    /// Returns an error if tokenization fails.
    fn tokenize(&self, text: &str) -> Result<Vec<String>>;
}

/// Word tokenizer that lowercases and keeps only alphanumeric runs.
///
/// Punctuation and other symbols act as separators, so `"Hello, world!"`
/// tokenizes to `["hello", "world"]`.
///
/// # Examples
///
/// ```
/// use clasificar::text::{Tokenizer, WordTokenizer};
///
/// let tokenizer = WordTokenizer::new();
/// let tokens = tokenizer.tokenize("Hello, world!").expect("tokenize should succeed");
/// assert_eq!(tokens, vec!["hello", "world"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct WordTokenizer;

impl WordTokenizer {
    /// Create a new word tokenizer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Tokenizer for WordTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        let tokens: Vec<String> = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
            .collect();
        Ok(tokens)
    }
}

/// Preprocessor composing tokenization, stop-word removal, and stemming.
///
/// Both filters are off by default; enable them with the builder methods.
///
/// # Examples
///
/// ```
/// use clasificar::text::Preprocessor;
///
/// let pre = Preprocessor::new()
///     .with_stopwords(true)
///     .with_stemming(true);
///
/// let tokens = pre.process("the running dogs").expect("process should succeed");
/// assert_eq!(tokens, vec!["run", "dog"]);
/// ```
pub struct Preprocessor {
    tokenizer: Box<dyn Tokenizer + Send + Sync>,
    stop_words: Option<StopWordsFilter>,
    stemmer: Option<PorterStemmer>,
}

impl Preprocessor {
    /// Create a preprocessor with the default word tokenizer and no filters.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tokenizer: Box::new(WordTokenizer::new()),
            stop_words: None,
            stemmer: None,
        }
    }

    /// Replace the tokenizer.
    #[must_use]
    pub fn with_tokenizer(mut self, tokenizer: Box<dyn Tokenizer + Send + Sync>) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    /// Enable or disable English stop-word removal.
    #[must_use]
    pub fn with_stopwords(mut self, enable: bool) -> Self {
        self.stop_words = enable.then(StopWordsFilter::english);
        self
    }

    /// Enable or disable Porter stemming.
    #[must_use]
    pub fn with_stemming(mut self, enable: bool) -> Self {
        self.stemmer = enable.then(PorterStemmer::new);
        self
    }

    /// Produce the ordered token sequence for one document.
    ///
    /// # Errors
    ///
    /// Returns an error if tokenization or stemming fails.
    pub fn process(&self, text: &str) -> Result<Vec<String>> {
        let mut tokens = self.tokenizer.tokenize(text)?;
        if let Some(filter) = &self.stop_words {
            tokens = filter.filter(&tokens)?;
        }
        if let Some(stemmer) = &self.stemmer {
            tokens = stemmer.stem_tokens(&tokens)?;
        }
        Ok(tokens)
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}
