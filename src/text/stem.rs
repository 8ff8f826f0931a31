//! Stemming for token normalization.
//!
//! Stemming reduces words to their root form by removing suffixes, so that
//! "running" and "runs" land on the same vocabulary entry.
//!
//! # Examples
//!
//! ```
//! use clasificar::text::stem::{Stemmer, PorterStemmer};
//!
//! let stemmer = PorterStemmer::new();
//! assert_eq!(stemmer.stem("running").expect("stem should succeed"), "run");
//! assert_eq!(stemmer.stem("studies").expect("stem should succeed"), "studi");
//! ```
//!
//! # References
//!
//! Porter, M.F. (1980). "An algorithm for suffix stripping."
//! Program, 14(3), 130-137.

use crate::error::Result;

/// Trait for stemming algorithms.
pub trait Stemmer {
    /// Stem a single word to its root form.
    ///
    /// # Errors
    ///
    /// Returns an error if stemming fails.
    fn stem(&self, word: &str) -> Result<String>;

    /// Stem multiple tokens, preserving order.
    ///
    /// # Errors
    ///
    /// Returns an error if stemming any token fails.
    fn stem_tokens<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Vec<String>> {
        tokens
            .iter()
            .map(|token| self.stem(token.as_ref()))
            .collect()
    }
}

/// Simplified Porter Stemmer.
///
/// Implements the most common suffix removal rules of the classic algorithm:
/// plurals, -ed/-ing, -y, and a handful of longer suffixes. Words of two
/// characters or fewer pass through unchanged.
///
/// # Examples
///
/// ```
/// use clasificar::text::stem::{Stemmer, PorterStemmer};
///
/// let stemmer = PorterStemmer::new();
/// assert_eq!(stemmer.stem("flies").expect("stem should succeed"), "fli");
/// assert_eq!(stemmer.stem("is").expect("stem should succeed"), "is");
/// ```
#[derive(Debug, Clone, Default)]
pub struct PorterStemmer;

impl PorterStemmer {
    /// Create a new Porter Stemmer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn is_vowel(c: char) -> bool {
        matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
    }

    /// Number of VC sequences, roughly the syllable count.
    fn measure(word: &str) -> usize {
        let mut count = 0;
        let mut prev_is_vowel = false;
        for c in word.chars() {
            let is_vowel = Self::is_vowel(c);
            if !is_vowel && prev_is_vowel {
                count += 1;
            }
            prev_is_vowel = is_vowel;
        }
        count
    }

    fn ends_with_double_consonant(word: &str) -> bool {
        let chars: Vec<char> = word.chars().collect();
        if chars.len() < 2 {
            return false;
        }
        let last = chars[chars.len() - 1];
        let second_last = chars[chars.len() - 2];
        !Self::is_vowel(last) && last == second_last
    }

    /// CVC ending where the final consonant is not w, x, or y.
    fn ends_with_cvc(word: &str) -> bool {
        let chars: Vec<char> = word.chars().collect();
        if chars.len() < 3 {
            return false;
        }
        let len = chars.len();
        !Self::is_vowel(chars[len - 1])
            && Self::is_vowel(chars[len - 2])
            && !Self::is_vowel(chars[len - 3])
            && !matches!(chars[len - 1], 'w' | 'x' | 'y')
    }
}

impl Stemmer for PorterStemmer {
    fn stem(&self, word: &str) -> Result<String> {
        let mut word = word.to_lowercase();

        if word.len() <= 2 {
            return Ok(word);
        }

        // Step 1a: plurals
        if word.ends_with("sses") || word.ends_with("ies") {
            word.truncate(word.len() - 2);
        } else if word.ends_with("ss") {
            // keep ss
        } else if word.ends_with('s') {
            word.pop();
        }

        // Step 1b: -eed, -ed, -ing
        let mut step1b_flag = false;
        if word.ends_with("eed") {
            let stem = &word[..word.len() - 3];
            if Self::measure(stem) > 0 {
                word.truncate(word.len() - 1);
            }
        } else if word.ends_with("ed") {
            let stem = &word[..word.len() - 2];
            if stem.chars().any(Self::is_vowel) {
                word.truncate(word.len() - 2);
                step1b_flag = true;
            }
        } else if word.ends_with("ing") {
            let stem = &word[..word.len() - 3];
            if stem.chars().any(Self::is_vowel) {
                word.truncate(word.len() - 3);
                step1b_flag = true;
            }
        }

        if step1b_flag {
            if word.ends_with("at") || word.ends_with("bl") || word.ends_with("iz") {
                word.push('e');
            } else if Self::ends_with_double_consonant(&word)
                && !word.ends_with('l')
                && !word.ends_with('s')
                && !word.ends_with('z')
            {
                word.pop();
            } else if Self::measure(&word) == 1 && Self::ends_with_cvc(&word) {
                word.push('e');
            }
        }

        // Step 1c: terminal y with a vowel in the stem
        if word.ends_with('y') && word.len() > 1 {
            let stem = &word[..word.len() - 1];
            if stem.chars().any(Self::is_vowel) {
                word.truncate(word.len() - 1);
                word.push('i');
            }
        }

        // A few common longer suffixes (steps 2-4, abbreviated)
        for (suffix, replacement) in [
            ("ational", "ate"),
            ("ization", "ize"),
            ("fulness", "ful"),
            ("ousness", "ous"),
            ("iveness", "ive"),
            ("tional", "tion"),
            ("biliti", "ble"),
            ("entli", "ent"),
            ("ousli", "ous"),
            ("alli", "al"),
            ("ment", ""),
            ("ness", ""),
        ] {
            if let Some(stem) = word.strip_suffix(suffix) {
                if Self::measure(stem) > 0 {
                    word = format!("{stem}{replacement}");
                    break;
                }
            }
        }

        Ok(word)
    }
}
