//! Global word registry and per-document term counting.
//!
//! [`Vocabulary`] maps each distinct word to a stable integer feature id,
//! assigned sequentially on first sighting. It is built in two passes:
//! accumulate counts over the whole corpus, then finalize per-word weights
//! exactly once. After finalization it is immutable and can be persisted to
//! a `vocab.bin` artifact for reuse by a classification-time consumer.
//!
//! [`WordCounter`] is the per-document term-frequency table, created per
//! document and discarded after encoding.
//!
//! # Examples
//!
//! ```
//! use clasificar::vocabulary::Vocabulary;
//!
//! let mut vocab = Vocabulary::new();
//! vocab.update_counts("hello").unwrap();
//! vocab.update_counts("world").unwrap();
//! vocab.update_counts("hello").unwrap();
//!
//! assert_eq!(vocab.num_features(), 2);
//! assert_eq!(vocab.id_of("hello"), Some(0));
//! assert_eq!(vocab.id_of("world"), Some(1));
//!
//! vocab.finalize_weights().unwrap();
//! assert!(vocab.is_finalized());
//! ```

use crate::error::{ClasificarError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{hash_map, HashMap};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Global word→id registry with per-word weights.
///
/// Ids are assigned monotonically on first sighting and never reused or
/// reassigned, so repeated runs over identical input reproduce identical
/// id assignments.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Vocabulary {
    /// word → feature id, assigned sequentially on first sighting
    ids: HashMap<String, u32>,
    /// occurrence count per id
    counts: Vec<u64>,
    /// per-word weight per id; empty until finalized
    weights: Vec<f64>,
    /// total occurrences across the corpus
    total: u64,
    finalized: bool,
}

impl Vocabulary {
    /// Create an empty vocabulary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence of `word`, assigning the next sequential id on
    /// first sighting.
    ///
    /// # Errors
    ///
    /// Returns [`ClasificarError::VocabularyFrozen`] if called after
    /// [`finalize_weights`](Self::finalize_weights).
    pub fn update_counts(&mut self, word: &str) -> Result<()> {
        if self.finalized {
            return Err(ClasificarError::VocabularyFrozen);
        }
        match self.ids.entry(word.to_string()) {
            hash_map::Entry::Occupied(entry) => {
                self.counts[*entry.get() as usize] += 1;
            }
            hash_map::Entry::Vacant(entry) => {
                entry.insert(self.counts.len() as u32);
                self.counts.push(1);
            }
        }
        self.total += 1;
        Ok(())
    }

    /// Finalize per-word weights from the accumulated counts.
    ///
    /// The weight of a word seen `c` times out of `t` total occurrences is
    /// `ln(t / c)`, an IDF-like quantity: rare words weigh more, and a word
    /// present at every position weighs zero.
    ///
    /// Must be called exactly once, after the full corpus scan and before
    /// any corpus-derived-mode encoding.
    ///
    /// # Errors
    ///
    /// Returns [`ClasificarError::VocabularyFrozen`] if already finalized.
    pub fn finalize_weights(&mut self) -> Result<()> {
        if self.finalized {
            return Err(ClasificarError::VocabularyFrozen);
        }
        let total = self.total as f64;
        self.weights = self
            .counts
            .iter()
            .map(|&c| (total / c as f64).ln())
            .collect();
        self.finalized = true;
        Ok(())
    }

    /// Number of distinct words observed.
    #[must_use]
    pub fn num_features(&self) -> usize {
        self.counts.len()
    }

    /// Feature id of `word`, if it has been observed.
    #[must_use]
    pub fn id_of(&self, word: &str) -> Option<u32> {
        self.ids.get(word).copied()
    }

    /// Occurrence count for the given feature id.
    #[must_use]
    pub fn count_of(&self, id: u32) -> Option<u64> {
        self.counts.get(id as usize).copied()
    }

    /// Finalized weight for the given feature id.
    ///
    /// Returns `None` before finalization or for an unknown id.
    #[must_use]
    pub fn weight_of(&self, id: u32) -> Option<f64> {
        self.weights.get(id as usize).copied()
    }

    /// True once [`finalize_weights`](Self::finalize_weights) has run.
    #[must_use]
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Serialize the id table and weight table to `path` as a bincode blob.
    ///
    /// The write is atomic: the blob lands in a temp file in the target
    /// directory and is persisted into place.
    ///
    /// # Errors
    ///
    /// Returns an error on I/O or serialization failure.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent)?;

        let mut temp_file = NamedTempFile::new_in(parent)?;
        let mut writer = BufWriter::new(temp_file.as_file_mut());
        bincode::serialize_into(&mut writer, self)
            .map_err(|e| ClasificarError::Serialization(e.to_string()))?;
        writer.flush()?;
        drop(writer);
        temp_file
            .persist(path)
            .map_err(|e| ClasificarError::Io(e.error))?;
        Ok(())
    }

    /// Load a vocabulary previously written with [`write`](Self::write).
    ///
    /// # Errors
    ///
    /// Returns an error on I/O or deserialization failure.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        bincode::deserialize_from(reader)
            .map_err(|e| ClasificarError::Serialization(e.to_string()))
    }
}

/// Per-document word→term-frequency table.
///
/// # Examples
///
/// ```
/// use clasificar::vocabulary::WordCounter;
///
/// let mut counter = WordCounter::new();
/// counter.update_counts("spam");
/// counter.update_counts("spam");
/// counter.update_counts("ham");
///
/// assert_eq!(counter.count_of("spam"), 2);
/// assert_eq!(counter.count_of("ham"), 1);
/// assert_eq!(counter.count_of("eggs"), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct WordCounter {
    counts: HashMap<String, u32>,
}

impl WordCounter {
    /// Create an empty counter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment the frequency for `word`, creating the entry if absent.
    pub fn update_counts(&mut self, word: &str) {
        *self.counts.entry(word.to_string()).or_insert(0) += 1;
    }

    /// Term frequency of `word` in this document (0 if absent).
    #[must_use]
    pub fn count_of(&self, word: &str) -> u32 {
        self.counts.get(word).copied().unwrap_or(0)
    }

    /// Read-only iteration over word→frequency entries (order unspecified).
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.counts.iter().map(|(w, &c)| (w.as_str(), c))
    }

    /// Number of distinct words in this document.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// True if no words have been counted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_sequential_on_first_sighting() {
        let mut vocab = Vocabulary::new();
        for word in ["x", "y", "x", "z", "y", "x"] {
            vocab.update_counts(word).unwrap();
        }
        assert_eq!(vocab.id_of("x"), Some(0));
        assert_eq!(vocab.id_of("y"), Some(1));
        assert_eq!(vocab.id_of("z"), Some(2));
        assert_eq!(vocab.id_of("w"), None);
    }

    #[test]
    fn test_num_features_counts_distinct_words() {
        let mut vocab = Vocabulary::new();
        for word in ["a", "b", "a", "a", "c"] {
            vocab.update_counts(word).unwrap();
        }
        assert_eq!(vocab.num_features(), 3);
    }

    #[test]
    fn test_counts_accumulate() {
        let mut vocab = Vocabulary::new();
        for word in ["a", "b", "a"] {
            vocab.update_counts(word).unwrap();
        }
        assert_eq!(vocab.count_of(0), Some(2));
        assert_eq!(vocab.count_of(1), Some(1));
    }

    #[test]
    fn test_ids_stable_across_identical_runs() {
        let corpus = ["red", "green", "blue", "green", "red"];
        let build = || {
            let mut vocab = Vocabulary::new();
            for word in corpus {
                vocab.update_counts(word).unwrap();
            }
            vocab
        };
        let first = build();
        let second = build();
        for word in corpus {
            assert_eq!(first.id_of(word), second.id_of(word));
        }
    }

    #[test]
    fn test_finalize_computes_idf_like_weights() {
        let mut vocab = Vocabulary::new();
        // "a" twice, "b" once, "c" once: total 4
        for word in ["a", "b", "a", "c"] {
            vocab.update_counts(word).unwrap();
        }
        vocab.finalize_weights().unwrap();

        let w_a = vocab.weight_of(0).unwrap();
        let w_b = vocab.weight_of(1).unwrap();
        assert!((w_a - (4.0f64 / 2.0).ln()).abs() < 1e-12);
        assert!((w_b - (4.0f64).ln()).abs() < 1e-12);
        // rarer word weighs more
        assert!(w_b > w_a);
    }

    #[test]
    fn test_update_after_finalize_is_error() {
        let mut vocab = Vocabulary::new();
        vocab.update_counts("a").unwrap();
        vocab.finalize_weights().unwrap();
        assert!(matches!(
            vocab.update_counts("b"),
            Err(ClasificarError::VocabularyFrozen)
        ));
    }

    #[test]
    fn test_double_finalize_is_error() {
        let mut vocab = Vocabulary::new();
        vocab.update_counts("a").unwrap();
        vocab.finalize_weights().unwrap();
        assert!(matches!(
            vocab.finalize_weights(),
            Err(ClasificarError::VocabularyFrozen)
        ));
    }

    #[test]
    fn test_weight_unavailable_before_finalize() {
        let mut vocab = Vocabulary::new();
        vocab.update_counts("a").unwrap();
        assert_eq!(vocab.weight_of(0), None);
    }

    #[test]
    fn test_write_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vocab.bin");

        let mut vocab = Vocabulary::new();
        for word in ["x", "y", "x", "z"] {
            vocab.update_counts(word).unwrap();
        }
        vocab.finalize_weights().unwrap();
        vocab.write(&path).unwrap();

        let loaded = Vocabulary::load(&path).unwrap();
        assert_eq!(loaded.num_features(), 3);
        assert_eq!(loaded.id_of("x"), Some(0));
        assert_eq!(loaded.id_of("z"), Some(2));
        assert!(loaded.is_finalized());
        assert_eq!(loaded.weight_of(0), vocab.weight_of(0));
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Vocabulary::load(dir.path().join("absent.bin"));
        assert!(result.is_err());
    }

    #[test]
    fn test_word_counter_iteration() {
        let mut counter = WordCounter::new();
        counter.update_counts("a");
        counter.update_counts("b");
        counter.update_counts("a");

        let mut entries: Vec<(&str, u32)> = counter.iter().collect();
        entries.sort();
        assert_eq!(entries, vec![("a", 2), ("b", 1)]);
        assert_eq!(counter.len(), 2);
        assert!(!counter.is_empty());
    }
}
