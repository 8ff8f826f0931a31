//! Sparse feature vectors and document encoding.
//!
//! [`encode`] turns one per-document [`WordCounter`] plus the finalized
//! [`Vocabulary`] into a [`SparseVector`]: for each counted word that is
//! also in the vocabulary, `value = term_frequency × weight`. Words the
//! vocabulary has never seen are silently dropped — no error, no "unknown"
//! bucket.
//!
//! The output invariants are hard requirements of the downstream feature
//! file format: ids strictly ascending, at most one entry per id, no
//! zero-valued entries.
//!
//! # Examples
//!
//! ```
//! use clasificar::features::{encode, WeightMode};
//! use clasificar::vocabulary::{Vocabulary, WordCounter};
//!
//! let mut vocab = Vocabulary::new();
//! for word in ["x", "y", "z"] {
//!     vocab.update_counts(word).unwrap();
//! }
//! vocab.finalize_weights().unwrap();
//!
//! let mut counter = WordCounter::new();
//! counter.update_counts("z");
//! counter.update_counts("x");
//! counter.update_counts("unknown");
//!
//! let vector = encode(&counter, &vocab, WeightMode::Flat(0.5)).unwrap();
//! let entries: Vec<(u32, f64)> = vector.iter().collect();
//! assert_eq!(entries, vec![(0, 0.5), (2, 0.5)]);
//! ```

use crate::error::{ClasificarError, Result};
use crate::vocabulary::{Vocabulary, WordCounter};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Feature weighting mode.
///
/// The two supported modes, per the historical variants of this pipeline:
/// a corpus-derived per-word weight, or a single flat scalar (typically
/// `1 / num_features`) applied uniformly to every raw count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WeightMode {
    /// Each word carries its own finalized vocabulary weight.
    CorpusDerived,
    /// One externally supplied scalar multiplies every raw count.
    Flat(f64),
}

/// Sparse attribute vector: feature id → weight, ids strictly ascending.
///
/// At most one entry per id; never contains zero-valued entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    entries: Vec<(u32, f64)>,
}

impl SparseVector {
    /// Create an empty vector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from entries, enforcing the ordering and non-zero invariants.
    ///
    /// # Errors
    ///
    /// Returns an error if ids are not strictly ascending or any value is
    /// zero or non-finite.
    pub fn from_entries(entries: Vec<(u32, f64)>) -> Result<Self> {
        for window in entries.windows(2) {
            if window[1].0 <= window[0].0 {
                return Err(ClasificarError::Other(format!(
                    "sparse vector ids not strictly ascending: {} then {}",
                    window[0].0, window[1].0
                )));
            }
        }
        if let Some(&(id, value)) = entries.iter().find(|(_, v)| *v == 0.0 || !v.is_finite()) {
            return Err(ClasificarError::Other(format!(
                "sparse vector entry {id} has invalid value {value}"
            )));
        }
        Ok(Self { entries })
    }

    /// Iterate over `(id, value)` entries in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.entries.iter().copied()
    }

    /// Number of non-zero entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the vector has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Largest feature id present, if any.
    #[must_use]
    pub fn max_id(&self) -> Option<u32> {
        self.entries.last().map(|&(id, _)| id)
    }
}

/// Encode one document's counter against the vocabulary.
///
/// Words absent from the vocabulary are dropped; zero-valued products are
/// omitted so the no-zero-entries invariant holds even when a word's
/// corpus-derived weight is exactly zero.
///
/// # Errors
///
/// Returns [`ClasificarError::WeightsNotComputed`] if `mode` is
/// [`WeightMode::CorpusDerived`] and the vocabulary is not finalized.
pub fn encode(counter: &WordCounter, vocab: &Vocabulary, mode: WeightMode) -> Result<SparseVector> {
    if matches!(mode, WeightMode::CorpusDerived) && !vocab.is_finalized() {
        return Err(ClasificarError::WeightsNotComputed);
    }

    // BTreeMap gives ascending id order; duplicate ids cannot arise because
    // counter keys are unique.
    let mut values: BTreeMap<u32, f64> = BTreeMap::new();
    for (word, tf) in counter.iter() {
        let Some(id) = vocab.id_of(word) else {
            continue;
        };
        let weight = match mode {
            WeightMode::CorpusDerived => match vocab.weight_of(id) {
                Some(w) => w,
                None => return Err(ClasificarError::WeightsNotComputed),
            },
            WeightMode::Flat(scalar) => scalar,
        };
        let value = f64::from(tf) * weight;
        if value != 0.0 {
            values.insert(id, value);
        }
    }

    Ok(SparseVector {
        entries: values.into_iter().collect(),
    })
}
