//! Label grouping and balanced pairwise problem assembly.
//!
//! [`TrainingSet`] groups encoded documents by category label, preserving
//! original document order within each group. [`TrainingSet::pairs`]
//! enumerates every unordered pair of distinct labels exactly once, in
//! sorted order, and [`TrainingSet::build_problem`] assembles the balanced
//! binary problem for one pair: the lexicographically smaller category's
//! examples labeled `+1`, the other's `-1`, with the minority side
//! cyclically replicated to match the majority size.
//!
//! # Examples
//!
//! ```
//! use clasificar::features::SparseVector;
//! use clasificar::pairwise::TrainingSet;
//!
//! let mut set = TrainingSet::new();
//! set.add("B", SparseVector::new());
//! set.add("A", SparseVector::new());
//! set.add("C", SparseVector::new());
//!
//! let names: Vec<String> = set
//!     .pairs()
//!     .iter()
//!     .map(|p| p.artifact_name())
//!     .collect();
//! assert_eq!(names, vec!["A.B", "A.C", "B.C"]);
//! ```

use crate::error::{ClasificarError, Result};
use crate::features::SparseVector;
use std::collections::BTreeMap;

/// Canonicalized unordered pair of distinct category labels.
///
/// `cat1` is always the lexicographically smaller label, regardless of the
/// order the categories were discovered in the corpus.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairKey {
    cat1: String,
    cat2: String,
}

impl PairKey {
    /// Create a canonical pair key from two distinct labels.
    ///
    /// # Errors
    ///
    /// Returns an error if the labels are equal; a category is never paired
    /// with itself.
    pub fn new(a: &str, b: &str) -> Result<Self> {
        if a == b {
            return Err(ClasificarError::Other(format!(
                "cannot pair category {a} with itself"
            )));
        }
        let (cat1, cat2) = if a < b { (a, b) } else { (b, a) };
        Ok(Self {
            cat1: cat1.to_string(),
            cat2: cat2.to_string(),
        })
    }

    /// The lexicographically smaller label (the `+1` class).
    #[must_use]
    pub fn cat1(&self) -> &str {
        &self.cat1
    }

    /// The lexicographically larger label (the `-1` class).
    #[must_use]
    pub fn cat2(&self) -> &str {
        &self.cat2
    }

    /// Artifact name `<cat1>.<cat2>` used for every per-pair file.
    #[must_use]
    pub fn artifact_name(&self) -> String {
        format!("{}.{}", self.cat1, self.cat2)
    }
}

/// One balanced binary training problem for a category pair.
///
/// Contains `2 × max(n1, n2)` examples: first the `+1` block (`cat1`),
/// then the `-1` block (`cat2`).
#[derive(Debug, Clone)]
pub struct PairProblem {
    /// The canonical pair this problem trains.
    pub key: PairKey,
    /// `(±1, vector)` rows; `+1` block first, `-1` block second.
    pub examples: Vec<(f64, SparseVector)>,
}

impl PairProblem {
    /// Number of examples (both blocks together).
    #[must_use]
    pub fn len(&self) -> usize {
        self.examples.len()
    }

    /// True if the problem holds no examples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }
}

/// Category label → ordered list of encoded documents.
///
/// Insertion order within a label is the original document order; it is
/// semantically significant, since balancing replicates by document index.
#[derive(Debug, Clone, Default)]
pub struct TrainingSet {
    groups: BTreeMap<String, Vec<SparseVector>>,
}

impl TrainingSet {
    /// Create an empty training set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one encoded document under `label`.
    pub fn add(&mut self, label: &str, vector: SparseVector) {
        self.groups.entry(label.to_string()).or_default().push(vector);
    }

    /// Category labels in sorted order.
    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.groups.keys().map(String::as_str)
    }

    /// Documents for `label`, in original order.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&[SparseVector]> {
        self.groups.get(label).map(Vec::as_slice)
    }

    /// Number of distinct labels.
    #[must_use]
    pub fn num_labels(&self) -> usize {
        self.groups.len()
    }

    /// Total documents across all labels.
    #[must_use]
    pub fn num_documents(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Enumerate every unordered pair of distinct labels exactly once.
    ///
    /// Labels are visited in sorted order and pairs in increasing index
    /// order, so identical input always yields the identical pair sequence.
    /// A label observed only once in the corpus still pairs with every
    /// other label; a training set with fewer than two labels yields no
    /// pairs by construction.
    #[must_use]
    pub fn pairs(&self) -> Vec<PairKey> {
        let labels: Vec<&String> = self.groups.keys().collect();
        let mut pairs = Vec::new();
        for i in 0..labels.len() {
            for j in (i + 1)..labels.len() {
                pairs.push(PairKey {
                    cat1: labels[i].clone(),
                    cat2: labels[j].clone(),
                });
            }
        }
        pairs
    }

    /// Assemble the balanced binary problem for `key`.
    ///
    /// With `m = max(n1, n2)`, emits `m` examples from each class by
    /// indexing `i mod n` for `i` in `0..m`: deterministic cyclic
    /// replication of the minority class, preserving original document
    /// order. Never random resampling.
    ///
    /// # Errors
    ///
    /// Returns an error if either label of `key` has no examples.
    pub fn build_problem(&self, key: &PairKey) -> Result<PairProblem> {
        let set1 = self
            .get(key.cat1())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                ClasificarError::Other(format!("no examples for category {}", key.cat1()))
            })?;
        let set2 = self
            .get(key.cat2())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                ClasificarError::Other(format!("no examples for category {}", key.cat2()))
            })?;

        let max_size = set1.len().max(set2.len());
        let mut examples = Vec::with_capacity(2 * max_size);
        for i in 0..max_size {
            examples.push((1.0, set1[i % set1.len()].clone()));
        }
        for i in 0..max_size {
            examples.push((-1.0, set2[i % set2.len()].clone()));
        }

        Ok(PairProblem {
            key: key.clone(),
            examples,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Distinguishable single-entry vector for index tracking in tests.
    fn marker(id: u32) -> SparseVector {
        SparseVector::from_entries(vec![(id, 1.0)]).unwrap()
    }

    #[test]
    fn test_pair_key_canonical_order() {
        let forward = PairKey::new("A", "B").unwrap();
        let reversed = PairKey::new("B", "A").unwrap();
        assert_eq!(forward, reversed);
        assert_eq!(forward.cat1(), "A");
        assert_eq!(forward.cat2(), "B");
        assert_eq!(forward.artifact_name(), "A.B");
    }

    #[test]
    fn test_pair_key_rejects_self_pair() {
        assert!(PairKey::new("A", "A").is_err());
    }

    #[test]
    fn test_pairs_for_three_labels() {
        let mut set = TrainingSet::new();
        // discovery order deliberately scrambled
        set.add("C", marker(0));
        set.add("A", marker(1));
        set.add("B", marker(2));

        let names: Vec<String> = set.pairs().iter().map(PairKey::artifact_name).collect();
        assert_eq!(names, vec!["A.B", "A.C", "B.C"]);
    }

    #[test]
    fn test_no_pairs_for_single_label() {
        let mut set = TrainingSet::new();
        set.add("only", marker(0));
        assert!(set.pairs().is_empty());
    }

    #[test]
    fn test_pairs_lexicographic_for_numeric_labels() {
        // numeric codes sort as strings: "10" before "2"
        let mut set = TrainingSet::new();
        set.add("2", marker(0));
        set.add("10", marker(1));

        let names: Vec<String> = set.pairs().iter().map(PairKey::artifact_name).collect();
        assert_eq!(names, vec!["10.2"]);
    }

    #[test]
    fn test_balancing_three_vs_five() {
        let mut set = TrainingSet::new();
        for i in 0..3 {
            set.add("A", marker(i));
        }
        for i in 10..15 {
            set.add("B", marker(i));
        }

        let key = PairKey::new("A", "B").unwrap();
        let problem = set.build_problem(&key).unwrap();
        assert_eq!(problem.len(), 10);

        let plus: Vec<u32> = problem.examples[..5]
            .iter()
            .map(|(label, v)| {
                assert_eq!(*label, 1.0);
                v.max_id().unwrap()
            })
            .collect();
        // A's examples at indices 0,1,2,0,1
        assert_eq!(plus, vec![0, 1, 2, 0, 1]);

        let minus: Vec<u32> = problem.examples[5..]
            .iter()
            .map(|(label, v)| {
                assert_eq!(*label, -1.0);
                v.max_id().unwrap()
            })
            .collect();
        assert_eq!(minus, vec![10, 11, 12, 13, 14]);
    }

    #[test]
    fn test_already_balanced_pair_not_replicated() {
        let mut set = TrainingSet::new();
        set.add("A", marker(0));
        set.add("A", marker(1));
        set.add("B", marker(2));
        set.add("B", marker(3));

        let key = PairKey::new("A", "B").unwrap();
        let problem = set.build_problem(&key).unwrap();
        assert_eq!(problem.len(), 4);
        let ids: Vec<u32> = problem
            .examples
            .iter()
            .map(|(_, v)| v.max_id().unwrap())
            .collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_balancing_preserves_document_order() {
        let mut set = TrainingSet::new();
        set.add("A", marker(7));
        set.add("A", marker(3));
        for i in 20..23 {
            set.add("B", marker(i));
        }

        let key = PairKey::new("A", "B").unwrap();
        let problem = set.build_problem(&key).unwrap();
        let plus: Vec<u32> = problem.examples[..3]
            .iter()
            .map(|(_, v)| v.max_id().unwrap())
            .collect();
        // original order 7,3 then wraps
        assert_eq!(plus, vec![7, 3, 7]);
    }

    #[test]
    fn test_build_problem_unknown_label_is_error() {
        let mut set = TrainingSet::new();
        set.add("A", marker(0));
        set.add("B", marker(1));
        let key = PairKey::new("A", "Z").unwrap();
        assert!(set.build_problem(&key).is_err());
    }

    #[test]
    fn test_pair_sequence_deterministic() {
        let build = || {
            let mut set = TrainingSet::new();
            for label in ["g", "b", "e", "a"] {
                set.add(label, marker(0));
            }
            set.pairs()
        };
        assert_eq!(build(), build());
        assert_eq!(build().len(), 6);
    }
}
