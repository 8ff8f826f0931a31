//! Clasificar: one-vs-one SVM training-set preparation for text
//! classification, in pure Rust.
//!
//! Clasificar builds a shared vocabulary over a labeled corpus, encodes
//! each document as a sparse feature vector, and assembles one balanced
//! binary training set per pair of distinct category labels, handing each
//! to a pluggable binary-classifier trainer. The numerical optimization
//! itself is always an external capability.
//!
//! # Quick Start
//!
//! ```
//! use clasificar::prelude::*;
//!
//! // Accumulate the vocabulary over the corpus
//! let mut vocab = Vocabulary::new();
//! let mut counter = WordCounter::new();
//! for word in ["price", "of", "corn", "price"] {
//!     vocab.update_counts(word).unwrap();
//!     counter.update_counts(word);
//! }
//! vocab.finalize_weights().unwrap();
//!
//! // Encode one document against it
//! let vector = encode(&counter, &vocab, WeightMode::CorpusDerived).unwrap();
//! let ids: Vec<u32> = vector.iter().map(|(id, _)| id).collect();
//! assert!(ids.windows(2).all(|w| w[0] < w[1]));
//! ```
//!
//! # Modules
//!
//! - [`vocabulary`]: word→id registry with per-word weights; per-document
//!   term counting
//! - [`features`]: sparse vectors and the document encoder
//! - [`pairwise`]: label grouping and balanced pair assembly
//! - [`model_dir`]: model directory refresh and artifact persistence
//! - [`trainer`]: the trainer capability (in-process and external-process)
//! - [`corpus`]: corpus data source collaborator
//! - [`text`]: preprocessing collaborator (tokenizer, stop words, stemmer)
//! - [`pipeline`]: end-to-end orchestration

pub mod corpus;
pub mod error;
pub mod features;
pub mod model_dir;
pub mod pairwise;
pub mod pipeline;
pub mod prelude;
pub mod text;
pub mod trainer;
pub mod vocabulary;

pub use error::{ClasificarError, Result};
pub use features::{encode, SparseVector, WeightMode};
pub use pairwise::{PairKey, PairProblem, TrainingSet};
pub use vocabulary::{Vocabulary, WordCounter};
