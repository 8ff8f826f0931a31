//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use clasificar::prelude::*;
//! ```

pub use crate::corpus::{CorpusRecord, CorpusSource, DelimitedCorpus, InMemoryCorpus};
pub use crate::error::{ClasificarError, Result};
pub use crate::features::{encode, SparseVector, WeightMode};
pub use crate::model_dir::ModelDir;
pub use crate::pairwise::{PairKey, PairProblem, TrainingSet};
pub use crate::pipeline::{run, TrainConfig, TrainSummary};
pub use crate::text::Preprocessor;
pub use crate::trainer::{
    ExternalProcessTrainer, InProcessTrainer, SvmParameters, TrainerInvoker,
};
pub use crate::vocabulary::{Vocabulary, WordCounter};
