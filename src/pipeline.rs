//! End-to-end training pipeline orchestration.
//!
//! [`run`] wires the collaborators together in strict left-to-right order:
//! corpus scan (accumulating the vocabulary and one [`WordCounter`] per
//! document) → weight finalization → per-document encoding → label grouping
//! → destructive model-directory refresh → vocabulary persistence → the
//! O(C²) pair loop, each iteration either training one balanced problem or
//! emitting its feature file.
//!
//! Pair iterations touch disjoint outputs and may run under rayon when
//! [`TrainConfig::parallel`] is set; the vocabulary and label groupings are
//! read-only by then, and artifact names do not depend on scheduling. A
//! failure in any single pair aborts the whole run.
//!
//! # Examples
//!
//! ```no_run
//! use clasificar::corpus::InMemoryCorpus;
//! use clasificar::pipeline::{run, TrainConfig};
//! use clasificar::text::Preprocessor;
//! use clasificar::trainer::InProcessTrainer;
//!
//! let corpus = InMemoryCorpus::from_labeled_texts(&[
//!     ("A", "x y"),
//!     ("A", "x"),
//!     ("B", "y z"),
//!     ("B", "z"),
//! ]);
//! let trainer = InProcessTrainer::new(|_problem, _params| Ok(vec![0u8]));
//! let config = TrainConfig::new("svm_model");
//!
//! let summary = run(&corpus, &Preprocessor::new(), Some(&trainer), &config).unwrap();
//! assert_eq!(summary.pairs, 1);
//! ```

use crate::corpus::CorpusSource;
use crate::error::{ClasificarError, Result};
use crate::features::{encode, WeightMode};
use crate::model_dir::{refresh_dir, write_feature_file, ModelDir};
use crate::pairwise::{PairKey, TrainingSet};
use crate::text::Preprocessor;
use crate::trainer::{SvmParameters, TrainerInvoker};
use crate::vocabulary::{Vocabulary, WordCounter};
use rayon::prelude::*;
use std::path::PathBuf;

/// Configuration for one training run.
#[derive(Debug, Clone)]
pub struct TrainConfig {
    /// Output model directory; destructively refreshed at run start.
    pub model_dir: PathBuf,
    /// When set, write one sparse feature file per pair here instead of
    /// invoking the trainer.
    pub feature_dir: Option<PathBuf>,
    /// Optional second copy of the vocabulary artifact.
    pub vocab_copy: Option<PathBuf>,
    /// Use corpus-derived per-word weights instead of the flat scalar.
    pub corpus_weights: bool,
    /// Externally supplied gamma; `None` resolves to `1 / num_features`.
    /// Serves both as the flat feature scalar and the kernel gamma.
    pub gamma: Option<f64>,
    /// Run the pair loop on the rayon pool.
    pub parallel: bool,
}

impl TrainConfig {
    /// Create a configuration writing models to `model_dir`, flat-scalar
    /// weighting, sequential pair loop.
    #[must_use]
    pub fn new<P: Into<PathBuf>>(model_dir: P) -> Self {
        Self {
            model_dir: model_dir.into(),
            feature_dir: None,
            vocab_copy: None,
            corpus_weights: false,
            gamma: None,
            parallel: false,
        }
    }

    /// Write feature files into `dir` instead of training.
    #[must_use]
    pub fn with_feature_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.feature_dir = Some(dir.into());
        self
    }

    /// Also write the vocabulary artifact to `path`.
    #[must_use]
    pub fn with_vocab_copy<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.vocab_copy = Some(path.into());
        self
    }

    /// Select corpus-derived per-word weighting.
    #[must_use]
    pub fn with_corpus_weights(mut self, enable: bool) -> Self {
        self.corpus_weights = enable;
        self
    }

    /// Supply gamma externally.
    #[must_use]
    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = Some(gamma);
        self
    }

    /// Run the pair loop in parallel.
    #[must_use]
    pub fn with_parallel(mut self, enable: bool) -> Self {
        self.parallel = enable;
        self
    }
}

/// What a completed run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainSummary {
    /// Documents scanned
    pub documents: usize,
    /// Distinct words in the vocabulary
    pub num_features: usize,
    /// Distinct category labels
    pub categories: usize,
    /// Pairs trained or emitted as feature files
    pub pairs: usize,
}

/// Execute one full training run.
///
/// `trainer` may be `None` only when `config.feature_dir` is set; that
/// check, like all configuration validation, happens before the model
/// directory is touched, so a configuration error never destroys a prior
/// run's artifacts.
///
/// # Errors
///
/// Returns the first error encountered; every failure is fatal and there
/// are no retries.
pub fn run(
    corpus: &dyn CorpusSource,
    preprocessor: &Preprocessor,
    trainer: Option<&dyn TrainerInvoker>,
    config: &TrainConfig,
) -> Result<TrainSummary> {
    if trainer.is_none() && config.feature_dir.is_none() {
        return Err(ClasificarError::missing_config("trainer or feature_dir"));
    }
    if let Some(gamma) = config.gamma {
        if gamma <= 0.0 || !gamma.is_finite() {
            return Err(ClasificarError::InvalidConfig {
                param: "gamma".to_string(),
                value: gamma.to_string(),
                constraint: "> 0".to_string(),
            });
        }
    }

    let records = corpus.records()?;
    if records.is_empty() {
        return Err(ClasificarError::empty_input("corpus"));
    }

    // Pass one: accumulate the shared vocabulary and per-document counters.
    let mut vocabulary = Vocabulary::new();
    let mut documents: Vec<(String, WordCounter)> = Vec::with_capacity(records.len());
    for record in &records {
        let tokens = preprocessor.process(&record.text)?;
        let mut counter = WordCounter::new();
        for token in &tokens {
            vocabulary.update_counts(token)?;
            counter.update_counts(token);
        }
        documents.push((record.label.clone(), counter));
    }
    vocabulary.finalize_weights()?;

    let num_features = vocabulary.num_features();
    if num_features == 0 {
        return Err(ClasificarError::empty_input("vocabulary"));
    }

    let gamma = config
        .gamma
        .unwrap_or(1.0 / num_features as f64);
    let mode = if config.corpus_weights {
        WeightMode::CorpusDerived
    } else {
        WeightMode::Flat(gamma)
    };

    // Pass two: encode every document and group by label, preserving
    // original document order within each label.
    let mut training_set = TrainingSet::new();
    for (label, counter) in &documents {
        let vector = encode(counter, &vocabulary, mode)?;
        training_set.add(label, vector);
    }

    // All inputs validated; from here on the output directories are fair
    // game. The feature directory gets the same destructive refresh as the
    // model root, so a rerun never merges with stale pair files.
    let model_dir = ModelDir::create(&config.model_dir)?;
    if let Some(feature_dir) = &config.feature_dir {
        refresh_dir(feature_dir)?;
    }
    model_dir.write_vocabulary(&vocabulary)?;
    if let Some(copy) = &config.vocab_copy {
        vocabulary.write(copy)?;
    }

    let parameters = SvmParameters::new().with_gamma(gamma);
    let pairs = training_set.pairs();

    let process = |key: &PairKey| -> Result<()> {
        let problem = training_set.build_problem(key)?;
        if let Some(feature_dir) = &config.feature_dir {
            write_feature_file(feature_dir, &problem)?;
            return Ok(());
        }
        let trainer = trainer.ok_or_else(|| {
            ClasificarError::missing_config("trainer")
        })?;
        let model = trainer.train(&problem, &parameters)?;
        model_dir.write_model(key, &model.bytes)?;
        if let Some(diagnostics) = &model.diagnostics {
            model_dir.write_diagnostics(key, diagnostics)?;
        }
        Ok(())
    };

    if config.parallel {
        pairs.par_iter().try_for_each(process)?;
    } else {
        pairs.iter().try_for_each(process)?;
    }

    Ok(TrainSummary {
        documents: records.len(),
        num_features,
        categories: training_set.num_labels(),
        pairs: pairs.len(),
    })
}
