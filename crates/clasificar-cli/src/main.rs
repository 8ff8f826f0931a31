//! clasificar - one-vs-one SVM training-set preparation CLI
//!
//! Usage:
//!   clasificar --data cases.tsv --model svm_model --trainer-cmd svm_learn
//!   clasificar --data cases.tsv --model svm_model --feature-dir features
//!   clasificar --data cases.tsv --model svm_model --feature-dir features \
//!       --use-stemming --remove-stopwords --filter even

use clap::{Parser, ValueEnum};
use clasificar::corpus::{DelimitedCorpus, ParityFilter};
use clasificar::pipeline::{run, TrainConfig, TrainSummary};
use clasificar::text::Preprocessor;
use clasificar::trainer::{ExternalProcessTrainer, TrainerInvoker};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

mod output;

/// clasificar - prepare and train one-vs-one SVM text classifiers
///
/// Reads a delimited corpus of (id, label, text) rows, builds the shared
/// vocabulary, and produces one balanced binary training set per pair of
/// category labels. Pairs are trained via an external trainer command, or
/// written out as sparse feature files for later training.
#[derive(Parser)]
#[command(name = "clasificar")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Delimited corpus file, one (id, label, text) row per line
    #[arg(long, value_name = "FILE")]
    data: PathBuf,

    /// Column delimiter
    #[arg(long, default_value = "\t")]
    delimiter: char,

    /// 0-based column of the row id
    #[arg(long, default_value_t = 0)]
    id_column: usize,

    /// 0-based column of the category label
    #[arg(long, default_value_t = 1)]
    label_column: usize,

    /// 0-based column of the document text
    #[arg(long, default_value_t = 2)]
    text_column: usize,

    /// Directory where model files are written (destructively refreshed)
    #[arg(long, default_value = "svm_model", value_name = "DIR")]
    model: PathBuf,

    /// Write per-pair sparse feature files here instead of training
    #[arg(long, value_name = "DIR")]
    feature_dir: Option<PathBuf>,

    /// External trainer executable invoked per pair
    #[arg(long, value_name = "CMD")]
    trainer_cmd: Option<PathBuf>,

    /// File where an extra copy of the vocabulary is written
    #[arg(long, value_name = "FILE")]
    output_vocab: Option<PathBuf>,

    /// Apply Porter stemming to tokens
    #[arg(long)]
    use_stemming: bool,

    /// Remove English stop words
    #[arg(long)]
    remove_stopwords: bool,

    /// Replace each label with its major code (numeric label / 100)
    #[arg(long)]
    compute_major_labels: bool,

    /// Keep only rows at even or odd source positions
    #[arg(long, value_enum, default_value_t = RowFilter::All)]
    filter: RowFilter,

    /// Kernel gamma and flat feature scalar (default: 1 / num_features)
    #[arg(long)]
    gamma: Option<f64>,

    /// Weight features by corpus-derived per-word weights
    #[arg(long)]
    corpus_weights: bool,

    /// Train category pairs in parallel
    #[arg(long)]
    parallel: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RowFilter {
    All,
    Even,
    Odd,
}

impl From<RowFilter> for ParityFilter {
    fn from(filter: RowFilter) -> Self {
        match filter {
            RowFilter::All => ParityFilter::All,
            RowFilter::Even => ParityFilter::Even,
            RowFilter::Odd => ParityFilter::Odd,
        }
    }
}

fn execute(cli: &Cli) -> clasificar::Result<TrainSummary> {
    let corpus = DelimitedCorpus::new(&cli.data)
        .with_delimiter(cli.delimiter)
        .with_columns(cli.id_column, cli.label_column, cli.text_column)
        .with_parity(cli.filter.into())
        .with_major_labels(cli.compute_major_labels);

    let preprocessor = Preprocessor::new()
        .with_stopwords(cli.remove_stopwords)
        .with_stemming(cli.use_stemming);

    let mut config = TrainConfig::new(&cli.model)
        .with_corpus_weights(cli.corpus_weights)
        .with_parallel(cli.parallel);
    if let Some(dir) = &cli.feature_dir {
        config = config.with_feature_dir(dir);
    }
    if let Some(path) = &cli.output_vocab {
        config = config.with_vocab_copy(path);
    }
    if let Some(gamma) = cli.gamma {
        config = config.with_gamma(gamma);
    }

    let external = cli.trainer_cmd.as_ref().map(ExternalProcessTrainer::new);
    let trainer = external.as_ref().map(|t| t as &dyn TrainerInvoker);

    run(&corpus, &preprocessor, trainer, &config)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let start = Instant::now();

    output::section("clasificar");
    output::kv("data", cli.data.display());
    output::kv("model dir", cli.model.display());
    if let Some(dir) = &cli.feature_dir {
        output::kv("feature dir", dir.display());
    }
    if let Some(cmd) = &cli.trainer_cmd {
        output::kv("trainer", cmd.display());
    }

    match execute(&cli) {
        Ok(summary) => {
            output::info(&format!(
                "{} documents, {} features, {} categories",
                summary.documents, summary.num_features, summary.categories
            ));
            let what = if cli.feature_dir.is_some() {
                "feature files written"
            } else {
                "pair models trained"
            };
            output::success(&format!("{} {what}", summary.pairs));
            output::info(&format!("total time {:.2?}", start.elapsed()));
            ExitCode::SUCCESS
        }
        Err(err) => {
            output::error(&err.to_string());
            ExitCode::FAILURE
        }
    }
}
