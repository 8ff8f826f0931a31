//! Corpus data source collaborator.
//!
//! A [`CorpusSource`] supplies the `(id, text, label)` rows the pipeline
//! consumes. [`DelimitedCorpus`] reads them from a delimited text file and
//! carries the two row-shaping options of the original front end: deriving
//! a coarser "major" label from a finer numeric code, and filtering rows by
//! positional parity for train/holdout splitting.

use crate::error::{ClasificarError, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// One corpus row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusRecord {
    /// Row identifier, opaque to the pipeline
    pub id: String,
    /// Raw document text
    pub text: String,
    /// Category label
    pub label: String,
}

/// Capability contract for retrieving corpus rows.
pub trait CorpusSource {
    /// Retrieve all rows, in stable source order.
    ///
    /// # Errors
    ///
    /// Returns an error if retrieval fails.
    fn records(&self) -> Result<Vec<CorpusRecord>>;
}

/// Row filter by position in the source: all rows, even positions only, or
/// odd positions only (0-based). Used to split train/holdout halves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParityFilter {
    /// Keep every row
    #[default]
    All,
    /// Keep rows at positions 0, 2, 4, ...
    Even,
    /// Keep rows at positions 1, 3, 5, ...
    Odd,
}

impl ParityFilter {
    /// True if the row at 0-based `position` passes the filter.
    #[must_use]
    pub fn keeps(&self, position: usize) -> bool {
        match self {
            ParityFilter::All => true,
            ParityFilter::Even => position % 2 == 0,
            ParityFilter::Odd => position % 2 == 1,
        }
    }
}

/// Derive the coarser "major" label from a finer code.
///
/// Numeric codes map to `code / 100` (so `"1204"` becomes `"12"`); a
/// non-numeric label passes through unchanged.
///
/// # Examples
///
/// ```
/// use clasificar::corpus::major_label;
///
/// assert_eq!(major_label("1204"), "12");
/// assert_eq!(major_label("99"), "0");
/// assert_eq!(major_label("health"), "health");
/// ```
#[must_use]
pub fn major_label(label: &str) -> String {
    match label.trim().parse::<i64>() {
        Ok(code) => (code / 100).to_string(),
        Err(_) => label.to_string(),
    }
}

/// Corpus source over rows already in memory.
///
/// # Examples
///
/// ```
/// use clasificar::corpus::{CorpusRecord, CorpusSource, InMemoryCorpus};
///
/// let corpus = InMemoryCorpus::new(vec![CorpusRecord {
///     id: "1".to_string(),
///     text: "hello world".to_string(),
///     label: "A".to_string(),
/// }]);
/// assert_eq!(corpus.records().unwrap().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryCorpus {
    records: Vec<CorpusRecord>,
}

impl InMemoryCorpus {
    /// Wrap a list of rows.
    #[must_use]
    pub fn new(records: Vec<CorpusRecord>) -> Self {
        Self { records }
    }

    /// Convenience constructor from `(label, text)` pairs; ids are the
    /// 1-based positions.
    #[must_use]
    pub fn from_labeled_texts(rows: &[(&str, &str)]) -> Self {
        Self {
            records: rows
                .iter()
                .enumerate()
                .map(|(i, (label, text))| CorpusRecord {
                    id: (i + 1).to_string(),
                    text: (*text).to_string(),
                    label: (*label).to_string(),
                })
                .collect(),
        }
    }
}

impl CorpusSource for InMemoryCorpus {
    fn records(&self) -> Result<Vec<CorpusRecord>> {
        Ok(self.records.clone())
    }
}

/// Corpus source backed by a delimited text file, one row per line.
///
/// Column positions are 0-based. Rows with too few columns are rejected as
/// malformed rather than silently skipped.
///
/// # Examples
///
/// ```no_run
/// use clasificar::corpus::{CorpusSource, DelimitedCorpus};
///
/// let corpus = DelimitedCorpus::new("cases.tsv")
///     .with_columns(0, 1, 2)
///     .with_major_labels(true);
/// let records = corpus.records().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct DelimitedCorpus {
    path: PathBuf,
    delimiter: char,
    id_column: usize,
    label_column: usize,
    text_column: usize,
    parity: ParityFilter,
    use_major_labels: bool,
}

impl DelimitedCorpus {
    /// Create a tab-delimited corpus reader with columns `id=0`, `label=1`,
    /// `text=2`.
    #[must_use]
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            delimiter: '\t',
            id_column: 0,
            label_column: 1,
            text_column: 2,
            parity: ParityFilter::All,
            use_major_labels: false,
        }
    }

    /// Set the column delimiter.
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set the 0-based id, label, and text column positions.
    #[must_use]
    pub fn with_columns(mut self, id: usize, label: usize, text: usize) -> Self {
        self.id_column = id;
        self.label_column = label;
        self.text_column = text;
        self
    }

    /// Keep only rows of the given positional parity.
    #[must_use]
    pub fn with_parity(mut self, parity: ParityFilter) -> Self {
        self.parity = parity;
        self
    }

    /// Replace each label with its derived major label.
    #[must_use]
    pub fn with_major_labels(mut self, enable: bool) -> Self {
        self.use_major_labels = enable;
        self
    }
}

impl CorpusSource for DelimitedCorpus {
    fn records(&self) -> Result<Vec<CorpusRecord>> {
        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let min_columns = self
            .id_column
            .max(self.label_column)
            .max(self.text_column)
            + 1;

        let mut records = Vec::new();
        // parity positions count data rows only; a blank line must not
        // flip the even/odd assignment of the rows after it
        let mut position = 0usize;
        for (line_number, line) in reader.lines().enumerate() {
            let line = line?;
            if line.is_empty() {
                continue;
            }
            let keep = self.parity.keeps(position);
            position += 1;
            if !keep {
                continue;
            }
            let columns: Vec<&str> = line.split(self.delimiter).collect();
            if columns.len() < min_columns {
                return Err(ClasificarError::Other(format!(
                    "malformed row {} in {}: expected at least {} columns, found {}",
                    line_number + 1,
                    self.path.display(),
                    min_columns,
                    columns.len()
                )));
            }
            let raw_label = columns[self.label_column].trim();
            let label = if self.use_major_labels {
                major_label(raw_label)
            } else {
                raw_label.to_string()
            };
            records.push(CorpusRecord {
                id: columns[self.id_column].trim().to_string(),
                text: columns[self.text_column].to_string(),
                label,
            });
        }
        Ok(records)
    }
}
