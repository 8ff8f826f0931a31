//! Model directory management and artifact persistence.
//!
//! [`ModelDir::create`] performs the destructive refresh of the output
//! directory: any pre-existing directory at the path is recursively deleted
//! and recreated empty, so a rerun never merges with a prior run's
//! artifacts. All per-run files live under this root:
//!
//! ```text
//! root/vocab.bin            serialized vocabulary
//! root/svm.<cat1>.<cat2>    trained model blob, one per pair
//! root/temp.<cat1>.<cat2>   optional trainer diagnostic output
//! root/features/<cat1>.<cat2>   sparse feature file, one per pair
//! ```
//!
//! Feature files are plain text, one example per line:
//! `<+1|-1> <id1>:<val1> <id2>:<val2> ...` with ids strictly ascending.

use crate::error::Result;
use crate::features::SparseVector;
use crate::pairwise::{PairKey, PairProblem};
use crate::vocabulary::Vocabulary;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// File name of the vocabulary artifact at the directory root.
pub const VOCAB_FILE: &str = "vocab.bin";

/// Handle to a freshly created model output directory.
#[derive(Debug, Clone)]
pub struct ModelDir {
    root: PathBuf,
}

impl ModelDir {
    /// Destructively refresh `root`: delete it recursively if present, then
    /// recreate it empty.
    ///
    /// # Errors
    ///
    /// Returns an error if deletion or creation fails.
    pub fn create<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        refresh_dir(&root)?;
        Ok(Self { root })
    }

    /// The directory root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write the vocabulary artifact `vocab.bin` at the root.
    ///
    /// # Errors
    ///
    /// Returns an error on I/O or serialization failure.
    pub fn write_vocabulary(&self, vocab: &Vocabulary) -> Result<PathBuf> {
        let path = self.root.join(VOCAB_FILE);
        vocab.write(&path)?;
        Ok(path)
    }

    /// Path of the model artifact for `key`: `svm.<cat1>.<cat2>`.
    #[must_use]
    pub fn model_path(&self, key: &PairKey) -> PathBuf {
        self.root.join(format!("svm.{}", key.artifact_name()))
    }

    /// Path of the diagnostics capture for `key`: `temp.<cat1>.<cat2>`.
    #[must_use]
    pub fn diagnostics_path(&self, key: &PairKey) -> PathBuf {
        self.root.join(format!("temp.{}", key.artifact_name()))
    }

    /// Persist a trained model blob for `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn write_model(&self, key: &PairKey, blob: &[u8]) -> Result<PathBuf> {
        let path = self.model_path(key);
        fs::write(&path, blob)?;
        Ok(path)
    }

    /// Persist trainer diagnostic output for `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn write_diagnostics(&self, key: &PairKey, output: &str) -> Result<PathBuf> {
        let path = self.diagnostics_path(key);
        fs::write(&path, output)?;
        Ok(path)
    }
}

/// Destructively refresh `dir`: delete it recursively if present, then
/// recreate it empty. A rerun never merges with a prior run's artifacts,
/// whichever directory they land in.
///
/// # Errors
///
/// Returns an error if deletion or creation fails.
pub fn refresh_dir<P: AsRef<Path>>(dir: P) -> Result<()> {
    let dir = dir.as_ref();
    if dir.exists() {
        fs::remove_dir_all(dir)?;
    }
    fs::create_dir_all(dir)?;
    Ok(())
}

/// Format one example as a feature-file line: `<label> <id>:<val> ...`.
///
/// The label is rendered as `+1` or `-1`; ids come out ascending because
/// the vector stores them so.
#[must_use]
pub fn feature_line(label: f64, vector: &SparseVector) -> String {
    let mut line = String::from(if label > 0.0 { "+1" } else { "-1" });
    for (id, value) in vector.iter() {
        line.push_str(&format!(" {id}:{value}"));
    }
    line
}

/// Write one pair's balanced problem as a sparse feature file.
///
/// The file is named `<cat1>.<cat2>` inside `dir` (created if missing).
///
/// # Errors
///
/// Returns an error if directory creation or the write fails.
pub fn write_feature_file<P: AsRef<Path>>(dir: P, problem: &PairProblem) -> Result<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    let path = dir.join(problem.key.artifact_name());

    let file = File::create(&path)?;
    let mut writer = BufWriter::new(file);
    for (label, vector) in &problem.examples {
        writeln!(writer, "{}", feature_line(*label, vector))?;
    }
    writer.flush()?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pairwise::TrainingSet;

    fn vector(entries: Vec<(u32, f64)>) -> SparseVector {
        SparseVector::from_entries(entries).unwrap()
    }

    #[test]
    fn test_create_is_destructive() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("model");

        fs::create_dir_all(root.join("stale_subdir")).unwrap();
        fs::write(root.join("stale.file"), b"old run").unwrap();

        let model_dir = ModelDir::create(&root).unwrap();
        assert!(model_dir.root().exists());
        let leftover: Vec<_> = fs::read_dir(&root).unwrap().collect();
        assert!(leftover.is_empty());
    }

    #[test]
    fn test_create_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("fresh");
        let model_dir = ModelDir::create(&root).unwrap();
        assert!(model_dir.root().is_dir());
    }

    #[test]
    fn test_artifact_paths() {
        let dir = tempfile::tempdir().unwrap();
        let model_dir = ModelDir::create(dir.path().join("m")).unwrap();
        let key = PairKey::new("B", "A").unwrap();

        assert!(model_dir.model_path(&key).ends_with("svm.A.B"));
        assert!(model_dir.diagnostics_path(&key).ends_with("temp.A.B"));
    }

    #[test]
    fn test_write_model_and_diagnostics() {
        let dir = tempfile::tempdir().unwrap();
        let model_dir = ModelDir::create(dir.path().join("m")).unwrap();
        let key = PairKey::new("A", "B").unwrap();

        let model_path = model_dir.write_model(&key, b"model bytes").unwrap();
        assert_eq!(fs::read(model_path).unwrap(), b"model bytes");

        let diag_path = model_dir.write_diagnostics(&key, "iterations: 12\n").unwrap();
        assert!(fs::read_to_string(diag_path).unwrap().contains("iterations"));
    }

    #[test]
    fn test_feature_line_format() {
        let v = vector(vec![(0, 0.5), (3, 1.25)]);
        assert_eq!(feature_line(1.0, &v), "+1 0:0.5 3:1.25");
        assert_eq!(feature_line(-1.0, &v), "-1 0:0.5 3:1.25");
    }

    #[test]
    fn test_feature_line_empty_vector() {
        assert_eq!(feature_line(1.0, &SparseVector::new()), "+1");
    }

    #[test]
    fn test_write_feature_file() {
        let dir = tempfile::tempdir().unwrap();
        let features = dir.path().join("features");

        let mut set = TrainingSet::new();
        set.add("A", vector(vec![(0, 1.0)]));
        set.add("B", vector(vec![(1, 2.0)]));
        let key = PairKey::new("A", "B").unwrap();
        let problem = set.build_problem(&key).unwrap();

        let path = write_feature_file(&features, &problem).unwrap();
        assert!(path.ends_with("A.B"));

        let contents = fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines, vec!["+1 0:1", "-1 1:2"]);
    }

    #[test]
    fn test_feature_file_ids_ascending_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let mut set = TrainingSet::new();
        set.add("A", vector(vec![(1, 0.5), (4, 0.5), (9, 0.5)]));
        set.add("B", vector(vec![(0, 0.5), (2, 0.5)]));
        let problem = set
            .build_problem(&PairKey::new("A", "B").unwrap())
            .unwrap();

        let path = write_feature_file(dir.path().join("f"), &problem).unwrap();
        for line in fs::read_to_string(path).unwrap().lines() {
            let ids: Vec<u32> = line
                .split_whitespace()
                .skip(1)
                .map(|pair| pair.split(':').next().unwrap().parse().unwrap())
                .collect();
            let mut sorted = ids.clone();
            sorted.sort_unstable();
            sorted.dedup();
            assert_eq!(ids, sorted);
        }
    }
}
