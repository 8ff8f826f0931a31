//! Binary-classifier training capability.
//!
//! The core never implements the numerical optimization; it assembles one
//! balanced [`PairProblem`] at a time and hands it to a [`TrainerInvoker`],
//! which returns an opaque trained-model artifact. Two interchangeable
//! implementations are provided and the pipeline never branches on which
//! is in use:
//!
//! - [`InProcessTrainer`] adapts an externally supplied fit function.
//! - [`ExternalProcessTrainer`] writes a sparse feature file, spawns a
//!   trainer executable, drains its output streams concurrently with the
//!   wait (a full pipe must never deadlock the child), and reads back the
//!   model file.

use crate::error::{ClasificarError, Result};
use crate::model_dir::write_feature_file;
use crate::pairwise::PairProblem;
use std::io::Read;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// SVM kernel selection, numbered in the libsvm/svmlight convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kernel {
    /// Linear: `u'v`
    Linear = 0,
    /// Polynomial: `(gamma*u'v + coef0)^degree`
    Polynomial = 1,
    /// Radial basis function: `exp(-gamma*|u-v|^2)`
    Rbf = 2,
    /// Sigmoid: `tanh(gamma*u'v + coef0)`
    Sigmoid = 3,
}

/// Fixed kernel configuration handed to every pair's training run.
///
/// Defaults match the historical pipeline: RBF kernel, degree 3, cost 1.0,
/// epsilon 1e-3, shrinking heuristic enabled, no per-class weighting.
/// Gamma is either supplied externally or resolved to `1 / num_features`.
///
/// # Examples
///
/// ```
/// use clasificar::trainer::{Kernel, SvmParameters};
///
/// let params = SvmParameters::new();
/// assert_eq!(params.kernel, Kernel::Rbf);
/// assert_eq!(params.degree, 3);
/// assert_eq!(params.resolve_gamma(100), 0.01);
///
/// let params = params.with_gamma(0.5);
/// assert_eq!(params.resolve_gamma(100), 0.5);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SvmParameters {
    /// Kernel type
    pub kernel: Kernel,
    /// Polynomial degree (unused by RBF but carried for the trainer)
    pub degree: u32,
    /// Soft-margin cost C
    pub cost: f64,
    /// Termination tolerance
    pub epsilon: f64,
    /// Kernel gamma; `None` resolves to `1 / num_features`
    pub gamma: Option<f64>,
    /// Shrinking heuristic
    pub shrinking: bool,
}

impl SvmParameters {
    /// Create the default parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            kernel: Kernel::Rbf,
            degree: 3,
            cost: 1.0,
            epsilon: 1e-3,
            gamma: None,
            shrinking: true,
        }
    }

    /// Supply gamma externally.
    #[must_use]
    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = Some(gamma);
        self
    }

    /// Effective gamma: the supplied value, or `1 / num_features`.
    #[must_use]
    pub fn resolve_gamma(&self, num_features: usize) -> f64 {
        self.gamma.unwrap_or(1.0 / num_features.max(1) as f64)
    }
}

impl Default for SvmParameters {
    fn default() -> Self {
        Self::new()
    }
}

/// A trained binary-classifier artifact.
#[derive(Debug, Clone)]
pub struct TrainedModel {
    /// Opaque model blob, persisted as `svm.<cat1>.<cat2>`.
    pub bytes: Vec<u8>,
    /// Trainer diagnostic output, persisted as `temp.<cat1>.<cat2>` when
    /// present.
    pub diagnostics: Option<String>,
}

/// Capability contract for fitting one balanced binary problem.
pub trait TrainerInvoker: Send + Sync {
    /// Train one pair's problem and return the model artifact.
    ///
    /// # Errors
    ///
    /// Any failure aborts the whole batch; implementations never retry.
    fn train(&self, problem: &PairProblem, params: &SvmParameters) -> Result<TrainedModel>;
}

/// In-process trainer wrapping an externally supplied fit function.
///
/// # Examples
///
/// ```
/// use clasificar::trainer::{InProcessTrainer, SvmParameters, TrainerInvoker};
/// use clasificar::pairwise::{PairKey, TrainingSet};
/// use clasificar::features::SparseVector;
///
/// let trainer = InProcessTrainer::new(|problem, _params| {
///     Ok(format!("model for {}", problem.key.artifact_name()).into_bytes())
/// });
///
/// let mut set = TrainingSet::new();
/// set.add("A", SparseVector::new());
/// set.add("B", SparseVector::new());
/// let problem = set.build_problem(&PairKey::new("A", "B").unwrap()).unwrap();
///
/// let model = trainer.train(&problem, &SvmParameters::new()).unwrap();
/// assert_eq!(model.bytes, b"model for A.B");
/// ```
pub struct InProcessTrainer<F> {
    fit: F,
}

impl<F> InProcessTrainer<F>
where
    F: Fn(&PairProblem, &SvmParameters) -> Result<Vec<u8>> + Send + Sync,
{
    /// Wrap a fit function.
    pub fn new(fit: F) -> Self {
        Self { fit }
    }
}

impl<F> TrainerInvoker for InProcessTrainer<F>
where
    F: Fn(&PairProblem, &SvmParameters) -> Result<Vec<u8>> + Send + Sync,
{
    fn train(&self, problem: &PairProblem, params: &SvmParameters) -> Result<TrainedModel> {
        let bytes = (self.fit)(problem, params)?;
        Ok(TrainedModel {
            bytes,
            diagnostics: None,
        })
    }
}

/// Trainer that invokes an external executable per pair.
///
/// For each problem: write the feature file into a scratch directory,
/// run `<command> [kernel flags] <feature_file> <model_file>`, drain
/// stdout/stderr concurrently with the wait, check the exit status, and
/// read the model file back. Kernel flags follow the libsvm convention
/// (`-t`, `-d`, `-c`, `-e`, `-g`, `-h`).
#[derive(Debug, Clone)]
pub struct ExternalProcessTrainer {
    command: PathBuf,
}

impl ExternalProcessTrainer {
    /// Create an invoker for the given trainer executable.
    #[must_use]
    pub fn new<P: Into<PathBuf>>(command: P) -> Self {
        Self {
            command: command.into(),
        }
    }

    fn kernel_args(params: &SvmParameters) -> Vec<String> {
        let mut args = vec![
            "-t".to_string(),
            (params.kernel as i32).to_string(),
            "-d".to_string(),
            params.degree.to_string(),
            "-c".to_string(),
            params.cost.to_string(),
            "-e".to_string(),
            params.epsilon.to_string(),
            "-h".to_string(),
            if params.shrinking { "1" } else { "0" }.to_string(),
        ];
        if let Some(gamma) = params.gamma {
            args.push("-g".to_string());
            args.push(gamma.to_string());
        }
        args
    }
}

impl TrainerInvoker for ExternalProcessTrainer {
    fn train(&self, problem: &PairProblem, params: &SvmParameters) -> Result<TrainedModel> {
        let pair = problem.key.artifact_name();
        let scratch = tempfile::tempdir()?;
        let feature_path = write_feature_file(scratch.path(), problem)?;
        let model_path = scratch.path().join(format!("model.{pair}"));

        let mut child = Command::new(&self.command)
            .args(Self::kernel_args(params))
            .arg(&feature_path)
            .arg(&model_path)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                ClasificarError::trainer(&pair, format!("failed to spawn {:?}: {e}", self.command))
            })?;

        // Drain both streams while waiting; a blocked pipe would deadlock
        // the child.
        let mut stdout = child.stdout.take().ok_or_else(|| {
            ClasificarError::trainer(&pair, "trainer stdout was not captured")
        })?;
        let mut stderr = child.stderr.take().ok_or_else(|| {
            ClasificarError::trainer(&pair, "trainer stderr was not captured")
        })?;

        let out_handle = std::thread::spawn(move || {
            let mut buf = String::new();
            stdout.read_to_string(&mut buf).map(|_| buf)
        });
        let err_handle = std::thread::spawn(move || {
            let mut buf = String::new();
            stderr.read_to_string(&mut buf).map(|_| buf)
        });

        let status = child
            .wait()
            .map_err(|e| ClasificarError::trainer(&pair, format!("wait failed: {e}")))?;

        let stdout_text = out_handle
            .join()
            .map_err(|_| ClasificarError::trainer(&pair, "stdout drain thread panicked"))?
            .map_err(|e| ClasificarError::trainer(&pair, format!("stdout read failed: {e}")))?;
        let stderr_text = err_handle
            .join()
            .map_err(|_| ClasificarError::trainer(&pair, "stderr drain thread panicked"))?
            .map_err(|e| ClasificarError::trainer(&pair, format!("stderr read failed: {e}")))?;

        if !status.success() {
            return Err(ClasificarError::trainer(
                &pair,
                format!("exited with {status}: {}", stderr_text.trim()),
            ));
        }

        let bytes = std::fs::read(&model_path).map_err(|e| {
            ClasificarError::trainer(&pair, format!("model file not readable: {e}"))
        })?;

        let diagnostics = format!("{stdout_text}{stderr_text}");
        Ok(TrainedModel {
            bytes,
            diagnostics: (!diagnostics.is_empty()).then_some(diagnostics),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::SparseVector;
    use crate::pairwise::{PairKey, TrainingSet};

    fn two_label_problem() -> PairProblem {
        let mut set = TrainingSet::new();
        set.add("A", SparseVector::from_entries(vec![(0, 1.0)]).unwrap());
        set.add("B", SparseVector::from_entries(vec![(1, 1.0)]).unwrap());
        set.build_problem(&PairKey::new("A", "B").unwrap()).unwrap()
    }

    #[test]
    fn test_default_parameters() {
        let params = SvmParameters::new();
        assert_eq!(params.kernel, Kernel::Rbf);
        assert_eq!(params.degree, 3);
        assert!((params.cost - 1.0).abs() < f64::EPSILON);
        assert!((params.epsilon - 1e-3).abs() < f64::EPSILON);
        assert!(params.shrinking);
        assert_eq!(params.gamma, None);
    }

    #[test]
    fn test_gamma_resolution() {
        let params = SvmParameters::new();
        assert!((params.resolve_gamma(4) - 0.25).abs() < f64::EPSILON);
        assert!((params.with_gamma(0.7).resolve_gamma(4) - 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn test_gamma_resolution_zero_features() {
        // degenerate but must not divide by zero
        let params = SvmParameters::new();
        assert!(params.resolve_gamma(0).is_finite());
    }

    #[test]
    fn test_kernel_args_include_gamma_when_set() {
        let params = SvmParameters::new().with_gamma(0.125);
        let args = ExternalProcessTrainer::kernel_args(&params);
        assert!(args.windows(2).any(|w| w == ["-g", "0.125"]));
        assert!(args.windows(2).any(|w| w == ["-t", "2"]));
    }

    #[test]
    fn test_kernel_args_omit_gamma_when_unset() {
        let args = ExternalProcessTrainer::kernel_args(&SvmParameters::new());
        assert!(!args.contains(&"-g".to_string()));
    }

    #[test]
    fn test_in_process_trainer_passes_problem_through() {
        let trainer = InProcessTrainer::new(|problem: &PairProblem, _params: &SvmParameters| {
            Ok(problem.len().to_string().into_bytes())
        });
        let model = trainer
            .train(&two_label_problem(), &SvmParameters::new())
            .unwrap();
        assert_eq!(model.bytes, b"2");
        assert!(model.diagnostics.is_none());
    }

    #[test]
    fn test_in_process_trainer_propagates_failure() {
        let trainer = InProcessTrainer::new(|problem: &PairProblem, _params: &SvmParameters| {
            Err(ClasificarError::trainer(
                &problem.key.artifact_name(),
                "did not converge",
            ))
        });
        let result = trainer.train(&two_label_problem(), &SvmParameters::new());
        assert!(matches!(result, Err(ClasificarError::Trainer { .. })));
    }

    #[test]
    fn test_external_trainer_missing_command_is_error() {
        let trainer = ExternalProcessTrainer::new("/nonexistent/svm_learn");
        let result = trainer.train(&two_label_problem(), &SvmParameters::new());
        assert!(matches!(result, Err(ClasificarError::Trainer { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_external_trainer_runs_command_and_reads_model() {
        // stand-in trainer: skips the kernel flags, copies the feature file
        // to the model path
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("fake_trainer.sh");
        std::fs::write(
            &script,
            "#!/bin/sh\nwhile [ $# -gt 2 ]; do shift; done\ncp \"$1\" \"$2\"\necho trained\n",
        )
        .unwrap();
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let model = ExternalProcessTrainer::new(&script)
            .train(&two_label_problem(), &SvmParameters::new())
            .unwrap();
        assert!(!model.bytes.is_empty());
        assert!(model.diagnostics.unwrap().contains("trained"));
    }

    #[cfg(unix)]
    #[test]
    fn test_external_trainer_nonzero_exit_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("failing_trainer.sh");
        std::fs::write(&script, "#!/bin/sh\necho broken >&2\nexit 3\n").unwrap();
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let result = ExternalProcessTrainer::new(&script)
            .train(&two_label_problem(), &SvmParameters::new());
        match result {
            Err(ClasificarError::Trainer { pair, message }) => {
                assert_eq!(pair, "A.B");
                assert!(message.contains("broken"));
            }
            other => panic!("expected trainer error, got {other:?}"),
        }
    }
}
