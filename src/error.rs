//! Error types for clasificar operations.
//!
//! Provides rich error context for library consumers.

use std::fmt;

/// Main error type for clasificar operations.
///
/// Covers configuration problems, vocabulary lifecycle misuse, I/O and
/// serialization failures, and trainer invocation failures.
///
/// # Examples
///
/// ```
/// use clasificar::error::ClasificarError;
///
/// let err = ClasificarError::MissingConfig {
///     param: "model_dir".to_string(),
/// };
/// assert!(err.to_string().contains("model_dir"));
/// ```
#[derive(Debug)]
pub enum ClasificarError {
    /// A required configuration input was not supplied.
    MissingConfig {
        /// Parameter name
        param: String,
    },

    /// A configuration value violates its constraint.
    InvalidConfig {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// The vocabulary was mutated after finalization.
    VocabularyFrozen,

    /// Corpus-derived weights were requested before finalization.
    WeightsNotComputed,

    /// The trainer failed for one category pair; the whole batch aborts.
    Trainer {
        /// Artifact name of the pair (`<cat1>.<cat2>`)
        pair: String,
        /// Failure detail
        message: String,
    },

    /// I/O error (file not found, permission denied, etc.).
    Io(std::io::Error),

    /// Serialization/deserialization error.
    Serialization(String),

    /// Generic error with string message.
    Other(String),
}

impl fmt::Display for ClasificarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClasificarError::MissingConfig { param } => {
                write!(f, "Missing required configuration: {param}")
            }
            ClasificarError::InvalidConfig {
                param,
                value,
                constraint,
            } => {
                write!(
                    f,
                    "Invalid configuration: {param} = {value}, expected {constraint}"
                )
            }
            ClasificarError::VocabularyFrozen => {
                write!(f, "Vocabulary is finalized and can no longer be updated")
            }
            ClasificarError::WeightsNotComputed => {
                write!(
                    f,
                    "Vocabulary weights not computed: call finalize_weights() first"
                )
            }
            ClasificarError::Trainer { pair, message } => {
                write!(f, "Trainer failed for pair {pair}: {message}")
            }
            ClasificarError::Io(e) => write!(f, "I/O error: {e}"),
            ClasificarError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            ClasificarError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ClasificarError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClasificarError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ClasificarError {
    fn from(err: std::io::Error) -> Self {
        ClasificarError::Io(err)
    }
}

impl From<&str> for ClasificarError {
    fn from(msg: &str) -> Self {
        ClasificarError::Other(msg.to_string())
    }
}

impl From<String> for ClasificarError {
    fn from(msg: String) -> Self {
        ClasificarError::Other(msg)
    }
}

impl ClasificarError {
    /// Create a missing-configuration error.
    #[must_use]
    pub fn missing_config(param: &str) -> Self {
        Self::MissingConfig {
            param: param.to_string(),
        }
    }

    /// Create a trainer failure for the named pair.
    #[must_use]
    pub fn trainer(pair: &str, message: impl Into<String>) -> Self {
        Self::Trainer {
            pair: pair.to_string(),
            message: message.into(),
        }
    }

    /// Create an empty input error.
    #[must_use]
    pub fn empty_input(context: &str) -> Self {
        Self::Other(format!("empty input: {context}"))
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, ClasificarError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_display() {
        let err = ClasificarError::missing_config("data");
        assert!(err.to_string().contains("Missing required configuration"));
        assert!(err.to_string().contains("data"));
    }

    #[test]
    fn test_invalid_config_display() {
        let err = ClasificarError::InvalidConfig {
            param: "gamma".to_string(),
            value: "-1".to_string(),
            constraint: ">0".to_string(),
        };
        assert!(err.to_string().contains("gamma"));
        assert!(err.to_string().contains("-1"));
        assert!(err.to_string().contains(">0"));
    }

    #[test]
    fn test_vocabulary_frozen_display() {
        let err = ClasificarError::VocabularyFrozen;
        assert!(err.to_string().contains("finalized"));
    }

    #[test]
    fn test_weights_not_computed_display() {
        let err = ClasificarError::WeightsNotComputed;
        assert!(err.to_string().contains("finalize_weights"));
    }

    #[test]
    fn test_trainer_display() {
        let err = ClasificarError::trainer("A.B", "exit status 1");
        assert!(err.to_string().contains("A.B"));
        assert!(err.to_string().contains("exit status 1"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ClasificarError = io_err.into();
        assert!(matches!(err, ClasificarError::Io(_)));
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_from_str_and_string() {
        let err: ClasificarError = "boom".into();
        assert!(matches!(err, ClasificarError::Other(_)));
        let err: ClasificarError = "boom".to_string().into();
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn test_error_source_io() {
        use std::error::Error;
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = ClasificarError::Io(io_err);
        assert!(err.source().is_some());
        assert!(ClasificarError::VocabularyFrozen.source().is_none());
    }

    #[test]
    fn test_empty_input_helper() {
        let err = ClasificarError::empty_input("corpus");
        assert!(err.to_string().contains("empty input"));
        assert!(err.to_string().contains("corpus"));
    }
}
