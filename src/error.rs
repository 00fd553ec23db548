use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CardmatchError {
    #[error("Malformed input {}: {reason}", path.display())]
    MalformedInput { path: PathBuf, reason: String },

    #[error("Rename source not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Rename target already exists: {}", path.display())]
    Collision { path: PathBuf },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CardmatchError {
    /// Returns true for errors that abort the whole run.
    ///
    /// Apply-time errors (`NotFound`, `Collision`) and validation warnings
    /// are per-item: they are reported and the batch continues.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            CardmatchError::NotFound { .. }
                | CardmatchError::Collision { .. }
                | CardmatchError::Validation(_)
        )
    }

    pub(crate) fn malformed(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        CardmatchError::MalformedInput {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CardmatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_errors_are_not_fatal() {
        let not_found = CardmatchError::NotFound {
            path: PathBuf::from("a.png"),
        };
        let collision = CardmatchError::Collision {
            path: PathBuf::from("b.png"),
        };
        assert!(!not_found.is_fatal());
        assert!(!collision.is_fatal());
        assert!(!CardmatchError::Validation("Unknown tag".to_string()).is_fatal());
    }

    #[test]
    fn input_errors_are_fatal() {
        let err = CardmatchError::malformed("cards.json", "expected an array");
        assert!(err.is_fatal());
        assert_eq!(
            err.to_string(),
            "Malformed input cards.json: expected an array"
        );
        assert!(CardmatchError::Config("bad threshold".to_string()).is_fatal());
    }
}
