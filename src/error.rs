// Crate-level error type
// Separates bad caller input from broken engine invariants

use thiserror::Error;

use crate::scoring::ConfigError;

/// Errors returned by a scoring call
///
/// A rejected performance (too few strikes) is not an error; it is reported
/// through `ScoreResult::beat_accepted`.
#[derive(Debug, Error)]
pub enum ScoringError {
    /// Caller supplied a value the engine cannot score
    #[error("invalid input `{name}`: got {value}, {reason}")]
    InvalidInput {
        name: &'static str,
        value: String,
        reason: String,
    },

    /// Alignment produced the wrong number of note differences.
    /// Only reachable through an engine defect or a hand-built model sequence.
    #[error("note count mismatch: expected {expected} differences, produced {actual}")]
    NoteCountMismatch { expected: usize, actual: usize },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ScoringError {
    pub(crate) fn invalid_input(
        name: &'static str,
        value: impl std::fmt::Display,
        reason: impl Into<String>,
    ) -> Self {
        ScoringError::InvalidInput {
            name,
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// True for errors that indicate an engine defect rather than bad input
    pub fn is_internal(&self) -> bool {
        matches!(self, ScoringError::NoteCountMismatch { .. })
    }
}

pub type Result<T> = std::result::Result<T, ScoringError>;
