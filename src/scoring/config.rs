// Scoring configuration - detector knobs and the score mapping policy

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// How the aggregate error is mapped to a score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ScoreMapping {
    /// Descending mean-square-error thresholds (seconds squared)
    /// The first threshold the MSE reaches gives rating `index + 1`;
    /// the table must end at 0.0 so every MSE lands in a bucket
    Buckets { thresholds: Vec<f64> },

    /// Legacy 0-100 score: `100 - floor(step_mean_square_error)`, floored at 0
    Linear,
}

impl ScoreMapping {
    /// Five-star table
    /// 0.0005 s² is roughly 22ms RMS error, 0.004 s² roughly 63ms
    pub fn five_star() -> Self {
        ScoreMapping::Buckets {
            thresholds: vec![0.004, 0.002, 0.001, 0.0005, 0.0],
        }
    }

    /// Best rating this mapping can produce
    pub fn best_score(&self) -> u32 {
        match self {
            ScoreMapping::Buckets { thresholds } => thresholds.len() as u32,
            ScoreMapping::Linear => 100,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let ScoreMapping::Buckets { thresholds } = self else {
            return Ok(());
        };

        if thresholds.is_empty() {
            return Err(ConfigError::Invalid("score thresholds are empty".to_string()));
        }

        if thresholds.iter().any(|t| !t.is_finite() || *t < 0.0) {
            return Err(ConfigError::Invalid(
                "score thresholds must be finite and non-negative".to_string(),
            ));
        }

        if thresholds.windows(2).any(|pair| pair[0] <= pair[1]) {
            return Err(ConfigError::Invalid(
                "score thresholds must be strictly descending".to_string(),
            ));
        }

        if thresholds.last() != Some(&0.0) {
            return Err(ConfigError::Invalid(
                "the last score threshold must be 0.0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for ScoreMapping {
    fn default() -> Self {
        ScoreMapping::five_star()
    }
}

/// Tunable knobs for a scoring call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Onset strength a slot must exceed to count as a strike
    pub threshold: f32,

    /// Slots suppressed after each raw onset
    pub cooldown_steps: usize,

    /// Slots of error forgiven per note (detector jitter)
    pub leniency: usize,

    pub mapping: ScoreMapping,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig {
            threshold: 0.1,
            cooldown_steps: 2,
            leniency: 1,
            mapping: ScoreMapping::default(),
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.threshold.is_finite() || self.threshold <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "threshold must be positive, got {}",
                self.threshold
            )));
        }

        self.mapping.validate()
    }

    /// Deserialize and validate from JSON bytes
    pub fn from_json_bytes(data: &[u8]) -> Result<Self, ConfigError> {
        let config: ScoringConfig = serde_json::from_slice(data)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read(path)?;
        Self::from_json_bytes(&data)
    }
}
