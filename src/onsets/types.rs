// Onset-strength trace supplied by the acoustic front end

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScoringError};

/// Per-slot onset strength plus the duration of one slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnsetTrace {
    /// Onset strength for each sample slot (non-negative, typically normalized to [0, 1])
    pub strengths: Vec<f32>,

    /// Seconds covered by one slot
    pub sample_period: f64,
}

impl OnsetTrace {
    pub fn new(strengths: Vec<f32>, sample_period: f64) -> Self {
        OnsetTrace {
            strengths,
            sample_period,
        }
    }

    /// Number of sample slots
    pub fn len(&self) -> usize {
        self.strengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strengths.is_empty()
    }

    /// Duration of the whole trace in seconds
    pub fn duration_secs(&self) -> f64 {
        self.strengths.len() as f64 * self.sample_period
    }

    /// Reject traces the engine cannot reason about
    pub fn validate(&self) -> Result<()> {
        if !self.sample_period.is_finite() || self.sample_period <= 0.0 {
            return Err(ScoringError::invalid_input(
                "sample_period",
                self.sample_period,
                "must be a positive finite number of seconds",
            ));
        }

        if let Some(slot) = self.strengths.iter().position(|s| !s.is_finite()) {
            return Err(ScoringError::invalid_input(
                "strengths",
                format!("slot {}", slot),
                "onset strength must be finite",
            ));
        }

        Ok(())
    }
}
