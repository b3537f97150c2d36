// Score result - value object handed to the presentation layer
// Carries the onset sequences for rendering alongside the statistics

use serde::{Deserialize, Serialize};

/// Error statistics of an accepted performance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreStats {
    /// Sum of squared per-note errors in seconds²
    pub square_error: f64,

    /// `square_error` averaged over the scored notes (all but the anchor)
    pub mean_square_error: f64,

    /// Sum of squared per-note errors in slots²
    pub step_square_error: u64,

    pub step_mean_square_error: f64,

    /// Rating under the configured mapping
    pub score: u32,

    /// Raw slot offset per note, before leniency
    pub note_differences: Vec<usize>,
}

/// Result of one scoring call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// False when too few strikes were detected; `stats` is then `None`
    pub beat_accepted: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<ScoreStats>,

    /// Quantized detected onsets (leading silence trimmed)
    pub actual_onsets: Vec<bool>,

    /// Synthesized model onsets
    pub model_onsets: Vec<bool>,

    /// Seconds per slot for both sequences
    pub sample_period: f64,
}

impl ScoreResult {
    /// Result for a performance that did not contain enough strikes
    pub fn rejected(actual_onsets: Vec<bool>, model_onsets: Vec<bool>, sample_period: f64) -> Self {
        ScoreResult {
            beat_accepted: false,
            stats: None,
            actual_onsets,
            model_onsets,
            sample_period,
        }
    }

    pub fn accepted(
        stats: ScoreStats,
        actual_onsets: Vec<bool>,
        model_onsets: Vec<bool>,
        sample_period: f64,
    ) -> Self {
        ScoreResult {
            beat_accepted: true,
            stats: Some(stats),
            actual_onsets,
            model_onsets,
            sample_period,
        }
    }

    /// Rating, if the performance was accepted
    pub fn score(&self) -> Option<u32> {
        self.stats.as_ref().map(|s| s.score)
    }

    /// Root-mean-square timing error in milliseconds
    pub fn rms_error_ms(&self) -> Option<f64> {
        self.stats
            .as_ref()
            .map(|s| s.mean_square_error.sqrt() * 1000.0)
    }

    /// One-line human-readable outcome
    pub fn summary(&self) -> String {
        match (&self.stats, self.rms_error_ms()) {
            (Some(stats), Some(rms_ms)) => format!(
                "Score {} ({} notes, RMS error {:.1}ms, step MSE {:.2})",
                stats.score,
                stats.note_differences.len(),
                rms_ms,
                stats.step_mean_square_error
            ),
            _ => "Not enough strikes detected - try again".to_string(),
        }
    }
}

/// Render an onset sequence as space-separated 1/0 digits
pub fn render_onsets(sequence: &[bool]) -> String {
    sequence
        .iter()
        .map(|&onset| if onset { "1" } else { "0" })
        .collect::<Vec<_>>()
        .join(" ")
}
