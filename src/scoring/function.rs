// Scoring function - per-note offsets to error statistics and a rating

use super::config::ScoreMapping;
use super::result::ScoreStats;
use crate::error::{Result, ScoringError};

/// Compute timing-error statistics for an accepted alignment
///
/// Algorithm:
/// 1. Skip the first note (the sync anchor, always 0)
/// 2. Forgive `leniency` slots of every remaining offset
/// 3. Accumulate squared error in slots and in seconds
/// 4. Average over the scored notes and map the mean through `mapping`
pub fn score_differences(
    differences: &[usize],
    sample_period: f64,
    leniency: usize,
    mapping: &ScoreMapping,
) -> Result<ScoreStats> {
    if differences.len() < 2 {
        return Err(ScoringError::invalid_input(
            "differences",
            differences.len(),
            "at least two notes are needed to score timing",
        ));
    }

    let mut step_square_error: u64 = 0;
    let mut square_error = 0.0;

    for &difference in &differences[1..] {
        let lenient = difference.saturating_sub(leniency) as u64;
        step_square_error += lenient * lenient;

        let time_difference = lenient as f64 * sample_period;
        square_error += time_difference * time_difference;
    }

    let scored_notes = (differences.len() - 1) as f64;
    let mean_square_error = square_error / scored_notes;
    let step_mean_square_error = step_square_error as f64 / scored_notes;

    let score = map_score(mapping, mean_square_error, step_mean_square_error);

    Ok(ScoreStats {
        square_error,
        mean_square_error,
        step_square_error,
        step_mean_square_error,
        score,
        note_differences: differences.to_vec(),
    })
}

/// Map error statistics to a score under the given policy
fn map_score(mapping: &ScoreMapping, mean_square_error: f64, step_mean_square_error: f64) -> u32 {
    match mapping {
        ScoreMapping::Buckets { thresholds } => thresholds
            .iter()
            .position(|&threshold| mean_square_error >= threshold)
            .map(|index| index as u32 + 1)
            .unwrap_or(thresholds.len() as u32),
        ScoreMapping::Linear => (100.0 - step_mean_square_error.floor()).max(0.0) as u32,
    }
}
