// Beat scorer - end-to-end scoring of one performance against a rhythm

use serde_json::json;

use crate::alignment::align_onsets;
use crate::error::Result;
use crate::onsets::{count_onsets, quantize_onsets, OnsetTrace};
use crate::rhythm::{generate_model_onsets, RhythmSpec};
use crate::scoring::{render_onsets, score_differences, ScoreResult, ScoringConfig};

use super::trace::{ScoreStage, TraceBuilder, TraceEntry, TraceWriter};

/// Scores performances with a fixed configuration
///
/// Stateless between calls; one scorer can serve any number of performances.
#[derive(Debug, Clone, Default)]
pub struct BeatScorer {
    config: ScoringConfig,
    trace: Option<TraceWriter>,
}

impl BeatScorer {
    /// Create a scorer, rejecting invalid configuration up front
    pub fn new(config: ScoringConfig) -> Result<Self> {
        config.validate()?;
        Ok(BeatScorer {
            config,
            trace: None,
        })
    }

    /// Record every stage to a JSONL trace file
    pub fn with_trace(mut self, writer: TraceWriter) -> Self {
        self.trace = Some(writer);
        self
    }

    /// Score a performance
    ///
    /// Returns `Ok` with `beat_accepted = false` when too few strikes were detected.
    /// Errors are reserved for invalid input and engine contract violations.
    pub fn score(&self, onsets: &OnsetTrace, rhythm: &RhythmSpec) -> Result<ScoreResult> {
        onsets.validate()?;
        rhythm.validate(onsets.sample_period)?;

        let sample_period = onsets.sample_period;
        let expected_notes = rhythm.expected_note_count();

        let actual_onsets = quantize_onsets(
            &onsets.strengths,
            self.config.threshold,
            self.config.cooldown_steps,
        );
        let detected = count_onsets(&actual_onsets);
        log::debug!(
            "Quantized {} slots into {} slots with {} onsets",
            onsets.len(),
            actual_onsets.len(),
            detected
        );
        self.record(TraceBuilder::stage(ScoreStage::Quantize).with_data(
            format!("Detected {} onsets", detected),
            json!({
                "trace_slots": onsets.len(),
                "trace_secs": onsets.duration_secs(),
                "trimmed_slots": onsets.len() - actual_onsets.len(),
                "onsets": detected,
            }),
        ));

        let model_onsets = generate_model_onsets(rhythm, sample_period);
        log::debug!(
            "Model for {} BPM x {} bars spans {} slots",
            rhythm.bpm,
            rhythm.bar_count,
            model_onsets.len()
        );
        self.record(TraceBuilder::stage(ScoreStage::Model).with_data(
            format!("Generated {} model notes", expected_notes),
            json!({
                "model_slots": model_onsets.len(),
                "bar_secs": rhythm.bar_secs(),
                "expected_notes": expected_notes,
            }),
        ));

        let alignment = align_onsets(&actual_onsets, &model_onsets, expected_notes)?;
        self.record(TraceBuilder::stage(ScoreStage::Align).with_data(
            format!(
                "Matched {} of {} notes",
                alignment.note_differences.len(),
                expected_notes
            ),
            json!({
                "beat_accepted": alignment.beat_accepted,
                "note_differences": alignment.note_differences,
            }),
        ));

        if !alignment.beat_accepted {
            log::warn!(
                "Beat rejected: {} onsets detected, {} notes expected",
                detected,
                expected_notes
            );
            self.record(TraceBuilder::stage(ScoreStage::Score).message("Beat rejected, not scored"));
            return Ok(ScoreResult::rejected(actual_onsets, model_onsets, sample_period));
        }

        log::debug!("Note differences: {:?}", alignment.note_differences);
        log::debug!("Actual onsets: {}", render_onsets(&actual_onsets));
        log::debug!("Model onsets:  {}", render_onsets(&model_onsets));

        let stats = score_differences(
            &alignment.note_differences,
            sample_period,
            self.config.leniency,
            &self.config.mapping,
        )?;
        let result = ScoreResult::accepted(stats, actual_onsets, model_onsets, sample_period);
        self.record(TraceBuilder::stage(ScoreStage::Score).with_data(
            format!("Score {}", result.score().unwrap_or_default()),
            json!({
                "rms_error_ms": result.rms_error_ms(),
                "stats": result.stats,
            }),
        ));
        log::info!("Beat accepted: {}", result.summary());

        Ok(result)
    }

    fn record(&self, entry: TraceEntry) {
        if let Some(ref writer) = self.trace {
            if let Err(e) = writer.write(&entry) {
                log::warn!("Failed to write trace to {}: {}", writer.path().display(), e);
            }
        }
    }
}

/// Score a performance with a one-off configuration
pub fn score_performance(
    onsets: &OnsetTrace,
    rhythm: &RhythmSpec,
    config: &ScoringConfig,
) -> Result<ScoreResult> {
    BeatScorer::new(config.clone())?.score(onsets, rhythm)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScoringError;
    use crate::pipeline::read_trace_file;
    use crate::scoring::ScoreMapping;
    use tempfile::TempDir;

    const HOP_PERIOD: f64 = 512.0 / 44100.0;

    fn scenario_rhythm() -> RhythmSpec {
        RhythmSpec::new(130, 2, vec![4, 4, 4, 4, 4, 4, 4, 4])
    }

    /// Strength trace that quantizes to exactly `sequence` after `silence` quiet slots
    fn strengths_for(sequence: &[bool], silence: usize) -> Vec<f32> {
        let mut strengths = vec![0.0; silence];
        strengths.extend(sequence.iter().map(|&onset| if onset { 0.9 } else { 0.0 }));
        strengths
    }

    fn onset_slots(sequence: &[bool]) -> Vec<usize> {
        sequence
            .iter()
            .enumerate()
            .filter(|&(_, &onset)| onset)
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn test_exact_performance_gets_best_score() {
        let rhythm = scenario_rhythm();
        let model = generate_model_onsets(&rhythm, HOP_PERIOD);
        let trace = OnsetTrace::new(strengths_for(&model, 25), HOP_PERIOD);

        let result = score_performance(&trace, &rhythm, &ScoringConfig::default()).unwrap();

        assert!(result.beat_accepted);
        assert_eq!(result.actual_onsets, model);
        let stats = result.stats.unwrap();
        assert_eq!(stats.note_differences, vec![0; 16]);
        assert_eq!(stats.mean_square_error, 0.0);
        assert_eq!(stats.score, 5);
    }

    #[test]
    fn test_three_strikes_rejected() {
        let rhythm = scenario_rhythm();
        let mut strengths = vec![0.0; 640];
        for slot in [0, 40, 80] {
            strengths[slot] = 0.9;
        }
        let trace = OnsetTrace::new(strengths, HOP_PERIOD);

        let result = score_performance(&trace, &rhythm, &ScoringConfig::default()).unwrap();

        assert!(!result.beat_accepted);
        assert!(result.stats.is_none());
        assert_eq!(count_onsets(&result.actual_onsets), 3);
        assert_eq!(count_onsets(&result.model_onsets), 16);
    }

    #[test]
    fn test_silent_recording_rejected() {
        let trace = OnsetTrace::new(vec![0.01; 700], HOP_PERIOD);
        let result = score_performance(&trace, &scenario_rhythm(), &ScoringConfig::default())
            .unwrap();

        assert!(!result.beat_accepted);
        assert!(result.actual_onsets.is_empty());
    }

    #[test]
    fn test_late_note_beyond_leniency() {
        let rhythm = scenario_rhythm();
        let config = ScoringConfig::default();
        let model = generate_model_onsets(&rhythm, HOP_PERIOD);
        let fourth_note = onset_slots(&model)[3];

        // Performer comes in leniency + 5 slots late on the fourth note and stays there
        let mut performed = model[..fourth_note].to_vec();
        performed.extend(vec![false; config.leniency + 5]);
        performed.extend_from_slice(&model[fourth_note..]);
        let trace = OnsetTrace::new(strengths_for(&performed, 0), HOP_PERIOD);

        let result = score_performance(&trace, &rhythm, &config).unwrap();
        let stats = result.stats.unwrap();

        assert_eq!(stats.note_differences[3], config.leniency + 5);
        assert_eq!(stats.step_square_error, 25);
        let expected = (5.0 * HOP_PERIOD) * (5.0 * HOP_PERIOD);
        assert!((stats.square_error - expected).abs() < 1e-12);
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let rhythm = RhythmSpec::new(100, 2, vec![4, 8, 8, 4, 4]);
        let model = generate_model_onsets(&rhythm, HOP_PERIOD);
        let mut performed = model.clone();
        performed.insert(30, false);
        performed.insert(90, false);
        let trace = OnsetTrace::new(strengths_for(&performed, 3), HOP_PERIOD);
        let scorer = BeatScorer::new(ScoringConfig::default()).unwrap();

        let first = scorer.score(&trace, &rhythm).unwrap();
        let second = scorer.score(&trace, &rhythm).unwrap();

        assert!(first.beat_accepted);
        assert_eq!(first, second);
    }

    #[test]
    fn test_linear_mapping_end_to_end() {
        let rhythm = scenario_rhythm();
        let model = generate_model_onsets(&rhythm, HOP_PERIOD);
        let trace = OnsetTrace::new(strengths_for(&model, 0), HOP_PERIOD);
        let config = ScoringConfig {
            mapping: ScoreMapping::Linear,
            ..ScoringConfig::default()
        };

        let result = score_performance(&trace, &rhythm, &config).unwrap();
        assert_eq!(result.score(), Some(100));
    }

    #[test]
    fn test_invalid_rhythm_rejected_before_scoring() {
        let trace = OnsetTrace::new(vec![0.9, 0.0, 0.0], HOP_PERIOD);
        let rhythm = RhythmSpec::new(130, 1, vec![4]);

        let err = score_performance(&trace, &rhythm, &ScoringConfig::default()).unwrap_err();
        assert!(matches!(err, ScoringError::InvalidInput { .. }));
        assert!(!err.is_internal());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ScoringConfig {
            threshold: -1.0,
            ..ScoringConfig::default()
        };
        assert!(matches!(
            BeatScorer::new(config),
            Err(ScoringError::Config(_))
        ));
    }

    #[test]
    fn test_trace_records_every_stage() {
        let temp_dir = TempDir::new().unwrap();
        let trace_path = temp_dir.path().join("score.jsonl");
        let rhythm = scenario_rhythm();
        let model = generate_model_onsets(&rhythm, HOP_PERIOD);
        let trace = OnsetTrace::new(strengths_for(&model, 10), HOP_PERIOD);

        let scorer = BeatScorer::new(ScoringConfig::default())
            .unwrap()
            .with_trace(TraceWriter::new(trace_path.clone()));
        scorer.score(&trace, &rhythm).unwrap();

        let entries = read_trace_file(&trace_path).unwrap();
        let stages: Vec<ScoreStage> = entries.iter().map(|e| e.stage).collect();
        assert_eq!(
            stages,
            vec![
                ScoreStage::Quantize,
                ScoreStage::Model,
                ScoreStage::Align,
                ScoreStage::Score
            ]
        );
        assert_eq!(entries[0].data.as_ref().unwrap()["trimmed_slots"], 10);
        assert_eq!(entries[0].data.as_ref().unwrap()["trace_secs"], trace.duration_secs());
        assert_eq!(entries[1].data.as_ref().unwrap()["bar_secs"], rhythm.bar_secs());
        assert_eq!(entries[3].data.as_ref().unwrap()["rms_error_ms"], 0.0);
        assert_eq!(entries[3].data.as_ref().unwrap()["stats"]["score"], 5);
    }

    #[test]
    fn test_rejected_trace_skips_statistics() {
        let temp_dir = TempDir::new().unwrap();
        let trace_path = temp_dir.path().join("score.jsonl");
        let trace = OnsetTrace::new(vec![0.9, 0.0, 0.0, 0.0], HOP_PERIOD);

        let scorer = BeatScorer::default().with_trace(TraceWriter::new(trace_path.clone()));
        let result = scorer.score(&trace, &scenario_rhythm()).unwrap();

        assert!(!result.beat_accepted);
        let entries = read_trace_file(&trace_path).unwrap();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[2].data.as_ref().unwrap()["beat_accepted"], false);
        assert_eq!(entries[3].stage, ScoreStage::Score);
        assert!(entries[3].data.is_none());
    }
}
