// Beatscore - Rhythmic accuracy scoring for percussive performances
// Module declarations

pub mod alignment;
pub mod error;
pub mod onsets;
pub mod pipeline;
pub mod rhythm;
pub mod scoring;

pub use alignment::{align_onsets, Alignment, SyncState};
pub use error::{Result, ScoringError};
pub use onsets::{quantize_onsets, OnsetTrace};
pub use pipeline::{score_performance, BeatScorer, TraceWriter};
pub use rhythm::{generate_model_onsets, RhythmSpec};
pub use scoring::{score_differences, ScoreMapping, ScoreResult, ScoreStats, ScoringConfig};
