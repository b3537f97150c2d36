// Scoring pipeline
// Runs quantization, model synthesis, alignment, and scoring for one performance

pub mod scorer;
pub mod trace;

pub use scorer::{score_performance, BeatScorer};
pub use trace::{read_trace_file, ScoreStage, TraceBuilder, TraceEntry, TraceError, TraceWriter};
