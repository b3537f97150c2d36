// Timing-error scoring
// Turns per-note offsets into error statistics and a bounded rating

pub mod config;
pub mod function;
pub mod result;

pub use config::{ConfigError, ScoreMapping, ScoringConfig};
pub use function::score_differences;
pub use result::{render_onsets, ScoreResult, ScoreStats};
