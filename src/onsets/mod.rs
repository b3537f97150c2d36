// Onset event handling
// Turns the front end's onset-strength trace into discrete strike events

pub mod quantize;
pub mod types;

pub use quantize::{quantize_onsets, count_onsets};
pub use types::OnsetTrace;
