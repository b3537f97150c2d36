// Rhythm specification and reference onset synthesis
// Describes what the performer should play and renders it on the trace's time base

pub mod model;
pub mod spec;

pub use model::{generate_model_onsets, generate_bar};
pub use spec::RhythmSpec;
