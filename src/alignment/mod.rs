// Alignment of detected strikes against the model onset train

pub mod engine;

pub use engine::{align_onsets, Alignment, SyncState};
