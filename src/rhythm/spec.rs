// Rhythm specification - tempo, bar count, and note values of one bar

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScoringError};

/// A rhythm pattern to be performed at a fixed tempo
///
/// Accepts both snake_case keys and the pattern-library keys
/// (`Base_BPM`, `No_Bars`, `Musical_notes`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RhythmSpec {
    /// Quarter notes per minute
    #[serde(alias = "Base_BPM", alias = "base_bpm")]
    pub bpm: u32,

    /// How many times the bar is repeated
    #[serde(alias = "No_Bars", alias = "no_bars")]
    pub bar_count: u32,

    /// Note values of one bar as denominators (4 = quarter, 8 = eighth, 16 = sixteenth)
    #[serde(alias = "Musical_notes", alias = "musical_notes")]
    pub note_durations: Vec<u32>,
}

impl RhythmSpec {
    pub fn new(bpm: u32, bar_count: u32, note_durations: Vec<u32>) -> Self {
        RhythmSpec {
            bpm,
            bar_count,
            note_durations,
        }
    }

    /// Total number of notes across all bars
    pub fn expected_note_count(&self) -> usize {
        self.bar_count as usize * self.note_durations.len()
    }

    /// Length of a quarter note in seconds
    pub fn quarter_note_secs(&self) -> f64 {
        60.0 / self.bpm as f64
    }

    /// Length of a note with the given denominator in seconds
    pub fn note_secs(&self, duration: u32) -> f64 {
        self.quarter_note_secs() * (4.0 / duration as f64)
    }

    /// Length of one bar in seconds
    pub fn bar_secs(&self) -> f64 {
        self.note_durations.iter().map(|&d| self.note_secs(d)).sum()
    }

    /// Check that the rhythm can be rendered and scored at the given sample period
    pub fn validate(&self, sample_period: f64) -> Result<()> {
        if self.bpm == 0 {
            return Err(ScoringError::invalid_input("bpm", self.bpm, "must be positive"));
        }

        if self.bar_count == 0 {
            return Err(ScoringError::invalid_input(
                "bar_count",
                self.bar_count,
                "must be positive",
            ));
        }

        if self.note_durations.is_empty() {
            return Err(ScoringError::invalid_input(
                "note_durations",
                "[]",
                "a bar needs at least one note",
            ));
        }

        if let Some(&bad) = self.note_durations.iter().find(|d| !d.is_power_of_two()) {
            return Err(ScoringError::invalid_input(
                "note_durations",
                bad,
                "note values must be powers of two (1, 2, 4, 8, 16, ...)",
            ));
        }

        // The first note is the sync anchor and is excluded from the mean
        if self.expected_note_count() < 2 {
            return Err(ScoringError::invalid_input(
                "note_durations",
                format!("{} note(s)", self.expected_note_count()),
                "at least two notes are needed to score timing",
            ));
        }

        // Shortest note has the largest denominator
        if let Some(&shortest) = self.note_durations.iter().max() {
            let shortest_secs = self.note_secs(shortest);
            if shortest_secs <= sample_period {
                return Err(ScoringError::invalid_input(
                    "note_durations",
                    shortest,
                    format!(
                        "note of {:.4}s does not span more than one sample period ({:.4}s)",
                        shortest_secs, sample_period
                    ),
                ));
            }
        }

        Ok(())
    }

    /// Deserialize from JSON bytes (pattern-library entry or snake_case form)
    pub fn from_json_bytes(data: &[u8]) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_slice(data)
    }
}
