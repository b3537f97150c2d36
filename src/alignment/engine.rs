// Dual-cursor alignment engine
// Pairs the n-th detected strike with the n-th model note and measures the slot offset

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScoringError};

/// Which side, if any, owes a matching event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum SyncState {
    /// Both cursors advance together
    Synced,

    /// The model has produced a note; the performer is late
    AwaitingActual { gap: usize },

    /// The performer struck first; the model note is still ahead
    AwaitingModel { gap: usize },
}

/// Outcome of aligning the two sequences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alignment {
    /// False when the performance ran out of strikes before the rhythm ended
    pub beat_accepted: bool,

    /// Absolute slot offset per note; exactly `expected_note_count` entries when accepted
    pub note_differences: Vec<usize>,
}

impl Alignment {
    fn rejected(note_differences: Vec<usize>) -> Self {
        Alignment {
            beat_accepted: false,
            note_differences,
        }
    }
}

/// Read cursors and note counters for one side
#[derive(Debug, Default)]
struct Cursor {
    slot: usize,
    notes: usize,
}

impl Cursor {
    fn read(&self, sequence: &[bool]) -> bool {
        sequence.get(self.slot).copied().unwrap_or(false)
    }

    fn exhausted(&self, sequence: &[bool]) -> bool {
        self.slot > sequence.len()
    }
}

/// Align detected onsets against model onsets note-by-note
///
/// Algorithm:
/// 1. Read one slot from each side
/// 2. An event on a side that is owed closes the gap and records it;
///    an event while synced puts the other side in debt
/// 3. While one side owes an event only that side's cursor moves and the gap grows;
///    otherwise both cursors move
/// 4. Stop once both sides have produced `expected_note_count` notes
///
/// A consumed event also advances its own cursor, so the slot right after an
/// event is skipped while synced. A second event on the side that is already
/// ahead is a duplicate trigger: it is consumed without counting as a note.
///
/// Returns `beat_accepted = false` when the performer is owed a strike after the
/// detected sequence has run out.
pub fn align_onsets(
    actual: &[bool],
    model: &[bool],
    expected_note_count: usize,
) -> Result<Alignment> {
    let mut actual_cursor = Cursor::default();
    let mut model_cursor = Cursor::default();
    let mut state = SyncState::Synced;
    let mut note_differences = Vec::with_capacity(expected_note_count);

    while actual_cursor.notes < expected_note_count || model_cursor.notes < expected_note_count {
        match state {
            SyncState::AwaitingActual { .. } if actual_cursor.exhausted(actual) => {
                log::debug!(
                    "Performance ran out after {} of {} notes",
                    note_differences.len(),
                    expected_note_count
                );
                return Ok(Alignment::rejected(note_differences));
            }
            SyncState::AwaitingModel { .. } if model_cursor.exhausted(model) => {
                return Err(ScoringError::NoteCountMismatch {
                    expected: expected_note_count,
                    actual: note_differences.len(),
                });
            }
            SyncState::Synced
                if actual_cursor.slot >= actual.len() && model_cursor.slot >= model.len() =>
            {
                return Err(ScoringError::NoteCountMismatch {
                    expected: expected_note_count,
                    actual: note_differences.len(),
                });
            }
            _ => {}
        }

        let actual_event = actual_cursor.read(actual);
        let model_event = model_cursor.read(model);

        if actual_event {
            state = match state {
                SyncState::AwaitingActual { gap } => {
                    note_differences.push(gap);
                    actual_cursor.notes += 1;
                    SyncState::Synced
                }
                SyncState::Synced => {
                    actual_cursor.notes += 1;
                    SyncState::AwaitingModel { gap: 0 }
                }
                duplicate @ SyncState::AwaitingModel { .. } => duplicate,
            };
            actual_cursor.slot += 1;
        }

        if model_event {
            state = match state {
                SyncState::AwaitingModel { gap } => {
                    note_differences.push(gap);
                    model_cursor.notes += 1;
                    SyncState::Synced
                }
                SyncState::Synced => {
                    model_cursor.notes += 1;
                    SyncState::AwaitingActual { gap: 0 }
                }
                duplicate @ SyncState::AwaitingActual { .. } => duplicate,
            };
            model_cursor.slot += 1;
        }

        state = match state {
            SyncState::AwaitingActual { gap } => {
                actual_cursor.slot += 1;
                SyncState::AwaitingActual { gap: gap + 1 }
            }
            SyncState::AwaitingModel { gap } => {
                model_cursor.slot += 1;
                SyncState::AwaitingModel { gap: gap + 1 }
            }
            SyncState::Synced => {
                actual_cursor.slot += 1;
                model_cursor.slot += 1;
                SyncState::Synced
            }
        };
    }

    if note_differences.len() != expected_note_count {
        log::error!(
            "Alignment produced {} differences, expected {}",
            note_differences.len(),
            expected_note_count
        );
        return Err(ScoringError::NoteCountMismatch {
            expected: expected_note_count,
            actual: note_differences.len(),
        });
    }

    Ok(Alignment {
        beat_accepted: true,
        note_differences,
    })
}
