// Model onset synthesis - the ideal performance of a rhythm on the trace's time base
// One bar is rendered once and repeated verbatim for every bar

use super::spec::RhythmSpec;

/// Initial countdown; any value <= 0 makes the first note fire on slot 0
const FIRST_NOTE_COUNTDOWN_SECS: f64 = -0.1;

/// Render a single bar of the rhythm as boolean onset slots
///
/// Each note emits one `true` slot, then `false` slots while the countdown to the
/// next note stays positive. The countdown is decremented by `sample_period` per slot.
pub fn generate_bar(rhythm: &RhythmSpec, sample_period: f64) -> Vec<bool> {
    let mut bar = Vec::new();
    let mut time_to_next_note = FIRST_NOTE_COUNTDOWN_SECS;
    let mut notes = rhythm.note_durations.iter();
    let mut notes_remaining = rhythm.note_durations.len();

    while notes_remaining > 0 || time_to_next_note > 0.0 {
        if time_to_next_note <= 0.0 {
            match notes.next() {
                Some(&duration) => {
                    time_to_next_note = rhythm.note_secs(duration);
                    notes_remaining -= 1;
                    bar.push(true);
                }
                None => break,
            }
        } else {
            bar.push(false);
        }

        time_to_next_note -= sample_period;
    }

    bar
}

/// Render the full model sequence: one bar repeated `bar_count` times
pub fn generate_model_onsets(rhythm: &RhythmSpec, sample_period: f64) -> Vec<bool> {
    let bar = generate_bar(rhythm, sample_period);
    bar.repeat(rhythm.bar_count as usize)
}
