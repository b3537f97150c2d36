// Onset quantization - threshold, refractory debounce, and leading-silence trim
// Produces the "actual" boolean event sequence fed to the aligner

/// Convert an onset-strength trace into boolean onset events
///
/// Algorithm:
/// 1. A slot is a raw onset when its strength exceeds `threshold`
/// 2. Slots before the first raw onset are dropped so the sequence starts on the first strike
/// 3. A raw onset fires only when no cooldown is active; every raw onset (fired or not)
///    re-arms the cooldown, suppressing the following `cooldown_steps` slots
pub fn quantize_onsets(strengths: &[f32], threshold: f32, cooldown_steps: usize) -> Vec<bool> {
    let mut quantized = Vec::with_capacity(strengths.len());
    let mut quiet_beginning = true;
    let mut cooldown = 0usize;

    for &strength in strengths {
        let raw_onset = strength > threshold;

        if raw_onset {
            quiet_beginning = false;
        } else if quiet_beginning {
            continue;
        }

        if raw_onset {
            quantized.push(cooldown == 0);
            // +1 because the decrement below runs on this same slot
            cooldown = cooldown_steps + 1;
        } else {
            quantized.push(false);
        }

        cooldown = cooldown.saturating_sub(1);
    }

    quantized
}

/// Number of `true` events in a sequence
pub fn count_onsets(sequence: &[bool]) -> usize {
    sequence.iter().filter(|&&onset| onset).count()
}
