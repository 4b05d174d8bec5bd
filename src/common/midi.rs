use micromath::F32Ext;

/// Converts a frequency in Hz to a [MIDI](https://en.wikipedia.org/wiki/MIDI) note number
/// (with a fractional part). Returns `None` for frequencies that are not positive and finite,
/// such as the unvoiced sentinel.
pub fn freq_to_midi_note(freq: f32) -> Option<f32> {
    if !(freq > 0.0) || !freq.is_finite() {
        return None;
    }
    // 69 + 12 * log2(f / 440)
    Some(12.0 * F32Ext::log2(freq) - 36.376316562295926)
}
