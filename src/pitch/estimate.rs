use crate::common::freq_to_midi_note;
use crate::spectrum::Spectrum;

/// A fundamental frequency estimate for one channel and block.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FundamentalEstimate {
    /// The estimated fundamental frequency in Hz, or 0 if unvoiced.
    pub frequency: f32,
    /// The spectrum bin the estimate was taken from. 0 if unvoiced.
    pub bin: usize,
    /// The magnitude of `bin`.
    pub magnitude: f32,
    /// The [MIDI note number](https://newt.phys.unsw.edu.au/jw/notes.html) of `frequency`.
    /// `None` if unvoiced.
    pub note_number: Option<f32>,
}

impl FundamentalEstimate {
    /// No usable pitch was found.
    pub const UNVOICED: FundamentalEstimate = FundamentalEstimate {
        frequency: 0.0,
        bin: 0,
        magnitude: 0.0,
        note_number: None,
    };

    pub(crate) fn from_bin(spectrum: &Spectrum, bin: usize) -> Self {
        let frequency = spectrum.bin_frequency(bin);
        FundamentalEstimate {
            frequency,
            bin,
            magnitude: spectrum.magnitudes()[bin],
            note_number: freq_to_midi_note(frequency),
        }
    }

    pub fn is_voiced(&self) -> bool {
        self.frequency > 0.0
    }
}

impl Default for FundamentalEstimate {
    fn default() -> Self {
        FundamentalEstimate::UNVOICED
    }
}
