//! Common algorithms and utilities.

mod fft;
mod midi;
mod window_function;

pub use fft::{is_supported_fft_size, real_fft, MAX_FFT_SIZE, MIN_FFT_SIZE};
pub use midi::freq_to_midi_note;
pub use window_function::{apply_window, WindowFunction};
