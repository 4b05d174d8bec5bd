//! Harmonic filtering with allpass derived second order sections.
//!
//! A [`HarmonicFilterBank`] holds one [`Biquad`] allpass section per channel and harmonic.
//! Each block, the sections of a channel are retuned to the harmonics of the channel's
//! estimated fundamental and applied to its samples, either in parallel as a comb of
//! bandpass filters ([`Response::Bandpass`]) or in cascade as notch filters
//! ([`Response::Notch`]).
//!
//! ```
//! use harmonic_divider::{CombScale, HarmonicFilterBank, Resonance, Response};
//!
//! let sample_rate = 44100.0;
//! let mut bank = HarmonicFilterBank::new(1, 3, sample_rate, Response::Bandpass, CombScale::default()).unwrap();
//!
//! bank.retune(0, 220.0, 3, Resonance::Bandwidth(100.0));
//! let centers: Vec<f32> = bank.center_frequencies(0).collect();
//! assert_eq!(centers, vec![220.0, 440.0, 660.0]);
//!
//! let mut samples = vec![0.0; 512];
//! samples[0] = 1.0;
//! bank.apply(0, &mut samples);
//! assert!(samples.iter().all(|s| s.is_finite()));
//! ```

mod bank;
mod biquad;

pub use bank::{CombScale, HarmonicFilterBank, Resonance, Response, DEFAULT_BANDWIDTH};
pub use biquad::{Biquad, BiquadCoefs};
