//! Real time [pitch](https://en.wikipedia.org/wiki/Pitch_%28music%29) tracking and
//! harmonic filtering for block based audio processing.
//!
//! For every incoming block, the dominant fundamental frequency of each channel is
//! estimated from the block's magnitude spectrum. A bank of allpass derived second order
//! sections is then tuned to that frequency and its harmonics and applied to the
//! time domain samples, emphasizing (or removing) the harmonic series of the detected pitch.
//! Only a single pitch per channel is tracked, so this cannot be used to separate
//! the notes of a chord.
//!
//! Features
//! * No allocations after configuration, suitable for real time audio use.
//! * Global peak or local maxima fundamental estimation.
//! * Single band or comb (one section per harmonic) filtering.
//! * Per channel, shared or divided (one voice per stereo channel) pitch tracking.
//!
//! # Examples
//!
//! ```
//! use harmonic_divider::{Options, Processor};
//!
//! // A 220 Hz tone in both channels of a stereo block.
//! let sample_rate = 44100.0;
//! let frame_count = 1024;
//! let tone: Vec<f32> = (0..frame_count)
//!     .map(|i| 0.5 * (2.0 * std::f32::consts::PI * 220.0 * (i as f32) / sample_rate).sin())
//!     .collect();
//! let mut left = tone.clone();
//! let mut right = tone.clone();
//!
//! let mut processor = Processor::new();
//! processor
//!     .configure(sample_rate, frame_count, Options::default().with_harmonic_count(3))
//!     .unwrap();
//!
//! processor
//!     .process_block(&mut [&mut left[..], &mut right[..]], frame_count)
//!     .unwrap();
//!
//! // The estimate is accurate to within one FFT bin.
//! let bin_width = sample_rate / 1024.0;
//! assert!((processor.fundamental(0) - 220.0).abs() <= bin_width);
//! ```

pub mod common;
mod error;
pub mod filter;
pub mod pitch;
pub mod processor;
pub mod spectrum;

pub use common::WindowFunction;
pub use error::{Error, Result};
pub use filter::{BiquadCoefs, CombScale, HarmonicFilterBank, Resonance, Response};
pub use pitch::{Estimator, EstimatorStrategy, FundamentalEstimate};
pub use processor::{ExtraChannels, Options, PitchTracking, Processor};
pub use spectrum::{SpectralAnalyzer, Spectrum};
