//! Magnitude spectrum analysis of fixed size blocks.
//!
//! A [`SpectralAnalyzer`] windows the first `transform_size` samples of a block,
//! zero padding if the block is shorter, and computes the magnitude of each
//! real FFT bin below Nyquist. All buffers are allocated on construction.
//!
//! ```
//! use harmonic_divider::common::WindowFunction;
//! use harmonic_divider::SpectralAnalyzer;
//!
//! let sample_rate = 44100.0;
//! let mut analyzer = SpectralAnalyzer::new(1024, sample_rate, WindowFunction::Hann).unwrap();
//! let block: Vec<f32> = (0..1024)
//!     .map(|i| (2.0 * std::f32::consts::PI * 1000.0 * (i as f32) / sample_rate).sin())
//!     .collect();
//! let spectrum = analyzer.analyze(&block);
//! assert_eq!(spectrum.len(), 512);
//! assert!((spectrum.bin_frequency(23) - 990.5).abs() < 0.1);
//! ```

mod analyzer;
mod frame;

pub use analyzer::SpectralAnalyzer;
pub(crate) use analyzer::{validate_sample_rate, validate_transform_size};
pub use frame::Spectrum;
