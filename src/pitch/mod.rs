//! Fundamental frequency estimation from a magnitude spectrum.
//!
//! Two strategies are available:
//! * [`EstimatorStrategy::GlobalPeak`] picks the non-DC bin with the largest magnitude.
//! * [`EstimatorStrategy::LocalMaxima`] picks the lowest bin that is larger than both
//!   its neighbors and the magnitude threshold.
//!
//! The resolution is one FFT bin, i.e `sample_rate / transform_size` Hz. A block
//! without a usable peak yields the unvoiced estimate, with a frequency of 0.
//!
//! ```
//! use harmonic_divider::common::WindowFunction;
//! use harmonic_divider::{Estimator, EstimatorStrategy, SpectralAnalyzer};
//!
//! let sample_rate = 44100.0;
//! let mut analyzer = SpectralAnalyzer::new(1024, sample_rate, WindowFunction::Hann).unwrap();
//! let estimator = Estimator::new(EstimatorStrategy::LocalMaxima, 5.0);
//!
//! let tone: Vec<f32> = (0..1024)
//!     .map(|i| 0.5 * (2.0 * std::f32::consts::PI * 440.0 * (i as f32) / sample_rate).sin())
//!     .collect();
//! let estimate = estimator.estimate(analyzer.analyze(&tone), 50.0);
//! assert!(estimate.is_voiced());
//! assert!((estimate.frequency - 440.0).abs() <= sample_rate / 1024.0);
//!
//! let estimate = estimator.estimate(analyzer.analyze(&[0.0; 1024]), 50.0);
//! assert!(!estimate.is_voiced());
//! assert_eq!(estimate.frequency, 0.0);
//! ```

mod estimate;
mod estimator;

pub use estimate::FundamentalEstimate;
pub use estimator::{Estimator, EstimatorStrategy, DEFAULT_MAGNITUDE_THRESHOLD};
