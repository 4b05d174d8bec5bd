use crate::common::WindowFunction;
use crate::error::{Error, Result};
use crate::filter::{CombScale, Resonance, Response};
use crate::pitch::EstimatorStrategy;
use crate::spectrum::{validate_sample_rate, validate_transform_size};

/// Which signal the fundamental of each channel is estimated from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PitchTracking {
    /// Every channel is analyzed on its own.
    PerChannel,
    /// The mono mix of the channels is analyzed once and the estimate is shared by all channels.
    Shared,
    /// The mono mix is analyzed once. The first pitch candidate drives the first channel
    /// and the second candidate drives the second channel, splitting two voices
    /// over a stereo pair.
    Divided,
}

impl Default for PitchTracking {
    fn default() -> Self {
        PitchTracking::PerChannel
    }
}

/// What happens to channels beyond the two that are processed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExtraChannels {
    PassThrough,
    Silence,
}

impl Default for ExtraChannels {
    fn default() -> Self {
        ExtraChannels::PassThrough
    }
}

/// Processing options, fixed between calls to [`Processor::configure`](crate::Processor::configure).
#[derive(Clone, Debug, PartialEq)]
pub struct Options {
    /// The FFT size used for pitch estimation. A power of two, at most the maximum block size.
    pub transform_size: usize,
    /// The number of harmonics to filter, including the fundamental. 1 gives a single band.
    pub harmonic_count: usize,
    /// Estimates at or below this frequency in Hz are considered unvoiced.
    pub min_frequency: f32,
    /// The width of each harmonic section.
    pub resonance: Resonance,
    pub pitch_tracking: PitchTracking,
    pub estimator: EstimatorStrategy,
    /// The magnitude a spectral peak must exceed to be a pitch candidate.
    pub magnitude_threshold: f32,
    pub response: Response,
    pub comb_scale: CombScale,
    /// The window applied before the FFT.
    pub window: WindowFunction,
    pub extra_channels: ExtraChannels,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            transform_size: 1024,
            harmonic_count: 20,
            min_frequency: 50.0,
            resonance: Resonance::default(),
            pitch_tracking: PitchTracking::default(),
            estimator: EstimatorStrategy::default(),
            magnitude_threshold: crate::pitch::DEFAULT_MAGNITUDE_THRESHOLD,
            response: Response::default(),
            comb_scale: CombScale::default(),
            window: WindowFunction::default(),
            extra_channels: ExtraChannels::default(),
        }
    }
}

impl Options {
    pub fn with_transform_size(mut self, transform_size: usize) -> Self {
        self.transform_size = transform_size;
        self
    }

    pub fn with_harmonic_count(mut self, harmonic_count: usize) -> Self {
        self.harmonic_count = harmonic_count;
        self
    }

    pub fn with_min_frequency(mut self, min_frequency: f32) -> Self {
        self.min_frequency = min_frequency;
        self
    }

    pub fn with_resonance(mut self, resonance: Resonance) -> Self {
        self.resonance = resonance;
        self
    }

    pub fn with_pitch_tracking(mut self, pitch_tracking: PitchTracking) -> Self {
        self.pitch_tracking = pitch_tracking;
        self
    }

    /// `true` analyzes every channel on its own, `false` shares one estimate
    /// computed from the mono mix.
    pub fn with_per_channel_pitch(self, per_channel_pitch: bool) -> Self {
        self.with_pitch_tracking(if per_channel_pitch {
            PitchTracking::PerChannel
        } else {
            PitchTracking::Shared
        })
    }

    pub fn with_estimator(mut self, estimator: EstimatorStrategy) -> Self {
        self.estimator = estimator;
        self
    }

    pub fn with_magnitude_threshold(mut self, magnitude_threshold: f32) -> Self {
        self.magnitude_threshold = magnitude_threshold;
        self
    }

    pub fn with_response(mut self, response: Response) -> Self {
        self.response = response;
        self
    }

    pub fn with_comb_scale(mut self, comb_scale: CombScale) -> Self {
        self.comb_scale = comb_scale;
        self
    }

    pub fn with_window(mut self, window: WindowFunction) -> Self {
        self.window = window;
        self
    }

    pub fn with_extra_channels(mut self, extra_channels: ExtraChannels) -> Self {
        self.extra_channels = extra_channels;
        self
    }

    /// Checks the options against a sample rate and maximum block size.
    pub fn validate(&self, sample_rate: f32, max_block_size: usize) -> Result<()> {
        validate_sample_rate(sample_rate)?;
        if max_block_size == 0 {
            return Err(Error::InvalidBlockSize);
        }
        validate_transform_size(self.transform_size)?;
        if self.transform_size > max_block_size {
            return Err(Error::TransformSizeExceedsBlockSize {
                transform_size: self.transform_size,
                max_block_size,
            });
        }
        if self.harmonic_count == 0 {
            return Err(Error::InvalidHarmonicCount);
        }
        let min_frequency = self.min_frequency;
        if !min_frequency.is_finite() || min_frequency < 0.0 || min_frequency >= 0.5 * sample_rate {
            return Err(Error::InvalidMinFrequency(min_frequency));
        }
        self.resonance.validate(sample_rate)?;
        if !self.magnitude_threshold.is_finite() || self.magnitude_threshold < 0.0 {
            return Err(Error::InvalidMagnitudeThreshold(self.magnitude_threshold));
        }
        self.comb_scale.validate()
    }
}
