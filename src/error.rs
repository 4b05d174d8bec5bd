use thiserror::Error;

/// All errors produced by the processor and its components.
///
/// Configuration errors are reported by `configure` and the component constructors.
/// Block errors are reported by `process_block` before any sample is touched.
/// Numerical degeneracies during processing (silence, harmonics above Nyquist,
/// unusable filter designs) are not errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("sample rate must be finite and positive, got {0}")]
    InvalidSampleRate(f32),

    #[error("transform size must be a power of two between {min} and {max}, got {size}")]
    InvalidTransformSize { size: usize, min: usize, max: usize },

    #[error("transform size {transform_size} exceeds the maximum block size {max_block_size}")]
    TransformSizeExceedsBlockSize {
        transform_size: usize,
        max_block_size: usize,
    },

    #[error("maximum block size must be greater than 0")]
    InvalidBlockSize,

    #[error("harmonic count must be greater than 0")]
    InvalidHarmonicCount,

    #[error("minimum frequency must be finite, non-negative and below Nyquist, got {0} Hz")]
    InvalidMinFrequency(f32),

    #[error("resonance must be a finite positive bandwidth below Nyquist or a finite positive Q, got {0}")]
    InvalidResonance(f32),

    #[error("magnitude threshold must be finite and non-negative, got {0}")]
    InvalidMagnitudeThreshold(f32),

    #[error("comb scale must be finite, got {0}")]
    InvalidCombScale(f32),

    #[error("processor is not configured")]
    NotConfigured,

    #[error("block of {frame_count} frames exceeds the maximum block size {max_block_size}")]
    BlockTooLarge {
        frame_count: usize,
        max_block_size: usize,
    },

    #[error("channel {channel} holds {len} samples, expected at least {frame_count}")]
    ChannelTooShort {
        channel: usize,
        len: usize,
        frame_count: usize,
    },
}

pub type Result<T> = core::result::Result<T, Error>;
