//! Block processing: pitch estimation followed by harmonic filtering, per channel.
//!
//! ```
//! use harmonic_divider::{Error, Options, PitchTracking, Processor, Response};
//!
//! let sample_rate = 48000.0;
//! let max_block_size = 512;
//! let options = Options::default()
//!     .with_transform_size(512)
//!     .with_harmonic_count(8)
//!     .with_response(Response::Notch)
//!     .with_pitch_tracking(PitchTracking::Shared);
//!
//! let mut processor = Processor::new();
//! assert_eq!(processor.process_block(&mut [], 0), Err(Error::NotConfigured));
//!
//! processor.configure(sample_rate, max_block_size, options).unwrap();
//! let mut left = vec![0.0; max_block_size];
//! let mut right = vec![0.0; max_block_size];
//! processor.process_block(&mut [&mut left[..], &mut right[..]], max_block_size).unwrap();
//!
//! // Silence has no pitch.
//! assert_eq!(processor.fundamental(0), 0.0);
//! ```

mod block_processor;
mod options;

pub use block_processor::{Processor, MAX_CHANNELS};
pub use options::{ExtraChannels, Options, PitchTracking};
