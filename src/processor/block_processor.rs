use crate::error::{Error, Result};
use crate::filter::HarmonicFilterBank;
use crate::pitch::{Estimator, FundamentalEstimate};
use crate::processor::{ExtraChannels, Options, PitchTracking};
use crate::spectrum::SpectralAnalyzer;

/// The number of channels that are analyzed and filtered. Further channels are
/// passed through or silenced, see [`ExtraChannels`].
pub const MAX_CHANNELS: usize = 2;

/// Everything allocated by `configure`.
struct Pipeline {
    sample_rate: f32,
    max_block_size: usize,
    options: Options,
    analyzer: SpectralAnalyzer,
    estimator: Estimator,
    filter_bank: HarmonicFilterBank,
    /// Mono mix of the analyzed part of a block.
    mix: Box<[f32]>,
    estimates: [FundamentalEstimate; MAX_CHANNELS],
}

impl Pipeline {
    fn new(sample_rate: f32, max_block_size: usize, options: Options) -> Result<Self> {
        options.validate(sample_rate, max_block_size)?;

        let analyzer = SpectralAnalyzer::new(options.transform_size, sample_rate, options.window)?;
        let filter_bank = HarmonicFilterBank::new(
            MAX_CHANNELS,
            options.harmonic_count,
            sample_rate,
            options.response,
            options.comb_scale,
        )?;

        Ok(Pipeline {
            sample_rate,
            max_block_size,
            estimator: Estimator::new(options.estimator, options.magnitude_threshold),
            mix: vec![0.; options.transform_size].into_boxed_slice(),
            options,
            analyzer,
            filter_bank,
            estimates: [FundamentalEstimate::UNVOICED; MAX_CHANNELS],
        })
    }

    /// Estimates the fundamental of the first `channel_count` channels.
    fn estimate(&mut self, channels: &[&mut [f32]], channel_count: usize, frame_count: usize) {
        let min_frequency = self.options.min_frequency;
        self.estimates = [FundamentalEstimate::UNVOICED; MAX_CHANNELS];

        match self.options.pitch_tracking {
            PitchTracking::PerChannel => {
                for (channel, estimate) in self.estimates.iter_mut().enumerate().take(channel_count) {
                    let spectrum = self.analyzer.analyze(&channels[channel][..frame_count]);
                    *estimate = self.estimator.estimate(spectrum, min_frequency);
                }
            }
            PitchTracking::Shared => {
                let mix_len = self.mix_down(channels, channel_count, frame_count);
                let spectrum = self.analyzer.analyze(&self.mix[..mix_len]);
                let estimate = self.estimator.estimate(spectrum, min_frequency);
                for shared in self.estimates.iter_mut().take(channel_count) {
                    *shared = estimate;
                }
            }
            PitchTracking::Divided => {
                let mix_len = self.mix_down(channels, channel_count, frame_count);
                let spectrum = self.analyzer.analyze(&self.mix[..mix_len]);
                let pair = self.estimator.estimate_pair(spectrum, min_frequency);
                for (estimate, divided) in self.estimates.iter_mut().zip(pair.iter()).take(channel_count) {
                    *estimate = *divided;
                }
            }
        }
    }

    /// Averages the first `channel_count` channels into the mix buffer, up to the transform size.
    /// Returns the number of mixed samples.
    fn mix_down(&mut self, channels: &[&mut [f32]], channel_count: usize, frame_count: usize) -> usize {
        let mix_len = frame_count.min(self.mix.len());
        let mix = &mut self.mix[..mix_len];
        for value in mix.iter_mut() {
            *value = 0.;
        }
        if channel_count == 0 {
            return mix_len;
        }
        let scale = 1.0 / (channel_count as f32);
        for channel in channels.iter().take(channel_count) {
            for (value, sample) in mix.iter_mut().zip(channel.iter()) {
                *value += scale * sample;
            }
        }
        mix_len
    }
}

/// Tracks the pitch of each channel of a stream of blocks and filters the harmonics
/// of that pitch.
///
/// A processor starts out unconfigured. [`configure`](Processor::configure) allocates
/// everything needed for processing, after which [`process_block`](Processor::process_block)
/// neither allocates nor logs and is safe to call from a real time audio thread.
/// The first two channels of a block are analyzed and filtered.
pub struct Processor {
    pipeline: Option<Pipeline>,
}

impl Default for Processor {
    fn default() -> Self {
        Processor::new()
    }
}

impl Processor {
    /// Creates an unconfigured processor.
    pub fn new() -> Self {
        Processor { pipeline: None }
    }

    /// Validates the options and allocates all buffers for a given sample rate and
    /// maximum block size, discarding any previous filter state. On failure, the processor
    /// is left unconfigured.
    ///
    /// Must not be called while a block is being processed.
    pub fn configure(&mut self, sample_rate: f32, max_block_size: usize, options: Options) -> Result<()> {
        self.pipeline = None;
        match Pipeline::new(sample_rate, max_block_size, options) {
            Ok(pipeline) => {
                let options = &pipeline.options;
                log::info!(
                    "Configured for {} Hz, blocks of up to {} frames, {}-point FFT, {} harmonics, {:?} estimation, {:?} pitch tracking",
                    sample_rate,
                    max_block_size,
                    options.transform_size,
                    options.harmonic_count,
                    options.estimator,
                    options.pitch_tracking,
                );
                log::debug!(
                    "Bin width {:.2} Hz, Nyquist {} Hz, {:?}, {:?} response",
                    sample_rate / (options.transform_size as f32),
                    0.5 * sample_rate,
                    options.resonance,
                    options.response,
                );
                self.pipeline = Some(pipeline);
                Ok(())
            }
            Err(error) => {
                log::warn!("Rejected configuration: {}", error);
                Err(error)
            }
        }
    }

    /// Releases all buffers and returns to the unconfigured state.
    pub fn release(&mut self) {
        self.pipeline = None;
    }

    pub fn is_configured(&self) -> bool {
        self.pipeline.is_some()
    }

    /// Processes the first `frame_count` frames of a block in place.
    ///
    /// Channels 0 and 1 are analyzed and filtered. A channel without a usable pitch is left
    /// untouched. Further channels are handled according to [`Options::extra_channels`].
    ///
    /// Fails without touching the block if the processor is not configured, if `frame_count`
    /// exceeds the configured maximum block size or if a channel holds fewer than
    /// `frame_count` samples.
    pub fn process_block(&mut self, channels: &mut [&mut [f32]], frame_count: usize) -> Result<()> {
        let pipeline = self.pipeline.as_mut().ok_or(Error::NotConfigured)?;
        if frame_count > pipeline.max_block_size {
            return Err(Error::BlockTooLarge {
                frame_count,
                max_block_size: pipeline.max_block_size,
            });
        }
        if let Some((channel, samples)) = channels
            .iter()
            .enumerate()
            .find(|(_, samples)| samples.len() < frame_count)
        {
            return Err(Error::ChannelTooShort {
                channel,
                len: samples.len(),
                frame_count,
            });
        }

        let channel_count = channels.len().min(MAX_CHANNELS);
        pipeline.estimate(channels, channel_count, frame_count);

        let harmonic_count = pipeline.options.harmonic_count;
        let resonance = pipeline.options.resonance;
        for (channel, samples) in channels.iter_mut().enumerate().take(channel_count) {
            let fundamental = pipeline.estimates[channel].frequency;
            pipeline
                .filter_bank
                .retune(channel, fundamental, harmonic_count, resonance);
            pipeline.filter_bank.apply(channel, &mut samples[..frame_count]);
        }

        if pipeline.options.extra_channels == ExtraChannels::Silence {
            for samples in channels.iter_mut().skip(MAX_CHANNELS) {
                for sample in samples[..frame_count].iter_mut() {
                    *sample = 0.;
                }
            }
        }

        Ok(())
    }

    /// The most recent fundamental frequency estimate of a channel in Hz, 0 meaning unvoiced.
    /// Also 0 before the first block and for channels that are not analyzed.
    pub fn fundamental(&self, channel: usize) -> f32 {
        self.estimate(channel).frequency
    }

    /// The most recent estimate of a channel, see [`fundamental`](Processor::fundamental).
    pub fn estimate(&self, channel: usize) -> FundamentalEstimate {
        self.pipeline
            .as_ref()
            .and_then(|pipeline| pipeline.estimates.get(channel))
            .copied()
            .unwrap_or(FundamentalEstimate::UNVOICED)
    }

    pub fn sample_rate(&self) -> Option<f32> {
        self.pipeline.as_ref().map(|pipeline| pipeline.sample_rate)
    }

    pub fn max_block_size(&self) -> Option<usize> {
        self.pipeline.as_ref().map(|pipeline| pipeline.max_block_size)
    }

    pub fn options(&self) -> Option<&Options> {
        self.pipeline.as_ref().map(|pipeline| &pipeline.options)
    }

    /// The filter bank, for inspecting how channels are currently tuned.
    pub fn filter_bank(&self) -> Option<&HarmonicFilterBank> {
        self.pipeline.as_ref().map(|pipeline| &pipeline.filter_bank)
    }
}
