use crate::common::{apply_window, is_supported_fft_size, real_fft, WindowFunction};
use crate::common::{MAX_FFT_SIZE, MIN_FFT_SIZE};
use crate::error::{Error, Result};
use crate::spectrum::Spectrum;

pub(crate) fn validate_sample_rate(sample_rate: f32) -> Result<()> {
    if !sample_rate.is_finite() || sample_rate <= 0.0 {
        return Err(Error::InvalidSampleRate(sample_rate));
    }
    Ok(())
}

pub(crate) fn validate_transform_size(transform_size: usize) -> Result<()> {
    if !is_supported_fft_size(transform_size) {
        return Err(Error::InvalidTransformSize {
            size: transform_size,
            min: MIN_FFT_SIZE,
            max: MAX_FFT_SIZE,
        });
    }
    Ok(())
}

/// Computes the magnitude spectrum of the first `transform_size` samples of a block.
pub struct SpectralAnalyzer {
    window_function: WindowFunction,
    /// Precomputed window function values.
    window: Box<[f32]>,
    /// Windowed input, transformed in place.
    fft_buffer: Box<[f32]>,
    spectrum: Spectrum,
}

impl SpectralAnalyzer {
    pub fn new(
        transform_size: usize,
        sample_rate: f32,
        window_function: WindowFunction,
    ) -> Result<Self> {
        validate_transform_size(transform_size)?;
        validate_sample_rate(sample_rate)?;

        let mut window = vec![0.; transform_size].into_boxed_slice();
        window_function.fill(&mut window);

        Ok(SpectralAnalyzer {
            window_function,
            window,
            fft_buffer: vec![0.; transform_size].into_boxed_slice(),
            spectrum: Spectrum::new(transform_size, sample_rate),
        })
    }

    /// Analyzes a block of samples. Only the first `transform_size` samples are used,
    /// and shorter blocks are treated as if padded with silence.
    pub fn analyze(&mut self, samples: &[f32]) -> &Spectrum {
        let used = samples.len().min(self.fft_buffer.len());
        self.fft_buffer[..used].copy_from_slice(&samples[..used]);
        for value in self.fft_buffer[used..].iter_mut() {
            *value = 0.;
        }
        apply_window(&self.window, &mut self.fft_buffer);

        let magnitudes = self.spectrum.magnitudes_mut();
        match real_fft(&mut self.fft_buffer) {
            Some(fft) => {
                // Clear real-valued coefficient at the Nyquist frequency, which is packed into the
                // imaginary part of the DC bin.
                fft[0].im = 0.;
                for (magnitude, z) in magnitudes.iter_mut().zip(fft.iter()) {
                    *magnitude = z.norm_sqr().sqrt();
                }
            }
            // Unreachable, the transform size is validated on construction.
            None => magnitudes.iter_mut().for_each(|m| *m = 0.),
        }

        &self.spectrum
    }

    /// The most recently computed spectrum.
    pub fn spectrum(&self) -> &Spectrum {
        &self.spectrum
    }

    pub fn transform_size(&self) -> usize {
        self.fft_buffer.len()
    }

    pub fn sample_rate(&self) -> f32 {
        self.spectrum.sample_rate()
    }

    pub fn window_function(&self) -> WindowFunction {
        self.window_function
    }
}
