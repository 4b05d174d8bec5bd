use crate::pitch::FundamentalEstimate;
use crate::spectrum::Spectrum;

/// The default magnitude a spectral peak must exceed to count as a pitch candidate.
pub const DEFAULT_MAGNITUDE_THRESHOLD: f32 = 5.0;

/// How to pick the fundamental among the bins of a spectrum.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EstimatorStrategy {
    /// The largest non-DC bin.
    GlobalPeak,
    /// The lowest bin larger than both of its neighbors.
    LocalMaxima,
}

impl Default for EstimatorStrategy {
    fn default() -> Self {
        EstimatorStrategy::GlobalPeak
    }
}

/// Picks fundamental frequencies from magnitude spectra.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Estimator {
    strategy: EstimatorStrategy,
    magnitude_threshold: f32,
}

impl Default for Estimator {
    fn default() -> Self {
        Estimator::new(EstimatorStrategy::default(), DEFAULT_MAGNITUDE_THRESHOLD)
    }
}

impl Estimator {
    /// Candidates must have a magnitude strictly greater than `magnitude_threshold`, on the
    /// linear (unnormalized) scale of the analyzer's FFT.
    pub fn new(strategy: EstimatorStrategy, magnitude_threshold: f32) -> Self {
        Estimator {
            strategy,
            magnitude_threshold,
        }
    }

    pub fn strategy(&self) -> EstimatorStrategy {
        self.strategy
    }

    pub fn magnitude_threshold(&self) -> f32 {
        self.magnitude_threshold
    }

    /// Estimates the fundamental frequency of a spectrum. Returns
    /// [`FundamentalEstimate::UNVOICED`] if there is no peak above the magnitude
    /// threshold or if the peak is at or below `min_frequency` Hz.
    pub fn estimate(&self, spectrum: &Spectrum, min_frequency: f32) -> FundamentalEstimate {
        let bin = match self.strategy {
            EstimatorStrategy::GlobalPeak => self
                .global_peak(spectrum)
                .filter(|bin| spectrum.bin_frequency(*bin) > min_frequency),
            EstimatorStrategy::LocalMaxima => self.local_maxima(spectrum, min_frequency).next(),
        };
        match bin {
            Some(bin) => FundamentalEstimate::from_bin(spectrum, bin),
            None => FundamentalEstimate::UNVOICED,
        }
    }

    /// Estimates two fundamentals from a single spectrum, for instance a mix of two voices.
    /// The first estimate is the one returned by [`Estimator::estimate`]. The second is
    /// the next local maximum above the magnitude threshold: the next one in ascending
    /// frequency order for [`EstimatorStrategy::LocalMaxima`], the next largest one for
    /// [`EstimatorStrategy::GlobalPeak`]. Either may be unvoiced.
    pub fn estimate_pair(&self, spectrum: &Spectrum, min_frequency: f32) -> [FundamentalEstimate; 2] {
        let first = self.estimate(spectrum, min_frequency);
        if !first.is_voiced() {
            return [first, FundamentalEstimate::UNVOICED];
        }

        let second_bin = match self.strategy {
            EstimatorStrategy::GlobalPeak => {
                let mut best: Option<usize> = None;
                for bin in self.local_maxima(spectrum, min_frequency) {
                    if bin == first.bin {
                        continue;
                    }
                    let magnitudes = spectrum.magnitudes();
                    best = match best {
                        Some(best_bin) if magnitudes[best_bin] >= magnitudes[bin] => Some(best_bin),
                        _ => Some(bin),
                    };
                }
                best
            }
            EstimatorStrategy::LocalMaxima => self
                .local_maxima(spectrum, min_frequency)
                .find(|bin| *bin > first.bin),
        };

        let second = match second_bin {
            Some(bin) => FundamentalEstimate::from_bin(spectrum, bin),
            None => FundamentalEstimate::UNVOICED,
        };
        [first, second]
    }

    /// The largest bin, excluding DC, if it exceeds the magnitude threshold.
    /// The lowest bin wins ties.
    fn global_peak(&self, spectrum: &Spectrum) -> Option<usize> {
        let mut max_magnitude = self.magnitude_threshold;
        let mut max_index = None;
        for (index, magnitude) in spectrum.magnitudes().iter().enumerate().skip(1) {
            if *magnitude > max_magnitude {
                max_magnitude = *magnitude;
                max_index = Some(index);
            }
        }
        max_index
    }

    /// Bins `1..=len - 2` larger than both neighbors and the magnitude threshold, in ascending
    /// order. Bins at or below `min_frequency` are skipped.
    fn local_maxima<'a>(
        &self,
        spectrum: &'a Spectrum,
        min_frequency: f32,
    ) -> impl Iterator<Item = usize> + 'a {
        let threshold = self.magnitude_threshold;
        let magnitudes = spectrum.magnitudes();
        let last = magnitudes.len().saturating_sub(1);
        (1..last).filter(move |bin| {
            let magnitude = magnitudes[*bin];
            magnitude > threshold
                && magnitude > magnitudes[bin - 1]
                && magnitude > magnitudes[bin + 1]
                && spectrum.bin_frequency(*bin) > min_frequency
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::WindowFunction;
    use crate::spectrum::SpectralAnalyzer;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    const SAMPLE_RATE: f32 = 44100.0;
    const TRANSFORM_SIZE: usize = 1024;

    fn generate_tones(tones: &[(f32, f32)]) -> Vec<f32> {
        (0..TRANSFORM_SIZE)
            .map(|i| {
                tones
                    .iter()
                    .map(|(frequency, amplitude)| {
                        amplitude
                            * (2.0 * core::f32::consts::PI * frequency * (i as f32) / SAMPLE_RATE).sin()
                    })
                    .sum()
            })
            .collect()
    }

    /// Builds a spectrum directly from magnitudes, with a bin width of 100 Hz.
    fn spectrum_from(magnitudes: &[f32]) -> Spectrum {
        let transform_size = 2 * magnitudes.len();
        let mut spectrum = Spectrum::new(transform_size, 100.0 * transform_size as f32);
        spectrum.magnitudes_mut().copy_from_slice(magnitudes);
        spectrum
    }

    #[test]
    fn test_sine_detection() {
        let mut analyzer = SpectralAnalyzer::new(TRANSFORM_SIZE, SAMPLE_RATE, WindowFunction::Hann).unwrap();
        let bin_width = SAMPLE_RATE / TRANSFORM_SIZE as f32;
        for strategy in [EstimatorStrategy::GlobalPeak, EstimatorStrategy::LocalMaxima].iter() {
            let estimator = Estimator::new(*strategy, DEFAULT_MAGNITUDE_THRESHOLD);
            for frequency in [70.0, 110.0, 220.0, 467.0, 1000.0, 4000.0, 12000.0, 20000.0].iter() {
                let block = generate_tones(&[(*frequency, 0.5)]);
                let estimate = estimator.estimate(analyzer.analyze(&block), 50.0);
                assert!(estimate.is_voiced());
                assert!(
                    (estimate.frequency - frequency).abs() <= bin_width,
                    "{:?}: expected {} Hz, got {} Hz",
                    strategy,
                    frequency,
                    estimate.frequency
                );
                assert!(estimate.note_number.is_some());
            }
        }
    }

    #[test]
    fn test_silence_is_unvoiced() {
        let mut analyzer = SpectralAnalyzer::new(TRANSFORM_SIZE, SAMPLE_RATE, WindowFunction::Hann).unwrap();
        let spectrum = analyzer.analyze(&[0.0; TRANSFORM_SIZE]);
        for strategy in [EstimatorStrategy::GlobalPeak, EstimatorStrategy::LocalMaxima].iter() {
            let estimator = Estimator::new(*strategy, DEFAULT_MAGNITUDE_THRESHOLD);
            assert_eq!(estimator.estimate(spectrum, 50.0), FundamentalEstimate::UNVOICED);
            assert_eq!(
                estimator.estimate_pair(spectrum, 50.0),
                [FundamentalEstimate::UNVOICED, FundamentalEstimate::UNVOICED]
            );
        }
    }

    #[test]
    fn test_quiet_noise_is_unvoiced() {
        let mut rng = StdRng::seed_from_u64(123);
        let noise: Vec<f32> = (0..TRANSFORM_SIZE).map(|_| rng.gen_range(-0.001..=0.001)).collect();
        let mut analyzer = SpectralAnalyzer::new(TRANSFORM_SIZE, SAMPLE_RATE, WindowFunction::Hann).unwrap();
        let spectrum = analyzer.analyze(&noise);
        for strategy in [EstimatorStrategy::GlobalPeak, EstimatorStrategy::LocalMaxima].iter() {
            let estimator = Estimator::new(*strategy, DEFAULT_MAGNITUDE_THRESHOLD);
            assert!(!estimator.estimate(spectrum, 50.0).is_voiced());
        }
    }

    #[test]
    fn test_min_frequency() {
        // The largest peak is at 100 Hz, the first bin above DC.
        let spectrum = spectrum_from(&[50.0, 40.0, 10.0, 20.0, 10.0, 0.0]);

        let global = Estimator::new(EstimatorStrategy::GlobalPeak, 5.0);
        assert_eq!(global.estimate(&spectrum, 50.0).frequency, 100.0);
        assert_eq!(global.estimate(&spectrum, 100.0), FundamentalEstimate::UNVOICED);

        // Bin 1 is no local maximum since the DC bin is larger. The first maximum is bin 3.
        let local = Estimator::new(EstimatorStrategy::LocalMaxima, 5.0);
        assert_eq!(local.estimate(&spectrum, 50.0).frequency, 300.0);
        assert_eq!(local.estimate(&spectrum, 300.0), FundamentalEstimate::UNVOICED);
    }

    #[test]
    fn test_global_peak_ignores_dc() {
        let spectrum = spectrum_from(&[100.0, 1.0, 2.0, 30.0, 2.0, 1.0]);
        let estimate = Estimator::new(EstimatorStrategy::GlobalPeak, 5.0).estimate(&spectrum, 50.0);
        assert_eq!(estimate.bin, 3);
        assert_eq!(estimate.magnitude, 30.0);
        assert_eq!(estimate.frequency, 300.0);
    }

    #[test]
    fn test_local_maxima_picks_lowest_candidate() {
        // Bin 2 is a local maximum but below the threshold, bin 4 is the first candidate,
        // even though bin 7 is larger.
        let spectrum = spectrum_from(&[0.0, 1.0, 4.0, 3.0, 8.0, 2.0, 6.0, 20.0, 5.0, 0.0]);
        let local = Estimator::new(EstimatorStrategy::LocalMaxima, 5.0);
        assert_eq!(local.estimate(&spectrum, 50.0).bin, 4);

        let global = Estimator::new(EstimatorStrategy::GlobalPeak, 5.0);
        assert_eq!(global.estimate(&spectrum, 50.0).bin, 7);

        // The last bin has no right neighbor and is never a local maximum.
        let rising = spectrum_from(&[0.0, 6.0, 7.0, 8.0]);
        assert!(!local.estimate(&rising, 50.0).is_voiced());
        assert_eq!(global.estimate(&rising, 50.0).bin, 3);
    }

    #[test]
    fn test_estimate_pair() {
        let spectrum = spectrum_from(&[0.0, 1.0, 9.0, 3.0, 8.0, 2.0, 6.0, 20.0, 5.0, 0.0]);

        let [first, second] = Estimator::new(EstimatorStrategy::LocalMaxima, 5.0).estimate_pair(&spectrum, 50.0);
        assert_eq!((first.bin, second.bin), (2, 4));

        let [first, second] = Estimator::new(EstimatorStrategy::GlobalPeak, 5.0).estimate_pair(&spectrum, 50.0);
        assert_eq!((first.bin, second.bin), (7, 2));

        // A single candidate leaves the second estimate unvoiced.
        let single = spectrum_from(&[0.0, 1.0, 9.0, 3.0, 0.0, 0.0]);
        let [first, second] = Estimator::new(EstimatorStrategy::LocalMaxima, 5.0).estimate_pair(&single, 50.0);
        assert_eq!(first.bin, 2);
        assert!(!second.is_voiced());
    }

    #[test]
    fn test_two_voices() {
        let mut analyzer = SpectralAnalyzer::new(TRANSFORM_SIZE, SAMPLE_RATE, WindowFunction::Hann).unwrap();
        let bin_width = SAMPLE_RATE / TRANSFORM_SIZE as f32;
        let block = generate_tones(&[(220.0, 0.3), (660.0, 0.5)]);
        let spectrum = analyzer.analyze(&block);

        let [low, high] = Estimator::new(EstimatorStrategy::LocalMaxima, 5.0).estimate_pair(spectrum, 50.0);
        assert!((low.frequency - 220.0).abs() <= bin_width);
        assert!((high.frequency - 660.0).abs() <= bin_width);

        let [loud, quiet] = Estimator::new(EstimatorStrategy::GlobalPeak, 5.0).estimate_pair(spectrum, 50.0);
        assert!((loud.frequency - 660.0).abs() <= bin_width);
        assert!((quiet.frequency - 220.0).abs() <= bin_width);
    }
}
