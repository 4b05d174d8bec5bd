use crate::error::{Error, Result};
use crate::filter::{Biquad, BiquadCoefs};

/// The default bandwidth of each harmonic section, in Hz.
pub const DEFAULT_BANDWIDTH: f32 = 100.0;

/// How wide each harmonic section is.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Resonance {
    /// A fixed bandwidth in Hz, the same for every harmonic.
    Bandwidth(f32),
    /// A quality factor. The bandwidth of a section centered at `f` Hz is `f / Q`,
    /// so higher harmonics get wider sections.
    Q(f32),
}

impl Default for Resonance {
    fn default() -> Self {
        Resonance::Bandwidth(DEFAULT_BANDWIDTH)
    }
}

impl Resonance {
    /// The bandwidth in Hz of a section centered at `center` Hz.
    pub fn bandwidth_at(self, center: f32) -> f32 {
        match self {
            Resonance::Bandwidth(bandwidth) => bandwidth,
            Resonance::Q(q) => center / q,
        }
    }

    pub(crate) fn validate(self, sample_rate: f32) -> Result<()> {
        let valid = match self {
            Resonance::Bandwidth(bandwidth) => {
                bandwidth.is_finite() && bandwidth > 0.0 && bandwidth < 0.5 * sample_rate
            }
            Resonance::Q(q) => q.is_finite() && q > 0.0,
        };
        if valid {
            Ok(())
        } else {
            let value = match self {
                Resonance::Bandwidth(value) | Resonance::Q(value) => value,
            };
            Err(Error::InvalidResonance(value))
        }
    }
}

/// What the filter bank does to the harmonics of the fundamental.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Response {
    /// Keep the harmonics, reject everything else. Sections run in parallel
    /// and their outputs are summed.
    Bandpass,
    /// Reject the harmonics, keep everything else. Sections run in cascade.
    Notch,
}

impl Default for Response {
    fn default() -> Self {
        Response::Bandpass
    }
}

/// The gain applied to the sum of parallel bandpass sections when more than one
/// harmonic is used. A single band is never scaled.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CombScale {
    /// A fixed gain.
    Fixed(f32),
    /// `0.5 / harmonic_count`.
    PerHarmonic,
}

impl Default for CombScale {
    fn default() -> Self {
        CombScale::Fixed(0.5)
    }
}

impl CombScale {
    fn gain(self, harmonic_count: usize) -> f64 {
        match self {
            CombScale::Fixed(gain) => gain as f64,
            CombScale::PerHarmonic => 0.5 / (harmonic_count.max(1) as f64),
        }
    }

    pub(crate) fn validate(self) -> Result<()> {
        match self {
            CombScale::Fixed(gain) if !gain.is_finite() => Err(Error::InvalidCombScale(gain)),
            _ => Ok(()),
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct HarmonicSection {
    allpass: Biquad,
    center: f32,
    active: bool,
}

impl HarmonicSection {
    #[inline]
    fn bandpass(&mut self, x: f64) -> f64 {
        0.5 * (x - self.allpass.process(x))
    }

    #[inline]
    fn notch(&mut self, x: f64) -> f64 {
        0.5 * (x + self.allpass.process(x))
    }
}

/// The sections of one channel, indexed by harmonic number minus one.
struct ChannelSections {
    sections: Box<[HarmonicSection]>,
    harmonic_count: usize,
    active_count: usize,
    /// The fundamental the sections are tuned to. 0 means bypassed.
    fundamental: f32,
    resonance: Option<Resonance>,
}

impl ChannelSections {
    fn new(max_harmonics: usize) -> Self {
        ChannelSections {
            sections: vec![HarmonicSection::default(); max_harmonics].into_boxed_slice(),
            harmonic_count: 0,
            active_count: 0,
            fundamental: 0.0,
            resonance: None,
        }
    }

    fn is_bypassed(&self) -> bool {
        self.fundamental == 0.0 || self.active_count == 0
    }

    fn reset_active(&mut self) {
        for section in self.sections.iter_mut().filter(|s| s.active) {
            section.allpass.reset();
        }
    }
}

/// A bank of [allpass derived](BiquadCoefs::allpass) second order sections per channel,
/// one per harmonic of a fundamental frequency.
///
/// Section `h` (1-based) of a channel is centered at `h * fundamental`. Sections at or above
/// Nyquist, or whose design is unusable, are skipped and keep their state. Retuning only
/// replaces coefficients, so the filter memory carries over between blocks.
///
/// All memory is allocated on construction.
pub struct HarmonicFilterBank {
    sample_rate: f32,
    response: Response,
    comb_scale: CombScale,
    channels: Box<[ChannelSections]>,
}

impl HarmonicFilterBank {
    pub fn new(
        channel_count: usize,
        max_harmonics: usize,
        sample_rate: f32,
        response: Response,
        comb_scale: CombScale,
    ) -> Result<Self> {
        crate::spectrum::validate_sample_rate(sample_rate)?;
        if max_harmonics == 0 {
            return Err(Error::InvalidHarmonicCount);
        }
        comb_scale.validate()?;

        let channels: Vec<ChannelSections> = (0..channel_count)
            .map(|_| ChannelSections::new(max_harmonics))
            .collect();

        Ok(HarmonicFilterBank {
            sample_rate,
            response,
            comb_scale,
            channels: channels.into_boxed_slice(),
        })
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn max_harmonics(&self) -> usize {
        self.channels
            .first()
            .map(|channel| channel.sections.len())
            .unwrap_or(0)
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn response(&self) -> Response {
        self.response
    }

    /// Tunes the sections of a channel to the first `harmonic_count` harmonics
    /// of `fundamental` Hz. `harmonic_count` is clamped to `1..=max_harmonics`.
    ///
    /// A fundamental that is not positive and finite, such as the unvoiced estimate,
    /// bypasses the channel until the next retune without touching any section state.
    /// Retuning to the same parameters as the previous call is a no-op.
    pub fn retune(
        &mut self,
        channel: usize,
        fundamental: f32,
        harmonic_count: usize,
        resonance: Resonance,
    ) {
        let sample_rate = self.sample_rate as f64;
        let nyquist = 0.5 * self.sample_rate;
        let channel = match self.channels.get_mut(channel) {
            Some(channel) => channel,
            None => return,
        };

        if !(fundamental > 0.0 && fundamental.is_finite()) {
            channel.fundamental = 0.0;
            return;
        }

        let harmonic_count = harmonic_count.max(1).min(channel.sections.len());
        if channel.fundamental == fundamental
            && channel.harmonic_count == harmonic_count
            && channel.resonance == Some(resonance)
        {
            return;
        }

        let mut active_count = 0;
        for (index, section) in channel.sections.iter_mut().enumerate() {
            let center = ((index + 1) as f32) * fundamental;
            let coefs = if index < harmonic_count && center < nyquist {
                BiquadCoefs::allpass(
                    sample_rate,
                    center as f64,
                    resonance.bandwidth_at(center) as f64,
                )
            } else {
                None
            };
            match coefs {
                Some(coefs) => {
                    section.allpass.set_coefs(coefs);
                    section.center = center;
                    section.active = true;
                    active_count += 1;
                }
                None => section.active = false,
            }
        }

        channel.fundamental = fundamental;
        channel.harmonic_count = harmonic_count;
        channel.resonance = Some(resonance);
        channel.active_count = active_count;
    }

    /// Filters a channel's samples in place. Bypassed channels are left untouched.
    /// Out of range channels are ignored.
    pub fn apply(&mut self, channel: usize, samples: &mut [f32]) {
        let response = self.response;
        let comb_scale = self.comb_scale;
        let channel = match self.channels.get_mut(channel) {
            Some(channel) => channel,
            None => return,
        };
        if channel.is_bypassed() {
            return;
        }

        let single_band = channel.harmonic_count == 1;
        let gain = comb_scale.gain(channel.harmonic_count);
        for sample in samples.iter_mut() {
            let x = *sample as f64;
            let y = match response {
                Response::Bandpass => {
                    let mut sum = 0.0;
                    for section in channel.sections.iter_mut().filter(|s| s.active) {
                        sum += section.bandpass(x);
                    }
                    if single_band {
                        sum
                    } else {
                        gain * sum
                    }
                }
                Response::Notch => {
                    let mut y = x;
                    for section in channel.sections.iter_mut().filter(|s| s.active) {
                        y = section.notch(y);
                    }
                    y
                }
            };

            let y = y as f32;
            *sample = if y.is_finite() {
                y
            } else {
                channel.reset_active();
                if sample.is_finite() {
                    *sample
                } else {
                    0.0
                }
            };
        }
    }

    /// Returns true if [`apply`](Self::apply) currently leaves the channel untouched.
    pub fn is_bypassed(&self, channel: usize) -> bool {
        self.channels
            .get(channel)
            .map(|channel| channel.is_bypassed())
            .unwrap_or(true)
    }

    /// The fundamental a channel is tuned to, or 0 if bypassed.
    pub fn fundamental(&self, channel: usize) -> f32 {
        match self.channels.get(channel) {
            Some(channel) if !channel.is_bypassed() => channel.fundamental,
            _ => 0.0,
        }
    }

    /// The number of sections of a channel that are currently applied.
    pub fn active_section_count(&self, channel: usize) -> usize {
        match self.channels.get(channel) {
            Some(channel) if !channel.is_bypassed() => channel.active_count,
            _ => 0,
        }
    }

    /// The center frequencies of the applied sections of a channel, in ascending order.
    pub fn center_frequencies(&self, channel: usize) -> impl Iterator<Item = f32> + '_ {
        let sections: &[HarmonicSection] = match self.channels.get(channel) {
            Some(channel) if !channel.is_bypassed() => &channel.sections[..],
            _ => &[],
        };
        sections.iter().filter(|s| s.active).map(|s| s.center)
    }

    /// The allpass coefficients of a channel's section for a given harmonic (1-based),
    /// or `None` if that section is not applied.
    pub fn section_coefs(&self, channel: usize, harmonic: usize) -> Option<BiquadCoefs> {
        let channel = self.channels.get(channel).filter(|c| !c.is_bypassed())?;
        let section = channel.sections.get(harmonic.checked_sub(1)?)?;
        if section.active {
            Some(*section.allpass.coefs())
        } else {
            None
        }
    }

    /// The state of a channel's section for a given harmonic (1-based), whether applied or not.
    /// See [`Biquad::state`].
    pub fn section_state(&self, channel: usize, harmonic: usize) -> Option<[f64; 4]> {
        let channel = self.channels.get(channel)?;
        let section = channel.sections.get(harmonic.checked_sub(1)?)?;
        Some(section.allpass.state())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    const SAMPLE_RATE: f32 = 44100.0;

    fn bank(max_harmonics: usize, response: Response) -> HarmonicFilterBank {
        HarmonicFilterBank::new(2, max_harmonics, SAMPLE_RATE, response, CombScale::default()).unwrap()
    }

    fn generate_tones(frequencies: &[f32], amplitude: f32, sample_count: usize) -> Vec<f32> {
        (0..sample_count)
            .map(|i| {
                frequencies
                    .iter()
                    .map(|f| amplitude * (2.0 * core::f32::consts::PI * f * (i as f32) / SAMPLE_RATE).sin())
                    .sum()
            })
            .collect()
    }

    fn settled_peak(samples: &[f32]) -> f32 {
        samples[samples.len() / 2..]
            .iter()
            .fold(0.0, |peak: f32, s| peak.max(s.abs()))
    }

    #[test]
    fn test_harmonic_centers() {
        let mut bank = bank(20, Response::Bandpass);
        bank.retune(0, 220.0, 3, Resonance::default());
        let centers: Vec<f32> = bank.center_frequencies(0).collect();
        assert_eq!(centers, vec![220.0, 440.0, 660.0]);
        assert_eq!(bank.active_section_count(0), 3);
        assert!(bank.section_coefs(0, 3).is_some());
        assert!(bank.section_coefs(0, 4).is_none());
        assert!(bank.section_coefs(0, 0).is_none());

        // The other channel is untouched.
        assert!(bank.is_bypassed(1));
        assert_eq!(bank.center_frequencies(1).count(), 0);
    }

    #[test]
    fn test_nyquist_guard() {
        let mut bank = bank(5, Response::Bandpass);
        bank.retune(0, 15000.0, 5, Resonance::default());
        let centers: Vec<f32> = bank.center_frequencies(0).collect();
        assert_eq!(centers, vec![15000.0]);
        for harmonic in 2..=5 {
            assert!(bank.section_coefs(0, harmonic).is_none());
        }
    }

    #[test]
    fn test_harmonic_count_is_clamped() {
        let mut bank = bank(4, Response::Bandpass);
        bank.retune(0, 100.0, 10, Resonance::default());
        assert_eq!(bank.active_section_count(0), 4);
        bank.retune(0, 100.0, 0, Resonance::default());
        assert_eq!(bank.active_section_count(0), 1);
    }

    #[test]
    fn test_unusable_designs_are_skipped() {
        let mut bank = bank(4, Response::Bandpass);
        // With Q = 0.5 a section is twice as wide as its center frequency, which
        // can not be realized above a quarter of the sample rate.
        bank.retune(0, 5000.0, 4, Resonance::Q(0.5));
        let centers: Vec<f32> = bank.center_frequencies(0).collect();
        assert_eq!(centers, vec![5000.0, 10000.0]);

        // Nothing usable at all bypasses the channel.
        bank.retune(1, 1000.0, 2, Resonance::Bandwidth(30000.0));
        assert!(bank.is_bypassed(1));
        let mut samples = generate_tones(&[1000.0], 0.5, 256);
        let expected = samples.clone();
        bank.apply(1, &mut samples);
        assert_eq!(samples, expected);
    }

    #[test]
    fn test_single_band_isolates_fundamental() {
        let mut bank = bank(1, Response::Bandpass);
        bank.retune(0, 441.0, 1, Resonance::default());
        let mut samples = generate_tones(&[441.0], 0.5, 44100);
        bank.apply(0, &mut samples);
        assert!((settled_peak(&samples) - 0.5).abs() < 0.01);

        let mut samples = generate_tones(&[5000.0], 0.5, 44100);
        bank.apply(0, &mut samples);
        assert!(settled_peak(&samples) < 0.02);
    }

    #[test]
    fn test_comb_keeps_harmonics() {
        let mut bank = bank(3, Response::Bandpass);
        bank.retune(0, 1000.0, 3, Resonance::default());

        // Harmonics pass with the comb gain.
        let mut samples = generate_tones(&[2000.0], 0.5, 44100);
        bank.apply(0, &mut samples);
        assert!((settled_peak(&samples) - 0.25).abs() < 0.01);

        // Between harmonics is rejected.
        bank.apply(0, &mut vec![0.0; 4410]);
        let mut samples = generate_tones(&[1500.0], 0.5, 44100);
        bank.apply(0, &mut samples);
        assert!(settled_peak(&samples) < 0.02);
    }

    #[test]
    fn test_per_harmonic_scale() {
        let mut bank =
            HarmonicFilterBank::new(1, 4, SAMPLE_RATE, Response::Bandpass, CombScale::PerHarmonic).unwrap();
        bank.retune(0, 2000.0, 4, Resonance::default());
        let mut samples = generate_tones(&[6000.0], 0.8, 44100);
        bank.apply(0, &mut samples);
        assert!((settled_peak(&samples) - 0.1).abs() < 0.01);
    }

    #[test]
    fn test_notch_removes_harmonics() {
        let mut bank = bank(3, Response::Notch);
        bank.retune(0, 300.0, 3, Resonance::default());
        let mut samples = generate_tones(&[300.0, 600.0, 900.0], 0.3, 44100);
        bank.apply(0, &mut samples);
        assert!(settled_peak(&samples) < 0.02);

        let mut samples = generate_tones(&[4000.0], 0.5, 44100);
        bank.apply(0, &mut samples);
        assert!((settled_peak(&samples) - 0.5).abs() < 0.02);
    }

    #[test]
    fn test_unvoiced_bypasses_and_freezes_state() {
        let mut bank = bank(3, Response::Bandpass);
        bank.retune(0, 220.0, 3, Resonance::default());
        let mut samples = generate_tones(&[220.0], 0.5, 512);
        bank.apply(0, &mut samples);
        let state: Vec<_> = (1..=3).map(|h| bank.section_state(0, h).unwrap()).collect();
        assert!(state.iter().all(|s| s.iter().any(|v| *v != 0.0)));

        bank.retune(0, 0.0, 3, Resonance::default());
        assert!(bank.is_bypassed(0));
        assert_eq!(bank.fundamental(0), 0.0);
        let mut samples = generate_tones(&[220.0], 0.5, 512);
        let expected = samples.clone();
        bank.apply(0, &mut samples);
        assert_eq!(samples, expected);
        let frozen: Vec<_> = (1..=3).map(|h| bank.section_state(0, h).unwrap()).collect();
        assert_eq!(state, frozen);

        // Voiced again, with the same tuning.
        bank.retune(0, 220.0, 3, Resonance::default());
        assert!(!bank.is_bypassed(0));
        assert_eq!(bank.fundamental(0), 220.0);
        assert_eq!(bank.active_section_count(0), 3);
    }

    #[test]
    fn test_skipped_sections_keep_state() {
        let mut bank = bank(2, Response::Bandpass);
        bank.retune(0, 1000.0, 2, Resonance::default());
        bank.apply(0, &mut generate_tones(&[1000.0, 2000.0], 0.5, 512));
        let second = bank.section_state(0, 2).unwrap();

        // The second harmonic is above Nyquist now.
        bank.retune(0, 12000.0, 2, Resonance::default());
        assert_eq!(bank.active_section_count(0), 1);
        bank.apply(0, &mut generate_tones(&[12000.0], 0.5, 512));
        assert_eq!(bank.section_state(0, 2).unwrap(), second);
    }

    #[test]
    fn test_retune_keeps_state() {
        let mut bank = bank(1, Response::Bandpass);
        bank.retune(0, 500.0, 1, Resonance::default());
        bank.apply(0, &mut generate_tones(&[500.0], 0.5, 300));
        let state = bank.section_state(0, 1).unwrap();
        bank.retune(0, 700.0, 1, Resonance::default());
        assert_eq!(bank.section_state(0, 1).unwrap(), state);
        assert_ne!(bank.section_coefs(0, 1), BiquadCoefs::allpass(44100.0, 500.0, 100.0));
        assert_eq!(bank.section_coefs(0, 1), BiquadCoefs::allpass(44100.0, 700.0, 100.0));
    }

    #[test]
    fn test_output_is_finite() {
        let mut rng = StdRng::seed_from_u64(7);
        let resonances = [
            Resonance::Bandwidth(1.0),
            Resonance::Bandwidth(100.0),
            Resonance::Bandwidth(5000.0),
            Resonance::Q(0.7),
            Resonance::Q(50.0),
        ];
        for response in [Response::Bandpass, Response::Notch].iter() {
            let mut bank = bank(20, *response);
            for _ in 0..200 {
                let fundamental = rng.gen_range(50.0..22050.0_f32);
                let harmonic_count = rng.gen_range(1..=20);
                let resonance = resonances[rng.gen_range(0..resonances.len())];
                bank.retune(0, fundamental, harmonic_count, resonance);
                let mut samples: Vec<f32> = (0..128).map(|_| rng.gen_range(-1.0..=1.0)).collect();
                bank.apply(0, &mut samples);
                assert!(samples.iter().all(|s| s.is_finite()));
            }
        }
    }

    #[test]
    fn test_non_finite_input_is_contained() {
        let mut bank = bank(3, Response::Bandpass);
        bank.retune(0, 220.0, 3, Resonance::default());
        let mut samples = vec![0.1, f32::NAN, 0.2, f32::INFINITY, 0.3];
        bank.apply(0, &mut samples);
        assert!(samples.iter().all(|s| s.is_finite()));
        assert_eq!(samples[1], 0.0);
        for harmonic in 1..=3 {
            assert!(bank.section_state(0, harmonic).unwrap().iter().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn test_causality() {
        let input = generate_tones(&[220.0, 440.0], 0.4, 1024);

        let mut first = input.clone();
        let mut bank = bank(3, Response::Bandpass);
        bank.retune(0, 220.0, 3, Resonance::default());
        bank.apply(0, &mut first[..512]);
        bank.retune(0, 440.0, 3, Resonance::default());
        bank.apply(0, &mut first[512..]);

        let mut second = input.clone();
        second[700] = 1.0;
        let mut other_bank = self::bank(3, Response::Bandpass);
        other_bank.retune(0, 220.0, 3, Resonance::default());
        other_bank.apply(0, &mut second[..512]);
        other_bank.retune(0, 880.0, 3, Resonance::default());
        other_bank.apply(0, &mut second[512..]);

        assert_eq!(first[..512], second[..512]);
        assert_ne!(first[512..], second[512..]);
    }

    #[test]
    fn test_out_of_range_channel() {
        let mut bank = bank(3, Response::Bandpass);
        bank.retune(5, 220.0, 3, Resonance::default());
        let mut samples = vec![0.5; 16];
        bank.apply(5, &mut samples);
        assert_eq!(samples, vec![0.5; 16]);
        assert!(bank.is_bypassed(5));
        assert_eq!(bank.section_state(5, 1), None);
    }

    #[test]
    fn test_invalid_construction() {
        assert_eq!(
            HarmonicFilterBank::new(2, 0, SAMPLE_RATE, Response::Bandpass, CombScale::default()).err(),
            Some(Error::InvalidHarmonicCount)
        );
        assert!(HarmonicFilterBank::new(2, 3, -1.0, Response::Bandpass, CombScale::default()).is_err());
        assert!(HarmonicFilterBank::new(2, 3, SAMPLE_RATE, Response::Bandpass, CombScale::Fixed(f32::NAN)).is_err());
        assert!(Resonance::Bandwidth(0.0).validate(SAMPLE_RATE).is_err());
        assert!(Resonance::Bandwidth(22050.0).validate(SAMPLE_RATE).is_err());
        assert!(Resonance::Q(-1.0).validate(SAMPLE_RATE).is_err());
        assert!(Resonance::Q(2.0).validate(SAMPLE_RATE).is_ok());
    }
}
