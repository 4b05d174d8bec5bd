/// Magnitudes of the bins `0..transform_size / 2` of a real FFT.
#[derive(Clone, Debug, PartialEq)]
pub struct Spectrum {
    magnitudes: Box<[f32]>,
    sample_rate: f32,
    transform_size: usize,
}

impl Spectrum {
    pub fn new(transform_size: usize, sample_rate: f32) -> Self {
        Spectrum {
            magnitudes: vec![0.; transform_size / 2].into_boxed_slice(),
            sample_rate,
            transform_size,
        }
    }

    /// Bin magnitudes. Bin `k` corresponds to `k * sample_rate / transform_size` Hz.
    pub fn magnitudes(&self) -> &[f32] {
        &self.magnitudes
    }

    pub(crate) fn magnitudes_mut(&mut self) -> &mut [f32] {
        &mut self.magnitudes
    }

    /// The number of bins, i.e half the transform size.
    pub fn len(&self) -> usize {
        self.magnitudes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.magnitudes.is_empty()
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn transform_size(&self) -> usize {
        self.transform_size
    }

    /// The frequency distance between adjacent bins in Hz.
    pub fn bin_width(&self) -> f32 {
        self.sample_rate / (self.transform_size as f32)
    }

    /// The center frequency of a given bin in Hz.
    pub fn bin_frequency(&self, bin: usize) -> f32 {
        (bin as f32) * self.sample_rate / (self.transform_size as f32)
    }
}
