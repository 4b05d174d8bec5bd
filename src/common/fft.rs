use core::convert::TryInto;

/// The smallest supported real FFT size.
pub const MIN_FFT_SIZE: usize = 16;
/// The largest supported real FFT size.
pub const MAX_FFT_SIZE: usize = 4096;

/// Returns true if a buffer of length `size` can be passed to [`real_fft`].
pub fn is_supported_fft_size(size: usize) -> bool {
    size.is_power_of_two() && size >= MIN_FFT_SIZE && size <= MAX_FFT_SIZE
}

macro_rules! rfft {
    ($buffer:expr, $fft:path) => {
        $buffer.try_into().ok().map(|input| &mut $fft(input)[..])
    };
}

/// Performs an in-place real FFT on a given buffer, returning the `N / 2` complex
/// coefficients. The real valued coefficient at the Nyquist frequency is packed
/// into the imaginary part of the DC bin.
///
/// Returns `None` if the buffer length is not a supported FFT size.
pub fn real_fft(buffer: &mut [f32]) -> Option<&mut [microfft::Complex32]> {
    match buffer.len() {
        16 => rfft!(buffer, microfft::real::rfft_16),
        32 => rfft!(buffer, microfft::real::rfft_32),
        64 => rfft!(buffer, microfft::real::rfft_64),
        128 => rfft!(buffer, microfft::real::rfft_128),
        256 => rfft!(buffer, microfft::real::rfft_256),
        512 => rfft!(buffer, microfft::real::rfft_512),
        1024 => rfft!(buffer, microfft::real::rfft_1024),
        2048 => rfft!(buffer, microfft::real::rfft_2048),
        4096 => rfft!(buffer, microfft::real::rfft_4096),
        _ => None,
    }
}
