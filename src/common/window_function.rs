//! [Window functions](https://en.wikipedia.org/wiki/Window_function).

use core::f64::consts::PI;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowFunction {
    /// <https://en.wikipedia.org/wiki/Window_function#Hann_and_Hamming_windows>
    Hann,
    /// <https://en.wikipedia.org/wiki/Window_function#Welch_window>
    Welch,
    /// No windowing, i.e all ones. Cheapest, but leaks the most.
    Rectangular,
}

impl Default for WindowFunction {
    fn default() -> Self {
        WindowFunction::Hann
    }
}

impl WindowFunction {
    /// Fills `table` with the window function evaluated over its length.
    /// Meant to be called once, ahead of processing.
    pub fn fill(self, table: &mut [f32]) {
        let len = table.len();
        if len < 2 {
            table.iter_mut().for_each(|value| *value = 1.0);
            return;
        }
        let span = (len - 1) as f64;
        for (i, value) in table.iter_mut().enumerate() {
            let x = i as f64 / span;
            *value = match self {
                WindowFunction::Hann => 0.5 - 0.5 * (2.0 * PI * x).cos(),
                WindowFunction::Welch => {
                    let u = 2.0 * x - 1.0;
                    1.0 - u * u
                }
                WindowFunction::Rectangular => 1.0,
            } as f32;
        }
    }
}

/// Performs point-wise multiplication of a buffer and a precomputed window table.
pub fn apply_window(table: &[f32], buffer: &mut [f32]) {
    for (value, w) in buffer.iter_mut().zip(table.iter()) {
        *value *= w;
    }
}
