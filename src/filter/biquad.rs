use core::f64::consts::PI;

/// [Biquad](https://en.wikipedia.org/wiki/Digital_biquad_filter) coefficients, normalized so that a0 = 1.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BiquadCoefs {
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub a1: f64,
    pub a2: f64,
}

impl Default for BiquadCoefs {
    fn default() -> Self {
        BiquadCoefs::IDENTITY
    }
}

impl BiquadCoefs {
    /// Passes the input through unchanged.
    pub const IDENTITY: BiquadCoefs = BiquadCoefs {
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
        a1: 0.0,
        a2: 0.0,
    };

    /// A second order allpass filter with a phase shift of -180 degrees at `center` Hz.
    /// The phase response goes from 0 to -360 degrees over a transition region whose width is
    /// given by `bandwidth` Hz. Mixing the input with the allpass output gives a bandpass
    /// (`0.5 * (x - allpass)`) or notch (`0.5 * (x + allpass)`) response with unity gain
    /// at the center or at DC and Nyquist respectively.
    ///
    /// From U. Zölzer, DAFX - Digital Audio Effects, section 2.2.
    ///
    /// Returns `None` if `center` or `bandwidth` are not within (0, Nyquist), or if the
    /// resulting filter would be unstable or non-finite.
    pub fn allpass(sample_rate: f64, center: f64, bandwidth: f64) -> Option<Self> {
        let nyquist = 0.5 * sample_rate;
        if !(center > 0.0 && center < nyquist && bandwidth > 0.0 && bandwidth < nyquist) {
            return None;
        }
        let t = (PI * bandwidth / sample_rate).tan();
        let c = (t - 1.0) / (t + 1.0);
        let d = -(2.0 * PI * center / sample_rate).cos();
        // Poles are inside the unit circle iff |c| < 1 and |d| < 1
        if !(c.abs() < 1.0 && d.abs() < 1.0) {
            return None;
        }
        let coefs = BiquadCoefs {
            b0: -c,
            b1: d * (1.0 - c),
            b2: 1.0,
            a1: d * (1.0 - c),
            a2: -c,
        };
        if coefs.is_finite() {
            Some(coefs)
        } else {
            None
        }
    }

    pub fn is_finite(&self) -> bool {
        self.b0.is_finite()
            && self.b1.is_finite()
            && self.b2.is_finite()
            && self.a1.is_finite()
            && self.a2.is_finite()
    }
}

/// A direct form I biquad section. Changing coefficients keeps the state.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Biquad {
    coefs: BiquadCoefs,
    x1: f64,
    x2: f64,
    y1: f64,
    y2: f64,
}

impl Biquad {
    pub fn new(coefs: BiquadCoefs) -> Self {
        Biquad {
            coefs,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    pub fn coefs(&self) -> &BiquadCoefs {
        &self.coefs
    }

    pub fn set_coefs(&mut self, coefs: BiquadCoefs) {
        self.coefs = coefs;
    }

    /// The previous inputs and outputs as `[x[n-1], x[n-2], y[n-1], y[n-2]]`.
    pub fn state(&self) -> [f64; 4] {
        [self.x1, self.x2, self.y1, self.y2]
    }

    pub fn reset(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }

    pub fn process(&mut self, x: f64) -> f64 {
        let c = &self.coefs;
        let y = c.b0 * x + c.b1 * self.x1 + c.b2 * self.x2 - c.a1 * self.y1 - c.a2 * self.y2;
        self.x2 = self.x1;
        self.x1 = x;
        self.y2 = self.y1;
        self.y1 = y;
        y
    }
}
