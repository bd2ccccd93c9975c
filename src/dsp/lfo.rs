//! # Low-Frequency Oscillator
//!
//! The LFO is just a phase accumulator. Every sample, the phase moves
//! forward by `frequency / sample_rate` and wraps back into `[0, 1)`;
//! the [`Waveform`] then maps that phase to an oscillator value.
//!
//! ```text
//! phase += frequency * inverse_sample_rate
//! if phase >= 1.0 { phase -= 1.0 }
//! ```
//!
//! At 44100 Hz and 5 Hz, the phase grows by ~0.000113 per sample and
//! wraps every 8820 samples.

use super::waveform::Waveform;

#[derive(Debug, Clone, Copy)]
pub struct Lfo {
    /// Normalized phase, always in `[0, 1)`.
    phase: f32,

    /// `1 / sample_rate`, cached so the per-sample update is a multiply.
    inverse_sample_rate: f32,
}

impl Lfo {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            phase: 0.0,
            inverse_sample_rate: 1.0 / sample_rate,
        }
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// The oscillator value for the current phase.
    #[inline]
    pub fn value(&self, waveform: Waveform) -> f32 {
        waveform.value(self.phase)
    }

    /// Advance the phase by one sample at `frequency_hz` and wrap it.
    ///
    /// `frequency_hz` is at most 10 Hz in this plugin, so the phase
    /// normally crosses 1.0 by a tiny amount and `rem_euclid` acts as a
    /// plain subtraction. It also handles steps larger than a period and
    /// negative frequencies.
    #[inline]
    pub fn advance(&mut self, frequency_hz: f32) {
        self.phase += frequency_hz * self.inverse_sample_rate;
        if !(0.0..1.0).contains(&self.phase) {
            self.phase = self.phase.rem_euclid(1.0);
            // `rem_euclid` rounds up to exactly 1.0 for tiny negatives.
            if self.phase >= 1.0 {
                self.phase = 0.0;
            }
        }
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}
