//! # Vibrato Pitch Range
//!
//! How far a given width and rate bend the pitch. The delay line plays
//! back at a speed of `1 - d(delay)/dt`: while the delay grows the tape
//! runs slow (flat), while it shrinks it runs fast (sharp). The delay is
//! `width * unipolar_lfo(phase)`, so its steepest slope depends on the
//! waveform:
//!
//! | Waveform         | Slowest speed | Fastest speed |
//! |------------------|---------------|---------------|
//! | Sine             | `1 - π·w·f`   | `1 + π·w·f`   |
//! | Triangle         | `1 - 2·w·f`   | `1 + 2·w·f`   |
//! | Sawtooth         | `1 - w·f`     | `1`           |
//! | Inverse Sawtooth | `1`           | `1 + w·f`     |
//!
//! A speed ratio converts to semitones as `12·log2(speed)`. A slowest
//! speed of zero or below means the read head stops or runs backwards,
//! which has no pitch equivalent.

use std::fmt;

use crate::dsp::waveform::Waveform;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VibratoRange {
    pub min_speed: f32,
    pub max_speed: f32,
}

impl VibratoRange {
    pub fn new(width_seconds: f32, frequency_hz: f32, waveform: Waveform) -> Self {
        let depth = width_seconds * frequency_hz;
        let (min_speed, max_speed) = match waveform {
            Waveform::Sine => {
                let swing = std::f32::consts::PI * depth;
                (1.0 - swing, 1.0 + swing)
            }
            Waveform::Triangle => (1.0 - 2.0 * depth, 1.0 + 2.0 * depth),
            Waveform::Sawtooth => (1.0 - depth, 1.0),
            Waveform::InverseSawtooth => (1.0, 1.0 + depth),
        };

        Self {
            min_speed,
            max_speed,
        }
    }

    /// Lowest pitch in semitones, or `None` when the slowest speed is not
    /// positive.
    pub fn min_semitones(&self) -> Option<f32> {
        (self.min_speed > 0.0).then(|| speed_to_semitones(self.min_speed))
    }

    pub fn max_semitones(&self) -> f32 {
        speed_to_semitones(self.max_speed)
    }
}

fn speed_to_semitones(speed: f32) -> f32 {
    12.0 * speed.log2()
}

impl fmt::Display for VibratoRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vibrato range: ")?;
        match self.min_semitones() {
            Some(min) => write!(f, "{min:+.2}")?,
            None => write!(f, "-----")?,
        }
        write!(
            f,
            " to {:+.2} semitones (speed {:.3} to {:.3})",
            self.max_semitones(),
            self.min_speed,
            self.max_speed
        )
    }
}
