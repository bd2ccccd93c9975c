//! # LFO Waveforms
//!
//! The vibrato's LFO is a phase accumulator (see [`lfo`](super::lfo));
//! this module turns a phase in `[0, 1)` into an oscillator value in
//! `[-1, 1]`. The shape decides how the pitch moves:
//!
//! ```text
//! Sine              Triangle          Sawtooth          Inverse Sawtooth
//!  1 ┤ ╭─╮           1 ┤ ╱╲            1 ┤   ╱│           1 ┤│╲
//!  0 ┼╯   ╰╮   ╭     0 ┼╱  ╲   ╱       0 ┤  ╱ │           0 ┤│ ╲
//! -1 ┤     ╰─╯      -1 ┤    ╲╱        -1 ┤ ╱  │          -1 ┤│  ╲
//!    0    0.5    1     0   0.5   1       0        1         0        1
//! ```
//!
//! - **Sine** sweeps the pitch smoothly above and below the input pitch.
//! - **Triangle** does the same with constant speed, so the pitch jumps
//!   between two fixed values.
//! - **Sawtooth** lengthens the delay at a constant rate (pitch held
//!   flat) and snaps back once per period.
//! - **Inverse Sawtooth** shortens the delay at a constant rate (pitch
//!   held sharp) and snaps back once per period.
//!
//! Sine and Triangle share the same phase alignment: both are 0 at
//! phase 0, peak at 0.25, and bottom out at 0.75.

use std::f32::consts::TAU;

use nih_plug::prelude::Enum;
use serde::{Deserialize, Serialize};

/// The LFO shape. Also exposed to the host as an `EnumParam`, so the
/// `#[id]`s are part of saved presets and must never change.
#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Waveform {
    #[default]
    #[id = "sine"]
    Sine,

    #[id = "triangle"]
    Triangle,

    #[id = "saw"]
    #[name = "Sawtooth (rising)"]
    Sawtooth,

    #[id = "inverse-saw"]
    #[name = "Sawtooth (falling)"]
    InverseSawtooth,
}

impl Waveform {
    pub const ALL: [Waveform; 4] = [
        Waveform::Sine,
        Waveform::Triangle,
        Waveform::Sawtooth,
        Waveform::InverseSawtooth,
    ];

    /// Evaluate the waveform at `phase` (normalized, `[0, 1)`).
    ///
    /// Returns a value in `[-1, 1]`. Sawtooth and Inverse Sawtooth have
    /// their discontinuity at the wrap from phase 1 back to 0; the other
    /// shapes are continuous there.
    #[inline]
    pub fn value(self, phase: f32) -> f32 {
        match self {
            Waveform::Sine => (TAU * phase).sin(),
            Waveform::Triangle => {
                // Four straight segments of slope ±4:
                //   [0.00, 0.25):  0 → 1
                //   [0.25, 0.75):  1 → -1
                //   [0.75, 1.00): -1 → 0
                if phase < 0.25 {
                    4.0 * phase
                } else if phase < 0.75 {
                    2.0 - 4.0 * phase
                } else {
                    4.0 * phase - 4.0
                }
            }
            Waveform::Sawtooth => 2.0 * phase - 1.0,
            Waveform::InverseSawtooth => 1.0 - 2.0 * phase,
        }
    }

    /// The same waveform rescaled to `[0, 1]`. This is the fraction of
    /// the modulation width the delay line reads behind its minimum
    /// delay.
    #[inline]
    pub fn unipolar(self, phase: f32) -> f32 {
        0.5 + 0.5 * self.value(phase)
    }
}
