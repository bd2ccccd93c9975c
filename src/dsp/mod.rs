//! # DSP (Digital Signal Processing) Primitives
//!
//! The building blocks of the vibrato:
//!
//! - **`delay_line`**: a multi-channel ring buffer with one shared write
//!   head and fractional read-behind.
//! - **`interpolation`**: nearest, linear, and cubic kernels for reading
//!   between stored samples.
//! - **`lfo`**: the phase accumulator that drives the modulation.
//! - **`waveform`**: the LFO shapes (sine, triangle, two sawtooths).
//! - **`smoother`**: lock-free linear ramps for continuous parameters.

pub mod delay_line;
pub mod interpolation;
pub mod lfo;
pub mod smoother;
pub mod waveform;
