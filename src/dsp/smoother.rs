//! # Linear Parameter Smoothing
//!
//! When a user moves a knob, the parameter value jumps instantly. In a
//! vibrato, an instant jump in width moves the read head by many samples
//! in one step, which is heard as a click. Smoothing ramps the value from
//! old to new instead.
//!
//! This smoother is a slew limiter: each sample, the current value moves
//! toward the target by at most `max_step`, where `max_step` is chosen so
//! that a full-range jump takes exactly the smoothing time:
//!
//! ```text
//! max_step = (max - min) / (smoothing_seconds * sample_rate)
//! current += clamp(target - current, -max_step, max_step)
//! ```
//!
//! Smaller jumps finish sooner, and the value never overshoots.
//!
//! ## Threads
//!
//! The target is written from the host's control threads and the current
//! value is advanced by the audio thread. Each is a single `AtomicF32`
//! accessed with relaxed ordering, so neither side ever blocks; the audio
//! thread may see a new target one sample late, which is inaudible.

use std::sync::atomic::Ordering;

use atomic_float::AtomicF32;

#[derive(Debug)]
pub struct LinearSmoother {
    target: AtomicF32,
    current: AtomicF32,
    /// Largest change per sample. Infinite until [`reset()`](Self::reset)
    /// has been given a sample rate, so the value follows its target
    /// immediately before playback starts.
    max_step: AtomicF32,
    /// `max - min` of the parameter range.
    span: f32,
    smoothing_ms: f32,
}

impl LinearSmoother {
    pub fn new(initial: f32, span: f32, smoothing_ms: f32) -> Self {
        Self {
            target: AtomicF32::new(initial),
            current: AtomicF32::new(initial),
            max_step: AtomicF32::new(f32::INFINITY),
            span,
            smoothing_ms,
        }
    }

    /// Set a new target. The caller is responsible for range clamping.
    pub fn set_target(&self, value: f32) {
        self.target.store(value, Ordering::Relaxed);
    }

    pub fn target(&self) -> f32 {
        self.target.load(Ordering::Relaxed)
    }

    /// The value most recently produced by [`next()`](Self::next).
    pub fn current(&self) -> f32 {
        self.current.load(Ordering::Relaxed)
    }

    /// Configure the ramp for `sample_rate` and jump straight to the
    /// target. Called from `prepare()`, never during playback.
    pub fn reset(&self, sample_rate: f32) {
        let smoothing_samples = self.smoothing_ms / 1000.0 * sample_rate;
        let max_step = if smoothing_samples > 0.0 {
            self.span / smoothing_samples
        } else {
            f32::INFINITY
        };

        self.max_step.store(max_step, Ordering::Relaxed);
        self.current.store(self.target(), Ordering::Relaxed);
    }

    /// Advance one sample toward the target and return the new value.
    #[inline]
    pub fn next(&self) -> f32 {
        let target = self.target.load(Ordering::Relaxed);
        let current = self.current.load(Ordering::Relaxed);
        let max_step = self.max_step.load(Ordering::Relaxed);

        let next = current + (target - current).clamp(-max_step, max_step);
        self.current.store(next, Ordering::Relaxed);
        next
    }
}
