//! # Multi-Channel Delay Line (Ring Buffer)
//!
//! A delay line stores audio samples and lets you read them back after a
//! specified time delay. A vibrato is a delay line whose read position
//! is constantly moving: when the read head drifts away from the write
//! head the pitch drops, when it catches up the pitch rises.
//!
//! ## How a Ring Buffer Works
//!
//! Imagine a circular tape loop. A "write head" records incoming audio
//! onto the tape, and a "read head" plays it back from a position further
//! behind on the tape. The distance between the two heads is the delay.
//!
//! In code, each channel's "tape" is a `Vec<f32>` and the write head is
//! one integer index shared by every channel, because all channels of a
//! frame are recorded at the same instant. Per frame:
//!
//! 1. Read each channel `offset` samples behind `write_pos`, wrapping
//!    around to the end of the buffer if we go past the start.
//! 2. Write each channel's new sample at `write_pos`.
//! 3. Advance `write_pos` by 1, wrapping back to 0 at the end.
//!
//! Reading happens *before* writing, so the slot at `write_pos` still
//! holds the oldest sample in the buffer when the read takes place.
//!
//! ## Fractional Reads
//!
//! The read position `write_pos - offset` is rarely a whole number. It is
//! wrapped into `[0, length)` and handed to
//! [`interpolate`](super::interpolation::interpolate), which reconstructs
//! the value between stored samples using the selected kernel.

use super::interpolation::{interpolate, Interpolation};

/// A set of equally long ring buffers, one per channel, sharing a single
/// write position.
///
/// Storage is allocated in [`resize()`](Self::resize), which the engine
/// calls from `prepare()`. Nothing here allocates afterwards.
#[derive(Debug, Default)]
pub struct DelayBuffer {
    /// One ring per channel, all `length` samples long.
    channels: Vec<Vec<f32>>,

    /// Capacity of every ring in samples. Zero until the first resize.
    length: usize,

    /// Where the next frame will be written. Always `< length` once the
    /// buffer has been sized.
    write_pos: usize,
}

impl DelayBuffer {
    /// Create a zeroed buffer with `num_channels` rings of `length`
    /// samples.
    pub fn new(num_channels: usize, length: usize) -> Self {
        let mut buffer = Self::default();
        buffer.resize(num_channels, length);
        buffer
    }

    /// Reallocate for a new channel count and length. Contents are zeroed
    /// and the write position returns to 0.
    ///
    /// # Panics
    ///
    /// Panics if `length` is 0. A zero-length ring has no valid index and
    /// would divide by zero in the wrap arithmetic.
    pub fn resize(&mut self, num_channels: usize, length: usize) {
        assert!(length > 0, "delay buffer length must be > 0");

        self.channels = vec![vec![0.0; length]; num_channels];
        self.length = length;
        self.write_pos = 0;
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    pub fn write_position(&self) -> usize {
        self.write_pos
    }

    /// Store `sample` for `channel` at the current write position.
    ///
    /// **Important:** this does NOT advance the write position. Call
    /// [`advance()`](Self::advance) once per frame, after every channel
    /// has been read and written.
    #[inline]
    pub fn write(&mut self, channel: usize, sample: f32) {
        self.channels[channel][self.write_pos] = sample;
    }

    /// Read `channel` at `offset` samples behind the write position.
    ///
    /// `offset` may be fractional. The caller keeps it inside
    /// `[1, length - 1]`; an offset of 0 would return the slot that is
    /// about to be overwritten.
    ///
    /// # The index math
    ///
    /// ```text
    /// position = (write_pos - offset) mod length
    /// ```
    ///
    /// Example: `write_pos = 5`, `offset = 10.25`, `length = 100`:
    /// `5 - 10.25 = -5.25`, which wraps to `94.75`, i.e. a quarter of the
    /// way from slot 94 to slot 95.
    #[inline]
    pub fn read_at(&self, channel: usize, offset: f32, kind: Interpolation) -> f32 {
        let position = (self.write_pos as f32 - offset).rem_euclid(self.length as f32);
        interpolate(&self.channels[channel], position, kind)
    }

    /// Advance the shared write position by one frame.
    #[inline]
    pub fn advance(&mut self) {
        self.write_pos += 1;
        if self.write_pos >= self.length {
            self.write_pos = 0;
        }
    }

    /// Zero every ring and rewind the write position, keeping the
    /// allocation.
    pub fn clear(&mut self) {
        for channel in &mut self.channels {
            channel.fill(0.0);
        }
        self.write_pos = 0;
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────
