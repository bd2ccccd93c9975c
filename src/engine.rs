//! # Vibrato Engine
//!
//! Vibrato is pitch modulation produced by a delay line whose delay time
//! is swept by an LFO. Nothing is mixed with the dry signal: the output
//! is only the delayed signal, and the *changing* delay is what bends
//! the pitch, like a tape machine whose motor speeds up and slows down.
//!
//! ## Signal Flow
//!
//! ```text
//!                  ┌──────────────┐
//!                  │     LFO      │  phase += frequency / sample_rate
//!                  └──────┬───────┘
//!                         │ waveform(phase) ∈ [-1, 1]
//!                         ▼
//!        offset = 2 + width·sample_rate·(0.5 + 0.5·lfo)
//!                         │
//!                         ▼
//! Input ──► [ write ]  [ Ring Buffer ]  [ read_at(offset) ] ──► Output
//!                       (per channel,     (interpolated)
//!                        shared cursor)
//! ```
//!
//! ## Lifecycle
//!
//! ```text
//! Uninitialized ──prepare()──► Prepared ──process_block()──► Processing
//!                                  ▲                              │
//!                                  └───────────release()──────────┘
//! ```
//!
//! `prepare()` may be called again from any state to change the sample
//! rate or channel count.

use std::sync::Arc;

use nih_plug::nih_debug_assert;

use crate::dsp::delay_line::DelayBuffer;
use crate::dsp::lfo::Lfo;
use crate::error::{Result, VibratoError};
use crate::store::{ParameterStore, WIDTH_MAX_SECONDS};

/// Shortest delay the read head is ever allowed to use, in samples.
///
/// The cubic kernel reads one sample *newer* than its integer position.
/// With at least 2 samples of delay, that tap never lands on the slot
/// the current frame is about to overwrite.
pub const MIN_DELAY_SAMPLES: f32 = 2.0;

/// Extra slots on top of the widest modulation plus the minimum delay.
const HEADROOM_SAMPLES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// No sample rate yet. Processing is a contract violation.
    Uninitialized,
    /// Buffers are allocated and zeroed; no audio has been processed
    /// since the last `prepare()` or `release()`.
    Prepared,
    /// At least one block has been processed.
    Processing,
}

/// The audio-thread half of the plugin: owns the delay buffer and LFO,
/// and reads its parameters from a shared [`ParameterStore`].
pub struct VibratoEngine {
    params: Arc<ParameterStore>,
    state: EngineState,
    sample_rate: f32,
    max_block_size: usize,
    delay: DelayBuffer,
    lfo: Lfo,
}

impl VibratoEngine {
    pub fn new(params: Arc<ParameterStore>) -> Self {
        Self {
            params,
            state: EngineState::Uninitialized,
            sample_rate: 0.0,
            max_block_size: 0,
            delay: DelayBuffer::default(),
            lfo: Lfo::new(1.0),
        }
    }

    pub fn params(&self) -> &Arc<ParameterStore> {
        &self.params
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Capacity of each channel's ring, in samples. Zero before `prepare()`.
    pub fn delay_buffer_len(&self) -> usize {
        self.delay.len()
    }

    /// A modulation effect has no fixed delay to compensate for.
    pub fn latency_samples(&self) -> u32 {
        0
    }

    /// Allocate and reset everything for a new audio configuration.
    ///
    /// The ring is sized for the widest possible modulation:
    ///
    /// ```text
    /// length = floor(WIDTH_MAX_SECONDS * sample_rate) + MIN_DELAY_SAMPLES + HEADROOM
    ///   50 ms at 44100 Hz → 2205 + 2 + 3 = 2210 samples
    /// ```
    ///
    /// On error nothing is changed.
    pub fn prepare(
        &mut self,
        sample_rate: f32,
        max_block_size: usize,
        num_channels: usize,
    ) -> Result<()> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(VibratoError::InvalidSampleRate(sample_rate));
        }
        if max_block_size == 0 {
            return Err(VibratoError::InvalidBlockSize(max_block_size));
        }
        if num_channels == 0 {
            return Err(VibratoError::InvalidChannelCount(num_channels));
        }

        let max_width_samples = (WIDTH_MAX_SECONDS * sample_rate) as usize;
        let length = max_width_samples + MIN_DELAY_SAMPLES as usize + HEADROOM_SAMPLES;

        self.sample_rate = sample_rate;
        self.max_block_size = max_block_size;
        self.delay.resize(num_channels, length);
        self.lfo = Lfo::new(sample_rate);
        self.params.reset_smoothers(sample_rate);
        self.state = EngineState::Prepared;

        Ok(())
    }

    /// Return to `Prepared`: the delay buffer is zeroed, the write cursor
    /// and LFO phase are rewound, and the smoothers jump to their targets.
    /// The next block therefore sounds exactly as it would after a fresh
    /// `prepare()`. Does nothing before the first `prepare()`.
    pub fn release(&mut self) {
        if self.state == EngineState::Uninitialized {
            return;
        }

        self.delay.clear();
        self.lfo.reset();
        self.params.reset_smoothers(self.sample_rate);
        self.state = EngineState::Prepared;
    }

    /// Process one block in place. `channels[c][n]` is sample `n` of
    /// channel `c`; every channel must be the same length.
    ///
    /// Runs on the audio thread: no allocation, no locks, no logging.
    ///
    /// # Panics
    ///
    /// - before [`prepare()`](Self::prepare),
    /// - with more channels than were prepared,
    /// - with a block longer than the prepared maximum block size.
    pub fn process_block(&mut self, channels: &mut [&mut [f32]]) {
        assert!(
            self.state != EngineState::Uninitialized,
            "VibratoEngine::process_block() called before prepare()"
        );
        assert!(
            channels.len() <= self.delay.num_channels(),
            "got {} channels, prepared for {}",
            channels.len(),
            self.delay.num_channels()
        );
        let num_samples = channels.first().map_or(0, |channel| channel.len());
        assert!(
            num_samples <= self.max_block_size,
            "block of {num_samples} samples exceeds the prepared maximum of {}",
            self.max_block_size
        );

        self.state = EngineState::Processing;

        for sample_idx in 0..num_samples {
            // ─── Parameters for this frame ───
            let width = self.params.next_width();
            let frequency = self.params.next_frequency();
            let waveform = self.params.waveform();
            let interpolation = self.params.interpolation();

            // ─── Where the read head sits this frame ───
            let offset = self.delay_offset(width, self.lfo.value(waveform));

            // ─── Read behind, then overwrite the oldest slot ───
            for (channel_idx, channel) in channels.iter_mut().enumerate() {
                let input = channel[sample_idx];
                let delayed = self.delay.read_at(channel_idx, offset, interpolation);
                self.delay.write(channel_idx, input);
                channel[sample_idx] = delayed;
            }

            self.delay.advance();
            self.lfo.advance(frequency);
        }
    }

    /// Delay in samples for a width (seconds) and an LFO value in
    /// `[-1, 1]`.
    ///
    /// The unipolar LFO places the read head between the minimum delay
    /// and `width` further back:
    ///
    /// ```text
    /// offset = MIN + width·sample_rate·(0.5 + 0.5·lfo)
    ///        = (MIN + depth) + depth·lfo      where depth = width·sample_rate / 2
    /// ```
    ///
    /// and is clamped to `[MIN_DELAY_SAMPLES, length - 2]`.
    #[inline]
    pub(crate) fn delay_offset(&self, width_seconds: f32, lfo_value: f32) -> f32 {
        let width_samples = width_seconds * self.sample_rate;
        let offset = MIN_DELAY_SAMPLES + width_samples * (0.5 + 0.5 * lfo_value);
        nih_debug_assert!(offset.is_finite());

        offset.clamp(MIN_DELAY_SAMPLES, self.max_delay_offset())
    }

    fn max_delay_offset(&self) -> f32 {
        (self.delay.len().saturating_sub(2) as f32).max(MIN_DELAY_SAMPLES)
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::interpolation::Interpolation;
    use crate::dsp::waveform::Waveform;
    use crate::store::{FREQUENCY_MAX_HZ, WIDTH_MIN_SECONDS};
    use approx::assert_abs_diff_eq;

    const SAMPLE_RATE: f32 = 44_100.0;

    fn engine_with(
        width: f32,
        frequency: f32,
        waveform: Waveform,
        interpolation: Interpolation,
    ) -> VibratoEngine {
        let store = Arc::new(ParameterStore::new());
        store.set_width(width);
        store.set_frequency(frequency);
        store.set_waveform(waveform);
        store.set_interpolation(interpolation);
        VibratoEngine::new(store)
    }

    /// A deterministic, noise-like test signal in [-1, 1].
    fn test_signal(len: usize, seed: u32) -> Vec<f32> {
        let mut state = seed;
        (0..len)
            .map(|_| {
                state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                (state >> 8) as f32 / (1 << 23) as f32 - 1.0
            })
            .collect()
    }

    fn process_mono(engine: &mut VibratoEngine, signal: &mut [f32], block_size: usize) {
        for block in signal.chunks_mut(block_size) {
            engine.process_block(&mut [block]);
        }
    }

    #[test]
    #[should_panic(expected = "before prepare")]
    fn test_process_before_prepare_panics() {
        let mut engine = VibratoEngine::new(Arc::new(ParameterStore::new()));
        let mut samples = [0.0_f32; 16];
        engine.process_block(&mut [&mut samples[..]]);
    }

    #[test]
    fn test_invalid_configuration_is_rejected() {
        let mut engine = VibratoEngine::new(Arc::new(ParameterStore::new()));

        for rate in [0.0, -44_100.0, f32::NAN, f32::INFINITY] {
            assert!(matches!(
                engine.prepare(rate, 512, 2),
                Err(VibratoError::InvalidSampleRate(_))
            ));
        }
        assert!(matches!(
            engine.prepare(SAMPLE_RATE, 0, 2),
            Err(VibratoError::InvalidBlockSize(0))
        ));
        assert!(matches!(
            engine.prepare(SAMPLE_RATE, 512, 0),
            Err(VibratoError::InvalidChannelCount(0))
        ));

        assert_eq!(engine.state(), EngineState::Uninitialized);
        assert_eq!(engine.delay_buffer_len(), 0);
    }

    #[test]
    fn test_state_transitions() {
        let mut engine = VibratoEngine::new(Arc::new(ParameterStore::new()));
        assert_eq!(engine.state(), EngineState::Uninitialized);

        // Releasing before prepare is a no-op.
        engine.release();
        assert_eq!(engine.state(), EngineState::Uninitialized);

        engine.prepare(SAMPLE_RATE, 256, 2).unwrap();
        assert_eq!(engine.state(), EngineState::Prepared);
        assert_eq!(engine.delay_buffer_len(), 2210);
        assert_eq!(engine.latency_samples(), 0);

        let mut left = [0.1_f32; 256];
        let mut right = [0.2_f32; 256];
        engine.process_block(&mut [&mut left[..], &mut right[..]]);
        assert_eq!(engine.state(), EngineState::Processing);

        engine.release();
        assert_eq!(engine.state(), EngineState::Prepared);

        engine.prepare(48_000.0, 256, 1).unwrap();
        assert_eq!(engine.state(), EngineState::Prepared);
        assert_eq!(engine.delay_buffer_len(), 2400 + 5);
    }

    #[test]
    #[should_panic(expected = "prepared for 1")]
    fn test_too_many_channels_panics() {
        let mut engine = VibratoEngine::new(Arc::new(ParameterStore::new()));
        engine.prepare(SAMPLE_RATE, 64, 1).unwrap();

        let mut left = [0.0_f32; 64];
        let mut right = [0.0_f32; 64];
        engine.process_block(&mut [&mut left[..], &mut right[..]]);
    }

    #[test]
    #[should_panic(expected = "exceeds the prepared maximum")]
    fn test_oversized_block_panics() {
        let mut engine = VibratoEngine::new(Arc::new(ParameterStore::new()));
        engine.prepare(SAMPLE_RATE, 64, 1).unwrap();

        let mut samples = [0.0_f32; 65];
        engine.process_block(&mut [&mut samples[..]]);
    }

    /// Fewer channels than prepared is fine (e.g. a mono block after a
    /// stereo prepare).
    #[test]
    fn test_fewer_channels_than_prepared() {
        let mut engine = VibratoEngine::new(Arc::new(ParameterStore::new()));
        engine.prepare(SAMPLE_RATE, 64, 2).unwrap();

        let mut samples = [0.5_f32; 64];
        engine.process_block(&mut [&mut samples[..]]);
        assert!(samples.iter().all(|s| s.is_finite()));
    }

    /// With the LFO frozen at phase 0 (frequency 0, sine = 0), the delay
    /// is constant: `2 + 0.002·44100·0.5 = 46.1` samples. An impulse
    /// comes out split 90/10 across samples 46 and 47.
    #[test]
    fn test_static_delay_impulse_response() {
        let mut engine = engine_with(0.002, 0.0, Waveform::Sine, Interpolation::Linear);
        engine.prepare(SAMPLE_RATE, 128, 1).unwrap();

        let mut signal = vec![0.0_f32; 128];
        signal[0] = 1.0;
        process_mono(&mut engine, &mut signal, 128);

        for (n, &sample) in signal.iter().enumerate() {
            let expected = match n {
                46 => 0.9,
                47 => 0.1,
                _ => 0.0,
            };
            assert_abs_diff_eq!(sample, expected, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_nearest_neighbour_does_not_blend() {
        let mut engine =
            engine_with(0.002, 0.0, Waveform::Sine, Interpolation::NearestNeighbour);
        engine.prepare(SAMPLE_RATE, 128, 1).unwrap();

        let mut signal = vec![0.0_f32; 128];
        signal[0] = 1.0;
        process_mono(&mut engine, &mut signal, 128);

        let nonzero: Vec<usize> = (0..signal.len()).filter(|&n| signal[n] != 0.0).collect();
        assert_eq!(nonzero, vec![46]);
        assert_eq!(signal[46], 1.0);
    }

    /// The modulated offset stays inside `[1, length - 1]` (and inside
    /// the tighter `[2, length - 2]` clamp) for every waveform with width
    /// at its maximum.
    #[test]
    fn test_offset_bounds_at_maximum_width() {
        let mut engine = VibratoEngine::new(Arc::new(ParameterStore::new()));
        engine.prepare(SAMPLE_RATE, 512, 2).unwrap();
        let length = engine.delay_buffer_len() as f32;

        for waveform in Waveform::ALL {
            let mut highest = 0.0_f32;
            for i in 0..100_000 {
                let phase = i as f32 / 100_000.0;
                let offset = engine.delay_offset(WIDTH_MAX_SECONDS, waveform.value(phase));
                assert!(offset >= 1.0 && offset <= length - 1.0, "{waveform:?}: {offset}");
                assert!(offset >= MIN_DELAY_SAMPLES && offset <= length - 2.0);
                highest = highest.max(offset);
            }
            // The widest setting really does reach the far end.
            assert!(highest > length - 4.0, "{waveform:?} peaked at {highest}");
        }

        // Values outside the nominal range are clamped rather than
        // reaching outside the buffer.
        assert_eq!(engine.delay_offset(1.0, 1.0), length - 2.0);
        assert_eq!(engine.delay_offset(WIDTH_MIN_SECONDS, -2.0), MIN_DELAY_SAMPLES);
    }

    /// Width and frequency both at their maxima, every waveform and
    /// kernel: two seconds of noise produce finite, bounded output.
    #[test]
    fn test_extreme_settings_stay_in_bounds() {
        for waveform in Waveform::ALL {
            for interpolation in Interpolation::ALL {
                let mut engine =
                    engine_with(WIDTH_MAX_SECONDS, FREQUENCY_MAX_HZ, waveform, interpolation);
                engine.prepare(SAMPLE_RATE, 512, 2).unwrap();

                let mut left = test_signal(88_200, 1);
                let mut right = test_signal(88_200, 2);
                for (l, r) in left.chunks_mut(512).zip(right.chunks_mut(512)) {
                    engine.process_block(&mut [l, r]);
                }

                // Catmull-Rom can overshoot its inputs by up to 25%.
                for sample in left.iter().chain(right.iter()) {
                    assert!(
                        sample.is_finite() && sample.abs() <= 1.3,
                        "{waveform:?}/{interpolation:?}: {sample}"
                    );
                }
            }
        }
    }

    /// After `release()`, the engine produces exactly what a freshly
    /// prepared engine produces.
    #[test]
    fn test_release_is_deterministic() {
        let mut reused = engine_with(0.01, 3.0, Waveform::Triangle, Interpolation::Cubic);
        reused.prepare(SAMPLE_RATE, 256, 1).unwrap();
        let mut warmup = test_signal(4096, 7);
        process_mono(&mut reused, &mut warmup, 256);
        reused.release();

        let mut fresh = engine_with(0.01, 3.0, Waveform::Triangle, Interpolation::Cubic);
        fresh.prepare(SAMPLE_RATE, 256, 1).unwrap();

        let mut a = test_signal(4096, 11);
        let mut b = a.clone();
        process_mono(&mut reused, &mut a, 256);
        process_mono(&mut fresh, &mut b, 256);
        assert_eq!(a, b);
    }

    /// Block size does not change the result: all state carries over
    /// between calls.
    #[test]
    fn test_block_size_independence() {
        let input = test_signal(5000, 3);

        let mut outputs = Vec::new();
        for block_size in [1, 64, 500, 1024] {
            let mut engine = engine_with(0.005, 4.0, Waveform::Sine, Interpolation::Linear);
            engine.prepare(SAMPLE_RATE, 1024, 1).unwrap();
            let mut signal = input.clone();
            process_mono(&mut engine, &mut signal, block_size);
            outputs.push(signal);
        }

        for output in &outputs[1..] {
            assert_eq!(output, &outputs[0]);
        }
    }

    /// A width change is ramped, not jumped: sample-to-sample the read
    /// head never moves by more than the smoothing slope allows.
    #[test]
    fn test_width_change_is_smoothed() {
        let mut engine = engine_with(WIDTH_MIN_SECONDS, 0.0, Waveform::Sine, Interpolation::Linear);
        engine.prepare(SAMPLE_RATE, 4096, 1).unwrap();

        // A rising ramp as input makes the output equal to (n - delay),
        // so the delay can be read straight off the output.
        let mut signal: Vec<f32> = (0..4096).map(|n| n as f32).collect();
        engine.params().set_width(WIDTH_MAX_SECONDS);
        process_mono(&mut engine, &mut signal, 4096);

        let delays: Vec<f32> = signal
            .iter()
            .enumerate()
            .map(|(n, &out)| n as f32 - out)
            .collect();

        // A full-range width change takes 50 ms (2205 samples) and half
        // of the width reaches the read head at phase 0, so the delay
        // grows by ~0.49 samples per sample and never jumps.
        for pair in delays[100..].windows(2) {
            let step = pair[1] - pair[0];
            assert!((-0.01..0.6).contains(&step), "delay jumped: {pair:?}");
        }
        // Halfway through the ramp: 2 + 0.5·44100·(0.001 + 1001·0.049/2205).
        assert!((500.0..530.0).contains(&delays[1000]), "{}", delays[1000]);
        // Fully ramped: 2 + 0.05·44100·0.5 = 1104.5.
        assert_abs_diff_eq!(delays[4095], 1104.5, epsilon = 0.01);
    }

    /// End-to-end: 1 kHz tone, 2 ms width, 5 Hz sine LFO, linear
    /// interpolation, one second at 44.1 kHz. The output's instantaneous
    /// frequency (from zero-crossing intervals) must swing by the
    /// predicted ±π·width·rate = ±3.14% and oscillate at 5 Hz.
    #[test]
    fn test_sine_vibrato_modulates_pitch_at_lfo_rate() {
        let mut engine = engine_with(0.002, 5.0, Waveform::Sine, Interpolation::Linear);
        engine.prepare(SAMPLE_RATE, 512, 1).unwrap();

        let rate = SAMPLE_RATE as f64;
        let mut signal: Vec<f32> = (0..44_100)
            .map(|n| (std::f64::consts::TAU * 1000.0 * n as f64 / rate).sin() as f32)
            .collect();
        process_mono(&mut engine, &mut signal, 512);

        assert!(signal.iter().all(|s| s.is_finite() && s.abs() <= 1.01));

        // Positive-going zero crossings with sub-sample precision,
        // skipping the first 100 ms while the ring fills.
        let start = 4410;
        let crossings: Vec<f64> = (start..signal.len())
            .filter(|&n| signal[n - 1] < 0.0 && signal[n] >= 0.0)
            .map(|n| {
                let (a, b) = (signal[n - 1] as f64, signal[n] as f64);
                (n - 1) as f64 + a / (a - b)
            })
            .collect();
        let frequencies: Vec<f64> = crossings
            .windows(2)
            .map(|pair| rate / (pair[1] - pair[0]))
            .collect();

        let lowest = frequencies.iter().copied().fold(f64::INFINITY, f64::min);
        let highest = frequencies.iter().copied().fold(0.0, f64::max);
        let mean = frequencies.iter().sum::<f64>() / frequencies.len() as f64;
        assert!((mean - 1000.0).abs() < 3.0, "mean frequency {mean}");
        assert!(lowest < 980.0 && lowest > 955.0, "lowest frequency {lowest}");
        assert!(highest > 1020.0 && highest < 1045.0, "highest frequency {highest}");

        // Count swings between "sharp" and "flat" with ±10 Hz hysteresis.
        // 5 Hz over the remaining 0.9 s crosses the mean 9 times.
        let mut sharp: Option<bool> = None;
        let mut swings = 0;
        for &frequency in &frequencies {
            let now = if frequency > 1010.0 {
                Some(true)
            } else if frequency < 990.0 {
                Some(false)
            } else {
                None
            };
            if let Some(now) = now {
                if sharp.is_some_and(|was| was != now) {
                    swings += 1;
                }
                sharp = Some(now);
            }
        }
        assert!((8..=10).contains(&swings), "expected ~9 pitch swings, got {swings}");
    }
}
