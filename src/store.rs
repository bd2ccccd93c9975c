//! # Parameter Store
//!
//! The single place the audio engine reads its parameters from. It is
//! shared through an `Arc` between the control side (the host's
//! parameter callbacks, or tests) and the audio thread:
//!
//! - The control side only writes **targets**, through
//!   [`ParameterStore::set_target`] or the typed setters. Every value is
//!   clamped into its declared range here, so callers never validate.
//! - The audio thread only reads. Width and frequency are smoothed by a
//!   [`LinearSmoother`] that it advances once per sample; the waveform and
//!   interpolation selectors switch immediately.
//!
//! Every field is one atomic scalar, so neither side ever takes a lock.
//!
//! The store also owns the flat state blob: [`serialize_state`] writes the
//! four targets as a JSON object and [`deserialize_state`] reads it back.
//!
//! [`serialize_state`]: ParameterStore::serialize_state
//! [`deserialize_state`]: ParameterStore::deserialize_state

use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};

use nih_plug::prelude::Enum;
use serde::{Deserialize, Serialize};

use crate::dsp::interpolation::Interpolation;
use crate::dsp::smoother::LinearSmoother;
use crate::dsp::waveform::Waveform;
use crate::error::{Result, VibratoError};
use crate::pitch_range::VibratoRange;

/// Narrowest modulation width: 1 ms.
pub const WIDTH_MIN_SECONDS: f32 = 0.001;
/// Widest modulation width: 50 ms. Sizes the delay buffer.
pub const WIDTH_MAX_SECONDS: f32 = 0.050;
pub const WIDTH_DEFAULT_SECONDS: f32 = 0.010;

pub const FREQUENCY_MIN_HZ: f32 = 0.0;
pub const FREQUENCY_MAX_HZ: f32 = 10.0;
pub const FREQUENCY_DEFAULT_HZ: f32 = 2.0;

/// Width moves the read head directly, so it gets the longer ramp.
const WIDTH_SMOOTHING_MS: f32 = 50.0;
const FREQUENCY_SMOOTHING_MS: f32 = 20.0;

/// Identifies one of the four parameters.
///
/// The string ids double as the host parameter ids in
/// [`VibratoParams`](crate::params::VibratoParams); once published they
/// must never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamId {
    Width,
    Frequency,
    Waveform,
    Interpolation,
}

impl ParamId {
    pub const ALL: [ParamId; 4] = [
        ParamId::Width,
        ParamId::Frequency,
        ParamId::Waveform,
        ParamId::Interpolation,
    ];

    pub fn id(self) -> &'static str {
        match self {
            ParamId::Width => "width",
            ParamId::Frequency => "freq",
            ParamId::Waveform => "wave",
            ParamId::Interpolation => "interp",
        }
    }
}

impl FromStr for ParamId {
    type Err = VibratoError;

    fn from_str(s: &str) -> Result<Self> {
        ParamId::ALL
            .into_iter()
            .find(|param| param.id() == s)
            .ok_or_else(|| VibratoError::UnknownParameter(s.to_string()))
    }
}

/// The persisted form of the store: all four targets, nothing else.
///
/// `#[serde(default)]` fills any missing key from [`Default`], so blobs
/// written by older versions keep loading. Unknown keys are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterState {
    /// Seconds.
    pub width: f32,
    /// Hz.
    pub frequency: f32,
    pub waveform: Waveform,
    pub interpolation: Interpolation,
}

impl Default for ParameterState {
    fn default() -> Self {
        Self {
            width: WIDTH_DEFAULT_SECONDS,
            frequency: FREQUENCY_DEFAULT_HZ,
            waveform: Waveform::default(),
            interpolation: Interpolation::default(),
        }
    }
}

#[derive(Debug)]
pub struct ParameterStore {
    width: LinearSmoother,
    frequency: LinearSmoother,
    /// `Enum::to_index()` of the selected [`Waveform`].
    waveform: AtomicUsize,
    /// `Enum::to_index()` of the selected [`Interpolation`].
    interpolation: AtomicUsize,
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterStore {
    pub fn new() -> Self {
        let defaults = ParameterState::default();
        Self {
            width: LinearSmoother::new(
                defaults.width,
                WIDTH_MAX_SECONDS - WIDTH_MIN_SECONDS,
                WIDTH_SMOOTHING_MS,
            ),
            frequency: LinearSmoother::new(
                defaults.frequency,
                FREQUENCY_MAX_HZ - FREQUENCY_MIN_HZ,
                FREQUENCY_SMOOTHING_MS,
            ),
            waveform: AtomicUsize::new(defaults.waveform.to_index()),
            interpolation: AtomicUsize::new(defaults.interpolation.to_index()),
        }
    }

    // ─── Control side: targets ───

    /// Set a parameter's target from a plain number.
    ///
    /// Width is in seconds and frequency in Hz. Selectors take the
    /// variant index (`Sine = 0`, ...), rounded to the nearest variant.
    /// Everything is clamped into range; a NaN is ignored because it has
    /// no place in any range.
    pub fn set_target(&self, param: ParamId, value: f32) {
        if value.is_nan() {
            return;
        }

        match param {
            ParamId::Width => self.set_width(value),
            ParamId::Frequency => self.set_frequency(value),
            ParamId::Waveform => {
                self.set_waveform(Waveform::from_index(selector_index(value, Waveform::ALL.len())))
            }
            ParamId::Interpolation => self.set_interpolation(Interpolation::from_index(
                selector_index(value, Interpolation::ALL.len()),
            )),
        }
    }

    pub fn set_width(&self, seconds: f32) {
        if !seconds.is_nan() {
            self.width
                .set_target(seconds.clamp(WIDTH_MIN_SECONDS, WIDTH_MAX_SECONDS));
        }
    }

    pub fn set_frequency(&self, hz: f32) {
        if !hz.is_nan() {
            self.frequency
                .set_target(hz.clamp(FREQUENCY_MIN_HZ, FREQUENCY_MAX_HZ));
        }
    }

    pub fn set_waveform(&self, waveform: Waveform) {
        self.waveform.store(waveform.to_index(), Ordering::Relaxed);
    }

    pub fn set_interpolation(&self, interpolation: Interpolation) {
        self.interpolation
            .store(interpolation.to_index(), Ordering::Relaxed);
    }

    /// A parameter's target as a plain number (see [`set_target`](Self::set_target)).
    pub fn target(&self, param: ParamId) -> f32 {
        match param {
            ParamId::Width => self.width.target(),
            ParamId::Frequency => self.frequency.target(),
            ParamId::Waveform => self.waveform().to_index() as f32,
            ParamId::Interpolation => self.interpolation().to_index() as f32,
        }
    }

    /// A parameter's most recent smoothed value. Selectors have no ramp,
    /// so this equals their target.
    pub fn current(&self, param: ParamId) -> f32 {
        match param {
            ParamId::Width => self.width.current(),
            ParamId::Frequency => self.frequency.current(),
            ParamId::Waveform | ParamId::Interpolation => self.target(param),
        }
    }

    pub fn waveform(&self) -> Waveform {
        Waveform::from_index(self.waveform.load(Ordering::Relaxed))
    }

    pub fn interpolation(&self) -> Interpolation {
        Interpolation::from_index(self.interpolation.load(Ordering::Relaxed))
    }

    /// The pitch range the current targets produce, for display.
    pub fn vibrato_range(&self) -> VibratoRange {
        VibratoRange::new(
            self.width.target(),
            self.frequency.target(),
            self.waveform(),
        )
    }

    // ─── Audio side: smoothing ───

    /// Configure the ramps for `sample_rate` and jump to the targets.
    pub(crate) fn reset_smoothers(&self, sample_rate: f32) {
        self.width.reset(sample_rate);
        self.frequency.reset(sample_rate);
    }

    #[inline]
    pub(crate) fn next_width(&self) -> f32 {
        self.width.next()
    }

    #[inline]
    pub(crate) fn next_frequency(&self) -> f32 {
        self.frequency.next()
    }

    // ─── Persistence ───

    pub fn state(&self) -> ParameterState {
        ParameterState {
            width: self.width.target(),
            frequency: self.frequency.target(),
            waveform: self.waveform(),
            interpolation: self.interpolation(),
        }
    }

    /// Set all four targets, clamping as [`set_target`](Self::set_target) does.
    pub fn apply_state(&self, state: &ParameterState) {
        self.set_width(state.width);
        self.set_frequency(state.frequency);
        self.set_waveform(state.waveform);
        self.set_interpolation(state.interpolation);
    }

    /// Serialize the targets, e.g.
    /// `{"width":0.01,"frequency":2.0,"waveform":"Sine","interpolation":"Linear"}`.
    pub fn serialize_state(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&self.state())?)
    }

    /// Restore targets from a blob written by [`serialize_state`](Self::serialize_state).
    ///
    /// The blob is parsed completely before anything is applied, so a
    /// malformed blob returns [`VibratoError::State`] and leaves every
    /// target as it was.
    pub fn deserialize_state(&self, bytes: &[u8]) -> Result<()> {
        let state: ParameterState = serde_json::from_slice(bytes)?;
        self.apply_state(&state);
        Ok(())
    }
}

/// Round a plain value to a selector index in `0..count`.
fn selector_index(value: f32, count: usize) -> usize {
    value.round().clamp(0.0, (count - 1) as f32) as usize
}
