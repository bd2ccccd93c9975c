//! # Plugin Parameters
//!
//! Parameters are the knobs the user sees in the DAW. Each has:
//!
//! - A **unique string ID** (`#[id = "..."]`) that the host uses to save
//!   and recall presets. Once published, never change these IDs or
//!   existing presets will break. They are the same ids
//!   [`ParamId`](crate::store::ParamId) parses.
//! - A **human-readable name** shown in the DAW's UI.
//! - A **range** and a **default value**.
//!
//! ## Where smoothing happens
//!
//! These `nih-plug` parameters are the host-facing half only. Every
//! value change fires the parameter's callback, which forwards the new
//! value to the shared [`ParameterStore`] as a target. The engine then
//! reads the store, which does its own per-sample smoothing, so none of
//! the parameters here carries a `SmoothingStyle`.

use std::sync::Arc;

use nih_plug::prelude::*;

use crate::dsp::interpolation::Interpolation;
use crate::dsp::waveform::Waveform;
use crate::store::{
    ParameterStore, FREQUENCY_DEFAULT_HZ, FREQUENCY_MAX_HZ, FREQUENCY_MIN_HZ,
    WIDTH_DEFAULT_SECONDS, WIDTH_MAX_SECONDS, WIDTH_MIN_SECONDS,
};

/// All user-facing parameters for the Loveless Vibrato plugin.
#[derive(Params)]
pub struct VibratoParams {
    /// **Width**: how far the read head swings, in milliseconds.
    ///
    /// Together with the rate this sets the pitch depth: at 5 Hz, 2 ms
    /// of sine width bends the pitch about half a semitone either way.
    ///
    /// Range: 1 ms to 50 ms. Default: 10 ms.
    #[id = "width"]
    pub width: FloatParam,

    /// **LFO Frequency**: how many pitch wobbles per second.
    ///
    /// Range: 0 Hz (frozen) to 10 Hz. Default: 2 Hz.
    #[id = "freq"]
    pub frequency: FloatParam,

    /// **LFO Waveform**: the shape of the pitch movement.
    #[id = "wave"]
    pub waveform: EnumParam<Waveform>,

    /// **Interpolation**: how the delay line reads between samples.
    #[id = "interp"]
    pub interpolation: EnumParam<Interpolation>,
}

impl VibratoParams {
    /// Create the parameters with callbacks that forward every change to
    /// `store`.
    pub fn new(store: Arc<ParameterStore>) -> Self {
        Self {
            width: FloatParam::new(
                "Width",
                WIDTH_DEFAULT_SECONDS * 1000.0,
                FloatRange::Linear {
                    min: WIDTH_MIN_SECONDS * 1000.0,
                    max: WIDTH_MAX_SECONDS * 1000.0,
                },
            )
            .with_unit(" ms")
            .with_step_size(0.1)
            .with_callback({
                let store = store.clone();
                Arc::new(move |ms: f32| store.set_width(ms / 1000.0))
            }),

            frequency: FloatParam::new(
                "LFO Frequency",
                FREQUENCY_DEFAULT_HZ,
                FloatRange::Linear {
                    min: FREQUENCY_MIN_HZ,
                    max: FREQUENCY_MAX_HZ,
                },
            )
            .with_unit(" Hz")
            .with_step_size(0.01)
            .with_callback({
                let store = store.clone();
                Arc::new(move |hz: f32| store.set_frequency(hz))
            }),

            waveform: EnumParam::new("LFO Waveform", Waveform::default()).with_callback({
                let store = store.clone();
                Arc::new(move |waveform: Waveform| store.set_waveform(waveform))
            }),

            interpolation: EnumParam::new("Interpolation", Interpolation::default())
                .with_callback(Arc::new(move |interpolation: Interpolation| {
                    store.set_interpolation(interpolation)
                })),
        }
    }

    /// Copy every current value into `store`.
    ///
    /// Callbacks only fire on changes. Calling this from `initialize()`
    /// makes the store match the host's values even when they were
    /// restored before the callbacks were wired up.
    pub fn sync_to(&self, store: &ParameterStore) {
        store.set_width(self.width.value() / 1000.0);
        store.set_frequency(self.frequency.value());
        store.set_waveform(self.waveform.value());
        store.set_interpolation(self.interpolation.value());
    }
}
