//! # Loveless Vibrato — An AU/VST3/CLAP Vibrato Plugin
//!
//! A vibrato effect plugin built with [nih-plug](https://github.com/robbert-vdh/nih-plug)
//! for learning DSP fundamentals. Outputs Audio Unit (AUv2), VST3, and
//! CLAP formats from a single codebase.
//!
//! ## Signal Flow
//!
//! ```text
//!              ┌───────────────────────────────┐
//!              │ LFO (sine / triangle / saws)  │ ◄── Frequency, Waveform
//!              └───────────────┬───────────────┘
//!                              │ modulates delay time ◄── Width
//!                              ▼
//! Input ──► [Ring Buffer / Delay Line] ──► [Interpolated read] ──► Output
//!                                                ▲
//!                                                └── Interpolation
//! ```
//!
//! There is no dry signal and no feedback: the output is entirely the
//! delayed signal, and the moving read head is what changes the pitch.
//!
//! ## Layout
//!
//! - [`dsp`]: delay buffer, interpolation kernels, LFO, waveforms,
//!   smoothers.
//! - [`store`]: the lock-free parameter store shared by the control side
//!   and the audio thread, plus the state blob.
//! - [`engine`]: the per-block vibrato processor and its lifecycle.
//! - [`params`]: the host-facing `nih-plug` parameters.

pub mod dsp;
pub mod engine;
pub mod error;
pub mod params;
pub mod pitch_range;
pub mod store;

use std::num::NonZeroU32;
use std::sync::Arc;

use engine::VibratoEngine;
use nih_plug::prelude::*;
use params::VibratoParams;
use store::ParameterStore;

/// The main plugin struct.
///
/// Parameters (`VibratoParams`) are shared with the host via `Arc` and
/// written from whatever thread the host likes; each change is forwarded
/// into the `ParameterStore`. The engine, which owns the delay buffer and
/// LFO, is only touched by the audio thread in `process()` and by the
/// lifecycle callbacks while audio is stopped.
struct LovelessVibrato {
    params: Arc<VibratoParams>,

    /// Same store the parameter callbacks write into and the engine
    /// reads from.
    store: Arc<ParameterStore>,

    engine: VibratoEngine,
}

impl Default for LovelessVibrato {
    fn default() -> Self {
        let store = Arc::new(ParameterStore::new());
        Self {
            params: Arc::new(VibratoParams::new(store.clone())),
            // Unprepared until initialize() tells us the sample rate.
            engine: VibratoEngine::new(store.clone()),
            store,
        }
    }
}

impl Plugin for LovelessVibrato {
    const NAME: &'static str = "Loveless Vibrato";
    const VENDOR: &'static str = "Loveless Audio";
    const URL: &'static str = "";
    const EMAIL: &'static str = "steve.loveless@gmail.com";
    const VERSION: &'static str = env!("CARGO_PKG_VERSION");

    // Stereo first, since most DAW tracks are stereo; mono as fallback.
    const AUDIO_IO_LAYOUTS: &'static [AudioIOLayout] = &[
        AudioIOLayout {
            main_input_channels: NonZeroU32::new(2),
            main_output_channels: NonZeroU32::new(2),
            aux_input_ports: &[],
            aux_output_ports: &[],
            names: PortNames::const_default(),
        },
        AudioIOLayout {
            main_input_channels: NonZeroU32::new(1),
            main_output_channels: NonZeroU32::new(1),
            aux_input_ports: &[],
            aux_output_ports: &[],
            names: PortNames::const_default(),
        },
    ];

    const MIDI_INPUT: MidiConfig = MidiConfig::None;

    const SAMPLE_ACCURATE_AUTOMATION: bool = true;

    type SysExMessage = ();
    type BackgroundTask = ();

    fn params(&self) -> Arc<dyn Params> {
        self.params.clone()
    }

    /// Called when the plugin is first loaded, or when the audio
    /// configuration changes. Allocates the delay buffer for the new
    /// sample rate and channel count.
    ///
    /// Returning `false` tells the host the plugin can't work with this
    /// configuration.
    fn initialize(
        &mut self,
        audio_io_layout: &AudioIOLayout,
        buffer_config: &BufferConfig,
        context: &mut impl InitContext<Self>,
    ) -> bool {
        let num_channels = audio_io_layout
            .main_input_channels
            .map(|c| c.get() as usize)
            .unwrap_or(2);

        // The host may have restored a preset before we got here.
        self.params.sync_to(&self.store);

        if let Err(err) = self.engine.prepare(
            buffer_config.sample_rate,
            buffer_config.max_buffer_size as usize,
            num_channels,
        ) {
            nih_error!("Failed to prepare the vibrato engine: {err}");
            return false;
        }

        context.set_latency_samples(self.engine.latency_samples());

        nih_log!(
            "Prepared {num_channels} channel(s) at {} Hz, delay buffer {} samples. {}",
            buffer_config.sample_rate,
            self.engine.delay_buffer_len(),
            self.store.vibrato_range()
        );

        true
    }

    /// Called when playback stops or the plugin is bypassed. Clears the
    /// delay buffer and rewinds the LFO so stale audio doesn't bleed into
    /// the next playback.
    fn reset(&mut self) {
        self.engine.release();
    }

    fn deactivate(&mut self) {
        self.engine.release();
    }

    /// The host calls this repeatedly with small blocks of audio. The
    /// engine processes them in place, frame by frame.
    fn process(
        &mut self,
        buffer: &mut Buffer,
        _aux: &mut AuxiliaryBuffers,
        _context: &mut impl ProcessContext<Self>,
    ) -> ProcessStatus {
        self.engine.process_block(buffer.as_slice());

        // No tail: once the input stops, the delay line is emptied within
        // at most 50 ms, which the host's own silence handling covers.
        ProcessStatus::Normal
    }
}

// ─────────────────────────────────────────────────────────────────────
// Plugin format trait implementations
// ─────────────────────────────────────────────────────────────────────

impl ClapPlugin for LovelessVibrato {
    const CLAP_ID: &'static str = "com.loveless-audio.loveless-vibrato-v1";
    const CLAP_DESCRIPTION: Option<&'static str> =
        Some("A vibrato plugin with selectable LFO shapes, built for learning DSP");
    const CLAP_MANUAL_URL: Option<&'static str> = None;
    const CLAP_SUPPORT_URL: Option<&'static str> = None;
    const CLAP_FEATURES: &'static [ClapFeature] = &[
        ClapFeature::AudioEffect,
        ClapFeature::Stereo,
        ClapFeature::Mono,
    ];
}

impl Vst3Plugin for LovelessVibrato {
    // 16 ASCII bytes, unique to this plugin.
    const VST3_CLASS_ID: [u8; 16] = *b"LvlssVibrato_v01";

    const VST3_SUBCATEGORIES: &'static [Vst3SubCategory] =
        &[Vst3SubCategory::Fx, Vst3SubCategory::Modulation];
}

// ─────────────────────────────────────────────────────────────────────
// Export macros
// ─────────────────────────────────────────────────────────────────────
//
// nih_export_clap! exports the `clap_entry` symbol for CLAP hosts.
// nih_export_vst3! exports `GetPluginFactory` for VST3 hosts.
// clap_wrapper re-exports the CLAP entry point as AUv2 for Logic Pro.

nih_export_clap!(LovelessVibrato);
nih_export_vst3!(LovelessVibrato);

clap_wrapper::export_auv2!();
