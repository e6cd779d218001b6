//! Tambor Synth - Drum and percussion voices
//!
//! This crate is the per-voice sound generation layer of an instrument rack.
//! Given a trigger (velocity, pitch, optional per-note envelope) a voice
//! produces a finite, click-free stream of samples, one `process()` call at a
//! time, without allocating, locking or blocking.
//!
//! # Core Components
//!
//! ## Voices
//!
//! - [`Voice`] - The contract every voice implements
//! - [`ProceduralVoice`] - Shared envelope, crossfade and silence handling
//!   around a [`Recipe`] (kick, snare, rimshot, hi-hat, cymbal, tom, clap,
//!   shaker, organ)
//! - [`WavetableVoice`] - Interpolated playback of pre-resampled tables
//! - [`SampleVoice`] - Recorded buffer with trim points and looping
//! - [`DrumVoice`] - Tagged union over all of the above, built from an
//!   [`InstrumentKind`]
//!
//! ## Envelope and retrigger
//!
//! - [`EnvelopeGenerator`] - Attack, decay, release and fade tail. The release
//!   starts from the level the decay actually reached, so note ends never jump.
//! - [`RetriggerCrossfader`] - ~5 ms blend from a sounding note into a new one
//!
//! ## Settings
//!
//! - [`VoiceSettings`] - Per-instrument tone parameters
//! - [`SettingsPatch`] - Partial update merged field by field
//! - [`Adsr`] - Envelope times and sustain, also used as a per-note override
//!
//! ## Control channel
//!
//! - [`VoiceMessage`] / [`MessageReceiver`] - Messages from the control thread
//! - [`VoiceSlot`] - Applies messages at block boundaries and triggers at
//!   sample-accurate offsets
//!
//! # Example
//!
//! ```rust
//! use tambor_synth::{DrumVoice, InstrumentKind, Voice};
//!
//! let mut kick = DrumVoice::with_defaults(InstrumentKind::Kick, 44100.0);
//! kick.trigger(1.0, 60.0, None);
//!
//! let mut block = vec![0.0; 512];
//! kick.process_block(&mut block);
//! assert!(block.iter().any(|s| s.abs() > 0.01));
//!
//! while kick.is_active() {
//!     kick.process();
//! }
//! assert_eq!(kick.process(), 0.0);
//! ```
//!
//! # no_std Support
//!
//! With `default-features = false` the crate builds on `core` + `alloc`. The
//! `rtrb` feature (on by default) adds a lock-free ring buffer receiver.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod drum;
pub mod envelope;
pub mod kind;
pub mod message;
pub mod recipes;
pub mod retrigger;
pub mod sample;
pub mod settings;
pub mod voice;
pub mod wavetable;

pub use drum::DrumVoice;
pub use envelope::{EnvelopeCurve, EnvelopeGenerator, EnvelopePhase, EnvelopeState};
pub use kind::{DrumKind, InstrumentDescriptor, InstrumentKind, ParseKindError, Synthesis};
pub use message::{MAX_PENDING_TRIGGERS, MessageReceiver, VoiceMessage, VoiceSlot};
pub use retrigger::RetriggerCrossfader;
pub use sample::{END_FADE_SECONDS, SampleVoice};
pub use settings::{
    Adsr, DRAWBAR_COUNT, DRAWBAR_MAX, MAX_SEGMENT_SECONDS, SampleSelection, SettingsPatch,
    VoiceSettings,
};
pub use voice::{NoteFrame, ProceduralVoice, Recipe, SILENCE_EPSILON, Voice};
pub use wavetable::{
    DEFAULT_TABLE_RATE, NamedTable, WavetableBank, WavetableVoice, resolve_selection,
};

pub use tambor_core::NoiseBuffer;
