//! Tambor Core - DSP primitives for drum and percussion voices
//!
//! This crate provides the leaf building blocks shared by every tambor voice.
//! Everything here is allocation-free once constructed and safe to call from a
//! realtime rendering callback.
//!
//! # Core Abstractions
//!
//! ## Noise
//!
//! - [`NoiseBuffer`] - Pre-generated, immutable block of uniform noise, read with
//!   wraparound indexing and shareable between voices without locking
//! - [`Xorshift32`] - Tiny PRNG used for per-trigger offsets
//!
//! ## Filters
//!
//! - [`OnePole`] - First-order lowpass/highpass with a per-call cutoff, so
//!   pitch-tracked filtering never needs a coefficient cache
//! - [`DcBlocker`] - First-order DC removal (~7 Hz corner)
//! - [`Biquad`] - RBJ cookbook lowpass, highpass and bandpass forms
//!
//! ## Utilities
//!
//! - [`pitch_ratio`] / [`semitones_to_ratio`] - Pitch distance to playback ratio
//! - [`soft_saturate`] - Linear below a threshold, `tanh` knee above it
//! - [`flush_denormal`], [`lerp`], [`time_to_samples`], [`midi_to_freq`]
//!
//! # no_std Support
//!
//! Disable the default `std` feature to build for embedded targets. The noise
//! buffer needs `alloc`.
//!
//! ```toml
//! [dependencies]
//! tambor-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use tambor_core::{NoiseBuffer, OnePole, pitch_ratio};
//!
//! let noise = NoiseBuffer::new(4096, 7);
//! let mut hp = OnePole::highpass();
//! let cutoff = 7000.0 * pitch_ratio(65.0, 60.0);
//!
//! let mut peak = 0.0f32;
//! for n in 0..256 {
//!     peak = peak.max(hp.process(noise.sample(n), cutoff, 44100.0).abs());
//! }
//! assert!(peak > 0.0);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod biquad;
pub mod dc_blocker;
pub mod math;
pub mod noise;
pub mod one_pole;

pub use biquad::{Biquad, BiquadCoefficients, BiquadKind};
pub use dc_blocker::DcBlocker;
pub use math::{
    flush_denormal, lerp, midi_to_freq, pitch_ratio, semitones_to_ratio, soft_saturate,
    time_to_samples,
};
pub use noise::{NoiseBuffer, Xorshift32};
pub use one_pole::{OnePole, OnePoleMode};
