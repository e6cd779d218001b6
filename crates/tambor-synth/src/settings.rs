//! Voice settings, typed partial updates and per-note envelope overrides.
//!
//! A voice owns one [`VoiceSettings`]. Control code never replaces it
//! wholesale; it sends a [`SettingsPatch`] whose present fields win over the
//! current values, field by field. Every merged value is sanitised on the way
//! in, so render code can trust the numbers it reads.
//!
//! A trigger may carry its own [`Adsr`] that overrides the root envelope for
//! that note only. When the root envelope changes while such a note sounds,
//! the override follows the change instead of being discarded (see
//! [`Adsr::follow`]).

use alloc::string::String;

/// Longest accepted envelope segment in seconds.
pub const MAX_SEGMENT_SECONDS: f32 = 60.0;

/// Attack / decay / sustain / release, times in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Adsr {
    /// Attack time (s).
    pub attack: f32,
    /// Decay time (s).
    pub decay: f32,
    /// Level the decay settles toward, 0..=1.
    pub sustain: f32,
    /// Release time (s).
    pub release: f32,
}

impl Adsr {
    /// Envelope used when nothing else is configured.
    pub const DEFAULT: Self = Self {
        attack: 0.005,
        decay: 0.4,
        sustain: 0.0,
        release: 0.15,
    };

    /// Create an envelope description.
    pub const fn new(attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        Self {
            attack,
            decay,
            sustain,
            release,
        }
    }

    /// Clamp every field into range, replacing non-finite values with the
    /// matching field of `fallback`.
    pub fn sanitized(self, fallback: &Adsr) -> Self {
        Self {
            attack: segment(self.attack, fallback.attack),
            decay: segment(self.decay, fallback.decay),
            sustain: unit(self.sustain, fallback.sustain),
            release: segment(self.release, fallback.release),
        }
    }

    /// Carry a root-envelope change over to this per-note override.
    ///
    /// Times scale by `new / old`, so an override that was twice as long as the
    /// root stays twice as long. When the old root time was zero there is no
    /// ratio to preserve and the override takes the new root time. Sustain
    /// keeps its offset from the root level and is clamped to `[0, 1]`.
    /// Fields whose root value did not change are left alone.
    pub fn follow(&mut self, old: &Adsr, new: &Adsr) {
        self.attack = follow_time(self.attack, old.attack, new.attack);
        self.decay = follow_time(self.decay, old.decay, new.decay);
        self.release = follow_time(self.release, old.release, new.release);
        if new.sustain != old.sustain {
            self.sustain = (self.sustain + new.sustain - old.sustain).clamp(0.0, 1.0);
        }
    }

    /// Sum of attack, decay and release.
    pub fn nominal_length(&self) -> f32 {
        self.attack + self.decay + self.release
    }
}

impl Default for Adsr {
    fn default() -> Self {
        Self::DEFAULT
    }
}

fn follow_time(value: f32, old: f32, new: f32) -> f32 {
    if new == old {
        value
    } else if old.abs() < 1e-6 {
        new
    } else {
        (value * new / old).clamp(0.0, MAX_SEGMENT_SECONDS)
    }
}

fn segment(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, MAX_SEGMENT_SECONDS)
    } else {
        fallback
    }
}

fn unit(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        fallback
    }
}

fn ranged(value: f32, fallback: f32, min: f32, max: f32) -> f32 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        fallback
    }
}

/// Which table a wavetable voice plays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SampleSelection {
    /// Position in the table list for the voice's drum type.
    Index(usize),
    /// Table name, matched exactly.
    Name(String),
}

impl Default for SampleSelection {
    fn default() -> Self {
        Self::Index(0)
    }
}

/// Number of organ drawbars.
pub const DRAWBAR_COUNT: usize = 9;

/// Highest drawbar setting.
pub const DRAWBAR_MAX: f32 = 8.0;

/// Complete configuration of one voice.
///
/// Not every field matters to every voice: the organ ignores `noise_level`,
/// the hi-hat ignores `drawbars`, and only table voices read the selection
/// and trim fields.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceSettings {
    /// Root amplitude envelope.
    pub adsr: Adsr,
    /// Oscillator detune in cents (kick, organ).
    pub detune: f32,
    /// Main filter cutoff in Hz at the base pitch.
    pub filter_cutoff: f32,
    /// Filter / rattle resonance, 0..=1.
    pub resonance: f32,
    /// Noise mix level, 0..=1.
    pub noise_level: f32,
    /// Organ drawbar levels, 0..=8 each.
    pub drawbars: [f32; DRAWBAR_COUNT],
    /// MIDI pitch at which the voice sounds untransposed.
    pub base_pitch: f32,
    /// Table choice for wavetable voices.
    pub selected_sample: SampleSelection,
    /// Playback start in source samples.
    pub start_point: Option<usize>,
    /// Playback end in source samples (exclusive).
    pub end_point: Option<usize>,
    /// Wrap from `end_point` back to `start_point` instead of stopping.
    pub looping: bool,
}

impl VoiceSettings {
    /// Base pitch of procedural voices (middle C).
    pub const DEFAULT_BASE_PITCH: f32 = 60.0;

    /// Generic defaults.
    pub fn new() -> Self {
        Self {
            adsr: Adsr::DEFAULT,
            detune: 0.0,
            filter_cutoff: 5000.0,
            resonance: 0.4,
            noise_level: 1.0,
            drawbars: [8.0, 8.0, 8.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            base_pitch: Self::DEFAULT_BASE_PITCH,
            selected_sample: SampleSelection::Index(0),
            start_point: None,
            end_point: None,
            looping: false,
        }
    }

    /// Builder-style envelope replacement.
    pub fn with_adsr(mut self, adsr: Adsr) -> Self {
        self.adsr = adsr.sanitized(&Adsr::DEFAULT);
        self
    }

    /// Builder-style base pitch replacement.
    pub fn with_base_pitch(mut self, base_pitch: f32) -> Self {
        self.base_pitch = ranged(base_pitch, self.base_pitch, 0.0, 127.0);
        self
    }

    /// Merge `patch` into these settings.
    ///
    /// Precedence per field: the patch value if present, otherwise the current
    /// value. Merged values are sanitised against the current value, so a NaN
    /// in a patch leaves the field unchanged.
    ///
    /// The patch is consumed: a named selection moves into the settings
    /// without being copied, so applying a patch never allocates.
    pub fn apply(&mut self, patch: SettingsPatch) {
        let adsr = Adsr {
            attack: patch.attack.unwrap_or(self.adsr.attack),
            decay: patch.decay.unwrap_or(self.adsr.decay),
            sustain: patch.sustain.unwrap_or(self.adsr.sustain),
            release: patch.release.unwrap_or(self.adsr.release),
        };
        self.adsr = adsr.sanitized(&self.adsr);

        if let Some(v) = patch.detune {
            self.detune = ranged(v, self.detune, -100.0, 100.0);
        }
        if let Some(v) = patch.filter_cutoff {
            self.filter_cutoff = ranged(v, self.filter_cutoff, 20.0, 20_000.0);
        }
        if let Some(v) = patch.resonance {
            self.resonance = unit(v, self.resonance);
        }
        if let Some(v) = patch.noise_level {
            self.noise_level = unit(v, self.noise_level);
        }
        if let Some(bars) = patch.drawbars {
            for (dst, src) in self.drawbars.iter_mut().zip(bars) {
                *dst = ranged(src, *dst, 0.0, DRAWBAR_MAX);
            }
        }
        if let Some(v) = patch.base_pitch {
            self.base_pitch = ranged(v, self.base_pitch, 0.0, 127.0);
        }
        if let Some(selection) = patch.selected_sample {
            self.selected_sample = selection;
        }
        if let Some(v) = patch.start_point {
            self.start_point = v;
        }
        if let Some(v) = patch.end_point {
            self.end_point = v;
        }
        if let Some(v) = patch.looping {
            self.looping = v;
        }
    }

    /// Copy with `patch` merged in.
    pub fn merged(&self, patch: &SettingsPatch) -> Self {
        let mut out = self.clone();
        out.apply(patch.clone());
        out
    }

    /// Sum of all drawbar levels divided by their maximum.
    pub fn drawbar_weight(&self) -> f32 {
        self.drawbars.iter().sum::<f32>() / DRAWBAR_MAX
    }
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self::new()
    }
}

/// Partial settings update. `None` leaves a field unchanged.
///
/// Trim points are doubly optional: `Some(None)` clears a trim point.
///
/// ```rust
/// use tambor_synth::{SettingsPatch, VoiceSettings};
///
/// let mut settings = VoiceSettings::default();
/// settings.apply(SettingsPatch::new().decay(0.8).noise_level(0.5));
/// assert_eq!(settings.adsr.decay, 0.8);
/// assert_eq!(settings.noise_level, 0.5);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsPatch {
    /// New attack time (s).
    pub attack: Option<f32>,
    /// New decay time (s).
    pub decay: Option<f32>,
    /// New sustain level.
    pub sustain: Option<f32>,
    /// New release time (s).
    pub release: Option<f32>,
    /// New detune (cents).
    pub detune: Option<f32>,
    /// New filter cutoff (Hz).
    pub filter_cutoff: Option<f32>,
    /// New resonance.
    pub resonance: Option<f32>,
    /// New noise level.
    pub noise_level: Option<f32>,
    /// New drawbar levels.
    pub drawbars: Option<[f32; DRAWBAR_COUNT]>,
    /// New base pitch.
    pub base_pitch: Option<f32>,
    /// New table selection.
    pub selected_sample: Option<SampleSelection>,
    /// New start point.
    pub start_point: Option<Option<usize>>,
    /// New end point.
    pub end_point: Option<Option<usize>>,
    /// New loop flag.
    pub looping: Option<bool>,
}

impl SettingsPatch {
    /// Empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Patch that replaces the whole envelope.
    pub fn from_adsr(adsr: Adsr) -> Self {
        Self {
            attack: Some(adsr.attack),
            decay: Some(adsr.decay),
            sustain: Some(adsr.sustain),
            release: Some(adsr.release),
            ..Self::default()
        }
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// True when any envelope field is set.
    pub fn touches_envelope(&self) -> bool {
        self.attack.is_some()
            || self.decay.is_some()
            || self.sustain.is_some()
            || self.release.is_some()
    }

    /// Set attack.
    pub fn attack(mut self, seconds: f32) -> Self {
        self.attack = Some(seconds);
        self
    }

    /// Set decay.
    pub fn decay(mut self, seconds: f32) -> Self {
        self.decay = Some(seconds);
        self
    }

    /// Set sustain.
    pub fn sustain(mut self, level: f32) -> Self {
        self.sustain = Some(level);
        self
    }

    /// Set release.
    pub fn release(mut self, seconds: f32) -> Self {
        self.release = Some(seconds);
        self
    }

    /// Set detune.
    pub fn detune(mut self, cents: f32) -> Self {
        self.detune = Some(cents);
        self
    }

    /// Set filter cutoff.
    pub fn filter_cutoff(mut self, hz: f32) -> Self {
        self.filter_cutoff = Some(hz);
        self
    }

    /// Set resonance.
    pub fn resonance(mut self, amount: f32) -> Self {
        self.resonance = Some(amount);
        self
    }

    /// Set noise level.
    pub fn noise_level(mut self, level: f32) -> Self {
        self.noise_level = Some(level);
        self
    }

    /// Set drawbars.
    pub fn drawbars(mut self, levels: [f32; DRAWBAR_COUNT]) -> Self {
        self.drawbars = Some(levels);
        self
    }

    /// Set base pitch.
    pub fn base_pitch(mut self, pitch: f32) -> Self {
        self.base_pitch = Some(pitch);
        self
    }

    /// Set table selection.
    pub fn selected_sample(mut self, selection: SampleSelection) -> Self {
        self.selected_sample = Some(selection);
        self
    }

    /// Set or clear the start point.
    pub fn start_point(mut self, start: Option<usize>) -> Self {
        self.start_point = Some(start);
        self
    }

    /// Set or clear the end point.
    pub fn end_point(mut self, end: Option<usize>) -> Self {
        self.end_point = Some(end);
        self
    }

    /// Set the loop flag.
    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = Some(looping);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_merges_only_present_fields() {
        let mut s = VoiceSettings::default();
        let before = s.clone();
        s.apply(SettingsPatch::new().attack(0.02).looping(true));
        assert_eq!(s.adsr.attack, 0.02);
        assert_eq!(s.adsr.decay, before.adsr.decay);
        assert!(s.looping);
        assert_eq!(s.filter_cutoff, before.filter_cutoff);
    }

    #[test]
    fn patch_values_are_sanitised() {
        let mut s = VoiceSettings::default();
        s.apply(
            SettingsPatch::new()
                .sustain(1.7)
                .attack(-3.0)
                .decay(f32::NAN)
                .drawbars([12.0, -1.0, 4.0, 0.0, 0.0, 0.0, 0.0, 0.0, f32::INFINITY]),
        );
        assert_eq!(s.adsr.sustain, 1.0);
        assert_eq!(s.adsr.attack, 0.0);
        assert_eq!(s.adsr.decay, Adsr::DEFAULT.decay);
        assert_eq!(s.drawbars[0], 8.0);
        assert_eq!(s.drawbars[1], 0.0);
        assert_eq!(s.drawbars[2], 4.0);
        assert_eq!(s.drawbars[8], 0.0);
    }

    #[test]
    fn trim_points_can_be_cleared() {
        let mut s = VoiceSettings::default();
        s.apply(SettingsPatch::new().start_point(Some(10)).end_point(Some(20)));
        assert_eq!((s.start_point, s.end_point), (Some(10), Some(20)));
        s.apply(SettingsPatch::new().start_point(None));
        assert_eq!((s.start_point, s.end_point), (None, Some(20)));
    }

    #[test]
    fn override_times_follow_root_ratio() {
        let old = Adsr::new(0.01, 0.4, 0.2, 0.1);
        let new = Adsr::new(0.02, 0.2, 0.2, 0.1);
        let mut over = Adsr::new(0.005, 1.0, 0.5, 0.3);
        over.follow(&old, &new);
        assert!((over.attack - 0.01).abs() < 1e-6);
        assert!((over.decay - 0.5).abs() < 1e-6);
        assert_eq!(over.release, 0.3);
        assert_eq!(over.sustain, 0.5);
    }

    #[test]
    fn override_sustain_keeps_offset_and_clamps() {
        let old = Adsr::new(0.01, 0.4, 0.2, 0.1);
        let mut over = Adsr::new(0.01, 0.4, 0.5, 0.1);
        over.follow(&old, &Adsr::new(0.01, 0.4, 0.4, 0.1));
        assert!((over.sustain - 0.7).abs() < 1e-6);
        over.follow(&Adsr::new(0.01, 0.4, 0.4, 0.1), &Adsr::new(0.01, 0.4, 0.9, 0.1));
        assert_eq!(over.sustain, 1.0);
    }

    #[test]
    fn override_adopts_new_time_when_old_was_zero() {
        let old = Adsr::new(0.0, 0.4, 0.0, 0.1);
        let new = Adsr::new(0.03, 0.4, 0.0, 0.1);
        let mut over = Adsr::new(0.0, 0.2, 0.0, 0.1);
        over.follow(&old, &new);
        assert_eq!(over.attack, 0.03);
    }

    #[test]
    fn empty_patch_is_empty() {
        assert!(SettingsPatch::new().is_empty());
        assert!(!SettingsPatch::new().looping(false).is_empty());
        assert!(SettingsPatch::from_adsr(Adsr::DEFAULT).touches_envelope());
    }
}
