//! Crossfade from a still-sounding note into a retriggered one.
//!
//! Resetting a voice that is mid-note would drop its output to whatever the
//! new note starts at (usually zero), which is a click. Instead the trailing
//! output is held, lightly smoothed toward the new signal, and blended out
//! over a ~5 ms window:
//!
//! ```text
//! last = last * 0.95 + new * 0.05
//! out  = last * (1 - p) + new * p        p = phase / fade_samples
//! ```
//!
//! The two blend weights always sum to one. After the window the new note's
//! samples pass through unchanged.

/// Retrigger crossfade state owned by one voice.
#[derive(Debug, Clone, Copy)]
pub struct RetriggerCrossfader {
    was_active: bool,
    phase: u32,
    fade_samples: u32,
    last_output: f32,
}

impl RetriggerCrossfader {
    /// Crossfade window in seconds.
    pub const FADE_SECONDS: f32 = 0.005;

    /// Trailing-sample smoothing factor.
    pub const SMOOTHING: f32 = 0.95;

    /// Crossfader for `sample_rate`: `floor(0.005 * sample_rate)` samples.
    pub fn new(sample_rate: f32) -> Self {
        let fade_samples = libm::floorf(Self::FADE_SECONDS * sample_rate + 1e-3).max(1.0) as u32;
        Self {
            was_active: false,
            phase: 0,
            fade_samples,
            last_output: 0.0,
        }
    }

    /// Note a trigger. A crossfade starts only if the voice was sounding.
    pub fn trigger(&mut self, was_active: bool) {
        if was_active {
            self.was_active = true;
            self.phase = 0;
        } else {
            self.reset();
        }
    }

    /// Blend the new note's sample with the trailing output.
    #[inline]
    pub fn process(&mut self, new_sample: f32) -> f32 {
        if !self.was_active {
            self.last_output = new_sample;
            return new_sample;
        }

        let (held, incoming) = self.weights();
        debug_assert!(self.phase < self.fade_samples);
        self.last_output =
            self.last_output * Self::SMOOTHING + new_sample * (1.0 - Self::SMOOTHING);
        let out = self.last_output * held + new_sample * incoming;

        self.phase += 1;
        if self.phase >= self.fade_samples {
            self.was_active = false;
            self.last_output = out;
        }
        out
    }

    /// Weights `(trailing, new)` for the next processed sample.
    ///
    /// Outside a crossfade this is `(0, 1)`.
    pub fn weights(&self) -> (f32, f32) {
        if self.was_active {
            let p = self.phase as f32 / self.fade_samples as f32;
            (1.0 - p, p)
        } else {
            (0.0, 1.0)
        }
    }

    /// True while a crossfade is running.
    pub fn is_fading(&self) -> bool {
        self.was_active
    }

    /// Samples into the current crossfade.
    pub fn phase(&self) -> u32 {
        self.phase
    }

    /// Crossfade window length in samples.
    pub fn fade_samples(&self) -> u32 {
        self.fade_samples
    }

    /// Most recent (smoothed) output.
    pub fn last_output(&self) -> f32 {
        self.last_output
    }

    /// Drop any crossfade and forget the trailing output.
    pub fn reset(&mut self) {
        self.was_active = false;
        self.phase = 0;
        self.last_output = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fade_length_is_floor_of_five_ms() {
        assert_eq!(RetriggerCrossfader::new(44100.0).fade_samples(), 220);
        assert_eq!(RetriggerCrossfader::new(48000.0).fade_samples(), 240);
    }

    #[test]
    fn passthrough_when_not_retriggered() {
        let mut xf = RetriggerCrossfader::new(44100.0);
        xf.trigger(false);
        assert_eq!(xf.process(0.3), 0.3);
        assert_eq!(xf.last_output(), 0.3);
    }

    #[test]
    fn crossfade_runs_exactly_window_length() {
        let mut xf = RetriggerCrossfader::new(44100.0);
        xf.process(0.8);
        xf.trigger(true);
        let mut steps = 0;
        while xf.is_fading() {
            let (a, b) = xf.weights();
            assert!((a + b - 1.0).abs() < 1e-6);
            xf.process(0.0);
            steps += 1;
        }
        assert_eq!(steps, 220);
        assert_eq!(xf.process(0.25), 0.25);
    }

    #[test]
    fn first_blended_sample_moves_only_by_smoothing_step() {
        let mut xf = RetriggerCrossfader::new(44100.0);
        let prev = xf.process(0.9);
        xf.trigger(true);
        let first = xf.process(-0.9);
        assert!((first - prev).abs() <= 0.05 * 1.8 + 1e-6);
    }

    #[test]
    fn trigger_while_idle_clears_state() {
        let mut xf = RetriggerCrossfader::new(44100.0);
        xf.process(0.5);
        xf.trigger(false);
        assert!(!xf.is_fading());
        assert_eq!(xf.last_output(), 0.0);
    }
}
