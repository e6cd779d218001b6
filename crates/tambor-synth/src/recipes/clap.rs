//! Hand clap: three staggered noise bursts plus a low click.
//!
//! Each burst starts 0.6 ms after the previous one with a lower velocity
//! (1.0, 0.8, 0.6) and owns its envelope phase and its highpass -> lowpass
//! band filter. The first bursts use a short fixed envelope; the last one
//! follows the voice's main envelope and carries the tail. A burst is retired
//! as soon as its own envelope, fade tail included, has run out.
//!
//! The click is a 150 Hz sine with a 3 ms decay, run through a lowpass at the
//! bursts' upper band edge so it never squeals.

use super::SineOsc;
use crate::envelope::{EnvelopeGenerator, EnvelopePhase};
use crate::settings::Adsr;
use crate::voice::{NoteFrame, Recipe};
use libm::expf;
use tambor_core::{OnePole, time_to_samples};

/// Number of noise bursts per clap.
pub const CLAP_BURSTS: usize = 3;

const STAGGER_SECONDS: f32 = 0.0006;
const BURST_VELOCITIES: [f32; CLAP_BURSTS] = [1.0, 0.8, 0.6];
const BURST_ADSR: Adsr = Adsr::new(0.0005, 0.012, 0.0, 0.008);
const BAND_WIDTH: f32 = 2.6;
const CLICK_HZ: f32 = 150.0;
const CLICK_TAU: f32 = 0.003;
const CLICK_LEVEL: f32 = 0.5;
const GAIN: f32 = 0.8;

#[derive(Debug, Clone, Copy)]
struct Burst {
    envelope: EnvelopePhase,
    hp: OnePole,
    lp: OnePole,
    delay: u32,
    active: bool,
}

/// Clap recipe.
#[derive(Debug, Clone)]
pub struct Clap {
    bursts: [Burst; CLAP_BURSTS],
    burst_envelope: EnvelopeGenerator,
    click: SineOsc,
    click_lp: OnePole,
}

impl Clap {
    /// Clap for `sample_rate`.
    pub fn new(sample_rate: f32) -> Self {
        let mut bursts = [Burst {
            envelope: EnvelopePhase::new(),
            hp: OnePole::highpass(),
            lp: OnePole::lowpass(),
            delay: 0,
            active: false,
        }; CLAP_BURSTS];
        for (k, burst) in bursts.iter_mut().enumerate() {
            burst.delay = time_to_samples(STAGGER_SECONDS * k as f32, sample_rate);
        }

        Self {
            bursts,
            burst_envelope: EnvelopeGenerator::new(&BURST_ADSR, sample_rate),
            click: SineOsc::new(),
            click_lp: OnePole::lowpass(),
        }
    }

    /// Number of bursts still sounding.
    pub fn active_bursts(&self) -> usize {
        self.bursts.iter().filter(|b| b.active).count()
    }

    /// Start offset of burst `index` in samples.
    pub fn burst_delay(&self, index: usize) -> Option<u32> {
        self.bursts.get(index).map(|b| b.delay)
    }
}

impl Recipe for Clap {
    fn trigger(&mut self, _frame: &NoteFrame<'_>) {
        for burst in &mut self.bursts {
            burst.envelope.reset();
            burst.hp.reset();
            burst.lp.reset();
            burst.active = true;
        }
        self.click.reset();
        self.click_lp.reset();
    }

    fn render(&mut self, frame: &NoteFrame<'_>) -> f32 {
        let sr = frame.sample_rate;
        let pm = frame.pitch_multiplier;
        let low = frame.settings.filter_cutoff * pm;
        let high = low * BAND_WIDTH;
        let stream_spacing = frame.noise.len() / CLAP_BURSTS;
        let last = CLAP_BURSTS - 1;

        let mut bursts = 0.0;
        for (k, burst) in self.bursts.iter_mut().enumerate() {
            if !burst.active || frame.phase < burst.delay {
                continue;
            }
            let generator = if k == last {
                frame.generator
            } else {
                &self.burst_envelope
            };
            let local = burst.envelope.phase();
            let env = generator.next(&mut burst.envelope);
            let noise = frame.noise_at(k * stream_spacing, local);
            let band = burst.lp.process(burst.hp.process(noise, low, sr), high, sr);
            bursts += band * env * BURST_VELOCITIES[k];

            if generator.is_finished(burst.envelope.phase()) {
                burst.active = false;
            }
        }

        let click = self.click.advance(CLICK_HZ * pm, sr)
            * expf(-frame.time / CLICK_TAU)
            * frame.onset()
            * CLICK_LEVEL;
        let click = self.click_lp.process(click, high, sr);

        (bursts * frame.settings.noise_level + click) * GAIN
    }

    fn is_sounding(&self) -> bool {
        self.bursts.iter().any(|b| b.active)
    }
}
