//! Shared CLI helpers used across multiple commands.

use anyhow::{Context, bail};
use std::collections::VecDeque;
use std::path::Path;
use tambor_config::{DefaultsTable, InstrumentDefaults};
use tambor_synth::{Adsr, SampleSelection, Voice, VoiceMessage, VoiceSettings, VoiceSlot};

/// Samples rendered per block.
pub const BLOCK_SIZE: usize = 256;

/// Parse a `key=value` string for clap's `value_parser`.
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) => Ok((key.trim().to_string(), value.trim().to_string())),
        None => Err(format!(
            "Invalid parameter format: '{}' (expected key=value)",
            s
        )),
    }
}

/// Load the defaults table from `path`, or the factory table when absent.
pub fn load_defaults(path: Option<&Path>) -> anyhow::Result<DefaultsTable> {
    match path {
        Some(path) => DefaultsTable::load(path)
            .with_context(|| format!("loading defaults from {}", path.display())),
        None => Ok(DefaultsTable::factory()),
    }
}

fn number(key: &str, value: &str) -> anyhow::Result<f32> {
    value
        .parse()
        .with_context(|| format!("'{key}' expects a number, got '{value}'"))
}

/// Set one field of `entry` from a command-line `key=value` pair.
pub fn set_param(entry: &mut InstrumentDefaults, key: &str, value: &str) -> anyhow::Result<()> {
    match key.to_ascii_lowercase().replace('-', "_").as_str() {
        "attack" => entry.attack = Some(number(key, value)?),
        "decay" => entry.decay = Some(number(key, value)?),
        "sustain" => entry.sustain = Some(number(key, value)?),
        "release" => entry.release = Some(number(key, value)?),
        "detune" => entry.detune = Some(number(key, value)?),
        "cutoff" | "filter_cutoff" => entry.filter_cutoff = Some(number(key, value)?),
        "resonance" => entry.resonance = Some(number(key, value)?),
        "noise" | "noise_level" => entry.noise_level = Some(number(key, value)?),
        "base_pitch" => entry.base_pitch = Some(number(key, value)?),
        "drawbars" => {
            let levels = value
                .split(',')
                .map(|v| number(key, v.trim()))
                .collect::<anyhow::Result<Vec<_>>>()?;
            entry.drawbars = Some(levels);
        }
        "sample" => match value.parse::<usize>() {
            Ok(index) => entry.sample_index = Some(index),
            Err(_) => entry.sample_name = Some(value.to_string()),
        },
        "start" | "start_point" => {
            entry.start_point = Some(value.parse().context("start expects a sample index")?);
        }
        "end" | "end_point" => {
            entry.end_point = Some(value.parse().context("end expects a sample index")?);
        }
        "loop" | "looping" => {
            entry.looping = Some(value.parse().context("loop expects true or false")?);
        }
        _ => bail!("unknown parameter '{key}'"),
    }
    Ok(())
}

/// Build a per-note override from the optional envelope flags.
///
/// Returns `None` when no flag is given; missing fields come from `root`.
pub fn note_override(
    root: &Adsr,
    attack: Option<f32>,
    decay: Option<f32>,
    sustain: Option<f32>,
    release: Option<f32>,
) -> Option<Adsr> {
    if attack.is_none() && decay.is_none() && sustain.is_none() && release.is_none() {
        return None;
    }
    Some(Adsr::new(
        attack.unwrap_or(root.attack),
        decay.unwrap_or(root.decay),
        sustain.unwrap_or(root.sustain),
        release.unwrap_or(root.release),
    ))
}

/// One scheduled note.
#[derive(Debug, Clone, Copy)]
pub struct Hit {
    /// Absolute start in samples.
    pub at: usize,
    /// Linear velocity.
    pub velocity: f32,
    /// MIDI pitch.
    pub pitch: f32,
    /// Per-note envelope.
    pub adsr: Option<Adsr>,
}

/// Render `hits` through `voice` block by block.
///
/// Hits are fed to the voice's queue in the block they fall in, as a host
/// scheduler would. Rendering stops once every hit has played out and the
/// voice is idle, or after `max_samples`.
pub fn render_hits<V: Voice>(voice: V, hits: &[Hit], max_samples: usize) -> Vec<f32> {
    let mut slot = VoiceSlot::new(voice);
    let mut queue = VecDeque::new();
    let mut out = Vec::new();
    let mut block = [0.0f32; BLOCK_SIZE];
    let mut next_hit = 0;

    while out.len() < max_samples {
        let start = out.len();
        let len = BLOCK_SIZE.min(max_samples - start);
        while next_hit < hits.len() && hits[next_hit].at < start + len {
            let hit = hits[next_hit];
            queue.push_back(VoiceMessage::Trigger {
                offset: hit.at.saturating_sub(start) as u32,
                velocity: hit.velocity,
                pitch: hit.pitch,
                adsr: hit.adsr,
            });
            next_hit += 1;
        }

        slot.render_block(&mut block[..len], &mut queue);
        out.extend_from_slice(&block[..len]);

        if next_hit == hits.len() && slot.pending() == 0 && !slot.voice().is_active() {
            break;
        }
    }

    tracing::debug!(samples = out.len(), hits = hits.len(), "render finished");
    out
}

/// Print resolved settings as an aligned two-column listing.
pub fn print_settings(settings: &VoiceSettings) {
    let adsr = &settings.adsr;
    println!("  {:14}  {:.4} s", "attack", adsr.attack);
    println!("  {:14}  {:.4} s", "decay", adsr.decay);
    println!("  {:14}  {:.3}", "sustain", adsr.sustain);
    println!("  {:14}  {:.4} s", "release", adsr.release);
    println!("  {:14}  {:.1} cents", "detune", settings.detune);
    println!("  {:14}  {:.0} Hz", "filter_cutoff", settings.filter_cutoff);
    println!("  {:14}  {:.3}", "resonance", settings.resonance);
    println!("  {:14}  {:.3}", "noise_level", settings.noise_level);
    let drawbars: Vec<String> = settings.drawbars.iter().map(|d| format!("{d}")).collect();
    println!("  {:14}  {}", "drawbars", drawbars.join(","));
    println!("  {:14}  {}", "base_pitch", settings.base_pitch);
    match &settings.selected_sample {
        SampleSelection::Index(i) => println!("  {:14}  #{i}", "sample"),
        SampleSelection::Name(name) => println!("  {:14}  {name}", "sample"),
    }
    let point = |p: Option<usize>| p.map_or_else(|| "-".to_string(), |v| v.to_string());
    println!("  {:14}  {}", "start_point", point(settings.start_point));
    println!("  {:14}  {}", "end_point", point(settings.end_point));
    println!("  {:14}  {}", "looping", settings.looping);
}

/// Peak absolute sample value.
pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0f32, |p, s| p.max(s.abs()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tambor_synth::{DrumVoice, InstrumentKind};

    #[test]
    fn key_val_splits_on_first_equals() {
        assert_eq!(
            parse_key_val("sample=a=b"),
            Ok(("sample".to_string(), "a=b".to_string()))
        );
        assert!(parse_key_val("decay").is_err());
    }

    #[test]
    fn params_fill_entry_fields() {
        let mut entry = InstrumentDefaults::default();
        set_param(&mut entry, "decay", "0.3").unwrap();
        set_param(&mut entry, "noise-level", "0.5").unwrap();
        set_param(&mut entry, "sample", "tight").unwrap();
        set_param(&mut entry, "drawbars", "8, 4, 2").unwrap();
        set_param(&mut entry, "loop", "true").unwrap();
        assert_eq!(entry.decay, Some(0.3));
        assert_eq!(entry.noise_level, Some(0.5));
        assert_eq!(entry.sample_name.as_deref(), Some("tight"));
        assert_eq!(entry.drawbars, Some(vec![8.0, 4.0, 2.0]));
        assert_eq!(entry.looping, Some(true));
        assert!(set_param(&mut entry, "wobble", "1").is_err());
        assert!(set_param(&mut entry, "decay", "slow").is_err());
    }

    #[test]
    fn override_only_when_asked() {
        let root = Adsr::DEFAULT;
        assert_eq!(note_override(&root, None, None, None, None), None);
        let over = note_override(&root, None, Some(1.0), None, None).unwrap();
        assert_eq!(over.decay, 1.0);
        assert_eq!(over.attack, root.attack);
    }

    #[test]
    fn render_stops_when_voice_is_idle() {
        let voice = DrumVoice::with_defaults(InstrumentKind::HiHat, 44100.0);
        let hits = [Hit {
            at: 300,
            velocity: 1.0,
            pitch: 60.0,
            adsr: None,
        }];
        let out = render_hits(voice, &hits, 44100 * 10);
        assert!(out.len() < 44100);
        assert!(out[..300].iter().all(|&s| s == 0.0));
        assert!(peak(&out) > 0.01);
    }

    #[test]
    fn render_with_no_hits_is_one_block() {
        let voice = DrumVoice::with_defaults(InstrumentKind::Kick, 44100.0);
        let out = render_hits(voice, &[], 44100);
        assert_eq!(out.len(), BLOCK_SIZE);
        assert_eq!(peak(&out), 0.0);
    }
}
