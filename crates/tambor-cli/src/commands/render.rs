//! Render an instrument to a WAV file.

use super::common::{Hit, load_defaults, note_override, parse_key_val, peak, render_hits, set_param};
use anyhow::{Context, bail};
use clap::Args;
use std::path::PathBuf;
use tambor_io::{BitDepth, WavSpec, load_bank, write_wav};
use tambor_synth::{DrumVoice, InstrumentKind, Synthesis, WavetableBank};

#[derive(Args)]
pub struct RenderArgs {
    /// Instrument id (see `tambor instruments`)
    #[arg(value_name = "INSTRUMENT")]
    instrument: String,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// MIDI pitch of each hit
    #[arg(long, default_value = "60")]
    pitch: f32,

    /// Hit velocity (0-1)
    #[arg(short, long, default_value = "1.0")]
    velocity: f32,

    /// Sample rate in Hz
    #[arg(long, default_value = "44100")]
    sample_rate: u32,

    /// Number of hits
    #[arg(long, default_value = "1")]
    hits: usize,

    /// Seconds between hits
    #[arg(long, default_value = "0.25")]
    interval: f32,

    /// Upper bound on output length in seconds
    #[arg(long, default_value = "10")]
    max_seconds: f32,

    /// Defaults table (TOML); the factory table is used otherwise
    #[arg(short, long)]
    defaults: Option<PathBuf>,

    /// Setting overrides (e.g., "decay=0.3", "sample=tight")
    #[arg(long = "set", value_parser = parse_key_val, number_of_values = 1)]
    set: Vec<(String, String)>,

    /// Per-note attack override in seconds
    #[arg(long)]
    attack: Option<f32>,

    /// Per-note decay override in seconds
    #[arg(long)]
    decay: Option<f32>,

    /// Per-note sustain override (0-1)
    #[arg(long)]
    sustain: Option<f32>,

    /// Per-note release override in seconds
    #[arg(long)]
    release: Option<f32>,

    /// Directory of per-drum table folders for wavetable instruments
    #[arg(long)]
    bank: Option<PathBuf>,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32")]
    bit_depth: BitDepth,
}

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    let kind: InstrumentKind = args
        .instrument
        .parse()
        .map_err(|_| anyhow::anyhow!("Unknown instrument: {}", args.instrument))?;
    if kind.synthesis() == Synthesis::Sample {
        bail!("'{}' plays recorded audio, use `tambor sample`", kind.id());
    }
    if args.sample_rate == 0 {
        bail!("sample rate must be positive");
    }

    let mut table = load_defaults(args.defaults.as_deref())?;
    if !args.set.is_empty() {
        let mut entry = table.get(kind).cloned().unwrap_or_default();
        for (key, value) in &args.set {
            set_param(&mut entry, key, value)?;
        }
        table.set(kind, entry);
    }
    table.validate().context("invalid instrument settings")?;

    let sample_rate = args.sample_rate as f32;
    let settings = table.settings_for(kind);
    let adsr = note_override(
        &settings.adsr,
        args.attack,
        args.decay,
        args.sustain,
        args.release,
    );
    let voice = match kind {
        InstrumentKind::Wavetable(drum) => {
            let bank = match &args.bank {
                Some(dir) => load_bank(dir, sample_rate)
                    .with_context(|| format!("loading tables from {}", dir.display()))?,
                None => {
                    tracing::warn!(instrument = kind.id(), "no --bank given, output is silent");
                    WavetableBank::new(sample_rate)
                }
            };
            DrumVoice::wavetable(drum, &bank, settings, sample_rate)
        }
        _ => DrumVoice::new(kind, settings, sample_rate),
    };

    let spacing = (args.interval.max(0.0) * sample_rate) as usize;
    let hits: Vec<Hit> = (0..args.hits)
        .map(|i| Hit {
            at: i * spacing,
            velocity: args.velocity,
            pitch: args.pitch,
            adsr,
        })
        .collect();
    let max_samples = (args.max_seconds.max(0.0) * sample_rate) as usize;

    tracing::info!(
        instrument = kind.id(),
        hits = hits.len(),
        sample_rate = args.sample_rate,
        "rendering"
    );
    let samples = render_hits(voice, &hits, max_samples);

    let spec = WavSpec {
        sample_rate: args.sample_rate,
        depth: args.bit_depth,
    };
    write_wav(&args.output, &samples, spec)?;

    println!(
        "Rendered {} to {}: {} samples ({:.3}s), peak {:.3}",
        kind.id(),
        args.output.display(),
        samples.len(),
        samples.len() as f32 / sample_rate,
        peak(&samples)
    );
    Ok(())
}
