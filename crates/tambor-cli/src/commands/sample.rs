//! Play a recorded WAV through the sampler voice.

use super::common::{Hit, load_defaults, note_override, peak, render_hits};
use anyhow::bail;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use tambor_io::{BitDepth, WavSpec, read_wav, write_wav};
use tambor_synth::{DrumVoice, InstrumentKind, SettingsPatch};

#[derive(Args)]
pub struct SampleArgs {
    /// Input WAV file (mixed to mono)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// First source sample to play
    #[arg(long)]
    start: Option<usize>,

    /// Source sample to stop before
    #[arg(long)]
    end: Option<usize>,

    /// Loop the trimmed region under the envelope
    #[arg(long = "loop")]
    looping: bool,

    /// MIDI pitch; the base pitch plays at the original speed
    #[arg(long, default_value = "60")]
    pitch: f32,

    /// Hit velocity (0-1)
    #[arg(short, long, default_value = "1.0")]
    velocity: f32,

    /// Output sample rate in Hz (defaults to the input's)
    #[arg(long)]
    sample_rate: Option<u32>,

    /// Upper bound on output length in seconds
    #[arg(long, default_value = "30")]
    max_seconds: f32,

    /// Defaults table (TOML); the factory table is used otherwise
    #[arg(short, long)]
    defaults: Option<PathBuf>,

    /// Per-note decay override in seconds (looped playback only)
    #[arg(long)]
    decay: Option<f32>,

    /// Per-note release override in seconds (looped playback only)
    #[arg(long)]
    release: Option<f32>,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32")]
    bit_depth: BitDepth,
}

pub fn run(args: SampleArgs) -> anyhow::Result<()> {
    println!("Reading {}...", args.input.display());
    let (buffer, source) = read_wav(&args.input)?;
    println!(
        "  {} samples, {} Hz, {:.2}s",
        source.frames,
        source.sample_rate,
        source.duration()
    );

    let out_rate = args.sample_rate.unwrap_or(source.sample_rate);
    if out_rate == 0 {
        bail!("sample rate must be positive");
    }
    let sample_rate = out_rate as f32;

    let table = load_defaults(args.defaults.as_deref())?;
    table.validate()?;
    let mut patch = SettingsPatch::new().looping(args.looping);
    if args.start.is_some() {
        patch = patch.start_point(args.start);
    }
    if args.end.is_some() {
        patch = patch.end_point(args.end);
    }
    let settings = table.settings_for(InstrumentKind::Sampler).merged(&patch);
    if let (Some(start), Some(end)) = (settings.start_point, settings.end_point) {
        if start >= end {
            bail!("trim is empty: start {start} >= end {end}");
        }
    }

    let adsr = note_override(&settings.adsr, None, args.decay, None, args.release);
    let buffer: Arc<[f32]> = buffer.into();
    let voice = DrumVoice::sampler(buffer, source.sample_rate as f32, settings, sample_rate);
    let hit = Hit {
        at: 0,
        velocity: args.velocity,
        pitch: args.pitch,
        adsr,
    };
    let max_samples = (args.max_seconds.max(0.0) * sample_rate) as usize;

    tracing::info!(
        looping = args.looping,
        pitch = args.pitch,
        sample_rate = out_rate,
        "playing sample"
    );
    let samples = render_hits(voice, &[hit], max_samples);

    let out_spec = WavSpec {
        sample_rate: out_rate,
        depth: args.bit_depth,
    };
    write_wav(&args.output, &samples, out_spec)?;

    println!(
        "Wrote {}: {} samples ({:.3}s), peak {:.3}",
        args.output.display(),
        samples.len(),
        samples.len() as f32 / sample_rate,
        peak(&samples)
    );
    Ok(())
}
