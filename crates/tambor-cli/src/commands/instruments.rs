//! Instrument listing and information command.

#![allow(clippy::print_literal)] // Table headers use literal strings intentionally

use super::common::{load_defaults, print_settings};
use clap::Args;
use std::path::PathBuf;
use tambor_synth::{InstrumentKind, Synthesis};

#[derive(Args)]
pub struct InstrumentsArgs {
    /// Show resolved settings for a specific instrument
    #[arg(value_name = "INSTRUMENT")]
    instrument: Option<String>,

    /// Defaults table (TOML) to resolve settings against
    #[arg(short, long)]
    defaults: Option<PathBuf>,
}

fn synthesis_label(synthesis: Synthesis) -> &'static str {
    match synthesis {
        Synthesis::Procedural => "procedural",
        Synthesis::Wavetable => "wavetable",
        Synthesis::Sample => "sample",
    }
}

pub fn run(args: InstrumentsArgs) -> anyhow::Result<()> {
    if let Some(id) = &args.instrument {
        let kind: InstrumentKind = id
            .parse()
            .map_err(|_| anyhow::anyhow!("Unknown instrument: {}", id))?;
        let table = load_defaults(args.defaults.as_deref())?;
        let descriptor = kind.descriptor();

        println!("{}", descriptor.name);
        println!("{}", "=".repeat(descriptor.name.len()));
        println!();
        println!("  {:14}  {}", "id", descriptor.id);
        println!("  {:14}  {}", "synthesis", synthesis_label(descriptor.synthesis));
        println!();
        println!("Settings:");
        println!();
        print_settings(&table.settings_for(kind));
        println!();
        println!("Example usage:");
        println!();
        match descriptor.synthesis {
            Synthesis::Sample => println!("  tambor sample input.wav out.wav --pitch 60"),
            Synthesis::Wavetable => println!(
                "  tambor render {} out.wav --bank tables/ --pitch {}",
                descriptor.id,
                kind.default_settings().base_pitch
            ),
            Synthesis::Procedural => {
                println!("  tambor render {} out.wav --hits 4 --interval 0.25", descriptor.id);
            }
        }
        return Ok(());
    }

    println!("Available instruments:");
    println!();
    println!("  {:22}  {:18}  {}", "Id", "Name", "Synthesis");
    println!("  {:22}  {:18}  {}", "--", "----", "---------");
    for kind in InstrumentKind::ALL {
        let d = kind.descriptor();
        println!("  {:22}  {:18}  {}", d.id, d.name, synthesis_label(d.synthesis));
    }
    println!();
    println!("Use 'tambor instruments <INSTRUMENT>' for settings.");
    Ok(())
}
