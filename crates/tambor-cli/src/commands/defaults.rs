//! Defaults table management command.

use super::common::{load_defaults, print_settings};
use anyhow::Context;
use clap::{Args, Subcommand};
use std::path::PathBuf;
use tambor_config::{DefaultsTable, InstrumentDefaults, validate_table};
use tambor_synth::InstrumentKind;

#[derive(Args)]
pub struct DefaultsArgs {
    #[command(subcommand)]
    command: DefaultsCommand,
}

#[derive(Subcommand)]
enum DefaultsCommand {
    /// Write a fully resolved table as TOML
    Dump {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Partial table to resolve; the factory table is dumped otherwise
        #[arg(short, long)]
        defaults: Option<PathBuf>,
    },

    /// Check a defaults table for out-of-range values
    Validate {
        /// Defaults table (TOML)
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Show the resolved settings for one instrument
    Show {
        /// Instrument id
        #[arg(value_name = "INSTRUMENT")]
        instrument: String,

        /// Defaults table (TOML); the factory table is used otherwise
        #[arg(short, long)]
        defaults: Option<PathBuf>,
    },
}

pub fn run(args: DefaultsArgs) -> anyhow::Result<()> {
    match args.command {
        DefaultsCommand::Dump { output, defaults } => dump(output, defaults),
        DefaultsCommand::Validate { file } => validate(file),
        DefaultsCommand::Show {
            instrument,
            defaults,
        } => show(&instrument, defaults),
    }
}

fn dump(output: Option<PathBuf>, defaults: Option<PathBuf>) -> anyhow::Result<()> {
    let source = load_defaults(defaults.as_deref())?;
    let mut table = DefaultsTable::new();
    for (kind, settings) in source.resolve_all() {
        table.set(kind, InstrumentDefaults::from_settings(&settings));
    }

    match output {
        Some(path) => {
            table.save(&path)?;
            println!("Wrote defaults to {}", path.display());
        }
        None => print!("{}", table.to_toml()?),
    }
    Ok(())
}

fn validate(file: PathBuf) -> anyhow::Result<()> {
    let table = DefaultsTable::load(&file)
        .with_context(|| format!("loading defaults from {}", file.display()))?;
    let errors = validate_table(&table);
    if errors.is_empty() {
        println!("{}: ok", file.display());
        return Ok(());
    }
    for error in &errors {
        println!("  {error}");
    }
    anyhow::bail!("{}: {} problem(s)", file.display(), errors.len())
}

fn show(id: &str, defaults: Option<PathBuf>) -> anyhow::Result<()> {
    let kind: InstrumentKind = id
        .parse()
        .map_err(|_| anyhow::anyhow!("Unknown instrument: {}", id))?;
    let table = load_defaults(defaults.as_deref())?;
    match table.get(kind) {
        Some(entry) if !entry.is_empty() => println!("{} (from table)", kind.id()),
        _ => println!("{} (built-in)", kind.id()),
    }
    print_settings(&table.settings_for(kind));
    Ok(())
}
