//! Tambor CLI - render drum voices to WAV files.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tambor")]
#[command(author, version, about = "Tambor drum voice CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render an instrument to a WAV file
    Render(commands::render::RenderArgs),

    /// Play a WAV file through the sampler with trim and loop
    Sample(commands::sample::SampleArgs),

    /// List instruments and their settings
    Instruments(commands::instruments::InstrumentsArgs),

    /// Dump, validate or inspect the defaults table
    Defaults(commands::defaults::DefaultsArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render(args) => commands::render::run(args),
        Commands::Sample(args) => commands::sample::run(args),
        Commands::Instruments(args) => commands::instruments::run(args),
        Commands::Defaults(args) => commands::defaults::run(args),
    }
}
