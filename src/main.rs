//! Pagecraft - ESPHome display snippet generator and importer
//!
//! Turns page layouts for 800x480 e-paper displays into ESPHome configuration
//! snippets and recovers layouts from (possibly hand-edited) snippets.

use clap::{Parser, Subcommand};
use pagecraft::cli::{GenerateArgs, ImportArgs, ValidateArgs};
use pagecraft::config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Pagecraft - ESPHome display snippet generator and importer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a display snippet from a layout file
    Generate(GenerateArgs),
    /// Import a layout from a display snippet
    Import(ImportArgs),
    /// Validate a layout file
    Validate(ValidateArgs),
}

fn main() {
    let cli = Cli::parse();

    // Load or create configuration; a broken file falls back to defaults
    let config = Config::load().unwrap_or_else(|err| {
        eprintln!("⚠ Ignoring configuration file, using defaults: {err:#}");
        Config::default()
    });

    // Logs go to stderr so stdout carries only command output
    let filter = if cli.verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let result = match &cli.command {
        Command::Generate(args) => args.execute(&config),
        Command::Import(args) => args.execute(&config),
        Command::Validate(args) => args.execute(&config),
    };

    if let Err(err) = result {
        eprintln!("Error: {err}");
        std::process::exit(err.exit_code.code());
    }
}
