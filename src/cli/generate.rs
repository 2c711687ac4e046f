//! Generate command: layout JSON to display snippet.

use crate::cli::common::{CliError, CliResult};
use crate::config::Config;
use crate::services::{write_atomic, LayoutService};
use crate::snippet::generate_snippet;
use clap::Args;
use std::path::PathBuf;
use tracing::info;

/// Generate an ESPHome display snippet from a layout
#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
    /// Path to layout JSON file
    #[arg(short, long, value_name = "FILE")]
    pub layout: PathBuf,

    /// Write the snippet to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub out: Option<PathBuf>,
}

impl GenerateArgs {
    /// Execute the generate command
    pub fn execute(&self, config: &Config) -> CliResult<()> {
        let path = config.resolve_layout_path(&self.layout);
        let device = LayoutService::load(&path)
            .map_err(|e| CliError::io(format!("Failed to load layout: {e:#}")))?;

        let snippet = generate_snippet(&device).map_err(|e| CliError::validation(e.to_string()))?;

        match &self.out {
            Some(out) => {
                write_atomic(out, &snippet)
                    .map_err(|e| CliError::io(format!("Failed to write snippet: {e:#}")))?;
                info!(device = %device.id, path = %out.display(), "wrote display snippet");
                println!(
                    "✓ Generated snippet for '{}' ({} pages, {} widgets)",
                    device.name,
                    device.pages.len(),
                    device.widget_count()
                );
                println!("  {}", out.display());
            }
            None => print!("{snippet}"),
        }

        Ok(())
    }
}
