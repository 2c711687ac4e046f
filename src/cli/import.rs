//! Import command: display snippet to layout JSON.

use crate::cli::common::{CliError, CliResult, WarningMessage};
use crate::config::Config;
use crate::models::Device;
use crate::services::LayoutService;
use crate::snippet::{parse_snippet, SnippetError};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

/// Import a layout from an ESPHome display snippet
#[derive(Debug, Clone, Args)]
pub struct ImportArgs {
    /// Path to the snippet YAML file
    #[arg(short, long, value_name = "FILE")]
    pub snippet: PathBuf,

    /// Device the snippet belongs to (defaults to import.device_id in config)
    #[arg(long, value_name = "ID")]
    pub device_id: Option<String>,

    /// Write the layout JSON to a file or directory instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Print the device together with import warnings as JSON
    #[arg(long)]
    pub json: bool,

    /// Fail if the import produced warnings
    #[arg(long)]
    pub strict: bool,
}

/// JSON output of `import --json`.
#[derive(Debug, Serialize)]
struct ImportResponse<'a> {
    device: &'a Device,
    warnings: Vec<WarningMessage>,
}

impl ImportArgs {
    /// Execute the import command
    pub fn execute(&self, config: &Config) -> CliResult<()> {
        let device_id = self
            .device_id
            .clone()
            .or_else(|| config.import.device_id.clone())
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| {
                CliError::validation(
                    "Device id not specified. Use --device-id or set import.device_id in the config file",
                )
            })?;

        let text = std::fs::read_to_string(&self.snippet).map_err(|e| {
            CliError::io(format!("Failed to read snippet {}: {e}", self.snippet.display()))
        })?;

        let imported = parse_snippet(&text, &device_id).map_err(|e| snippet_error(&e))?;
        let device = &imported.device;
        let warnings = &imported.warnings;

        if !self.json {
            for warning in warnings {
                eprintln!("⚠ {warning}");
            }
        }

        if (self.strict || config.import.strict) && !warnings.is_empty() {
            return Err(CliError::validation(format!(
                "{} import warnings found in strict mode",
                warnings.len()
            )));
        }

        if let Some(target) = &self.out {
            let path = LayoutService::output_path(target, device);
            LayoutService::save(device, &path)
                .map_err(|e| CliError::io(format!("Failed to write layout: {e:#}")))?;
            info!(device = %device.id, path = %path.display(), "wrote imported layout");
            if !self.json {
                println!(
                    "✓ Imported '{}' ({} pages, {} widgets, {} warnings)",
                    device.name,
                    device.pages.len(),
                    device.widget_count(),
                    warnings.len()
                );
                println!("  {}", path.display());
            }
        }

        if self.json {
            let response = ImportResponse {
                device,
                warnings: warnings.iter().map(WarningMessage::from).collect(),
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&response)
                    .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?
            );
        } else if self.out.is_none() {
            println!(
                "{}",
                serde_json::to_string_pretty(device)
                    .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?
            );
        }

        Ok(())
    }
}

/// Maps classified snippet failures to exit codes.
fn snippet_error(error: &SnippetError) -> CliError {
    let message = format!("Import failed [{}]: {error}", error.code());
    if error.is_input_error() {
        CliError::validation(message)
    } else {
        CliError::io(message)
    }
}
