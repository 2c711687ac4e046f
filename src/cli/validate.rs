//! Validation command for layout files.

use crate::cli::common::{CliError, CliResult, ValidationResponse};
use crate::config::Config;
use crate::services::LayoutService;
use clap::Args;
use std::path::PathBuf;

/// Validate a layout file for errors and warnings
#[derive(Debug, Clone, Args)]
pub struct ValidateArgs {
    /// Path to layout JSON file
    #[arg(short, long, value_name = "FILE")]
    pub layout: PathBuf,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,

    /// Treat warnings as errors (exit non-zero)
    #[arg(long)]
    pub strict: bool,
}

impl ValidateArgs {
    /// Execute the validate command
    pub fn execute(&self, config: &Config) -> CliResult<()> {
        let path = config.resolve_layout_path(&self.layout);
        let device = LayoutService::load(&path)
            .map_err(|e| CliError::io(format!("Failed to load layout: {e:#}")))?;

        let report = device.validate();
        let response = ValidationResponse::from(&report);

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&response)
                    .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?
            );
        } else {
            if response.valid {
                println!("✓ Validation passed");
            } else {
                println!("✗ Validation failed");
            }

            println!("\nDevice '{}' ({})", device.name, device.id);
            println!("  Pages:   {}", device.pages.len());
            println!("  Widgets: {}", device.widget_count());

            if !report.errors.is_empty() || !report.warnings.is_empty() {
                println!("\nIssues:");
                for error in &report.errors {
                    println!("  ✗ {error}");
                }
                for warning in &report.warnings {
                    println!("  ⚠ {warning}");
                }
            }
        }

        if !response.valid {
            return Err(CliError::validation("Validation failed"));
        }

        if self.strict && !report.warnings.is_empty() {
            return Err(CliError::validation("Warnings found in strict mode"));
        }

        Ok(())
    }
}
