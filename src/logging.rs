//! Logging initialization
//!
//! Installs a stderr `tracing` subscriber and applies color control. stdout is
//! reserved for reports.

use anyhow::{anyhow, Result};
use colored::control as color_control;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

/// Initialize logging from the global flags; `RUST_LOG` takes precedence
pub fn initialize_logging(cli: &Cli) -> Result<()> {
    let level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::WARN
    };

    let default_directive = format!("adoc_insight={}", level.as_str().to_ascii_lowercase());
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("failed to install logger: {}", e))?;

    let env_no_color = std::env::var_os("NO_COLOR").is_some();
    if cli.no_color || env_no_color {
        color_control::set_override(false);
    }
    Ok(())
}
