//! adoc-insight - Inspect AsciiDoc documents from the command line
//!
//! Prints heading structure, include graphs, header metadata and search
//! results as JSON (default) or Markdown.

use anyhow::Result;
use clap::Parser;

mod cli;
mod logging;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    logging::initialize_logging(&cli)?;
    cli::run(cli)
}
