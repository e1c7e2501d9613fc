//! CLI module - Command-line interface definitions and handlers

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;

use adoc_insight::analysis::search::DEFAULT_CONTEXT_LINES;
use adoc_insight::core::render::{Markdown, OutputFormat, RenderConfig, Renderer};
use adoc_insight::{ReadConfig, SearchOptions, Workspace, WorkspaceSearchOptions};

/// adoc-insight - inspect the structure, includes, metadata and content of AsciiDoc documents.
#[derive(Parser, Debug)]
#[command(name = "adoc-insight")]
#[command(
    author,
    version,
    about,
    long_about = r#"adoc-insight analyzes AsciiDoc documents without rendering them.

Each command prints one report in the selected format (default: json).

Output formats:
- json: a single JSON object (best for piping into tools)
- md: human-friendly Markdown

Examples:
    adoc-insight structure book.adoc
    adoc-insight includes book.adoc --no-recursive
    adoc-insight metadata book.adoc --format md
    adoc-insight search "TODO" chapters/intro.adoc --context 1
    adoc-insight search "deprecated"
"#
)]
pub struct Cli {
    /// Root directory for all operations.
    #[arg(
        long,
        global = true,
        env = "ADOC_INSIGHT_ROOT",
        default_value = ".",
        value_name = "ROOT",
        long_help = "Root directory for all operations (defaults to the current directory).\n\n\
Relative FILE arguments are resolved against it, report paths are given relative\n\
to it, and a search without FILE covers every AsciiDoc document under it."
    )]
    pub root: PathBuf,

    /// Output format (json/md).
    #[arg(
        long,
        global = true,
        env = "ADOC_INSIGHT_FORMAT",
        default_value = "json",
        value_name = "FORMAT",
        long_help = "Select the output format.\n\n\
Supported values:\n\
- json (default)\n\
- md (markdown)"
    )]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Disable colored output (when applicable).
    #[arg(
        long,
        global = true,
        long_help = "Disable colored output. This is useful when piping to files or when your\n\
terminal does not support ANSI colors. NO_COLOR is honored as well."
    )]
    pub no_color: bool,

    /// Replace invalid UTF-8 instead of failing.
    #[arg(
        long,
        global = true,
        long_help = "Decode documents lossily: invalid UTF-8 sequences become U+FFFD instead of\n\
failing the command with a decode error."
    )]
    pub lossy: bool,

    /// Quiet mode (errors only on stderr).
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose mode (debug diagnostics on stderr).
    #[arg(
        short,
        long,
        global = true,
        long_help = "Enable debug diagnostics on stderr. RUST_LOG overrides this when set."
    )]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the heading tree of a document.
    #[command(long_about = "Parse every heading of FILE into a nested tree.\n\n\
The first level-0 heading is the document title and becomes the tree root.\n\
Skipped levels attach to the nearest open ancestor.\n\n\
Examples:\n\
  adoc-insight structure book.adoc\n\
  adoc-insight structure book.adoc --content\n")]
    Structure {
        /// Document to analyze (relative to ROOT unless absolute).
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Include each section's body text.
        #[arg(long)]
        content: bool,
    },

    /// List include directives, following them recursively.
    #[command(long_about = "Find include:: directives in FILE and resolve their targets\n\
relative to the including document. Included documents are followed recursively unless\n\
--no-recursive is given; cycles are reported and not followed.\n\n\
Examples:\n\
  adoc-insight includes book.adoc\n\
  adoc-insight includes book.adoc --no-recursive\n")]
    Includes {
        /// Document to analyze (relative to ROOT unless absolute).
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Only report the document's own directives.
        #[arg(long)]
        no_recursive: bool,
    },

    /// Show header metadata (title, author, revision, attributes).
    Metadata {
        /// Document to analyze (relative to ROOT unless absolute).
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Search for a literal string with surrounding context.
    #[command(long_about = "Search for QUERY as a literal string. Matching is case-insensitive\n\
unless --case-sensitive is given. Without FILE every .adoc, .asciidoc and .asc document\n\
under ROOT is searched, honoring ignore files.\n\n\
Examples:\n\
  adoc-insight search \"TODO\" chapters/intro.adoc\n\
  adoc-insight search \"Deprecated\" --case-sensitive --context 0\n")]
    Search {
        /// Literal text to find.
        #[arg(value_name = "QUERY")]
        query: String,

        /// Document to search; omit to search the whole root.
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Match case exactly.
        #[arg(long)]
        case_sensitive: bool,

        /// Lines of context before and after each match.
        #[arg(long, default_value_t = DEFAULT_CONTEXT_LINES, value_name = "N")]
        context: usize,

        /// Include hidden files and directories in a root-wide search.
        #[arg(long)]
        hidden: bool,
    },
}

fn emit<T: Serialize + Markdown>(report: &T, render_config: RenderConfig) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    Renderer::with_config(render_config)
        .render_to(report, &mut handle)
        .context("failed to write report")?;
    handle.flush().context("failed to flush stdout")
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    let render_config = RenderConfig::with_pretty(cli.format, cli.pretty);
    let read = if cli.lossy {
        ReadConfig::lossy()
    } else {
        ReadConfig::default()
    };

    // Get absolute root path
    let root = cli.root.canonicalize().unwrap_or(cli.root);
    let workspace = Workspace::new(root).with_read_config(read);

    match cli.command {
        Commands::Structure { file, content } => {
            let report = workspace
                .analyze_document_structure(&file, content)
                .with_context(|| format!("cannot analyze structure of {}", file.display()))?;
            emit(&report, render_config)
        }

        Commands::Includes { file, no_recursive } => {
            let report = workspace
                .find_includes(&file, !no_recursive)
                .with_context(|| format!("cannot resolve includes of {}", file.display()))?;
            emit(&report, render_config)
        }

        Commands::Metadata { file } => {
            let metadata = workspace
                .extract_metadata(&file)
                .with_context(|| format!("cannot extract metadata from {}", file.display()))?;
            emit(&metadata, render_config)
        }

        Commands::Search {
            query,
            file,
            case_sensitive,
            context,
            hidden,
        } => {
            let search = SearchOptions {
                case_sensitive,
                context_lines: context,
            };
            match file {
                Some(file) => {
                    let result = workspace
                        .search_content(&query, &file, &search)
                        .with_context(|| format!("cannot search {}", file.display()))?;
                    emit(&result, render_config)
                }
                None => {
                    let options = WorkspaceSearchOptions {
                        search,
                        hidden,
                        ..Default::default()
                    };
                    let result = workspace
                        .search_workspace(&query, &options)
                        .with_context(|| {
                            format!("cannot search {}", workspace.root.display())
                        })?;
                    emit(&result, render_config)
                }
            }
        }
    }
}
