//! Renderer module
//!
//! Renders analysis reports as JSON or Markdown. JSON is the report's serde
//! form; Markdown is a human-oriented view with terminal emphasis from
//! `colored` (disabled globally via `colored::control` when requested).

use colored::Colorize;
use serde::Serialize;
use std::fmt::Write as _;
use std::io::Write;

use crate::analysis::includes::{IncludeEdge, IncludeReport};
use crate::analysis::metadata::Metadata;
use crate::analysis::search::{SearchMatch, SearchResult, WorkspaceSearchResult};
use crate::analysis::structure::{HeadingNode, StructureReport};

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Markdown,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "md" | "markdown" => Ok(OutputFormat::Markdown),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Render configuration combining format and options
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig {
    pub format: OutputFormat,
    pub pretty: bool,
}

impl RenderConfig {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            pretty: false,
        }
    }

    /// Create a new render config with pretty option
    pub fn with_pretty(format: OutputFormat, pretty: bool) -> Self {
        Self { format, pretty }
    }
}

/// A report with a Markdown view
pub trait Markdown {
    fn write_markdown(&self, out: &mut String);
}

/// Renderer for analysis reports
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            config: RenderConfig::new(format),
        }
    }

    /// Create a new renderer with render config
    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render a report to a string
    pub fn render<T: Serialize + Markdown>(&self, report: &T) -> String {
        match self.config.format {
            OutputFormat::Json => self.render_json(report),
            OutputFormat::Markdown => {
                let mut out = String::new();
                report.write_markdown(&mut out);
                out
            }
        }
    }

    /// Render to a writer, followed by a newline
    pub fn render_to<T: Serialize + Markdown, W: Write>(
        &self,
        report: &T,
        mut writer: W,
    ) -> std::io::Result<()> {
        let output = self.render(report);
        writer.write_all(output.as_bytes())?;
        if !output.ends_with('\n') {
            writer.write_all(b"\n")?;
        }
        Ok(())
    }

    fn render_json<T: Serialize>(&self, report: &T) -> String {
        if self.config.pretty {
            serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
        } else {
            serde_json::to_string(report).unwrap_or_else(|_| "{}".to_string())
        }
    }
}

impl Markdown for StructureReport {
    fn write_markdown(&self, out: &mut String) {
        let _ = writeln!(out, "# Structure of `{}`\n", self.path);
        if let Some(title) = &self.title {
            let _ = writeln!(out, "**Title:** {}\n", title.bold());
        }
        let _ = writeln!(
            out,
            "{} headings, max depth {}, {} lines, {} words\n",
            self.total_headings,
            self.max_depth,
            self.statistics.lines,
            self.statistics.words
        );
        for child in &self.tree.children {
            write_heading(out, child, 0);
        }
    }
}

fn write_heading(out: &mut String, node: &HeadingNode, indent: usize) {
    let _ = writeln!(
        out,
        "{}- {} {}",
        "  ".repeat(indent),
        node.title.bold(),
        format!("(line {})", node.line).dimmed()
    );
    for child in &node.children {
        write_heading(out, child, indent + 1);
    }
}

impl Markdown for IncludeReport {
    fn write_markdown(&self, out: &mut String) {
        let _ = writeln!(out, "# Includes of `{}`\n", self.path);
        let _ = writeln!(
            out,
            "{} includes across {} documents\n",
            self.total_includes,
            self.processed_files.len()
        );
        for edge in &self.includes {
            write_include(out, edge, 0);
        }
    }
}

fn write_include(out: &mut String, edge: &IncludeEdge, indent: usize) {
    let status = if edge.cycle {
        "cycle".yellow()
    } else if let Some(error) = &edge.error {
        format!("unreadable: {}", error).red()
    } else if edge.exists {
        "ok".green()
    } else {
        "missing".red()
    };
    let _ = writeln!(
        out,
        "{}- `{}` (line {}) [{}]",
        "  ".repeat(indent),
        edge.target,
        edge.line,
        status
    );
    if !edge.unresolved_attributes.is_empty() {
        let _ = writeln!(
            out,
            "{}  unresolved: {}",
            "  ".repeat(indent),
            edge.unresolved_attributes.join(", ")
        );
    }
    for child in edge.children.iter().flatten() {
        write_include(out, child, indent + 1);
    }
}

impl Markdown for Metadata {
    fn write_markdown(&self, out: &mut String) {
        out.push_str("# Metadata\n\n");
        let fields = [
            ("Title", &self.title),
            ("Author", &self.author),
            ("Email", &self.email),
            ("Revision", &self.revision),
            ("Date", &self.revdate),
            ("Remark", &self.revremark),
        ];
        for (label, value) in fields {
            if let Some(value) = value {
                let _ = writeln!(out, "- **{}:** {}", label, value);
            }
        }

        if !self.attributes.is_empty() {
            out.push_str("\n## Attributes\n\n");
            for (name, value) in &self.attributes {
                let _ = writeln!(out, "- `{}`: {}", name.cyan(), value);
            }
        }

        if let Some(info) = &self.file_info {
            let _ = writeln!(
                out,
                "\n{} bytes, hash {}",
                info.size_bytes, info.content_hash
            );
        }
    }
}

fn write_match(out: &mut String, m: &SearchMatch) {
    let _ = writeln!(out, "### Line {}\n", m.line);
    out.push_str("```\n");
    let first = m.line - m.context_before.len();
    for (offset, line) in m.context_before.iter().enumerate() {
        let _ = writeln!(out, "{:>5}  {}", first + offset, line);
    }
    let _ = writeln!(out, "{:>5}> {}", m.line, highlight(m));
    for (offset, line) in m.context_after.iter().enumerate() {
        let _ = writeln!(out, "{:>5}  {}", m.line + 1 + offset, line);
    }
    out.push_str("```\n\n");
}

/// Matched line with every occurrence emphasized
fn highlight(m: &SearchMatch) -> String {
    let mut out = String::with_capacity(m.text.len());
    let mut cursor = 0;
    for span in &m.positions {
        out.push_str(&m.text[cursor..span.start]);
        out.push_str(&m.text[span.start..span.end].red().bold().to_string());
        cursor = span.end;
    }
    out.push_str(&m.text[cursor..]);
    out
}

impl Markdown for SearchResult {
    fn write_markdown(&self, out: &mut String) {
        let _ = writeln!(
            out,
            "# Search `{}` in `{}`\n\n{} matching lines\n",
            self.query, self.path, self.total_matches
        );
        for m in &self.matches {
            write_match(out, m);
        }
    }
}

impl Markdown for WorkspaceSearchResult {
    fn write_markdown(&self, out: &mut String) {
        let _ = writeln!(
            out,
            "# Search `{}`\n\n{} matching lines in {} of {} documents\n",
            self.query,
            self.total_matches,
            self.results.len(),
            self.files_searched.len()
        );
        for file in &self.results {
            let _ = writeln!(out, "## `{}`\n", file.path.green());
            for m in &file.matches {
                write_match(out, m);
            }
        }
        if !self.skipped.is_empty() {
            out.push_str("## Skipped\n\n");
            for skip in &self.skipped {
                let _ = writeln!(out, "- `{}`: {}", skip.path, skip.reason);
            }
        }
    }
}
