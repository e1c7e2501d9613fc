//! Heading line recognition
//!
//! `= Title` is the document title (level 0), `== Section` is level 1, and so
//! on down to `======` at level 5.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Static regex for heading lines
/// Format: 1-6 '=' characters, one space, non-empty title
pub static HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(={1,6}) (\S.*?)\s*$").expect("Invalid HEADING_RE regex"));

/// A recognized heading line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// Number of '=' minus one
    pub level: usize,
    pub title: String,
    /// 1-based line number
    pub line: usize,
}

/// Parse a single line as a heading
pub fn parse_heading(line: &str, line_number: usize) -> Option<Heading> {
    let caps = HEADING_RE.captures(line)?;
    let marker = caps.get(1)?.as_str();
    let title = caps.get(2)?.as_str();

    Some(Heading {
        level: marker.len() - 1,
        title: title.to_string(),
        line: line_number,
    })
}

/// Collect every heading in document order
pub fn parse_headings(lines: &[String]) -> Vec<Heading> {
    lines
        .iter()
        .enumerate()
        .filter_map(|(idx, line)| parse_heading(line, idx + 1))
        .collect()
}
