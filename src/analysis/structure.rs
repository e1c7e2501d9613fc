//! Document structure analysis
//!
//! Builds a nested heading tree from the flat heading sequence. A depth stack
//! holds the open nodes; a node moves into its parent once a heading at the
//! same or a shallower level closes it, so every node is owned by exactly one
//! parent and no back-pointers are needed.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::analysis::metadata::parse_header;
use crate::core::error::Result;
use crate::core::file_reader::{Document, ReadConfig};
use crate::core::paths::normalize_path;
use crate::core::util::count_words;
use crate::parse::heading::{parse_headings, Heading};

/// A node of the heading tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingNode {
    /// Raw heading level (number of '=' minus one)
    pub level: usize,
    pub title: String,
    /// 1-based line of the heading; 0 for a synthetic root
    pub line: usize,
    /// Section body up to the next heading of the same or a shallower level;
    /// on the root, the preamble before the first section
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub children: Vec<HeadingNode>,
}

impl HeadingNode {
    fn new(level: usize, title: impl Into<String>, line: usize) -> Self {
        Self {
            level,
            title: title.into(),
            line,
            content: None,
            children: Vec::new(),
        }
    }

    /// Number of nodes below this one
    pub fn descendant_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| 1 + child.descendant_count())
            .sum()
    }

    /// Node count of the longest chain below this one
    pub fn height(&self) -> usize {
        self.children
            .iter()
            .map(|child| 1 + child.height())
            .max()
            .unwrap_or(0)
    }
}

/// Whole-document counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DocumentStatistics {
    pub lines: usize,
    pub characters: usize,
    pub words: usize,
}

/// Result of analyzing a document's structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureReport {
    pub path: String,
    pub title: Option<String>,
    /// All nodes except the root
    pub total_headings: usize,
    /// Longest root-to-leaf chain, in nodes
    pub max_depth: usize,
    pub tree: HeadingNode,
    pub statistics: DocumentStatistics,
}

/// Build the heading tree under `root`.
///
/// Level skips do not fail: a heading attaches under the nearest open node
/// with a smaller level, and keeps its raw level so callers can detect the
/// skip. The root is never popped.
pub fn build_tree(
    mut root: HeadingNode,
    headings: &[Heading],
    contents: Option<&[Option<String>]>,
) -> HeadingNode {
    let mut stack: Vec<HeadingNode> = Vec::with_capacity(8);

    for (idx, heading) in headings.iter().enumerate() {
        while stack.last().is_some_and(|top| top.level >= heading.level) {
            close_top(&mut stack, &mut root);
        }

        let mut node = HeadingNode::new(heading.level, heading.title.clone(), heading.line);
        node.content = contents.and_then(|c| c.get(idx).cloned().flatten());
        stack.push(node);
    }

    while !stack.is_empty() {
        close_top(&mut stack, &mut root);
    }

    root
}

/// Move the top of the stack into its parent (the next node down, or the root)
fn close_top(stack: &mut Vec<HeadingNode>, root: &mut HeadingNode) {
    if let Some(node) = stack.pop() {
        match stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => root.children.push(node),
        }
    }
}

/// Section bodies for each heading, in heading order
fn section_contents(lines: &[String], headings: &[Heading]) -> Vec<Option<String>> {
    headings
        .iter()
        .enumerate()
        .map(|(idx, heading)| {
            let end_line = headings[idx + 1..]
                .iter()
                .find(|next| next.level <= heading.level)
                .map(|next| next.line - 1)
                .unwrap_or(lines.len());
            let body = lines[heading.line..end_line].join("\n");
            Some(body.trim().to_string())
        })
        .collect()
}

/// Text after the header block and before the first section heading
fn preamble(lines: &[String], header_end: usize, first_section: Option<&Heading>) -> String {
    let end = first_section.map_or(lines.len(), |h| h.line - 1);
    let start = header_end.min(end);
    lines[start..end].join("\n").trim().to_string()
}

/// Analyze the structure of a loaded document
pub fn analyze_document(document: &Document, include_content: bool) -> StructureReport {
    let lines = document.lines();
    let mut headings = parse_headings(lines);
    let header = parse_header(lines);

    let all_contents = include_content.then(|| section_contents(lines, &headings));
    let mut contents = all_contents.as_deref();

    // A level-0 heading ahead of every section heading is the document title
    let has_title = headings.first().is_some_and(|h| h.level == 0);
    let mut root = if has_title {
        let first = headings.remove(0);
        contents = contents.map(|c| &c[1..]);
        HeadingNode::new(0, first.title, first.line)
    } else {
        HeadingNode::new(0, String::new(), 0)
    };

    let title = if has_title {
        Some(root.title.clone())
    } else {
        let fallback = header.effective_title();
        root.title = fallback.clone().unwrap_or_default();
        fallback
    };

    if include_content {
        let header_end = header.end.max(root.line);
        root.content = Some(preamble(lines, header_end, headings.first()));
    }

    let tree = build_tree(root, &headings, contents);
    let total_headings = tree.descendant_count();
    let max_depth = tree.height();

    debug!(
        path = %document.path().display(),
        total_headings,
        max_depth,
        "built heading tree"
    );

    StructureReport {
        path: normalize_path(document.path()),
        title,
        total_headings,
        max_depth,
        tree,
        statistics: DocumentStatistics {
            lines: lines.len(),
            characters: document.text().chars().count(),
            words: count_words(document.text()),
        },
    }
}

/// Load `path` and analyze its heading structure
pub fn analyze_document_structure(
    path: &Path,
    include_content: bool,
    config: &ReadConfig,
) -> Result<StructureReport> {
    let document = Document::load(path, config)?;
    Ok(analyze_document(&document, include_content))
}
