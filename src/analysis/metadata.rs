//! Header metadata extraction
//!
//! Reads the header block (title, author line, revision line, attribute
//! entries) into a [`Metadata`] record. Body content never affects the result.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

use crate::core::error::Result;
use crate::core::file_reader::{Document, ReadConfig};
use crate::core::util::FileInfo;
use crate::parse::header::{
    is_block_comment_delimiter, is_line_comment, parse_attribute, parse_author, parse_revision,
    strip_continuation,
    AttributeEntry, AuthorLine, RevisionLine,
};
use crate::parse::heading::parse_heading;
use crate::parse::include::parse_include;

/// Structured header metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub email: Option<String>,
    pub revision: Option<String>,
    pub revdate: Option<String>,
    pub revremark: Option<String>,
    /// Attribute entries from the header, last declaration wins
    pub attributes: BTreeMap<String, String>,
    /// Filesystem facts, present when extracted from a file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_info: Option<FileInfo>,
}

/// Raw header block as found in the document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderBlock {
    /// Document title from a level-0 heading
    pub title: Option<String>,
    /// Line of the document title
    pub title_line: Option<usize>,
    pub author: Option<AuthorLine>,
    pub revision: Option<RevisionLine>,
    pub attributes: BTreeMap<String, String>,
    /// Number of lines consumed, including skipped leading blanks and comments
    pub end: usize,
}

impl HeaderBlock {
    /// Title from the heading, else from `doctitle`/`title` attributes
    pub fn effective_title(&self) -> Option<String> {
        self.title
            .clone()
            .or_else(|| self.attributes.get("doctitle").cloned())
            .or_else(|| self.attributes.get("title").cloned())
            .filter(|t| !t.is_empty())
    }
}

/// Scan the header block at the top of `lines`
pub fn parse_header(lines: &[String]) -> HeaderBlock {
    let mut block = HeaderBlock::default();
    let mut idx = 0;

    while idx < lines.len() {
        if is_block_comment_delimiter(&lines[idx]) {
            idx = skip_comment_block(lines, idx);
        } else if lines[idx].trim().is_empty() || is_line_comment(&lines[idx]) {
            idx += 1;
        } else {
            break;
        }
    }

    if let Some(heading) = lines.get(idx).and_then(|l| parse_heading(l, idx + 1)) {
        if heading.level != 0 {
            block.end = idx;
            return block;
        }
        block.title = Some(heading.title);
        block.title_line = Some(heading.line);
        idx += 1;
    }

    let mut expect_author = block.title.is_some();
    let mut expect_revision = false;

    while idx < lines.len() {
        let line = &lines[idx];

        if line.trim().is_empty() {
            break;
        }

        if is_block_comment_delimiter(line) {
            idx = skip_comment_block(lines, idx);
            continue;
        }

        if is_line_comment(line) {
            idx += 1;
            continue;
        }

        if let Some(entry) = parse_attribute(line) {
            idx += 1;
            match entry {
                AttributeEntry::Set { name, value } => {
                    let mut value = value;
                    // A blank line ends the header even after a continuation marker
                    while let Some(head) = strip_continuation(&value).map(str::to_string) {
                        match lines.get(idx).filter(|next| !next.trim().is_empty()) {
                            Some(next) => {
                                value = join_continuation(&head, next.trim());
                                idx += 1;
                            }
                            None => {
                                value = head;
                                break;
                            }
                        }
                    }
                    block.attributes.insert(name, value);
                }
                AttributeEntry::Unset { name } => {
                    block.attributes.remove(&name);
                }
            }
            expect_revision = false;
            continue;
        }

        if parse_heading(line, idx + 1).is_some() || parse_include(line, idx + 1).is_some() {
            break;
        }

        if expect_author {
            if let Some(author) = parse_author(line) {
                block.author = Some(author);
                expect_author = false;
                expect_revision = true;
                idx += 1;
                continue;
            }
        }

        if expect_revision {
            if let Some(revision) = parse_revision(line) {
                block.revision = Some(revision);
                expect_revision = false;
                idx += 1;
                continue;
            }
        }

        break;
    }

    block.end = idx;
    block
}

/// Index just past the block comment opened at `open`
fn skip_comment_block(lines: &[String], open: usize) -> usize {
    let delimiter = lines[open].trim_end();
    lines[open + 1..]
        .iter()
        .position(|line| line.trim_end() == delimiter)
        .map_or(lines.len(), |offset| open + offset + 2)
}

fn join_continuation(head: &str, next: &str) -> String {
    match (head.is_empty(), next.is_empty()) {
        (true, _) => next.to_string(),
        (_, true) => head.to_string(),
        _ => format!("{} {}", head, next),
    }
}

impl From<HeaderBlock> for Metadata {
    fn from(block: HeaderBlock) -> Self {
        let title = block.effective_title();
        let attr = |name: &str| {
            block
                .attributes
                .get(name)
                .filter(|v| !v.is_empty())
                .cloned()
        };

        let (author, email) = match &block.author {
            Some(line) => (Some(line.name.clone()), line.email.clone()),
            None => (None, None),
        };
        let revision = block.revision.clone().unwrap_or_default();

        Metadata {
            title,
            author: author.or_else(|| attr("author")),
            email: email.or_else(|| attr("email")),
            revision: revision.version.or_else(|| attr("revnumber")),
            revdate: revision.date.or_else(|| attr("revdate")),
            revremark: revision.remark.or_else(|| attr("revremark")),
            attributes: block.attributes,
            file_info: None,
        }
    }
}

/// Extract metadata from a loaded document (no filesystem facts)
pub fn extract_from_document(document: &Document) -> Metadata {
    Metadata::from(parse_header(document.lines()))
}

/// Extract header metadata from the document at `path`
pub fn extract_metadata(path: &Path, config: &ReadConfig) -> Result<Metadata> {
    let document = Document::load(path, config)?;
    let mut metadata = extract_from_document(&document);

    match FileInfo::collect(path, document.text()) {
        Ok(info) => metadata.file_info = Some(info),
        Err(e) => debug!(path = %path.display(), error = %e, "file info unavailable"),
    }

    Ok(metadata)
}
