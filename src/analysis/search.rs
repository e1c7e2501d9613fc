//! Context search
//!
//! Literal substring search over a document's lines. Every matching line is
//! reported with a window of surrounding lines; overlapping windows are kept
//! independent. Search never follows include directives.

use ignore::WalkBuilder;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::core::error::{Error, Result};
use crate::core::file_reader::{Document, ReadConfig};
use crate::core::paths::{make_relative, normalize_path};

/// Lines of context captured on each side of a match by default
pub const DEFAULT_CONTEXT_LINES: usize = 2;

/// Extensions searched by workspace search
pub const ASCIIDOC_EXTENSIONS: &[&str] = &["adoc", "asciidoc", "asc"];

/// Options for searching a single document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    pub case_sensitive: bool,
    pub context_lines: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            context_lines: DEFAULT_CONTEXT_LINES,
        }
    }
}

/// Byte span of one occurrence within a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSpan {
    pub start: usize,
    pub end: usize,
}

/// A matching line with its context window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchMatch {
    /// 1-based line number
    pub line: usize,
    pub text: String,
    pub context_before: Vec<String>,
    pub context_after: Vec<String>,
    pub positions: Vec<MatchSpan>,
}

/// Matches found in one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub query: String,
    pub path: String,
    pub case_sensitive: bool,
    pub total_matches: usize,
    pub matches: Vec<SearchMatch>,
}

/// Build a literal matcher for `query`; `None` when nothing can match
pub fn build_matcher(query: &str, case_sensitive: bool) -> Option<Regex> {
    if query.is_empty() {
        return None;
    }

    match RegexBuilder::new(&regex::escape(query))
        .case_insensitive(!case_sensitive)
        .build()
    {
        Ok(re) => Some(re),
        Err(e) => {
            warn!(error = %e, "query cannot be compiled; no lines will match");
            None
        }
    }
}

/// Search a loaded document
pub fn search_document(document: &Document, query: &str, options: &SearchOptions) -> SearchResult {
    let matches = match build_matcher(query, options.case_sensitive) {
        Some(matcher) => collect_matches(document.lines(), &matcher, options.context_lines),
        None => Vec::new(),
    };

    SearchResult {
        query: query.to_string(),
        path: normalize_path(document.path()),
        case_sensitive: options.case_sensitive,
        total_matches: matches.len(),
        matches,
    }
}

fn collect_matches(lines: &[String], matcher: &Regex, context_lines: usize) -> Vec<SearchMatch> {
    lines
        .iter()
        .enumerate()
        .filter_map(|(idx, line)| {
            let positions: Vec<MatchSpan> = matcher
                .find_iter(line)
                .map(|m| MatchSpan {
                    start: m.start(),
                    end: m.end(),
                })
                .collect();
            if positions.is_empty() {
                return None;
            }

            let before_start = idx.saturating_sub(context_lines);
            let after_end = idx
                .saturating_add(context_lines)
                .saturating_add(1)
                .min(lines.len());

            Some(SearchMatch {
                line: idx + 1,
                text: line.clone(),
                context_before: lines[before_start..idx].to_vec(),
                context_after: lines[idx + 1..after_end].to_vec(),
                positions,
            })
        })
        .collect()
}

/// Load `path` and search it for `query`
pub fn search_content(
    query: &str,
    path: &Path,
    options: &SearchOptions,
    config: &ReadConfig,
) -> Result<SearchResult> {
    let document = Document::load(path, config)?;
    let result = search_document(&document, query, options);
    debug!(
        path = %path.display(),
        total_matches = result.total_matches,
        "searched document"
    );
    Ok(result)
}

/// Options for searching every AsciiDoc file under a root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceSearchOptions {
    pub search: SearchOptions,
    /// Include hidden files and directories
    pub hidden: bool,
    /// Respect .gitignore and other ignore files
    pub respect_ignore: bool,
    /// File extensions treated as AsciiDoc (without the dot)
    pub extensions: Vec<String>,
}

impl Default for WorkspaceSearchOptions {
    fn default() -> Self {
        Self {
            search: SearchOptions::default(),
            hidden: false,
            respect_ignore: true,
            extensions: ASCIIDOC_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

/// Matches within one workspace file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMatches {
    /// Path relative to the search root
    pub path: String,
    pub total_matches: usize,
    pub matches: Vec<SearchMatch>,
}

/// A workspace file that could not be searched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFile {
    pub path: String,
    pub reason: String,
}

/// Matches across every AsciiDoc file under a root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceSearchResult {
    pub query: String,
    pub case_sensitive: bool,
    pub total_matches: usize,
    /// Every file searched, relative to the root, sorted
    pub files_searched: Vec<String>,
    /// Files with at least one match, sorted by path
    pub results: Vec<FileMatches>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedFile>,
}

/// Find AsciiDoc documents under `root`, sorted by relative path
pub fn find_documents(root: &Path, options: &WorkspaceSearchOptions) -> Vec<(String, PathBuf)> {
    let mut builder = WalkBuilder::new(root);
    builder
        .hidden(!options.hidden)
        .git_ignore(options.respect_ignore)
        .git_global(options.respect_ignore)
        .git_exclude(options.respect_ignore)
        .ignore(options.respect_ignore);

    let mut documents: Vec<(String, PathBuf)> = builder
        .build()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
        .filter(|entry| {
            entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| {
                    options
                        .extensions
                        .iter()
                        .any(|wanted| wanted.eq_ignore_ascii_case(ext))
                })
        })
        .filter_map(|entry| {
            let path = entry.into_path();
            make_relative(&path, root).map(|relative| (relative, path))
        })
        .collect();

    documents.sort_by(|a, b| a.0.cmp(&b.0));
    documents
}

fn search_file(
    query: &str,
    relative: &str,
    path: &Path,
    options: &SearchOptions,
    config: &ReadConfig,
) -> std::result::Result<FileMatches, SkippedFile> {
    match Document::load(path, config) {
        Ok(document) => {
            let result = search_document(&document, query, options);
            Ok(FileMatches {
                path: relative.to_string(),
                total_matches: result.total_matches,
                matches: result.matches,
            })
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "skipping unreadable document");
            Err(SkippedFile {
                path: relative.to_string(),
                reason: e.to_string(),
            })
        }
    }
}

/// Search every AsciiDoc document under `root`.
///
/// Documents that fail to load are skipped and listed; only a missing root
/// fails the call.
pub fn search_workspace(
    query: &str,
    root: &Path,
    options: &WorkspaceSearchOptions,
    config: &ReadConfig,
) -> Result<WorkspaceSearchResult> {
    if !root.is_dir() {
        return Err(Error::NotFound {
            path: root.to_path_buf(),
        });
    }

    let documents = find_documents(root, options);
    let search_one = |(relative, path): &(String, PathBuf)| {
        search_file(query, relative, path, &options.search, config)
    };

    #[cfg(feature = "parallel")]
    let outcomes: Vec<_> = documents.par_iter().map(search_one).collect();
    #[cfg(not(feature = "parallel"))]
    let outcomes: Vec<_> = documents.iter().map(search_one).collect();

    let mut files_searched = Vec::new();
    let mut results = Vec::new();
    let mut skipped = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok(file) => {
                files_searched.push(file.path.clone());
                if file.total_matches > 0 {
                    results.push(file);
                }
            }
            Err(skip) => skipped.push(skip),
        }
    }

    let total_matches: usize = results.iter().map(|f| f.total_matches).sum();
    debug!(
        root = %root.display(),
        files = files_searched.len(),
        total_matches,
        "searched workspace"
    );

    Ok(WorkspaceSearchResult {
        query: query.to_string(),
        case_sensitive: options.search.case_sensitive,
        total_matches,
        files_searched,
        results,
        skipped,
    })
}
