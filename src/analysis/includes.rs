//! Include graph resolution
//!
//! Finds `include::` directives and resolves their targets relative to the
//! including document. In recursive mode the include graph is walked depth
//! first with a set of documents open on the current path: an edge pointing
//! back into that set is reported as a cycle and not descended into. The
//! same file reached through a different path is walked again.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::analysis::metadata::parse_header;
use crate::core::error::Result;
use crate::core::file_reader::{Document, ReadConfig};
use crate::core::paths::{identity_path, lexical_normalize, normalize_path, resolve_against};
use crate::parse::include::{parse_includes, substitute_attributes};

/// A resolved include directive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncludeEdge {
    /// The directive line as written
    pub raw_directive: String,
    /// Target as written, before attribute substitution
    pub target: String,
    /// Absolute path the target resolves to
    pub resolved_path: String,
    /// Whether the target is a readable document
    pub exists: bool,
    /// 1-based line of the directive in its document
    pub line: usize,
    /// Raw attribute list between the brackets
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub attributes: String,
    /// 0 for includes of the requested document
    pub depth: usize,
    /// Resolved path of the including document
    pub parent: String,
    /// Set when the target is already open on the current include path
    #[serde(default)]
    pub cycle: bool,
    /// Placeholders in the target with no matching header attribute
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unresolved_attributes: Vec<String>,
    /// Why an existing target could not be read
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Nested includes; only present in recursive mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<IncludeEdge>>,
}

/// Result of resolving a document's includes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncludeReport {
    pub path: String,
    pub recursive: bool,
    /// Every edge in the report, nested and cycle-truncated edges included
    pub total_includes: usize,
    pub includes: Vec<IncludeEdge>,
    /// Documents read during the walk, in first-visit order
    pub processed_files: Vec<String>,
}

/// Per-call walk state; dropped when the call returns
struct IncludeWalker<'a> {
    config: &'a ReadConfig,
    recursive: bool,
    /// Documents open on the current path
    on_path: HashSet<PathBuf>,
    visited: HashSet<PathBuf>,
    processed: Vec<String>,
    total: usize,
}

impl<'a> IncludeWalker<'a> {
    fn new(config: &'a ReadConfig, recursive: bool) -> Self {
        Self {
            config,
            recursive,
            on_path: HashSet::new(),
            visited: HashSet::new(),
            processed: Vec::new(),
            total: 0,
        }
    }

    fn enter(&mut self, identity: &Path) {
        self.on_path.insert(identity.to_path_buf());
        if self.visited.insert(identity.to_path_buf()) {
            self.processed.push(normalize_path(identity));
        }
    }

    fn leave(&mut self, identity: &Path) {
        self.on_path.remove(identity);
    }

    /// Edges for every directive in `document`
    fn edges(&mut self, document: &Document, identity: &Path, depth: usize) -> Vec<IncludeEdge> {
        let lines = document.lines();
        let attributes = parse_header(lines).attributes;
        let parent = normalize_path(identity);
        let mut edges = Vec::new();

        for directive in parse_includes(lines) {
            let (target, unresolved) = substitute_attributes(&directive.target, &attributes);
            let candidate = lexical_normalize(&resolve_against(document.dir(), &target));
            let exists = candidate.is_file();
            let resolved = identity_path(&candidate);

            self.total += 1;
            let mut edge = IncludeEdge {
                raw_directive: directive.raw,
                target: directive.target,
                resolved_path: normalize_path(&resolved),
                exists,
                line: directive.line,
                attributes: directive.attributes,
                depth,
                parent: parent.clone(),
                cycle: false,
                unresolved_attributes: unresolved,
                error: None,
                children: None,
            };

            if self.recursive {
                let children = self.descend(&mut edge, &candidate, &resolved, depth);
                edge.children = Some(children);
            }

            edges.push(edge);
        }

        edges
    }

    fn descend(
        &mut self,
        edge: &mut IncludeEdge,
        candidate: &Path,
        resolved: &Path,
        depth: usize,
    ) -> Vec<IncludeEdge> {
        if !edge.exists {
            trace!(target = %edge.target, "include target missing");
            return Vec::new();
        }

        if self.on_path.contains(resolved) {
            debug!(
                path = %resolved.display(),
                line = edge.line,
                "include cycle truncated"
            );
            edge.cycle = true;
            return Vec::new();
        }

        match Document::load(candidate, self.config) {
            Ok(child) => {
                self.enter(resolved);
                let children = self.edges(&child, resolved, depth + 1);
                self.leave(resolved);
                children
            }
            Err(e) => {
                debug!(path = %candidate.display(), error = %e, "included document unreadable");
                edge.exists = false;
                edge.error = Some(e.to_string());
                Vec::new()
            }
        }
    }
}

/// Resolve includes of an already loaded document
pub fn resolve_document(
    document: &Document,
    recursive: bool,
    config: &ReadConfig,
) -> IncludeReport {
    let identity = identity_path(document.path());
    let mut walker = IncludeWalker::new(config, recursive);

    walker.enter(&identity);
    let includes = walker.edges(document, &identity, 0);
    walker.leave(&identity);

    debug!(
        path = %document.path().display(),
        recursive,
        total = walker.total,
        files = walker.processed.len(),
        "resolved includes"
    );

    IncludeReport {
        path: normalize_path(document.path()),
        recursive,
        total_includes: walker.total,
        includes,
        processed_files: walker.processed,
    }
}

/// Load `path` and resolve its include directives
pub fn find_includes(path: &Path, recursive: bool, config: &ReadConfig) -> Result<IncludeReport> {
    let document = Document::load(path, config)?;
    Ok(resolve_document(&document, recursive, config))
}
