//! Workspace entry point
//!
//! A [`Workspace`] carries the caller's root directory and read configuration.
//! Relative paths are resolved against the root, and report paths are given
//! relative to it when the document lives under it.

use std::path::{Path, PathBuf};

use crate::analysis::includes::{resolve_document, IncludeReport};
use crate::analysis::metadata::{extract_metadata, Metadata};
use crate::analysis::search::{
    search_document, search_workspace, SearchOptions, SearchResult, WorkspaceSearchOptions,
    WorkspaceSearchResult,
};
use crate::analysis::structure::{analyze_document, StructureReport};
use crate::core::error::Result;
use crate::core::file_reader::{Document, ReadConfig};
use crate::core::paths::{make_relative, normalize_path};

/// Root directory plus read configuration shared by every operation
#[derive(Debug, Clone, Default)]
pub struct Workspace {
    pub root: PathBuf,
    pub read: ReadConfig,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            read: ReadConfig::default(),
        }
    }

    pub fn with_read_config(mut self, read: ReadConfig) -> Self {
        self.read = read;
        self
    }

    /// Absolute paths are kept; anything else is taken relative to the root
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Path as reported: relative to the root when under it
    pub fn label(&self, path: &Path) -> String {
        make_relative(path, &self.root)
            .filter(|relative| !relative.is_empty())
            .unwrap_or_else(|| normalize_path(path))
    }

    fn load(&self, path: &Path) -> Result<(PathBuf, Document)> {
        let resolved = self.resolve(path);
        let document = Document::load(&resolved, &self.read)?;
        Ok((resolved, document))
    }

    pub fn analyze_document_structure(
        &self,
        path: &Path,
        include_content: bool,
    ) -> Result<StructureReport> {
        let (resolved, document) = self.load(path)?;
        let mut report = analyze_document(&document, include_content);
        report.path = self.label(&resolved);
        Ok(report)
    }

    pub fn find_includes(&self, path: &Path, recursive: bool) -> Result<IncludeReport> {
        let (resolved, document) = self.load(path)?;
        let mut report = resolve_document(&document, recursive, &self.read);
        report.path = self.label(&resolved);
        Ok(report)
    }

    pub fn extract_metadata(&self, path: &Path) -> Result<Metadata> {
        extract_metadata(&self.resolve(path), &self.read)
    }

    pub fn search_content(
        &self,
        query: &str,
        path: &Path,
        options: &SearchOptions,
    ) -> Result<SearchResult> {
        let (resolved, document) = self.load(path)?;
        let mut result = search_document(&document, query, options);
        result.path = self.label(&resolved);
        Ok(result)
    }

    /// Search every AsciiDoc document under the root
    pub fn search_workspace(
        &self,
        query: &str,
        options: &WorkspaceSearchOptions,
    ) -> Result<WorkspaceSearchResult> {
        search_workspace(query, &self.root, options, &self.read)
    }
}
