//! adoc-insight - Read-only analysis of AsciiDoc documents
//!
//! Four operations over a document on disk:
//! - heading structure as a nested tree
//! - include directive graph, walked recursively with cycle detection
//! - header metadata (title, author, revision, attributes)
//! - literal content search with surrounding context
//!
//! Every operation is a synchronous, stateless call. Only a root document
//! that cannot be read fails a call; problems with included documents are
//! reported in the result.

pub mod analysis;
pub mod core;
pub mod parse;
pub mod workspace;

pub use crate::analysis::includes::{find_includes, IncludeEdge, IncludeReport};
pub use crate::analysis::metadata::{extract_metadata, Metadata};
pub use crate::analysis::search::{
    search_content, search_workspace, MatchSpan, SearchMatch, SearchOptions, SearchResult,
    WorkspaceSearchOptions, WorkspaceSearchResult,
};
pub use crate::analysis::structure::{
    analyze_document_structure, DocumentStatistics, HeadingNode, StructureReport,
};
pub use crate::core::error::{Error, Result};
pub use crate::core::file_reader::{Document, EncodingStrategy, ReadConfig};
pub use crate::workspace::Workspace;
