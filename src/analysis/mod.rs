//! Analysis module - The four read-only document operations
//!
//! - `structure`: heading tree and document statistics
//! - `includes`: include directive graph, optionally recursive
//! - `metadata`: header block (title, author, revision, attributes)
//! - `search`: literal search with context, per document or per workspace

pub mod includes;
pub mod metadata;
pub mod search;
pub mod structure;
