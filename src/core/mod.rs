//! Core module - Contains the fundamental data structures and utilities
//!
//! This module provides:
//! - Error type shared by all operations
//! - Line source for loading documents
//! - Path resolution and normalization
//! - Rendering of reports for the command-line host
//! - Common utilities

pub mod error;
pub mod file_reader;
pub mod paths;
pub mod render;
pub mod util;
