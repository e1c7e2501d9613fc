//! Parse module - Line-level recognizers for AsciiDoc syntax
//!
//! Every recognizer takes one line and returns `Option`: a line that does not
//! have the expected shape is simply not a match.
//!
//! Provides:
//! - heading: `== Section title` lines
//! - include: `include::target[attrs]` directives
//! - header: attribute entries, author and revision lines

pub mod header;
pub mod heading;
pub mod include;
