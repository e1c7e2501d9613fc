//! Line source
//!
//! Loads a document once per call and exposes it as an ordered sequence of
//! lines with stable 1-based line numbers. Handles:
//! - Non-UTF-8 content (strict or lossy)
//! - Binary files
//! - Oversized files

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::error::{Error, Result};

/// Default maximum file size in bytes (64 MB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 64 * 1024 * 1024;

/// Leading bytes inspected for NUL when sniffing binary content
const BINARY_SNIFF_LEN: usize = 8192;

/// Strategy for handling non-UTF-8 content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodingStrategy {
    /// Reject invalid UTF-8 and binary content with a decode error
    #[default]
    Strict,
    /// Replace invalid bytes with U+FFFD
    Lossy,
}

/// Configuration for loading documents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadConfig {
    /// Maximum file size to load (bytes)
    pub max_file_size: u64,

    /// How to handle non-UTF-8 content
    pub encoding: EncodingStrategy,
}

impl Default for ReadConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            encoding: EncodingStrategy::Strict,
        }
    }
}

impl ReadConfig {
    /// Config that decodes lossily instead of failing
    pub fn lossy() -> Self {
        Self {
            encoding: EncodingStrategy::Lossy,
            ..Default::default()
        }
    }
}

/// A document path together with the directory its includes resolve against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef {
    /// Path as it was opened
    pub path: PathBuf,
    /// Directory containing the document
    pub dir: PathBuf,
}

impl DocumentRef {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Self { path, dir }
    }
}

/// A loaded document split into lines
#[derive(Debug, Clone)]
pub struct Document {
    reference: DocumentRef,
    text: String,
    lines: Vec<String>,
    lossy: bool,
}

impl Document {
    /// Read `path` and split it into lines.
    ///
    /// The file handle lives only for the duration of this call.
    pub fn load(path: &Path, config: &ReadConfig) -> Result<Self> {
        let metadata = fs::metadata(path).map_err(|e| Error::from_io(path, e))?;
        if metadata.is_dir() {
            return Err(Error::Io {
                path: path.to_path_buf(),
                source: io::Error::other("path is a directory"),
            });
        }

        let size = metadata.len();
        if size > config.max_file_size {
            return Err(Error::TooLarge {
                path: path.to_path_buf(),
                size,
                limit: config.max_file_size,
            });
        }

        let bytes = read_file_bytes(path, size).map_err(|e| Error::from_io(path, e))?;
        let (text, lossy) = decode_bytes(path, bytes, config.encoding)?;

        let document = Self::from_text(path, text);
        debug!(
            path = %path.display(),
            lines = document.lines.len(),
            lossy,
            "loaded document"
        );
        Ok(Self { lossy, ..document })
    }

    /// Build a document from text already in memory
    pub fn from_text(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        let text = text.into();
        let text = match text.strip_prefix('\u{feff}') {
            Some(stripped) => stripped.to_string(),
            None => text,
        };
        let lines = text.lines().map(str::to_owned).collect();

        Self {
            reference: DocumentRef::new(path),
            text,
            lines,
            lossy: false,
        }
    }

    pub fn reference(&self) -> &DocumentRef {
        &self.reference
    }

    pub fn path(&self) -> &Path {
        &self.reference.path
    }

    /// Directory used to resolve relative include targets
    pub fn dir(&self) -> &Path {
        &self.reference.dir
    }

    /// The decoded text (byte-order mark removed)
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Line by 1-based number
    pub fn line(&self, number: usize) -> Option<&str> {
        number
            .checked_sub(1)
            .and_then(|idx| self.lines.get(idx))
            .map(String::as_str)
    }

    /// Iterate `(line_number, line)` pairs, numbering from 1
    pub fn numbered_lines(&self) -> impl Iterator<Item = (usize, &str)> {
        self.lines
            .iter()
            .enumerate()
            .map(|(idx, line)| (idx + 1, line.as_str()))
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Whether lossy conversion replaced invalid bytes
    pub fn is_lossy(&self) -> bool {
        self.lossy
    }
}

/// Read the whole file through a buffered reader
fn read_file_bytes(path: &Path, size_hint: u64) -> io::Result<Vec<u8>> {
    let file = fs::File::open(path)?;
    let mut reader = io::BufReader::new(file);
    let mut buffer = Vec::with_capacity(size_hint as usize);
    reader.read_to_end(&mut buffer)?;
    Ok(buffer)
}

/// Decode bytes per strategy, returning the text and whether it was lossy
fn decode_bytes(
    path: &Path,
    bytes: Vec<u8>,
    encoding: EncodingStrategy,
) -> Result<(String, bool)> {
    let check_len = std::cmp::min(BINARY_SNIFF_LEN, bytes.len());
    if encoding == EncodingStrategy::Strict && bytes[..check_len].contains(&0) {
        return Err(Error::Decode {
            path: path.to_path_buf(),
            reason: "file appears to be binary (contains null bytes)".to_string(),
        });
    }

    match String::from_utf8(bytes) {
        Ok(text) => Ok((text, false)),
        Err(err) => match encoding {
            EncodingStrategy::Strict => Err(Error::Decode {
                path: path.to_path_buf(),
                reason: err.utf8_error().to_string(),
            }),
            EncodingStrategy::Lossy => {
                let text = String::from_utf8_lossy(err.as_bytes()).into_owned();
                Ok((text, true))
            }
        },
    }
}
