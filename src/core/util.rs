//! Common utilities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use xxhash_rust::xxh3::xxh3_64;

/// Filesystem facts about an analyzed file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    /// File size in bytes
    pub size_bytes: u64,
    /// Last modification time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,
    /// XXH3 hash of the file content
    pub content_hash: String,
}

impl FileInfo {
    /// Collect file facts; `content` is the decoded text that was analyzed
    pub fn collect(path: &Path, content: &str) -> std::io::Result<Self> {
        let metadata = std::fs::metadata(path)?;
        let modified = metadata.modified().ok().map(DateTime::<Utc>::from);
        Ok(Self {
            size_bytes: metadata.len(),
            modified,
            content_hash: hash_bytes(content.as_bytes()),
        })
    }
}

/// Compute the XXH3 hash of bytes as lowercase hex
pub fn hash_bytes(data: &[u8]) -> String {
    format!("{:016x}", xxh3_64(data))
}

/// Count whitespace-separated words
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_bytes() {
        let hash = hash_bytes(b"hello world");
        assert_eq!(hash.len(), 16); // 64-bit hex
        assert_eq!(hash, hash_bytes(b"hello world"));
        assert_ne!(hash, hash_bytes(b"hello world!"));
    }

    #[test]
    fn test_count_words() {
        assert_eq!(count_words("hello world"), 2);
        assert_eq!(count_words("  spaced\tout \n words "), 3);
        assert_eq!(count_words(""), 0);
    }

    #[test]
    fn test_file_info_collect() {
        let temp = tempfile::tempdir().unwrap();
        let file = temp.path().join("doc.adoc");
        std::fs::write(&file, "= Doc\n").unwrap();

        let info = FileInfo::collect(&file, "= Doc\n").unwrap();
        assert_eq!(info.size_bytes, 6);
        assert!(info.modified.is_some());
        assert_eq!(info.content_hash, hash_bytes(b"= Doc\n"));
    }
}
