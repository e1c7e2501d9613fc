//! Error types for document analysis
//!
//! Only loading the requested document can fail an operation. Syntax that
//! does not match (headings, headers, include directives) is never an error,
//! and problems with included documents are reported as data on the edge.

use std::path::PathBuf;
use thiserror::Error;

/// The error type returned by every analysis operation.
#[derive(Error, Debug)]
pub enum Error {
    /// The document does not exist.
    #[error("File not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The document content is not valid text.
    #[error("Cannot decode {} as UTF-8 text: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },

    /// The document exceeds the configured size limit.
    #[error("File {} is too large ({size} > {limit} bytes)", path.display())]
    TooLarge { path: PathBuf, size: u64, limit: u64 },

    /// Any other I/O failure while reading the document.
    #[error("Cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Stable code for hosts that map errors onto their own wire format
    pub fn kind(&self) -> &'static str {
        match self {
            Error::NotFound { .. } => "NOT_FOUND",
            Error::Decode { .. } => "DECODE_ERROR",
            Error::TooLarge { .. } => "TOO_LARGE",
            Error::Io { .. } => "IO_ERROR",
        }
    }

    /// The path the error refers to
    pub fn path(&self) -> &std::path::Path {
        match self {
            Error::NotFound { path }
            | Error::Decode { path, .. }
            | Error::TooLarge { path, .. }
            | Error::Io { path, .. } => path,
        }
    }

    /// Map an I/O error for `path`, folding `NotFound` into its own variant
    pub(crate) fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Error::NotFound { path },
            std::io::ErrorKind::InvalidData => Error::Decode {
                path,
                reason: source.to_string(),
            },
            _ => Error::Io { path, source },
        }
    }
}

/// Result alias used across the crate
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_error_kind_codes() {
        let err = Error::NotFound {
            path: PathBuf::from("a.adoc"),
        };
        assert_eq!(err.kind(), "NOT_FOUND");

        let err = Error::Decode {
            path: PathBuf::from("a.adoc"),
            reason: "bad byte".into(),
        };
        assert_eq!(err.kind(), "DECODE_ERROR");
    }

    #[test]
    fn test_from_io_maps_not_found() {
        let err = Error::from_io("missing.adoc", io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(err, Error::NotFound { .. }));
        assert_eq!(err.path(), std::path::Path::new("missing.adoc"));
    }

    #[test]
    fn test_from_io_keeps_other_errors() {
        let err = Error::from_io(
            "locked.adoc",
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        assert_eq!(err.kind(), "IO_ERROR");
        assert!(err.to_string().contains("locked.adoc"));
    }

    #[test]
    fn test_display_mentions_path() {
        let err = Error::TooLarge {
            path: PathBuf::from("big.adoc"),
            size: 10,
            limit: 5,
        };
        let msg = err.to_string();
        assert!(msg.contains("big.adoc"));
        assert!(msg.contains("10 > 5"));
    }
}
