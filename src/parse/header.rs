//! Header line recognition
//!
//! Per-line matchers for the document header: attribute entries, the author
//! line and the revision line. Each returns `None` when the line does not
//! have the expected shape.

use once_cell::sync::Lazy;
use regex::Regex;

/// Static regex for attribute entries
/// Format: :name: value, :name!: or :!name:
pub static ATTRIBUTE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^:(!)?(\w[\w-]*)(!)?:(?:\s(.*))?$").expect("Invalid ATTRIBUTE_RE regex")
});

/// Static regex for an author line with a trailing email
/// Format: Firstname Lastname <email@example.org>
pub static AUTHOR_EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\S.*?)\s*<([^<>\s]+)>\s*$").expect("Invalid AUTHOR_EMAIL_RE regex")
});

/// Static regex for a revision number token (v1.0, 2.1-beta, 3)
pub static VERSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[vV]?(\d[\w.\-]*)$").expect("Invalid VERSION_RE regex"));

/// Static regex for a bare revision date (2024-01-31, 31/01/2024, 31.01.24)
pub static DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\d{4}-\d{1,2}-\d{1,2}|\d{1,2}[/.]\d{1,2}[/.]\d{2,4})$")
        .expect("Invalid DATE_RE regex")
});

/// A single attribute entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeEntry {
    /// `:name: value` (empty value means the attribute is set)
    Set { name: String, value: String },
    /// `:name!:` or `:!name:`
    Unset { name: String },
}

/// Parsed author line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorLine {
    pub name: String,
    pub email: Option<String>,
}

/// Parsed revision line; at least one of the fields is set
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RevisionLine {
    pub version: Option<String>,
    pub date: Option<String>,
    pub remark: Option<String>,
}

/// Parse an attribute entry line
pub fn parse_attribute(line: &str) -> Option<AttributeEntry> {
    let caps = ATTRIBUTE_RE.captures(line.trim_end())?;
    let name = caps.get(2)?.as_str().to_string();

    if caps.get(1).is_some() || caps.get(3).is_some() {
        return Some(AttributeEntry::Unset { name });
    }

    let value = caps
        .get(4)
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();
    Some(AttributeEntry::Set { name, value })
}

/// Strip a trailing ` \` line-continuation marker from an attribute value
pub fn strip_continuation(value: &str) -> Option<&str> {
    if value == "\\" {
        return Some("");
    }
    value.strip_suffix(" \\").map(str::trim_end)
}

/// Parse an author line.
///
/// `Name <email>` splits on the trailing angle brackets; anything else
/// non-blank becomes the author name with no email.
pub fn parse_author(line: &str) -> Option<AuthorLine> {
    let trimmed = line.trim();
    if !trimmed.chars().any(char::is_alphanumeric) {
        return None;
    }

    if let Some(caps) = AUTHOR_EMAIL_RE.captures(trimmed) {
        return Some(AuthorLine {
            name: caps[1].to_string(),
            email: Some(caps[2].to_string()),
        });
    }

    Some(AuthorLine {
        name: trimmed.to_string(),
        email: None,
    })
}

/// Parse a revision line: `<version>, <date>: <remark>` or a subset of it
pub fn parse_revision(line: &str) -> Option<RevisionLine> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    let (head, remark) = match trimmed.split_once(':') {
        Some((head, remark)) => (head.trim(), non_empty(remark)),
        None => (trimmed, None),
    };

    let (version, date) = match head.split_once(',') {
        Some((version, date)) => {
            let version = version.trim();
            let version = if version.is_empty() {
                None
            } else {
                Some(version_number(version)?)
            };
            (version, non_empty(date))
        }
        None if head.is_empty() => (None, None),
        None if DATE_RE.is_match(head) => (None, Some(head.to_string())),
        None => (Some(version_number(head)?), None),
    };

    if version.is_none() && date.is_none() {
        return None;
    }

    Some(RevisionLine {
        version,
        date,
        remark,
    })
}

/// Whether the line opens or closes a `////` comment block
pub fn is_block_comment_delimiter(line: &str) -> bool {
    let trimmed = line.trim_end();
    trimmed.len() >= 4 && trimmed.bytes().all(|b| b == b'/')
}

/// Whether the line is a single-line comment (`// ...`, but not a `////` block delimiter)
pub fn is_line_comment(line: &str) -> bool {
    line.starts_with("//") && !line.starts_with("////")
}

fn version_number(token: &str) -> Option<String> {
    VERSION_RE
        .captures(token)
        .map(|caps| caps[1].to_string())
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_attribute_set() {
        assert_eq!(
            parse_attribute(":version: 1.0"),
            Some(AttributeEntry::Set {
                name: "version".into(),
                value: "1.0".into()
            })
        );
        assert_eq!(
            parse_attribute(":toc:"),
            Some(AttributeEntry::Set {
                name: "toc".into(),
                value: String::new()
            })
        );
        assert_eq!(
            parse_attribute(":source-highlighter:   rouge  "),
            Some(AttributeEntry::Set {
                name: "source-highlighter".into(),
                value: "rouge".into()
            })
        );
    }

    #[test]
    fn test_parse_attribute_unset() {
        assert_eq!(
            parse_attribute(":sectnums!:"),
            Some(AttributeEntry::Unset {
                name: "sectnums".into()
            })
        );
        assert_eq!(
            parse_attribute(":!sectnums:"),
            Some(AttributeEntry::Unset {
                name: "sectnums".into()
            })
        );
    }

    #[test]
    fn test_parse_attribute_rejects_malformed() {
        assert!(parse_attribute(":no closing colon").is_none());
        assert!(parse_attribute(":name:value-without-space").is_none());
        assert!(parse_attribute("text :name: value").is_none());
        assert!(parse_attribute("::").is_none());
    }

    #[test]
    fn test_strip_continuation() {
        assert_eq!(strip_continuation("first part \\"), Some("first part"));
        assert_eq!(strip_continuation("\\"), Some(""));
        assert_eq!(strip_continuation("no marker"), None);
        assert_eq!(strip_continuation("path\\"), None);
    }

    #[test]
    fn test_parse_author_with_email() {
        let author = parse_author("Jane Doe <jane@x.org>").unwrap();
        assert_eq!(author.name, "Jane Doe");
        assert_eq!(author.email.as_deref(), Some("jane@x.org"));
    }

    #[test]
    fn test_parse_author_without_email() {
        let author = parse_author("  Jane Q. Doe ").unwrap();
        assert_eq!(author.name, "Jane Q. Doe");
        assert!(author.email.is_none());
        assert!(parse_author("   ").is_none());
    }

    #[test]
    fn test_parse_author_rejects_punctuation() {
        assert!(parse_author("////").is_none());
        assert!(parse_author("----").is_none());
        assert!(parse_author("Ana-María").is_some());
    }

    #[test]
    fn test_block_comment_delimiter() {
        assert!(is_block_comment_delimiter("////"));
        assert!(is_block_comment_delimiter("//////  "));
        assert!(!is_block_comment_delimiter("///"));
        assert!(!is_block_comment_delimiter("// note"));
    }

    #[test]
    fn test_parse_revision_full() {
        let rev = parse_revision("v1.2, 2024-05-01: Draft for review").unwrap();
        assert_eq!(rev.version.as_deref(), Some("1.2"));
        assert_eq!(rev.date.as_deref(), Some("2024-05-01"));
        assert_eq!(rev.remark.as_deref(), Some("Draft for review"));
    }

    #[test]
    fn test_parse_revision_subsets() {
        let rev = parse_revision("v2.0").unwrap();
        assert_eq!(rev.version.as_deref(), Some("2.0"));
        assert!(rev.date.is_none());

        let rev = parse_revision("1.0, 2023-01-01").unwrap();
        assert_eq!(rev.version.as_deref(), Some("1.0"));
        assert_eq!(rev.date.as_deref(), Some("2023-01-01"));
        assert!(rev.remark.is_none());

        let rev = parse_revision("3.1: Typo fixes").unwrap();
        assert_eq!(rev.version.as_deref(), Some("3.1"));
        assert_eq!(rev.remark.as_deref(), Some("Typo fixes"));

        let rev = parse_revision("2024-01-31").unwrap();
        assert!(rev.version.is_none());
        assert_eq!(rev.date.as_deref(), Some("2024-01-31"));
    }

    #[test]
    fn test_parse_revision_rejects_prose() {
        assert!(parse_revision("This is body text.").is_none());
        assert!(parse_revision("Note: something").is_none());
        assert!(parse_revision("Hello, world").is_none());
        assert!(parse_revision("").is_none());
    }

    #[test]
    fn test_is_line_comment() {
        assert!(is_line_comment("// a note"));
        assert!(!is_line_comment("////"));
        assert!(!is_line_comment("text // not a comment"));
    }
}
