//! Include directive recognition
//!
//! Parses `include::target[attrs]` lines and substitutes `{name}` attribute
//! placeholders in the target.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::BTreeMap;

/// Static regex for include directives
/// Format: include::path/to/file.adoc[leveloffset=+1]
pub static INCLUDE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*include::([^\s\[\]][^\[\]]*)\[(.*)\]\s*$").expect("Invalid INCLUDE_RE regex")
});

/// Static regex for attribute references inside a target
pub static PLACEHOLDER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{([A-Za-z0-9_][A-Za-z0-9_-]*)\}").expect("Invalid PLACEHOLDER_RE regex")
});

/// A recognized include directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeDirective {
    /// The directive line without surrounding whitespace
    pub raw: String,
    /// Target as written
    pub target: String,
    /// Raw attribute list between the brackets
    pub attributes: String,
    /// 1-based line number
    pub line: usize,
}

/// Parse a single line as an include directive
pub fn parse_include(line: &str, line_number: usize) -> Option<IncludeDirective> {
    let caps = INCLUDE_RE.captures(line)?;

    Some(IncludeDirective {
        raw: line.trim().to_string(),
        target: caps.get(1)?.as_str().to_string(),
        attributes: caps
            .get(2)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default(),
        line: line_number,
    })
}

/// Collect every include directive in document order
pub fn parse_includes(lines: &[String]) -> Vec<IncludeDirective> {
    lines
        .iter()
        .enumerate()
        .filter_map(|(idx, line)| parse_include(line, idx + 1))
        .collect()
}

/// Replace `{name}` references with attribute values.
///
/// Unknown references stay in the output verbatim; their names are returned
/// alongside the substituted target in first-seen order.
pub fn substitute_attributes(
    target: &str,
    attributes: &BTreeMap<String, String>,
) -> (String, Vec<String>) {
    let mut unresolved: Vec<String> = Vec::new();

    let substituted = PLACEHOLDER_RE.replace_all(target, |caps: &Captures| {
        let name = &caps[1];
        let value = attributes
            .get(name)
            .or_else(|| attributes.get(&name.to_lowercase()));
        match value {
            Some(value) => value.clone(),
            None => {
                if !unresolved.iter().any(|n| n == name) {
                    unresolved.push(name.to_string());
                }
                caps[0].to_string()
            }
        }
    });

    (substituted.into_owned(), unresolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_include_basic() {
        let directive = parse_include("include::chapters/intro.adoc[]", 4).unwrap();
        assert_eq!(directive.target, "chapters/intro.adoc");
        assert_eq!(directive.attributes, "");
        assert_eq!(directive.line, 4);
        assert_eq!(directive.raw, "include::chapters/intro.adoc[]");
    }

    #[test]
    fn test_parse_include_with_attributes_and_indent() {
        let line = "  include::{partialsdir}/a.adoc[leveloffset=+1]  ";
        let directive = parse_include(line, 1).unwrap();
        assert_eq!(directive.target, "{partialsdir}/a.adoc");
        assert_eq!(directive.attributes, "leveloffset=+1");
        assert_eq!(directive.raw, "include::{partialsdir}/a.adoc[leveloffset=+1]");
    }

    #[test]
    fn test_parse_include_rejects_malformed() {
        assert!(parse_include("include::missing-brackets.adoc", 1).is_none());
        assert!(parse_include("text include::a.adoc[]", 1).is_none());
        assert!(parse_include("include::[]", 1).is_none());
        assert!(parse_include("include::a.adoc[] trailing", 1).is_none());
        assert!(parse_include("// include::a.adoc[]", 1).is_none());
    }

    #[test]
    fn test_substitute_known_attribute() {
        let mut attrs = BTreeMap::new();
        attrs.insert("partialsdir".to_string(), "partials".to_string());

        let (target, unresolved) = substitute_attributes("{partialsdir}/a.adoc", &attrs);
        assert_eq!(target, "partials/a.adoc");
        assert!(unresolved.is_empty());
    }

    #[test]
    fn test_substitute_leaves_unknown_verbatim() {
        let attrs = BTreeMap::new();
        let (target, unresolved) = substitute_attributes("{dir}/{dir}/{other}.adoc", &attrs);
        assert_eq!(target, "{dir}/{dir}/{other}.adoc");
        assert_eq!(unresolved, vec!["dir".to_string(), "other".to_string()]);
    }
}
