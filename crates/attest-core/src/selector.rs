//! Selector parsing for selective artifact enablement.
//!
//! A selector names artifacts by content unit and identity:
//!
//! - `acme_unit::ssh-001` → a specific artifact in a unit
//! - `acme_unit::ssh.*` → artifacts matching a regex within a unit
//! - `.*::ssh.*` → artifacts matching a regex in any unit
//! - `acme_unit` → every artifact in matching units, regardless of name
//!
//! Both segments are regexes anchored at start and end, so a segment without
//! special characters behaves as an exact literal match. Patterns are regex
//! syntax, not globs: `.` and `*` carry their regex meaning.

use regex::Regex;

use crate::error::{ComplianceError, ComplianceResult};

const SEPARATOR: &str = "::";

/// A parsed `unit_pattern::name_pattern` selector.
#[derive(Debug, Clone)]
pub struct Selector {
    raw: String,
    unit_source: String,
    name_source: Option<String>,
    unit_pattern: Regex,
    name_pattern: Option<Regex>,
}

impl Selector {
    /// Parse a selector string.
    ///
    /// Splits on the first `::` into a unit pattern and an optional name
    /// pattern. A selector with no `::` matches on the unit pattern only.
    pub fn parse(raw: &str) -> ComplianceResult<Self> {
        let (unit_source, name_source) = match raw.split_once(SEPARATOR) {
            Some((unit, name)) => (unit, Some(name)),
            None => (raw, None),
        };

        let unit_pattern = anchored(raw, unit_source)?;
        let name_pattern = name_source.map(|name| anchored(raw, name)).transpose()?;

        Ok(Self {
            raw: raw.to_string(),
            unit_source: unit_source.to_string(),
            name_source: name_source.map(String::from),
            unit_pattern,
            name_pattern,
        })
    }

    /// Whether an artifact with this unit and identity is selected.
    pub fn matches(&self, unit: &str, name: &str) -> bool {
        self.unit_pattern.is_match(unit)
            && self
                .name_pattern
                .as_ref()
                .map_or(true, |pattern| pattern.is_match(name))
    }

    /// True when the selector has no name segment.
    pub fn is_unit_only(&self) -> bool {
        self.name_pattern.is_none()
    }

    /// The selector string as written.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The unit pattern as written (without the implicit anchors).
    pub fn unit_source(&self) -> &str {
        &self.unit_source
    }

    /// The name pattern as written, if present.
    pub fn name_source(&self) -> Option<&str> {
        self.name_source.as_deref()
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

impl std::str::FromStr for Selector {
    type Err = ComplianceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Compile a segment as an anchored whole-string regex (`^(?:pat)$`).
fn anchored(selector: &str, pattern: &str) -> ComplianceResult<Regex> {
    Regex::new(&format!("^(?:{pattern})$")).map_err(|err| ComplianceError::InvalidSelector {
        selector: selector.to_string(),
        reason: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_unit_and_name() {
        let sel = Selector::parse("acme_unit::ssh-001").unwrap();
        assert_eq!(sel.unit_source(), "acme_unit");
        assert_eq!(sel.name_source(), Some("ssh-001"));
        assert!(!sel.is_unit_only());
    }

    #[test]
    fn parse_unit_only() {
        let sel = Selector::parse("acme_unit").unwrap();
        assert_eq!(sel.unit_source(), "acme_unit");
        assert_eq!(sel.name_source(), None);
        assert!(sel.is_unit_only());
    }

    #[test]
    fn literal_segments_match_exactly() {
        let sel = Selector::parse("acme_unit::ssh").unwrap();
        assert!(sel.matches("acme_unit", "ssh"));
        assert!(!sel.matches("acme_unit", "ssh-001"));
        assert!(!sel.matches("acme_unit_extra", "ssh"));
        assert!(!sel.matches("prefix_acme_unit", "ssh"));
    }

    #[test]
    fn regex_segments_are_anchored_not_substring() {
        let sel = Selector::parse("acme.*::ssh.*").unwrap();
        assert!(sel.matches("acme_unit", "ssh-001"));
        assert!(sel.matches("acme", "ssh"));
        assert!(!sel.matches("the_acme_unit", "ssh"));
        assert!(!sel.matches("acme_unit", "openssh"));
    }

    #[test]
    fn unit_only_ignores_name() {
        let sel = Selector::parse("acme_unit").unwrap();
        assert!(sel.matches("acme_unit", "anything"));
        assert!(sel.matches("acme_unit", ""));
        assert!(!sel.matches("other_unit", "anything"));
    }

    #[test]
    fn dot_is_regex_syntax_not_literal() {
        let sel = Selector::parse("unit::ssh.001").unwrap();
        assert!(sel.matches("unit", "ssh-001"));
        assert!(sel.matches("unit", "ssh.001"));
    }

    #[test]
    fn invalid_regex_is_rejected() {
        let err = Selector::parse("acme_unit::ssh[").unwrap_err();
        assert!(matches!(err, ComplianceError::InvalidSelector { .. }));
        assert!(err.to_string().contains("acme_unit::ssh["));
    }

    #[test]
    fn from_str_roundtrip() {
        let sel: Selector = ".*::ssh.*".parse().unwrap();
        assert_eq!(sel.to_string(), ".*::ssh.*");
    }
}
