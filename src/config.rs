//! Parse and resolution options
//!
//! Defaults pick the strict behaviour where the historical a2 tooling was
//! silent (unresolved and ambiguous references), and the historical
//! behaviour where existing sources depend on it (indent jumps).

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Number of leading spaces per nesting level
pub const INDENT_UNIT: usize = 2;

/// How the constants builder treats a line more than one level deeper
/// than its predecessor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndentJumpPolicy {
    /// Treat any deeper indent as exactly one level deeper
    #[default]
    Collapse,
    /// Raise an indent error
    Reject,
}

/// How the first segment of a dotted path picks its root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RootLookup {
    /// The segment must match a child of exactly one root
    #[default]
    RequireUnique,
    /// The first root (in declaration order) with a matching child wins
    FirstMatch,
}

/// What an unresolved reference evaluates to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedPolicy {
    /// Fail with `ReferenceNotFound`
    #[default]
    Error,
    /// Evaluate to zero and log a warning
    Zero,
}

/// Options for [`crate::ProgramParser`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Spaces per indent level
    pub indent_unit: usize,
    /// Handling of multi-level indent jumps in constants blocks
    pub indent_jumps: IndentJumpPolicy,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            indent_unit: INDENT_UNIT,
            indent_jumps: IndentJumpPolicy::Collapse,
        }
    }
}

impl ParseOptions {
    /// Load options from JSON; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: ParseOptions = serde_json::from_str(json)
            .map_err(|e| Error::InvalidOptions(format!("parse options: {}", e)))?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        if self.indent_unit == 0 {
            return Err(Error::InvalidOptions(
                "indent_unit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Options for [`crate::Resolver`]
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveOptions {
    /// How a first path segment found under several roots is handled
    pub root_lookup: RootLookup,
    /// What an unknown constant path or address evaluates to
    pub unresolved: UnresolvedPolicy,
    /// Check `@name` references against table entry names and tag labels
    pub check_addresses: bool,
}

impl ResolveOptions {
    /// Options reproducing the historical resolver: first root wins and
    /// unknown names read as zero.
    pub fn legacy() -> Self {
        Self {
            root_lookup: RootLookup::FirstMatch,
            unresolved: UnresolvedPolicy::Zero,
            check_addresses: false,
        }
    }

    /// Load options from JSON; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::InvalidOptions(format!("resolve options: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_defaults() {
        let options = ParseOptions::default();
        assert_eq!(options.indent_unit, 2);
        assert_eq!(options.indent_jumps, IndentJumpPolicy::Collapse);

        let resolve = ResolveOptions::default();
        assert_eq!(resolve.root_lookup, RootLookup::RequireUnique);
        assert_eq!(resolve.unresolved, UnresolvedPolicy::Error);
        assert!(!resolve.check_addresses);
    }

    #[test]
    fn test_parse_options_from_partial_json() {
        let options = ParseOptions::from_json_str(r#"{"indent_jumps": "reject"}"#).unwrap();
        assert_eq!(options.indent_unit, 2);
        assert_eq!(options.indent_jumps, IndentJumpPolicy::Reject);
    }

    #[test]
    fn test_zero_indent_unit_rejected() {
        let err = ParseOptions::from_json_str(r#"{"indent_unit": 0}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOptions);
    }

    #[test]
    fn test_resolve_options_from_json() {
        let options =
            ResolveOptions::from_json_str(r#"{"root_lookup": "first_match", "unresolved": "zero"}"#)
                .unwrap();
        assert_eq!(options, ResolveOptions::legacy());
    }

    #[test]
    fn test_bad_json_is_invalid_options() {
        let err = ResolveOptions::from_json_str("{not json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOptions);
    }
}
