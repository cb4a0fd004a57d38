//! Error types for the a2 front end

use std::fmt;
use thiserror::Error;

/// a2 parse and resolution errors
///
/// Every variant that originates from a source line carries its 1-based line
/// number. Grammar functions work on bare text and report line `0`; the
/// program parser stamps the real line with [`Error::at_line`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // Parse errors
    /// Leading indentation that cannot be turned into a nesting level
    ///
    /// **Triggered by:** a leading-space count that is not a multiple of the
    /// indent unit, a rejected multi-level indent jump, or a dedent past the
    /// block root
    /// **Example:** `   reg: 1` (three spaces with an indent unit of two)
    #[error("Indent error at line {line}: {message}")]
    IndentError {
        /// Line number where error occurred
        line: usize,
        /// Error description
        message: String,
    },

    /// A line does not match any shape valid for its block
    ///
    /// **Triggered by:** malformed constants, table or code lines
    /// **Example:** `  ptr: a++b`, `  ABC()`
    #[error("Grammar error at line {line}, column {column}: expected {expected} in `{text}`")]
    GrammarError {
        /// Line number where error occurred
        line: usize,
        /// Column (1-indexed, in characters) where scanning stopped
        column: usize,
        /// Description of what the grammar expected at that column
        expected: String,
        /// The offending line
        text: String,
    },

    /// An operator other than `+`/`-` reached the series combiner
    #[error("Unexpected arithmetic operator '{op}'")]
    UnexpectedArithmeticOperator {
        /// The operator character
        op: char,
    },

    /// A matched token could not be interpreted
    #[error("Unexpected internal error: {0}")]
    UnexpectedInternal(String),

    // Resolution errors
    /// A dotted or address reference could not be resolved
    #[error("Reference not found: {reference}")]
    ReferenceNotFound {
        /// The reference as written in the source
        reference: String,
    },

    /// The first segment of a dotted reference matched under several roots
    #[error("Ambiguous reference: {reference} (found under roots {})", .roots.join(", "))]
    AmbiguousReference {
        /// The reference as written in the source
        reference: String,
        /// Names of every root with a matching child
        roots: Vec<String>,
    },

    // Structure errors
    /// An indented line appeared where a block header was required
    #[error("Line {line}: expected a block header, found `{text}`")]
    ExpectedBlockHeader {
        /// Line number where error occurred
        line: usize,
        /// The offending line
        text: String,
    },

    /// Options that cannot drive a parse
    #[error("Invalid options: {0}")]
    InvalidOptions(String),
}

/// Discriminant of [`Error`], used for matching and reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Indent,
    Grammar,
    UnexpectedArithmeticOperator,
    UnexpectedInternal,
    ReferenceNotFound,
    AmbiguousReference,
    ExpectedBlockHeader,
    InvalidOptions,
}

impl ErrorKind {
    /// Stable display name of the kind
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Indent => "IndentError",
            ErrorKind::Grammar => "GrammarError",
            ErrorKind::UnexpectedArithmeticOperator => "UnexpectedArithmeticOperator",
            ErrorKind::UnexpectedInternal => "UnexpectedInternal",
            ErrorKind::ReferenceNotFound => "ReferenceNotFound",
            ErrorKind::AmbiguousReference => "AmbiguousReference",
            ErrorKind::ExpectedBlockHeader => "ExpectedBlockHeader",
            ErrorKind::InvalidOptions => "InvalidOptions",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error {
    pub(crate) fn indent(message: impl Into<String>) -> Self {
        Error::IndentError {
            line: 0,
            message: message.into(),
        }
    }

    pub(crate) fn grammar(column: usize, expected: impl Into<String>, text: &str) -> Self {
        Error::GrammarError {
            line: 0,
            column,
            expected: expected.into(),
            text: text.to_string(),
        }
    }

    pub(crate) fn internal(msg: impl Into<String>) -> Self {
        Error::UnexpectedInternal(msg.into())
    }

    /// Kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::IndentError { .. } => ErrorKind::Indent,
            Error::GrammarError { .. } => ErrorKind::Grammar,
            Error::UnexpectedArithmeticOperator { .. } => ErrorKind::UnexpectedArithmeticOperator,
            Error::UnexpectedInternal(_) => ErrorKind::UnexpectedInternal,
            Error::ReferenceNotFound { .. } => ErrorKind::ReferenceNotFound,
            Error::AmbiguousReference { .. } => ErrorKind::AmbiguousReference,
            Error::ExpectedBlockHeader { .. } => ErrorKind::ExpectedBlockHeader,
            Error::InvalidOptions(_) => ErrorKind::InvalidOptions,
        }
    }

    /// Source line the error points at, if it has one
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::IndentError { line, .. }
            | Error::GrammarError { line, .. }
            | Error::ExpectedBlockHeader { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// Attach a source line to an error produced from bare text.
    ///
    /// Errors that already carry a non-zero line keep it.
    pub fn at_line(mut self, number: usize) -> Self {
        match &mut self {
            Error::IndentError { line, .. }
            | Error::GrammarError { line, .. }
            | Error::ExpectedBlockHeader { line, .. } => {
                if *line == 0 {
                    *line = number;
                }
            }
            _ => {}
        }
        self
    }
}

/// Result type for a2 operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(ErrorKind::Indent.as_str(), "IndentError");
        assert_eq!(ErrorKind::Grammar.to_string(), "GrammarError");
        assert_eq!(
            Error::ReferenceNotFound {
                reference: "a.b".into()
            }
            .kind()
            .as_str(),
            "ReferenceNotFound"
        );
    }

    #[test]
    fn test_at_line_fills_unset_line_only() {
        let err = Error::grammar(3, "':'", "abc").at_line(12);
        assert_eq!(err.line(), Some(12));

        let err = err.at_line(40);
        assert_eq!(err.line(), Some(12));
    }

    #[test]
    fn test_at_line_ignores_unlocated_errors() {
        let err = Error::internal("oops").at_line(7);
        assert_eq!(err.line(), None);
        assert_eq!(err.kind(), ErrorKind::UnexpectedInternal);
    }

    #[test]
    fn test_display_includes_position() {
        let err = Error::grammar(5, "a reference", "  x: +1").at_line(9);
        let msg = err.to_string();
        assert!(msg.contains("line 9"));
        assert!(msg.contains("column 5"));
        assert!(msg.contains("a reference"));
    }

    #[test]
    fn test_ambiguous_lists_roots() {
        let err = Error::AmbiguousReference {
            reference: "reg".into(),
            roots: vec!["io".into(), "mem".into()],
        };
        assert_eq!(
            err.to_string(),
            "Ambiguous reference: reg (found under roots io, mem)"
        );
    }
}
