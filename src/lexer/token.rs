use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operator combining a reference with the terms before it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RefOp {
    /// Head of a series
    None,
    Add,
    Subtract,
}

impl RefOp {
    /// Maps an operator character to its combining operator
    pub fn from_symbol(op: char) -> Result<RefOp> {
        match op {
            '+' => Ok(RefOp::Add),
            '-' => Ok(RefOp::Subtract),
            other => Err(Error::UnexpectedArithmeticOperator { op: other }),
        }
    }

    pub fn symbol(self) -> Option<char> {
        match self {
            RefOp::None => None,
            RefOp::Add => Some('+'),
            RefOp::Subtract => Some('-'),
        }
    }
}

/// What a reference points at
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RefTarget {
    /// `@name`, stored without the `@`
    Address(String),
    /// `a.b.c`, stored verbatim
    ConstPath(String),
    /// Decimal or `0x` hex literal
    Literal(u32),
}

impl fmt::Display for RefTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefTarget::Address(name) => write!(f, "@{}", name),
            RefTarget::ConstPath(path) => f.write_str(path),
            RefTarget::Literal(value) => write!(f, "{}", value),
        }
    }
}

/// One term of an arithmetic series
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    pub target: RefTarget,
    pub op: RefOp,
}

impl Reference {
    /// Creates a reference combining `target` with `op`
    pub fn new(target: RefTarget, op: RefOp) -> Self {
        Reference { target, op }
    }

    /// `@name` reference; `name` is given without the `@`
    pub fn address(name: impl Into<String>, op: RefOp) -> Self {
        Reference::new(RefTarget::Address(name.into()), op)
    }

    pub fn const_path(path: impl Into<String>, op: RefOp) -> Self {
        Reference::new(RefTarget::ConstPath(path.into()), op)
    }

    pub fn literal(value: u32, op: RefOp) -> Self {
        Reference::new(RefTarget::Literal(value), op)
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.op.symbol() {
            Some(op) => write!(f, "{} {}", op, self.target),
            None => write!(f, "{}", self.target),
        }
    }
}

/// `term (op term)*`: a non-empty, left-to-right chain of references.
///
/// The head always carries [`RefOp::None`]; every later term carries
/// `Add` or `Subtract`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Reference>", into = "Vec<Reference>")]
pub struct ArithmeticSeries {
    terms: Vec<Reference>,
}

impl ArithmeticSeries {
    /// Start a series from its head term
    pub fn new(head: RefTarget) -> Self {
        ArithmeticSeries {
            terms: vec![Reference::new(head, RefOp::None)],
        }
    }

    /// Append a term; the head operator is reserved for the first term.
    pub fn push(&mut self, op: RefOp, target: RefTarget) -> Result<()> {
        if op == RefOp::None {
            return Err(Error::internal(format!(
                "series term `{}` has no combining operator",
                target
            )));
        }
        self.terms.push(Reference::new(target, op));
        Ok(())
    }

    pub fn head(&self) -> &Reference {
        &self.terms[0]
    }

    pub fn terms(&self) -> &[Reference] {
        &self.terms
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Reference> {
        self.terms.iter()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether the series has no terms
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl TryFrom<Vec<Reference>> for ArithmeticSeries {
    type Error = Error;

    fn try_from(terms: Vec<Reference>) -> Result<Self> {
        let mut iter = terms.into_iter();
        let head = match iter.next() {
            Some(head) if head.op == RefOp::None => head,
            Some(head) => {
                return Err(Error::internal(format!(
                    "series head `{}` carries an operator",
                    head
                )))
            }
            None => return Err(Error::internal("empty arithmetic series")),
        };
        let mut series = ArithmeticSeries::new(head.target);
        for term in iter {
            series.push(term.op, term.target)?;
        }
        Ok(series)
    }
}

impl From<ArithmeticSeries> for Vec<Reference> {
    fn from(series: ArithmeticSeries) -> Self {
        series.terms
    }
}

impl<'s> IntoIterator for &'s ArithmeticSeries {
    type Item = &'s Reference;
    type IntoIter = std::slice::Iter<'s, Reference>;

    fn into_iter(self) -> Self::IntoIter {
        self.terms.iter()
    }
}

impl fmt::Display for ArithmeticSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, term) in self.terms.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", term)?;
        }
        Ok(())
    }
}

/// `name: NUM` in a constants block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedConstant {
    pub indent: usize,
    /// Name as written, including a leading `.` for bit-field lines
    pub name: String,
    pub value: u32,
}

impl NamedConstant {
    /// Bit-field annotation name without its leading `.`
    pub fn bit_field_name(&self) -> Option<&str> {
        self.name.strip_prefix('.')
    }
}

/// `name: SERIES` in a table block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedReference {
    pub indent: usize,
    pub name: String,
    pub series: ArithmeticSeries,
}

/// `FUNC` or `FUNC(SERIES, ...)` in a code block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionLine {
    pub indent: usize,
    pub func: String,
    pub args: Vec<ArithmeticSeries>,
}

/// Bare `name:` in a code block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagLabel {
    pub indent: usize,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_from_symbol() {
        assert_eq!(RefOp::from_symbol('+').unwrap(), RefOp::Add);
        assert_eq!(RefOp::from_symbol('-').unwrap(), RefOp::Subtract);

        let err = RefOp::from_symbol('*').unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedArithmeticOperator);
    }

    #[test]
    fn test_series_display() {
        let mut series = ArithmeticSeries::new(RefTarget::ConstPath("a.b".into()));
        series
            .push(RefOp::Subtract, RefTarget::Address("c".into()))
            .unwrap();
        series.push(RefOp::Add, RefTarget::Literal(2)).unwrap();

        assert_eq!(series.to_string(), "a.b - @c + 2");
        assert_eq!(series.len(), 3);
        assert_eq!(series.head().op, RefOp::None);
    }

    #[test]
    fn test_push_requires_operator() {
        let mut series = ArithmeticSeries::new(RefTarget::Literal(1));
        let err = series.push(RefOp::None, RefTarget::Literal(2)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedInternal);
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn test_series_rejects_malformed_terms() {
        assert!(ArithmeticSeries::try_from(Vec::new()).is_err());
        assert!(ArithmeticSeries::try_from(vec![Reference::literal(1, RefOp::Add)]).is_err());

        let series = ArithmeticSeries::try_from(vec![
            Reference::address("int", RefOp::None),
            Reference::literal(1, RefOp::Add),
        ])
        .unwrap();
        assert_eq!(series.to_string(), "@int + 1");
    }

    #[test]
    fn test_bit_field_name() {
        let field = NamedConstant {
            indent: 2,
            name: ".mode".into(),
            value: 3,
        };
        assert_eq!(field.bit_field_name(), Some("mode"));

        let node = NamedConstant {
            indent: 1,
            name: "ctrl".into(),
            value: 0x10,
        };
        assert_eq!(node.bit_field_name(), None);
    }
}
