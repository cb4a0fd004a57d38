use super::token::{ArithmeticSeries, RefOp, RefTarget};
use crate::error::{Error, Result};

/// Character scanner over a single source line
///
/// Building blocks for the line shapes in [`super::grammar`]. Every `scan_*`
/// method either consumes a complete element or fails with a grammar error
/// pointing at the column where the element went wrong.
pub struct LineScanner<'t> {
    /// The line being scanned, for diagnostics
    text: &'t str,
    /// Line as character vector
    source: Vec<char>,
    /// Current position in source
    current: usize,
}

impl<'t> LineScanner<'t> {
    /// Creates a scanner positioned at the start of `text`
    pub fn new(text: &'t str) -> Self {
        LineScanner {
            text,
            source: text.chars().collect(),
            current: 0,
        }
    }

    /// Column (1-indexed) of the next unread character
    pub fn column(&self) -> usize {
        self.current + 1
    }

    pub fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    /// Next character, or `'\0'` at the end of the line
    pub fn peek(&self) -> char {
        self.source.get(self.current).copied().unwrap_or('\0')
    }

    fn peek_next(&self) -> char {
        self.source.get(self.current + 1).copied().unwrap_or('\0')
    }

    fn advance(&mut self) -> char {
        let c = self.peek();
        self.current += 1;
        c
    }

    pub fn match_char(&mut self, expected: char) -> bool {
        if self.is_at_end() || self.peek() != expected {
            return false;
        }
        self.current += 1;
        true
    }

    /// Grammar error at the current column
    pub fn error(&self, expected: impl Into<String>) -> Error {
        Error::grammar(self.column(), expected, self.text)
    }

    /// Consume `expected` or fail at the current column
    pub fn expect_char(&mut self, expected: char) -> Result<()> {
        if self.match_char(expected) {
            Ok(())
        } else {
            Err(self.error(format!("'{}'", expected)))
        }
    }

    pub fn expect_end(&self) -> Result<()> {
        if self.is_at_end() {
            Ok(())
        } else {
            Err(self.error("end of line"))
        }
    }

    /// Consume leading spaces and return how many there were
    pub fn scan_indent(&mut self) -> usize {
        let start = self.current;
        self.skip_blanks();
        self.current - start
    }

    pub fn skip_blanks(&mut self) {
        while self.peek() == ' ' {
            self.current += 1;
        }
    }

    fn is_ident_start(c: char) -> bool {
        c.is_ascii_alphabetic() || c == '_'
    }

    fn is_ident_char(c: char) -> bool {
        c.is_ascii_alphanumeric() || c == '_'
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let start = self.current;
        while !self.is_at_end() && pred(self.peek()) {
            self.current += 1;
        }
        self.source[start..self.current].iter().collect()
    }

    /// `[A-Za-z_][A-Za-z0-9_]*`, or `None` without consuming anything
    pub fn scan_ident(&mut self) -> Option<String> {
        if !Self::is_ident_start(self.peek()) {
            return None;
        }
        Some(self.take_while(Self::is_ident_char))
    }

    /// One or more ASCII letters
    pub fn scan_letters(&mut self) -> Option<String> {
        if !self.peek().is_ascii_alphabetic() {
            return None;
        }
        Some(self.take_while(|c| c.is_ascii_alphabetic()))
    }

    /// `INT | HEXINT`, or `None` when the next character is not a digit
    pub fn scan_number(&mut self) -> Result<Option<u32>> {
        if !self.peek().is_ascii_digit() {
            return Ok(None);
        }

        let start = self.column();
        if self.peek() == '0' && matches!(self.peek_next(), 'x' | 'X') {
            self.current += 2;
            let digits = self.take_while(|c| c.is_ascii_hexdigit());
            if digits.is_empty() {
                return Err(self.error("hex digits after '0x'"));
            }
            return u32::from_str_radix(&digits, 16)
                .map(Some)
                .map_err(|_| Error::grammar(start, "a hex value that fits in 32 bits", self.text));
        }

        let digits = self.take_while(|c| c.is_ascii_digit());
        digits
            .parse::<u32>()
            .map(Some)
            .map_err(|_| Error::grammar(start, "a decimal value that fits in 32 bits", self.text))
    }

    /// Numeric value of a named-constant line
    pub fn scan_value(&mut self) -> Result<u32> {
        match self.scan_number()? {
            Some(value) => Ok(value),
            None => Err(self.error("a number")),
        }
    }

    /// `IDENT ("." IDENT)*`, or `None` when no identifier starts here
    pub fn scan_const_path(&mut self) -> Result<Option<String>> {
        let mut path = match self.scan_ident() {
            Some(ident) => ident,
            None => return Ok(None),
        };

        while self.match_char('.') {
            match self.scan_ident() {
                Some(segment) => {
                    path.push('.');
                    path.push_str(&segment);
                }
                None => return Err(self.error("an identifier after '.'")),
            }
        }

        Ok(Some(path))
    }

    /// `ADDR_REF | CONST_REF | NUM`
    pub fn scan_reference(&mut self, expected: &str) -> Result<RefTarget> {
        if self.match_char('@') {
            return match self.scan_ident() {
                Some(name) => Ok(RefTarget::Address(name)),
                None => Err(self.error("an identifier after '@'")),
            };
        }

        if let Some(value) = self.scan_number()? {
            return Ok(RefTarget::Literal(value));
        }

        match self.scan_const_path()? {
            Some(path) => Ok(RefTarget::ConstPath(path)),
            None => Err(self.error(expected)),
        }
    }

    /// `BLANK ALL_REF BLANK (ARITH_OP BLANK ALL_REF BLANK)*`
    ///
    /// Stops at the first character that is neither an operator nor part of
    /// a term; the caller decides whether that character may follow.
    pub fn scan_series(&mut self) -> Result<ArithmeticSeries> {
        self.skip_blanks();
        let head = self.scan_reference("a reference")?;
        let mut series = ArithmeticSeries::new(head);
        self.skip_blanks();

        while matches!(self.peek(), '+' | '-') {
            let symbol = self.advance();
            let op = RefOp::from_symbol(symbol)?;
            self.skip_blanks();
            let term = self.scan_reference(&format!("a reference after '{}'", symbol))?;
            series.push(op, term)?;
            self.skip_blanks();
        }

        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_scan_indent() {
        let mut scanner = LineScanner::new("    abc");
        assert_eq!(scanner.scan_indent(), 4);
        assert_eq!(scanner.scan_ident().as_deref(), Some("abc"));
        assert!(scanner.is_at_end());
    }

    #[test]
    fn test_scan_numbers() {
        assert_eq!(LineScanner::new("31").scan_number().unwrap(), Some(31));
        assert_eq!(LineScanner::new("0x1F").scan_number().unwrap(), Some(31));
        assert_eq!(LineScanner::new("0X1f").scan_number().unwrap(), Some(31));
        assert_eq!(LineScanner::new("0").scan_number().unwrap(), Some(0));
        assert_eq!(LineScanner::new("abc").scan_number().unwrap(), None);
    }

    #[test]
    fn test_scan_number_errors() {
        let err = LineScanner::new("0x").scan_number().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Grammar);

        let err = LineScanner::new("4294967296").scan_number().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Grammar);

        assert_eq!(
            LineScanner::new("0xFFFFFFFF").scan_number().unwrap(),
            Some(u32::MAX)
        );
    }

    #[test]
    fn test_scan_const_path() {
        let mut scanner = LineScanner::new("a.b_1.c rest");
        assert_eq!(scanner.scan_const_path().unwrap().as_deref(), Some("a.b_1.c"));
        assert_eq!(scanner.peek(), ' ');

        let err = LineScanner::new("a.").scan_const_path().unwrap_err();
        assert!(matches!(err, Error::GrammarError { column: 3, .. }));
    }

    #[test]
    fn test_scan_reference_kinds() {
        assert_eq!(
            LineScanner::new("@int").scan_reference("ref").unwrap(),
            RefTarget::Address("int".into())
        );
        assert_eq!(
            LineScanner::new("io.ctrl").scan_reference("ref").unwrap(),
            RefTarget::ConstPath("io.ctrl".into())
        );
        assert_eq!(
            LineScanner::new("0x10").scan_reference("ref").unwrap(),
            RefTarget::Literal(16)
        );
        assert!(LineScanner::new("@").scan_reference("ref").is_err());
        assert!(LineScanner::new("(").scan_reference("ref").is_err());
    }

    #[test]
    fn test_scan_series_stops_at_delimiter() {
        let mut scanner = LineScanner::new(" 1 + a.b , 2");
        let series = scanner.scan_series().unwrap();
        assert_eq!(series.to_string(), "1 + a.b");
        assert_eq!(scanner.peek(), ',');
    }

    #[test]
    fn test_scan_series_doubled_operator() {
        let err = LineScanner::new("a++b").scan_series().unwrap_err();
        match err {
            Error::GrammarError {
                column, expected, ..
            } => {
                assert_eq!(column, 3);
                assert_eq!(expected, "a reference after '+'");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
