//! Line shapes of the a2 language
//!
//! ```text
//! BLANK     = " "*
//! IDENT     = [A-Za-z_] [A-Za-z0-9_]*
//! NUM       = INT | "0" ("x"|"X") HEXDIGITS
//! ALL_REF   = "@" IDENT | IDENT ("." IDENT)* | NUM
//! SERIES    = BLANK ALL_REF BLANK (("+"|"-") BLANK ALL_REF BLANK)*
//!
//! constant  = INDENT ("." IDENT | ".*" | IDENT) BLANK ":" BLANK NUM BLANK
//! reference = INDENT IDENT ":" SERIES
//! instr     = INDENT [A-Za-z]+ ("(" SERIES ("," SERIES)* ")")? BLANK
//! tag       = INDENT IDENT ":" BLANK
//! ```
//!
//! Every recogniser consumes the whole line; anything left over is a
//! grammar error. Errors carry line `0` until the caller stamps them.

use super::scanner::LineScanner;
use super::token::{ArithmeticSeries, InstructionLine, NamedConstant, NamedReference, TagLabel};
use crate::config::INDENT_UNIT;
use crate::error::{Error, Result};

/// Line recogniser parameterised by the indent unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grammar {
    indent_unit: usize,
}

impl Default for Grammar {
    fn default() -> Self {
        Grammar {
            indent_unit: INDENT_UNIT,
        }
    }
}

impl Grammar {
    /// Creates a grammar counting `indent_unit` spaces per nesting level
    pub fn new(indent_unit: usize) -> Result<Self> {
        if indent_unit == 0 {
            return Err(Error::InvalidOptions(
                "indent_unit must be at least 1".to_string(),
            ));
        }
        Ok(Grammar { indent_unit })
    }

    pub fn indent_unit(&self) -> usize {
        self.indent_unit
    }

    /// Nesting level for a count of leading spaces
    pub fn count_indent(&self, spaces: usize) -> Result<usize> {
        if spaces % self.indent_unit != 0 {
            return Err(Error::indent(format!(
                "{} leading spaces is not a multiple of {}",
                spaces, self.indent_unit
            )));
        }
        Ok(spaces / self.indent_unit)
    }

    fn indent_of(&self, scanner: &mut LineScanner<'_>) -> Result<usize> {
        let spaces = scanner.scan_indent();
        self.count_indent(spaces)
    }

    /// `name: NUM`, `.name: NUM` or `.*: NUM`
    pub fn named_constant(&self, text: &str) -> Result<NamedConstant> {
        let mut scanner = LineScanner::new(text);
        let indent = self.indent_of(&mut scanner)?;

        let name = if scanner.match_char('.') {
            if scanner.match_char('*') {
                ".*".to_string()
            } else {
                match scanner.scan_ident() {
                    Some(ident) => format!(".{}", ident),
                    None => return Err(scanner.error("a bit-field name or '*' after '.'")),
                }
            }
        } else {
            match scanner.scan_ident() {
                Some(ident) => ident,
                None => return Err(scanner.error("a constant name")),
            }
        };

        scanner.skip_blanks();
        scanner.expect_char(':')?;
        scanner.skip_blanks();
        let value = scanner.scan_value()?;
        scanner.skip_blanks();
        scanner.expect_end()?;

        Ok(NamedConstant {
            indent,
            name,
            value,
        })
    }

    /// `name:SERIES`
    pub fn named_reference(&self, text: &str) -> Result<NamedReference> {
        let mut scanner = LineScanner::new(text);
        let indent = self.indent_of(&mut scanner)?;

        let name = match scanner.scan_ident() {
            Some(ident) => ident,
            None => return Err(scanner.error("an entry name")),
        };
        scanner.expect_char(':')?;
        let series = scanner.scan_series()?;
        scanner.expect_end()?;

        Ok(NamedReference {
            indent,
            name,
            series,
        })
    }

    /// `FUNC` or `FUNC(SERIES, ...)`
    pub fn instruction(&self, text: &str) -> Result<InstructionLine> {
        let mut scanner = LineScanner::new(text);
        let indent = self.indent_of(&mut scanner)?;

        let func = match scanner.scan_letters() {
            Some(func) => func,
            None => return Err(scanner.error("an instruction name")),
        };

        let mut args = Vec::new();
        if scanner.match_char('(') {
            loop {
                args.push(scanner.scan_series()?);
                if scanner.match_char(',') {
                    continue;
                }
                if scanner.match_char(')') {
                    break;
                }
                return Err(scanner.error("',' or ')'"));
            }
        }

        scanner.skip_blanks();
        scanner.expect_end()?;

        Ok(InstructionLine { indent, func, args })
    }

    /// Bare `name:`; `None` when the line has any other shape.
    ///
    /// The indent is only checked once the shape matched.
    pub fn tag_label(&self, text: &str) -> Result<Option<TagLabel>> {
        let mut scanner = LineScanner::new(text);
        let spaces = scanner.scan_indent();

        let name = match scanner.scan_ident() {
            Some(ident) => ident,
            None => return Ok(None),
        };
        if !scanner.match_char(':') {
            return Ok(None);
        }
        scanner.skip_blanks();
        if !scanner.is_at_end() {
            return Ok(None);
        }

        let indent = self.count_indent(spaces)?;
        Ok(Some(TagLabel { indent, name }))
    }

    /// A whole line holding exactly one series
    pub fn series(&self, text: &str) -> Result<ArithmeticSeries> {
        tokenize_series(text)
    }
}

/// Tokenize `text` as a single arithmetic series.
pub fn tokenize_series(text: &str) -> Result<ArithmeticSeries> {
    let mut scanner = LineScanner::new(text);
    let series = scanner.scan_series()?;
    scanner.expect_end()?;
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::lexer::token::{RefOp, RefTarget, Reference};

    fn grammar() -> Grammar {
        Grammar::default()
    }

    #[test]
    fn test_count_indent() {
        let g = grammar();
        assert_eq!(g.count_indent(0).unwrap(), 0);
        assert_eq!(g.count_indent(2).unwrap(), 1);
        assert_eq!(g.count_indent(8).unwrap(), 4);
        assert_eq!(g.count_indent(3).unwrap_err().kind(), ErrorKind::Indent);
    }

    #[test]
    fn test_named_constant_hex_and_decimal() {
        let nc = grammar().named_constant("name:0x1F").unwrap();
        assert_eq!(nc.name, "name");
        assert_eq!(nc.value, 31);
        assert_eq!(nc.indent, 0);

        let nc = grammar().named_constant("name:31").unwrap();
        assert_eq!(nc.value, 31);
    }

    #[test]
    fn test_named_constant_with_blanks_and_indent() {
        let nc = grammar().named_constant("    ctrl_1 :  0x40  ").unwrap();
        assert_eq!(nc.indent, 2);
        assert_eq!(nc.name, "ctrl_1");
        assert_eq!(nc.value, 0x40);
    }

    #[test]
    fn test_named_constant_bit_fields() {
        let nc = grammar().named_constant("    .mode: 3").unwrap();
        assert_eq!(nc.name, ".mode");
        assert_eq!(nc.bit_field_name(), Some("mode"));

        let nc = grammar().named_constant("  .*: 8").unwrap();
        assert_eq!(nc.name, ".*");
        assert_eq!(nc.bit_field_name(), Some("*"));
    }

    #[test]
    fn test_named_constant_rejects() {
        let g = grammar();
        for bad in ["  ..x: 1", "  .a.b: 1", "  a.b: 1", "  x: y", "  x:", "  x 1", "  9x: 1"] {
            let err = g.named_constant(bad).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Grammar, "{}", bad);
        }
        assert_eq!(
            g.named_constant("   x: 1").unwrap_err().kind(),
            ErrorKind::Indent
        );
    }

    #[test]
    fn test_named_reference() {
        let nr = grammar().named_reference("  reset:@start + 4").unwrap();
        assert_eq!(nr.indent, 1);
        assert_eq!(nr.name, "reset");
        assert_eq!(
            nr.series.terms(),
            &[
                Reference::address("start", RefOp::None),
                Reference::literal(4, RefOp::Add),
            ]
        );

        assert!(grammar().named_reference("  reset:").is_err());
        assert!(grammar().named_reference("  reset @start").is_err());
    }

    #[test]
    fn test_series_examples() {
        let series = tokenize_series("@int + 1").unwrap();
        assert_eq!(
            series.terms(),
            &[
                Reference::address("int", RefOp::None),
                Reference::literal(1, RefOp::Add),
            ]
        );

        let series = tokenize_series("a.b - @c + 2").unwrap();
        let ops: Vec<RefOp> = series.iter().map(|r| r.op).collect();
        assert_eq!(ops, vec![RefOp::None, RefOp::Subtract, RefOp::Add]);
        assert_eq!(series.head().target, RefTarget::ConstPath("a.b".into()));

        for bad in ["a++b", "+@a", "a +", "a - - b", "a b"] {
            let err = tokenize_series(bad).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Grammar, "{}", bad);
        }
    }

    #[test]
    fn test_instruction_arguments() {
        let g = grammar();

        let inst = g.instruction("ABC").unwrap();
        assert_eq!(inst.func, "ABC");
        assert!(inst.args.is_empty());

        let inst = g.instruction("ABC(1, 2)").unwrap();
        assert_eq!(inst.args.len(), 2);
        assert_eq!(inst.args[0].terms(), &[Reference::literal(1, RefOp::None)]);
        assert_eq!(inst.args[1].terms(), &[Reference::literal(2, RefOp::None)]);

        let inst = g.instruction("ABC(1 + 2, 3)").unwrap();
        assert_eq!(
            inst.args[0].terms(),
            &[
                Reference::literal(1, RefOp::None),
                Reference::literal(2, RefOp::Add),
            ]
        );
        assert_eq!(inst.args[1].terms(), &[Reference::literal(3, RefOp::None)]);
    }

    #[test]
    fn test_instruction_indent_and_rejects() {
        let g = grammar();
        let inst = g.instruction("    MOV(io.ctrl, @buf)  ").unwrap();
        assert_eq!(inst.indent, 2);
        assert_eq!(inst.func, "MOV");

        for bad in ["  ABC()", "  ABC(1", "  ABC(1,)", "  ABC (1)", "  AB1", "  ABC(1) x"] {
            let err = g.instruction(bad).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Grammar, "{}", bad);
        }
    }

    #[test]
    fn test_tag_label() {
        let g = grammar();
        let tag = g.tag_label("  loop:").unwrap().unwrap();
        assert_eq!(tag.name, "loop");
        assert_eq!(tag.indent, 1);

        assert_eq!(g.tag_label("  loop:  ").unwrap().unwrap().name, "loop");
        assert!(g.tag_label("  loop: 1").unwrap().is_none());
        assert!(g.tag_label("  NOP").unwrap().is_none());
        assert!(g.tag_label("  ABC(1)").unwrap().is_none());
        assert_eq!(
            g.tag_label("   loop:").unwrap_err().kind(),
            ErrorKind::Indent
        );
    }

    #[test]
    fn test_custom_indent_unit() {
        let g = Grammar::new(4).unwrap();
        assert_eq!(g.named_constant("    x: 1").unwrap().indent, 1);
        assert_eq!(
            g.named_constant("  x: 1").unwrap_err().kind(),
            ErrorKind::Indent
        );
    }

    #[test]
    fn test_zero_indent_unit_rejected() {
        let err = Grammar::new(0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOptions);
        assert_eq!(Grammar::new(1).unwrap().indent_unit(), 1);
    }
}
