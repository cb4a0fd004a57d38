//! # a2 - front end for the a2 description language
//!
//! a2 is a small line-oriented, indentation-scoped language describing named
//! constants, a reference table and a sequence of instructions for a
//! downstream code/data generator. This crate turns a2 source text into a
//! [`Program`] and resolves the references inside it.
//!
//! ## Quick Start
//!
//! ```rust
//! use a2::{RefOp, ResolveOptions};
//!
//! # fn main() -> a2::Result<()> {
//! let source = "\
//! ' peripheral registers
//! _io:
//!   ctrl: 0x40
//!     .mode: 2
//! #vectors:
//!   reset:@start
//! main:
//!   start:
//!   MOV(ctrl + 4, 1)
//! ";
//!
//! let program = a2::parse(source)?;
//!
//! assert_eq!(program.constants.root("io").unwrap().children().len(), 1);
//! assert_eq!(program.table[0].name, "reset");
//! assert_eq!(program.instructions[0].tag.as_deref(), Some("start"));
//!
//! let arg = &program.instructions[0].args[0];
//! assert_eq!(arg.terms()[1].op, RefOp::Add);
//!
//! let resolver = program.resolver(ResolveOptions::default());
//! assert_eq!(resolver.evaluate(arg)?.value, 0x44);
//! # Ok(())
//! # }
//! ```
//!
//! ## Source Format
//!
//! - Lines whose first non-blank character is `'` are comments; blank
//!   lines are ignored.
//! - A line starting in column one is a block header. `_name:` opens a
//!   constants block, `#name:` a table block, anything else a code block.
//! - Body lines are indented in units of two spaces.
//!
//! | Block     | Body line                                   |
//! |-----------|---------------------------------------------|
//! | constants | `name: NUM` or bit field `.name: NUM`       |
//! | table     | `name:SERIES`                               |
//! | code      | tag `name:` or instruction `FUNC(SERIES, ...)` |
//!
//! A series is `term (+|- term)*` where a term is an address `@name`, a
//! dotted constant path `a.b.c` or a decimal / `0x` hex number.
//!
//! ## Architecture
//!
//! ```text
//! Source → LineSource → BlockSegmenter → {ConstantsBuilder | table | code} → Program
//!                                                                              ↓
//!                                                                          Resolver
//! ```
//!
//! - [`LineSource`] - cleaned lines with one line of push-back
//! - [`BlockSegmenter`] - splits lines into constants, table and code blocks
//! - [`Grammar`] - recognises the line shapes of each block
//! - [`ConstantsBuilder`] - builds constant trees from indentation
//! - [`ProgramParser`] - drives the above into a [`Program`]
//! - [`Resolver`] - resolves dotted paths and evaluates series
//!
//! ## Error Handling
//!
//! Parsing stops at the first error. Errors carry their kind and the
//! offending source line:
//!
//! ```rust
//! use a2::ErrorKind;
//!
//! let err = a2::parse("_c:\n   x: 1\n").unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::Indent);
//! assert_eq!(err.line(), Some(2));
//! ```

/// Version of the a2 front end
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod config;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod resolver;

// Re-export main types
pub use config::{IndentJumpPolicy, ParseOptions, ResolveOptions, RootLookup, UnresolvedPolicy};
pub use error::{Error, ErrorKind, Result};
pub use lexer::{
    tokenize_series, ArithmeticSeries, Grammar, Line, LineSource, RefOp, RefTarget, Reference,
};
pub use parser::{
    BitField, BlockKind, BlockSegmenter, ConstantForest, ConstantNode, ConstantsBuilder,
    Instruction, Program, ProgramParser, TableEntry,
};
pub use resolver::{Evaluated, Link, Resolver};

/// Parse a2 source text with default options
pub fn parse(source: &str) -> Result<Program> {
    ProgramParser::default().parse(source)
}

/// Parse a2 source text with explicit options
pub fn parse_with(source: &str, options: ParseOptions) -> Result<Program> {
    ProgramParser::new(options)?.parse(source)
}
