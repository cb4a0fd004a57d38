//! Lexical analysis for a2
//!
//! Turns source text into cleaned lines and recognises the line shapes of
//! each block kind.

mod grammar;
mod scanner;
mod source;
mod token;

pub use grammar::{tokenize_series, Grammar};
pub use scanner::LineScanner;
pub use source::{Line, LineSource};
pub use token::{
    ArithmeticSeries, InstructionLine, NamedConstant, NamedReference, RefOp, RefTarget, Reference,
    TagLabel,
};
