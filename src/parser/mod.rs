//! a2 parser module
//!
//! Segments cleaned lines into blocks and builds the [`Program`]: the
//! constant forest, the table entries and the instruction list.

mod ast;
mod blocks;
mod constants;
mod program;

pub use ast::{
    BitField, BlockKind, ConstantForest, ConstantNode, Instruction, Program, TableEntry,
};
pub use blocks::{BlockBody, BlockHeader, BlockSegmenter};
pub use constants::ConstantsBuilder;
pub use program::ProgramParser;
