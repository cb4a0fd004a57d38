use crate::lexer::ArithmeticSeries;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Block kind, selected by the header sigil
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockKind {
    /// `_name:`
    Constants,
    /// `#name:`
    Table,
    /// any other header
    Code,
}

impl BlockKind {
    /// Kind selected by the first character of a header line
    pub fn from_sigil(first: char) -> Self {
        match first {
            '_' => BlockKind::Constants,
            '#' => BlockKind::Table,
            _ => BlockKind::Code,
        }
    }

    pub fn sigil(self) -> Option<char> {
        match self {
            BlockKind::Constants => Some('_'),
            BlockKind::Table => Some('#'),
            BlockKind::Code => None,
        }
    }
}

/// Named size annotation attached to a constant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitField {
    /// Name without the leading `.`; `*` for the `.*` wildcard
    pub name: String,
    pub size: u32,
}

/// A node of the constant tree
///
/// Children keep their declaration order. Re-declaring a name under the same
/// parent replaces the earlier node in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstantNode {
    pub name: String,
    pub value: u32,
    children: Vec<ConstantNode>,
    pub bit_fields: Vec<BitField>,
}

impl ConstantNode {
    /// Creates a leaf node with no children or bit fields
    pub fn new(name: impl Into<String>, value: u32) -> Self {
        ConstantNode {
            name: name.into(),
            value,
            children: Vec::new(),
            bit_fields: Vec::new(),
        }
    }

    /// Child nodes in declaration order
    pub fn children(&self) -> &[ConstantNode] {
        &self.children
    }

    /// Direct child named `name`
    pub fn child(&self, name: &str) -> Option<&ConstantNode> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut ConstantNode> {
        self.children.iter_mut().find(|c| c.name == name)
    }

    pub(crate) fn child_at_mut(&mut self, index: usize) -> Option<&mut ConstantNode> {
        self.children.get_mut(index)
    }

    /// Insert or replace a child; returns its index.
    pub fn insert_child(&mut self, node: ConstantNode) -> usize {
        match self.children.iter().position(|c| c.name == node.name) {
            Some(index) => {
                self.children[index] = node;
                index
            }
            None => {
                self.children.push(node);
                self.children.len() - 1
            }
        }
    }

    pub fn add_bit_field(&mut self, name: impl Into<String>, size: u32) {
        self.bit_fields.push(BitField {
            name: name.into(),
            size,
        });
    }

    pub fn bit_field(&self, name: &str) -> Option<&BitField> {
        self.bit_fields.iter().find(|b| b.name == name)
    }

    /// Walk a dotted path starting at this node's children
    pub fn find(&self, path: &str) -> Option<&ConstantNode> {
        path.split('.')
            .try_fold(self, |node, segment| node.child(segment))
    }
}

/// Independent constant trees, one root per constants block name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstantForest {
    roots: Vec<ConstantNode>,
}

impl ConstantForest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Roots in declaration order
    pub fn roots(&self) -> &[ConstantNode] {
        &self.roots
    }

    pub fn root(&self, name: &str) -> Option<&ConstantNode> {
        self.roots.iter().find(|r| r.name == name)
    }

    /// Index of the root named `name`, creating an empty one if needed
    pub(crate) fn root_index_or_insert(&mut self, name: &str) -> usize {
        match self.roots.iter().position(|r| r.name == name) {
            Some(index) => index,
            None => {
                self.roots.push(ConstantNode::new(name, 0));
                self.roots.len() - 1
            }
        }
    }

    pub(crate) fn root_at_mut(&mut self, index: usize) -> Option<&mut ConstantNode> {
        self.roots.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

/// Entry of a table block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableEntry {
    pub name: String,
    pub value: ArithmeticSeries,
    /// Source line of the entry
    pub line: usize,
}

/// Instruction of a code block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    /// Label from a preceding `name:` line
    pub tag: Option<String>,
    pub func: String,
    pub args: Vec<ArithmeticSeries>,
    pub indent: usize,
    /// Source line of the instruction
    pub line: usize,
}

/// Parsed a2 program, handed to the code generator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub constants: ConstantForest,
    /// Table entries in file order
    pub table: Vec<TableEntry>,
    /// Instructions in file order
    pub instructions: Vec<Instruction>,
}

impl Program {
    /// Names an `@address` reference may point at: table entries and
    /// instruction tags.
    pub fn symbols(&self) -> BTreeSet<&str> {
        self.table
            .iter()
            .map(|e| e.name.as_str())
            .chain(self.instructions.iter().filter_map(|i| i.tag.as_deref()))
            .collect()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
