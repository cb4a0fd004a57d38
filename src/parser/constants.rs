//! Indentation-driven construction of constant trees
//!
//! A constants block extends the forest root named after the block. Each
//! body line is either a node (`name: value`) or a bit-field annotation
//! (`.name: size`) for the node created just before it.
//!
//! Positions in the tree are tracked as index paths from the block root
//! rather than references, so the builder owns no aliases into the forest.
//! Indices stay valid because a re-declared name replaces its node in place.

use super::ast::{ConstantForest, ConstantNode};
use crate::config::IndentJumpPolicy;
use crate::error::{Error, Result};
use crate::lexer::{Grammar, Line, NamedConstant};

type NodePath = Vec<usize>;

/// Builds one constants block into a [`ConstantForest`]
pub struct ConstantsBuilder<'f> {
    forest: &'f mut ConstantForest,
    root: usize,
    grammar: Grammar,
    jumps: IndentJumpPolicy,
    /// Current insertion parent
    parent: NodePath,
    /// Most recently created node
    last: NodePath,
    last_indent: usize,
    /// Ancestors of `parent`
    stack: Vec<NodePath>,
    nodes: usize,
    bit_fields: usize,
}

impl<'f> ConstantsBuilder<'f> {
    /// Start a block; the root named `root_name` is created if missing
    /// and extended otherwise.
    pub fn new(
        forest: &'f mut ConstantForest,
        root_name: &str,
        grammar: Grammar,
        jumps: IndentJumpPolicy,
    ) -> Self {
        let root = forest.root_index_or_insert(root_name);
        ConstantsBuilder {
            forest,
            root,
            grammar,
            jumps,
            parent: Vec::new(),
            last: Vec::new(),
            last_indent: 0,
            stack: Vec::new(),
            nodes: 0,
            bit_fields: 0,
        }
    }

    /// Tokenize and add one body line
    pub fn feed(&mut self, line: &Line) -> Result<()> {
        let constant = self
            .grammar
            .named_constant(&line.text)
            .map_err(|e| e.at_line(line.number))?;
        self.add(constant).map_err(|e| e.at_line(line.number))
    }

    pub fn add(&mut self, constant: NamedConstant) -> Result<()> {
        if let Some(field) = constant.bit_field_name() {
            tracing::trace!(field, size = constant.value, "bit field");
            let last = self.last.clone();
            self.node_mut(&last)?.add_bit_field(field, constant.value);
            self.bit_fields += 1;
            return Ok(());
        }

        let indent = constant.indent;
        let node = ConstantNode::new(constant.name, constant.value);

        if indent > self.last_indent {
            self.check_jump(indent)?;
            let deeper = std::mem::take(&mut self.last);
            let outer = std::mem::replace(&mut self.parent, deeper);
            self.stack.push(outer);
            self.last_indent = indent;
        } else if indent < self.last_indent {
            for _ in 0..(self.last_indent - indent) {
                let grandparent = self.stack.pop().ok_or_else(|| {
                    Error::indent(format!(
                        "indent level {} closes more levels than are open",
                        indent
                    ))
                })?;
                self.last = std::mem::replace(&mut self.parent, grandparent);
            }
            self.last_indent = indent;
        }

        self.attach(node)
    }

    /// Number of nodes and bit fields added by this block
    pub fn finish(self) -> (usize, usize) {
        (self.nodes, self.bit_fields)
    }

    /// Insert under `parent`; the new node becomes `last`.
    fn attach(&mut self, node: ConstantNode) -> Result<()> {
        tracing::trace!(
            name = %node.name,
            value = node.value,
            depth = self.parent.len() + 1,
            "constant"
        );
        let parent = self.parent.clone();
        let index = self.node_mut(&parent)?.insert_child(node);
        self.last = parent;
        self.last.push(index);
        self.nodes += 1;
        Ok(())
    }

    fn check_jump(&self, indent: usize) -> Result<()> {
        if indent - self.last_indent <= 1 {
            return Ok(());
        }
        match self.jumps {
            IndentJumpPolicy::Reject => Err(Error::indent(format!(
                "indent jumps from level {} to {}",
                self.last_indent, indent
            ))),
            IndentJumpPolicy::Collapse => {
                tracing::warn!(
                    from = self.last_indent,
                    to = indent,
                    "indent jump treated as one level"
                );
                Ok(())
            }
        }
    }

    fn node_mut(&mut self, path: &[usize]) -> Result<&mut ConstantNode> {
        let mut node = self
            .forest
            .root_at_mut(self.root)
            .ok_or_else(|| Error::internal("constants root disappeared"))?;
        for &index in path {
            node = node
                .child_at_mut(index)
                .ok_or_else(|| Error::internal(format!("stale constant path {:?}", path)))?;
        }
        Ok(node)
    }
}
