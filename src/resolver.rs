//! Reference resolution against a built program
//!
//! The resolver only reads the constant forest. Dotted paths resolve to
//! constant nodes; arithmetic series evaluate to a numeric part plus the
//! address references a later linking step has to fill in.

use crate::config::{ResolveOptions, RootLookup, UnresolvedPolicy};
use crate::error::{Error, Result};
use crate::lexer::{ArithmeticSeries, RefOp, RefTarget};
use crate::parser::{ConstantForest, ConstantNode, Program};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Address reference left for the linker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub name: String,
    /// The address is subtracted rather than added
    pub negative: bool,
}

/// Result of evaluating an arithmetic series
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Evaluated {
    /// Sum of literal and constant terms (wrapping)
    pub value: u32,
    /// Address terms in series order
    pub links: Vec<Link>,
}

impl Evaluated {
    /// True when no address needs linking
    pub fn is_resolved(&self) -> bool {
        self.links.is_empty()
    }
}

/// Read-only view over a program's constants (and optionally its symbols)
pub struct Resolver<'p> {
    forest: &'p ConstantForest,
    symbols: Option<BTreeSet<&'p str>>,
    options: ResolveOptions,
}

impl<'p> Resolver<'p> {
    pub fn new(forest: &'p ConstantForest, options: ResolveOptions) -> Self {
        Resolver {
            forest,
            symbols: None,
            options,
        }
    }

    /// Names `@address` references are checked against when
    /// `check_addresses` is set
    pub fn with_symbols(mut self, symbols: BTreeSet<&'p str>) -> Self {
        self.symbols = Some(symbols);
        self
    }

    pub fn options(&self) -> &ResolveOptions {
        &self.options
    }

    /// Resolve a dotted path to its constant node.
    ///
    /// The first segment names a direct child of some root. If no root has
    /// such a child, the segment may name a root itself (`root.child...`).
    /// Later segments walk down the children.
    pub fn resolve(&self, path: &str) -> Result<&'p ConstantNode> {
        let not_found = || Error::ReferenceNotFound {
            reference: path.to_string(),
        };

        let mut segments = path.split('.');
        let first = segments.next().ok_or_else(not_found)?;
        let rest: Vec<&str> = segments.collect();

        let mut node = match self.first_segment(path, first)? {
            Some(node) => node,
            None if !rest.is_empty() => self.forest.root(first).ok_or_else(not_found)?,
            None => return Err(not_found()),
        };

        for segment in rest {
            node = node.child(segment).ok_or_else(not_found)?;
        }
        Ok(node)
    }

    fn first_segment(&self, path: &str, first: &str) -> Result<Option<&'p ConstantNode>> {
        let matches: Vec<(&'p ConstantNode, &'p ConstantNode)> = self
            .forest
            .roots()
            .iter()
            .filter_map(|root| root.child(first).map(|child| (root, child)))
            .collect();

        match matches.as_slice() {
            [] => Ok(None),
            [(_, child)] => Ok(Some(*child)),
            [(root, child), ..] => match self.options.root_lookup {
                RootLookup::FirstMatch => {
                    tracing::warn!(
                        reference = path,
                        root = %root.name,
                        candidates = matches.len(),
                        "ambiguous reference resolved by first root"
                    );
                    Ok(Some(*child))
                }
                RootLookup::RequireUnique => Err(Error::AmbiguousReference {
                    reference: path.to_string(),
                    roots: matches.iter().map(|(r, _)| r.name.clone()).collect(),
                }),
            },
        }
    }

    /// Value of the constant at `path`, honouring the unresolved policy
    pub fn value_of(&self, path: &str) -> Result<u32> {
        match self.resolve(path) {
            Ok(node) => Ok(node.value),
            Err(Error::ReferenceNotFound { reference })
                if self.options.unresolved == UnresolvedPolicy::Zero =>
            {
                tracing::warn!(reference = %reference, "unresolved reference read as 0");
                Ok(0)
            }
            Err(e) => Err(e),
        }
    }

    /// Fold a series left to right.
    ///
    /// Literals and constants are added or subtracted with wrapping u32
    /// arithmetic; addresses are collected as links.
    pub fn evaluate(&self, series: &ArithmeticSeries) -> Result<Evaluated> {
        let mut result = Evaluated::default();

        for term in series {
            let amount = match &term.target {
                RefTarget::Literal(value) => *value,
                RefTarget::ConstPath(path) => self.value_of(path)?,
                RefTarget::Address(name) => {
                    if self.address_known(name)? {
                        result.links.push(Link {
                            name: name.clone(),
                            negative: term.op == RefOp::Subtract,
                        });
                    }
                    continue;
                }
            };

            result.value = match term.op {
                RefOp::None | RefOp::Add => result.value.wrapping_add(amount),
                RefOp::Subtract => result.value.wrapping_sub(amount),
            };
        }

        Ok(result)
    }

    /// Whether an address term should become a link. Unknown names fail, or
    /// are dropped (contributing 0) under the zero policy.
    fn address_known(&self, name: &str) -> Result<bool> {
        let symbols = match (&self.symbols, self.options.check_addresses) {
            (Some(symbols), true) => symbols,
            _ => return Ok(true),
        };
        if symbols.contains(name) {
            return Ok(true);
        }
        match self.options.unresolved {
            UnresolvedPolicy::Zero => {
                tracing::warn!(address = name, "unknown address read as 0");
                Ok(false)
            }
            UnresolvedPolicy::Error => Err(Error::ReferenceNotFound {
                reference: format!("@{}", name),
            }),
        }
    }
}

impl Program {
    /// Resolver over this program's constants, with its table names and
    /// tags as the address symbols.
    pub fn resolver(&self, options: ResolveOptions) -> Resolver<'_> {
        let resolver = Resolver::new(&self.constants, options);
        if resolver.options.check_addresses {
            resolver.with_symbols(self.symbols())
        } else {
            resolver
        }
    }
}
