//! # Reference Resolution
//!
//! Inlines every external `$ref` of a root schema, recursively, producing a
//! single self-contained tree that a validator can compile without a
//! resolver of its own.
//!
//! ## Cycles
//!
//! The schema graph may be cyclic (`Service` → `Organization` → `Service`).
//! The traversal keeps the set of identifiers currently being expanded on
//! the path from the root. A reference to an identifier already in that set
//! closes a cycle; it is replaced by a permissive object placeholder
//! ([`SchemaNode::cycle_placeholder`]) instead of being expanded again.
//! Identifiers leave the set when their expansion returns, so a schema
//! reached twice along different branches (a diamond) is inlined both times.
//!
//! The root's own identifier is in the set from the start: a reference back
//! to the root is a cycle like any other.

use std::collections::{BTreeMap, HashSet};

use crate::catalog::{SchemaCatalog, SchemaDocument};
use crate::error::SchemaError;
use crate::node::SchemaNode;

/// Inlines external references against a catalog.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceResolver<'c> {
    catalog: &'c SchemaCatalog,
}

impl<'c> ReferenceResolver<'c> {
    pub fn new(catalog: &'c SchemaCatalog) -> Self {
        Self { catalog }
    }

    /// Resolve `root` into a tree free of external references.
    ///
    /// The result owns all of its nodes; nothing aliases the catalog.
    ///
    /// # Errors
    ///
    /// [`SchemaError::UnresolvedReference`] if any reachable `$ref` names a
    /// schema the catalog does not hold.
    pub fn resolve(&self, root: &SchemaDocument) -> Result<SchemaNode, SchemaError> {
        let mut resolving = HashSet::new();
        resolving.insert(root.identifier().to_string());
        self.resolve_node(root.body(), &mut resolving)
    }

    fn resolve_node(
        &self,
        node: &SchemaNode,
        resolving: &mut HashSet<String>,
    ) -> Result<SchemaNode, SchemaError> {
        match node {
            SchemaNode::Object(map) => {
                let mut out = BTreeMap::new();
                for (key, child) in map {
                    out.insert(key.clone(), self.resolve_node(child, resolving)?);
                }
                Ok(SchemaNode::Object(out))
            }
            SchemaNode::Array(items) => items
                .iter()
                .map(|item| self.resolve_node(item, resolving))
                .collect::<Result<Vec<_>, _>>()
                .map(SchemaNode::Array),
            SchemaNode::Leaf(value) => Ok(SchemaNode::Leaf(value.clone())),
            SchemaNode::Reference(target) => self.resolve_reference(target, resolving),
        }
    }

    fn resolve_reference(
        &self,
        target: &str,
        resolving: &mut HashSet<String>,
    ) -> Result<SchemaNode, SchemaError> {
        let doc = self
            .catalog
            .lookup(target)
            .ok_or_else(|| SchemaError::UnresolvedReference {
                reference: target.to_string(),
                available: self.catalog.available_filenames(),
            })?;
        let identifier = doc.identifier();

        if resolving.contains(identifier) {
            tracing::warn!(
                reference = target,
                schema = identifier,
                "circular reference detected; substituting permissive placeholder"
            );
            return Ok(SchemaNode::cycle_placeholder(identifier));
        }

        resolving.insert(identifier.to_string());
        let resolved = self.resolve_node(doc.body(), resolving);
        resolving.remove(identifier);
        resolved
    }
}
