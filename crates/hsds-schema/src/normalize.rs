//! # Dialect Normalization
//!
//! HSDS schemas are JSON Schema plus a handful of extension keys (`core`,
//! `order`, `example`, `datapackage_metadata`, `constraints`, and the
//! identifying `name`). A standard validator either rejects or ignores them;
//! this module removes them so the tree compiles cleanly.
//!
//! Removal is position-aware. Extension keys are stripped only where a
//! *schema* is expected, so a property that is literally called `name`
//! inside `properties` survives, and data-valued keywords (`enum`, `const`,
//! `default`, `required`, `examples`) are never touched.
//!
//! Documents inlined by resolution lose their own `$schema`: only the root
//! declares the dialect. A nested `$id` is kept so the inlined body stays its
//! own resource and its fragment references (`#/definitions/x`) still point
//! into it.

use std::collections::{BTreeMap, BTreeSet};

use crate::node::SchemaNode;

/// Extension keys of the HSDS dialect.
pub const HSDS_EXTENSION_KEYS: &[&str] = &[
    "core",
    "name",
    "datapackage_metadata",
    "example",
    "order",
    "constraints",
];

/// Keywords whose value maps member names to schemas.
pub(crate) const SCHEMA_MAP_KEYWORDS: &[&str] = &[
    "properties",
    "patternProperties",
    "$defs",
    "definitions",
    "dependentSchemas",
];

/// Keywords whose value is a schema (or, for `items`, possibly an array of them).
pub(crate) const SCHEMA_KEYWORDS: &[&str] = &[
    "items",
    "additionalItems",
    "additionalProperties",
    "not",
    "if",
    "then",
    "else",
    "contains",
    "propertyNames",
    "unevaluatedProperties",
    "unevaluatedItems",
];

/// Keywords whose value is an array of schemas.
pub(crate) const SCHEMA_ARRAY_KEYWORDS: &[&str] = &["allOf", "anyOf", "oneOf", "prefixItems"];

/// Keys that only mean something at the root of the compiled tree.
const ROOT_ONLY_KEYS: &[&str] = &["$schema"];

/// Strips extension-dialect keys from a resolved schema tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialectNormalizer {
    extension_keys: BTreeSet<String>,
}

impl DialectNormalizer {
    /// A normalizer removing the given keys.
    pub fn new<I, S>(extension_keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            extension_keys: extension_keys.into_iter().map(Into::into).collect(),
        }
    }

    /// A normalizer for the HSDS dialect.
    pub fn hsds() -> Self {
        Self::new(HSDS_EXTENSION_KEYS.iter().copied())
    }

    /// The keys this normalizer removes.
    pub fn extension_keys(&self) -> &BTreeSet<String> {
        &self.extension_keys
    }

    /// Produce a normalized copy of `schema`.
    pub fn normalize(&self, schema: &SchemaNode) -> SchemaNode {
        self.schema(schema, true)
    }

    fn schema(&self, node: &SchemaNode, is_root: bool) -> SchemaNode {
        let SchemaNode::Object(map) = node else {
            // Boolean schemas and anything malformed pass through for the
            // compiler to judge.
            return node.clone();
        };

        let mut out = BTreeMap::new();
        for (key, child) in map {
            let key_str = key.as_str();
            if self.extension_keys.contains(key) || (!is_root && ROOT_ONLY_KEYS.contains(&key_str)) {
                continue;
            }
            let value = if SCHEMA_MAP_KEYWORDS.contains(&key_str) {
                self.schema_map(child)
            } else if SCHEMA_KEYWORDS.contains(&key_str) {
                match child {
                    SchemaNode::Array(_) => self.schema_array(child),
                    _ => self.schema(child, false),
                }
            } else if SCHEMA_ARRAY_KEYWORDS.contains(&key_str) {
                self.schema_array(child)
            } else {
                child.clone()
            };
            out.insert(key.clone(), value);
        }
        SchemaNode::Object(out)
    }

    fn schema_map(&self, node: &SchemaNode) -> SchemaNode {
        match node {
            SchemaNode::Object(members) => SchemaNode::Object(
                members
                    .iter()
                    .map(|(name, schema)| (name.clone(), self.schema(schema, false)))
                    .collect(),
            ),
            other => other.clone(),
        }
    }

    fn schema_array(&self, node: &SchemaNode) -> SchemaNode {
        match node {
            SchemaNode::Array(items) => {
                SchemaNode::Array(items.iter().map(|s| self.schema(s, false)).collect())
            }
            other => other.clone(),
        }
    }
}

impl Default for DialectNormalizer {
    fn default() -> Self {
        Self::hsds()
    }
}
