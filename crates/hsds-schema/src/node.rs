//! # Schema Nodes
//!
//! A tagged representation of a schema tree. Raw JSON schema bodies are
//! converted into [`SchemaNode`]s once, at catalog construction, so every
//! later stage (resolution, normalization, compilation) matches on explicit
//! variants instead of probing untyped maps for a `$ref` key.
//!
//! Only *external* references become [`SchemaNode::Reference`]. An object
//! whose `$ref` is a fragment (`#/definitions/x`) stays an ordinary
//! [`SchemaNode::Object`] and is carried through untouched. Values of data
//! keywords (`enum`, `const`, `default`, `examples`, `example`) are literal
//! JSON, so a `$ref` inside them is never a reference.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::{Map, Value};

use crate::normalize::SCHEMA_MAP_KEYWORDS;

/// The key that marks a reference object.
pub const REF_KEY: &str = "$ref";

/// Keywords whose value is instance data rather than a schema.
pub(crate) const DATA_KEYWORDS: &[&str] = &["enum", "const", "default", "examples", "example"];

/// One node of a schema tree.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    /// A JSON object that is not an external reference.
    Object(BTreeMap<String, SchemaNode>),
    /// A JSON array.
    Array(Vec<SchemaNode>),
    /// Any scalar: string, number, boolean, or null.
    Leaf(Value),
    /// An external `$ref`, holding the target exactly as written.
    Reference(String),
}

/// Returns true for intra-document references (`#`, `#/definitions/x`).
pub fn is_fragment_ref(target: &str) -> bool {
    target.starts_with('#')
}

impl SchemaNode {
    /// Convert a JSON value into a tagged tree.
    ///
    /// Sibling keys of an external `$ref` object are dropped: the whole
    /// object is replaced by the referenced schema during resolution.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => {
                if let Some(Value::String(target)) = map.get(REF_KEY) {
                    if !is_fragment_ref(target) {
                        return Self::Reference(target.clone());
                    }
                }
                Self::Object(
                    map.iter()
                        .map(|(k, v)| (k.clone(), Self::keyword(k, v)))
                        .collect(),
                )
            }
            Value::Array(items) => Self::Array(items.iter().map(Self::from_value).collect()),
            scalar => Self::Leaf(scalar.clone()),
        }
    }

    fn keyword(key: &str, value: &Value) -> Self {
        match value {
            _ if DATA_KEYWORDS.contains(&key) => Self::data(value),
            // Member names of `properties` and friends are not keywords.
            Value::Object(members) if SCHEMA_MAP_KEYWORDS.contains(&key) => Self::Object(
                members
                    .iter()
                    .map(|(name, schema)| (name.clone(), Self::from_value(schema)))
                    .collect(),
            ),
            _ => Self::from_value(value),
        }
    }

    /// Convert literal data, never producing a [`SchemaNode::Reference`].
    fn data(value: &Value) -> Self {
        match value {
            Value::Object(map) => Self::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), Self::data(v)))
                    .collect(),
            ),
            Value::Array(items) => Self::Array(items.iter().map(Self::data).collect()),
            scalar => Self::Leaf(scalar.clone()),
        }
    }

    /// Convert back into plain JSON.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_value()))
                    .collect::<Map<String, Value>>(),
            ),
            Self::Array(items) => Value::Array(items.iter().map(Self::to_value).collect()),
            Self::Leaf(v) => v.clone(),
            Self::Reference(target) => {
                let mut map = Map::new();
                map.insert(REF_KEY.to_string(), Value::String(target.clone()));
                Value::Object(map)
            }
        }
    }

    /// The permissive schema substituted for a cyclic reference.
    ///
    /// Accepts any object and records which schema closed the cycle.
    pub fn cycle_placeholder(identifier: &str) -> Self {
        let mut map = BTreeMap::new();
        map.insert("type".to_string(), Self::Leaf(Value::from("object")));
        map.insert("additionalProperties".to_string(), Self::Leaf(Value::Bool(true)));
        map.insert(
            "description".to_string(),
            Self::Leaf(Value::from(format!("Circular reference: {identifier}"))),
        );
        Self::Object(map)
    }

    /// Every external reference target anywhere in this tree.
    pub fn external_refs(&self) -> BTreeSet<String> {
        let mut refs = BTreeSet::new();
        self.collect_refs(&mut refs);
        refs
    }

    fn collect_refs(&self, acc: &mut BTreeSet<String>) {
        match self {
            Self::Object(map) => map.values().for_each(|v| v.collect_refs(acc)),
            Self::Array(items) => items.iter().for_each(|v| v.collect_refs(acc)),
            Self::Leaf(_) => {}
            Self::Reference(target) => {
                acc.insert(target.clone());
            }
        }
    }

    /// Look up a key if this node is an object.
    pub fn get(&self, key: &str) -> Option<&SchemaNode> {
        match self {
            Self::Object(map) => map.get(key),
            _ => None,
        }
    }

    /// The string value of a leaf, if it is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Leaf(Value::String(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Short name of the JSON shape, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Object(_) => "object",
            Self::Array(_) => "array",
            Self::Leaf(Value::String(_)) => "string",
            Self::Leaf(Value::Number(_)) => "number",
            Self::Leaf(Value::Bool(_)) => "boolean",
            Self::Leaf(_) => "null",
            Self::Reference(_) => "reference",
        }
    }
}

impl From<&Value> for SchemaNode {
    fn from(value: &Value) -> Self {
        Self::from_value(value)
    }
}
