//! # Validator Compilation
//!
//! Turns a resolved, normalized schema tree into a reusable validator.
//!
//! Compilation runs once per batch. It first checks the handful of
//! structural rules that produce the least readable library errors
//! (`type`, `properties`, `required`, `items`, `enum`), reporting the
//! location inside the schema as a dot-joined path. The tree is then handed
//! to the `jsonschema` crate. The draft is taken from `$schema` when present.
//!
//! The validator never touches the network: every remote reference goes
//! through [`OfflineRetriever`], which refuses it. By the time a tree
//! reaches this stage all external references have been inlined, so any
//! retrieval attempt means the schema is broken.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::SchemaError;
use crate::node::SchemaNode;
use crate::normalize::{SCHEMA_ARRAY_KEYWORDS, SCHEMA_KEYWORDS, SCHEMA_MAP_KEYWORDS};
use crate::report::ValidationViolation;

/// JSON type names accepted by the `type` keyword.
const JSON_TYPES: &[&str] = &[
    "array", "boolean", "integer", "null", "number", "object", "string",
];

/// Retriever that refuses every remote resource.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineRetriever;

impl jsonschema::Retrieve for OfflineRetriever {
    fn retrieve(
        &self,
        uri: &jsonschema::Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();
        tracing::debug!(uri = uri_str, "refusing remote schema retrieval");
        Err(format!("remote schema retrieval is disabled: {uri_str}").into())
    }
}

/// Knobs that change what a compiled validator accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileOptions {
    /// Reject properties not declared in `properties`.
    pub forbid_additional_properties: bool,
    /// Assert the `format` keyword instead of treating it as an annotation.
    pub validate_formats: bool,
}

/// Builds [`CompiledValidator`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatorCompiler {
    options: CompileOptions,
}

impl ValidatorCompiler {
    pub fn new(options: CompileOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> CompileOptions {
        self.options
    }

    /// Compile `schema`, the entry schema named `schema_name`.
    ///
    /// # Errors
    ///
    /// [`SchemaError::SchemaCompilation`] if the structural checks fail or
    /// the library rejects the schema.
    pub fn compile(
        &self,
        schema_name: &str,
        schema: &SchemaNode,
    ) -> Result<CompiledValidator, SchemaError> {
        check_schema(schema, &mut Vec::new())?;

        let tree = if self.options.forbid_additional_properties {
            forbid_additional(schema)
        } else {
            schema.clone()
        };

        let validator = jsonschema::options()
            .with_retriever(OfflineRetriever)
            .should_validate_formats(self.options.validate_formats)
            .build(&tree.to_value())
            .map_err(|e| SchemaError::SchemaCompilation {
                path: dotted(&e.instance_path.to_string()),
                reason: e.to_string(),
            })?;

        tracing::debug!(schema = schema_name, "validator compiled");
        Ok(CompiledValidator {
            validator,
            schema_name: schema_name.to_string(),
        })
    }
}

/// An immutable validator shared by every document of a batch.
pub struct CompiledValidator {
    validator: jsonschema::Validator,
    schema_name: String,
}

impl std::fmt::Debug for CompiledValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledValidator")
            .field("schema_name", &self.schema_name)
            .finish_non_exhaustive()
    }
}

impl CompiledValidator {
    /// Identifier of the entry schema this validator was built from.
    pub fn schema_name(&self) -> &str {
        &self.schema_name
    }

    /// Every violation of `instance`, in library order.
    pub fn check(&self, instance: &Value) -> Vec<ValidationViolation> {
        self.validator
            .iter_errors(instance)
            .map(|e| ValidationViolation::from_error(instance, &e))
            .collect()
    }

    pub fn is_valid(&self, instance: &Value) -> bool {
        self.validator.is_valid(instance)
    }
}

fn dotted(pointer: &str) -> String {
    pointer
        .split('/')
        .skip(1)
        .map(|t| t.replace("~1", "/").replace("~0", "~"))
        .collect::<Vec<_>>()
        .join(".")
}

fn compile_error(path: &[String], reason: impl Into<String>) -> SchemaError {
    SchemaError::SchemaCompilation {
        path: path.join("."),
        reason: reason.into(),
    }
}

fn check_schema(node: &SchemaNode, path: &mut Vec<String>) -> Result<(), SchemaError> {
    let map = match node {
        SchemaNode::Object(map) => map,
        SchemaNode::Leaf(Value::Bool(_)) => return Ok(()),
        SchemaNode::Reference(target) => {
            return Err(compile_error(path, format!("unresolved reference '{target}'")))
        }
        other => {
            return Err(compile_error(
                path,
                format!("expected a schema object or boolean, found {}", other.kind()),
            ))
        }
    };

    for (key, child) in map {
        path.push(key.clone());
        check_keyword(key, child, path)?;
        path.pop();
    }
    Ok(())
}

fn check_keyword(key: &str, value: &SchemaNode, path: &mut Vec<String>) -> Result<(), SchemaError> {
    match key {
        "type" => check_type(value, path),
        "required" => match value {
            SchemaNode::Array(items) if items.iter().all(|i| i.as_str().is_some()) => Ok(()),
            _ => Err(compile_error(path, "'required' must be an array of strings")),
        },
        "enum" => match value {
            SchemaNode::Array(_) => Ok(()),
            other => Err(compile_error(
                path,
                format!("'enum' must be an array, found {}", other.kind()),
            )),
        },
        "items" => match value {
            SchemaNode::Array(_) => check_schema_array(value, path),
            SchemaNode::Object(_) | SchemaNode::Leaf(Value::Bool(_)) => check_schema(value, path),
            other => Err(compile_error(
                path,
                format!("'items' must be a schema or an array of schemas, found {}", other.kind()),
            )),
        },
        k if SCHEMA_MAP_KEYWORDS.contains(&k) => match value {
            SchemaNode::Object(members) => {
                for (name, member) in members {
                    path.push(name.clone());
                    check_schema(member, path)?;
                    path.pop();
                }
                Ok(())
            }
            other => Err(compile_error(
                path,
                format!("'{k}' must be an object, found {}", other.kind()),
            )),
        },
        k if SCHEMA_KEYWORDS.contains(&k) => check_schema(value, path),
        k if SCHEMA_ARRAY_KEYWORDS.contains(&k) => check_schema_array(value, path),
        _ => Ok(()),
    }
}

fn check_schema_array(value: &SchemaNode, path: &mut Vec<String>) -> Result<(), SchemaError> {
    let SchemaNode::Array(items) = value else {
        return Err(compile_error(path, format!("expected an array of schemas, found {}", value.kind())));
    };
    for (i, item) in items.iter().enumerate() {
        path.push(i.to_string());
        check_schema(item, path)?;
        path.pop();
    }
    Ok(())
}

fn check_type(value: &SchemaNode, path: &[String]) -> Result<(), SchemaError> {
    let known = |name: &str| {
        if JSON_TYPES.contains(&name) {
            Ok(())
        } else {
            Err(compile_error(path, format!("unknown type '{name}'")))
        }
    };
    match value {
        SchemaNode::Leaf(Value::String(name)) => known(name),
        SchemaNode::Array(items) => items.iter().try_for_each(|item| match item.as_str() {
            Some(name) => known(name),
            None => Err(compile_error(path, "'type' array entries must be strings")),
        }),
        other => Err(compile_error(
            path,
            format!("'type' must be a string or an array of strings, found {}", other.kind()),
        )),
    }
}

/// Copy of `node` with `additionalProperties: false` added to every schema
/// that declares `properties` without saying anything about extras.
fn forbid_additional(node: &SchemaNode) -> SchemaNode {
    let SchemaNode::Object(map) = node else {
        return node.clone();
    };
    let mut out: BTreeMap<String, SchemaNode> = map
        .iter()
        .map(|(key, child)| {
            let k = key.as_str();
            let value = if SCHEMA_MAP_KEYWORDS.contains(&k) {
                match child {
                    SchemaNode::Object(members) => SchemaNode::Object(
                        members
                            .iter()
                            .map(|(n, s)| (n.clone(), forbid_additional(s)))
                            .collect(),
                    ),
                    other => other.clone(),
                }
            } else if SCHEMA_KEYWORDS.contains(&k) || SCHEMA_ARRAY_KEYWORDS.contains(&k) {
                match child {
                    SchemaNode::Array(items) => {
                        SchemaNode::Array(items.iter().map(forbid_additional).collect())
                    }
                    other => forbid_additional(other),
                }
            } else {
                child.clone()
            };
            (key.clone(), value)
        })
        .collect();
    if out.contains_key("properties") && !out.contains_key("additionalProperties") {
        out.insert(
            "additionalProperties".to_string(),
            SchemaNode::Leaf(Value::Bool(false)),
        );
    }
    SchemaNode::Object(out)
}
