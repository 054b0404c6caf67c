//! # Schema Catalog
//!
//! The addressable collection of schema documents for one batch.
//!
//! Documents are keyed by the identifier they declare (HSDS schemas carry a
//! `name` field), never by the filename they were read from. References
//! between schemas, however, are usually written as filenames or paths, so
//! [`SchemaCatalog::lookup`] tries three tiers in order:
//!
//! 1. **exact** — the reference equals an identifier or `<identifier>.json`;
//! 2. **basename** — the last path segment (`../v3/phone.json` → `phone.json`);
//! 3. **stem** — the basename without extension (`phone.json` → `phone`).

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use serde_json::Value;

use crate::error::SchemaError;
use crate::node::SchemaNode;

/// Field holding a schema's declared identifier.
pub const IDENTIFIER_FIELD: &str = "name";

/// One schema of the batch.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDocument {
    identifier: String,
    body: SchemaNode,
    outbound_refs: BTreeSet<String>,
}

impl SchemaDocument {
    /// Wrap a raw body under the given identifier.
    pub fn new(identifier: impl Into<String>, body: &Value) -> Self {
        let body = SchemaNode::from_value(body);
        let outbound_refs = body.external_refs();
        Self {
            identifier: identifier.into(),
            body,
            outbound_refs,
        }
    }

    /// The declared identifier.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// The tagged schema tree.
    pub fn body(&self) -> &SchemaNode {
        &self.body
    }

    /// External `$ref` targets, exactly as written.
    pub fn outbound_refs(&self) -> &BTreeSet<String> {
        &self.outbound_refs
    }
}

/// Schema documents indexed for reference lookup.
#[derive(Debug, Clone)]
pub struct SchemaCatalog {
    documents: Vec<SchemaDocument>,
    index: HashMap<String, usize>,
}

impl SchemaCatalog {
    /// Build a catalog from `(identifier, body)` pairs, preserving order.
    ///
    /// # Errors
    ///
    /// - [`SchemaError::EmptySchemaSet`] if no entries are given.
    /// - [`SchemaError::DuplicateSchemaIdentifier`] if two entries share an
    ///   identifier.
    pub fn new<I, S>(entries: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        let documents: Vec<SchemaDocument> = entries
            .into_iter()
            .map(|(id, body)| SchemaDocument::new(id, &body))
            .collect();
        if documents.is_empty() {
            return Err(SchemaError::EmptySchemaSet);
        }

        let mut index = HashMap::with_capacity(documents.len() * 2);
        for (pos, doc) in documents.iter().enumerate() {
            if index.insert(doc.identifier.clone(), pos).is_some() {
                return Err(SchemaError::DuplicateSchemaIdentifier(doc.identifier.clone()));
            }
        }
        // Filename aliases never shadow a declared identifier.
        for (pos, doc) in documents.iter().enumerate() {
            index.entry(format!("{}.json", doc.identifier)).or_insert(pos);
        }

        Ok(Self { documents, index })
    }

    /// Build a catalog from raw bodies, reading each body's `name` field.
    ///
    /// # Errors
    ///
    /// [`SchemaError::MissingSchemaIdentifier`] if a body has no string
    /// `name`, plus everything [`SchemaCatalog::new`] can return.
    pub fn from_bodies(bodies: &[Value]) -> Result<Self, SchemaError> {
        let entries = bodies
            .iter()
            .enumerate()
            .map(|(index, body)| {
                body.get(IDENTIFIER_FIELD)
                    .and_then(Value::as_str)
                    .map(|id| (id.to_string(), body.clone()))
                    .ok_or(SchemaError::MissingSchemaIdentifier { index })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(entries)
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Always false for a constructed catalog; present for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Documents in input order.
    pub fn documents(&self) -> &[SchemaDocument] {
        &self.documents
    }

    /// Look up a document by its exact identifier.
    pub fn get(&self, identifier: &str) -> Option<&SchemaDocument> {
        self.documents.iter().find(|d| d.identifier == identifier)
    }

    /// Case-insensitive identifier lookup.
    pub fn find_case_insensitive(&self, name: &str) -> Option<&SchemaDocument> {
        let wanted = name.to_lowercase();
        self.documents
            .iter()
            .find(|d| d.identifier.to_lowercase() == wanted)
    }

    /// Resolve a `$ref` target using the exact, basename, stem tiers.
    ///
    /// Any `#fragment` suffix on the reference is ignored for lookup.
    pub fn lookup(&self, reference: &str) -> Option<&SchemaDocument> {
        let reference = reference.split('#').next().unwrap_or(reference);
        let path = Path::new(reference);
        let basename = path.file_name().and_then(|n| n.to_str());
        let stem = path.file_stem().and_then(|n| n.to_str());

        std::iter::once(Some(reference))
            .chain([basename, stem])
            .flatten()
            .find_map(|key| self.index.get(key))
            .map(|&pos| &self.documents[pos])
    }

    /// Declared identifiers in input order.
    pub fn identifiers(&self) -> Vec<&str> {
        self.documents.iter().map(|d| d.identifier.as_str()).collect()
    }

    /// `<identifier>.json` for every document, for diagnostics.
    pub fn available_filenames(&self) -> Vec<String> {
        self.documents
            .iter()
            .map(|d| format!("{}.json", d.identifier))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn catalog() -> SchemaCatalog {
        SchemaCatalog::from_bodies(&[
            json!({"name": "organization", "type": "object",
                   "properties": {"phones": {"type": "array", "items": {"$ref": "phone.json"}}}}),
            json!({"name": "phone", "type": "object"}),
        ])
        .unwrap()
    }

    #[test]
    fn empty_input_is_rejected() {
        let err = SchemaCatalog::new(Vec::<(String, Value)>::new()).unwrap_err();
        assert_eq!(err, SchemaError::EmptySchemaSet);
    }

    #[test]
    fn duplicate_identifier_is_rejected() {
        let err = SchemaCatalog::from_bodies(&[json!({"name": "a"}), json!({"name": "a"})])
            .unwrap_err();
        assert_eq!(err, SchemaError::DuplicateSchemaIdentifier("a".into()));
    }

    #[test]
    fn missing_name_is_rejected_with_position() {
        let err = SchemaCatalog::from_bodies(&[json!({"name": "a"}), json!({"title": "b"})])
            .unwrap_err();
        assert_eq!(err, SchemaError::MissingSchemaIdentifier { index: 1 });
    }

    #[test]
    fn lookup_exact_identifier_and_json_suffix() {
        let cat = catalog();
        assert_eq!(cat.lookup("phone").unwrap().identifier(), "phone");
        assert_eq!(cat.lookup("phone.json").unwrap().identifier(), "phone");
    }

    #[test]
    fn lookup_by_basename_of_path_or_url() {
        let cat = catalog();
        assert_eq!(cat.lookup("../schema/phone.json").unwrap().identifier(), "phone");
        assert_eq!(
            cat.lookup("https://example.org/hsds/phone.json").unwrap().identifier(),
            "phone"
        );
    }

    #[test]
    fn lookup_by_stem() {
        let cat = SchemaCatalog::new([("phone.json".to_string(), json!({}))]).unwrap();
        assert_eq!(cat.lookup("dir/phone.json").unwrap().identifier(), "phone.json");
        let cat = SchemaCatalog::new([("phone".to_string(), json!({}))]).unwrap();
        assert_eq!(cat.lookup("dir/phone.schema").unwrap().identifier(), "phone");
    }

    #[test]
    fn lookup_ignores_fragment_suffix() {
        assert_eq!(catalog().lookup("phone.json#/properties").unwrap().identifier(), "phone");
    }

    #[test]
    fn lookup_unknown_is_none() {
        assert!(catalog().lookup("address.json").is_none());
    }

    #[test]
    fn declared_identifier_wins_over_filename_alias() {
        let cat = SchemaCatalog::new([
            ("a".to_string(), json!({"title": "first"})),
            ("a.json".to_string(), json!({"title": "second"})),
        ])
        .unwrap();
        assert_eq!(cat.lookup("a.json").unwrap().identifier(), "a.json");
    }

    #[test]
    fn documents_record_outbound_refs() {
        let cat = catalog();
        let org = cat.get("organization").unwrap();
        assert!(org.outbound_refs().contains("phone.json"));
        assert!(cat.get("phone").unwrap().outbound_refs().is_empty());
    }

    #[test]
    fn case_insensitive_find() {
        assert!(catalog().find_case_insensitive("Organization").is_some());
        assert!(catalog().find_case_insensitive("Service").is_none());
    }

    #[test]
    fn available_filenames_use_json_suffix() {
        assert_eq!(
            catalog().available_filenames(),
            vec!["organization.json".to_string(), "phone.json".to_string()]
        );
    }
}
