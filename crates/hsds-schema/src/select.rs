//! # Main Schema Selection
//!
//! A batch ships a whole schema family, but documents validate against one
//! entry schema. Two strategies pick it:
//!
//! - **Reference graph** — the entry schema is the one no *other* schema
//!   references. Needs no hints. Exactly one such schema must exist.
//! - **Filename token** — a hint (usually a document or batch filename) is
//!   normalized and matched exactly against a [`ModelRegistry`]; the matched
//!   model name then picks the catalog entry case-insensitively.
//!
//! Both are deterministic and pure. Failures are ordinary
//! [`SchemaError`] values the caller can recover from.

use std::collections::HashSet;

use hsds_core::registry::{normalize_model_token, ModelRegistry};
use serde::{Deserialize, Serialize};

use crate::catalog::{SchemaCatalog, SchemaDocument};
use crate::error::SchemaError;

/// Which selection strategy to run, without its runtime inputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Pick the single unreferenced schema.
    #[default]
    ReferenceGraph,
    /// Match a filename hint against the model registry.
    FilenameToken,
}

/// A fully specified selection request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionStrategy {
    /// Pick the single unreferenced schema.
    ReferenceGraph,
    /// Match this filename or batch name against the model registry.
    FilenameToken(String),
}

/// Chooses a batch's entry schema.
#[derive(Debug, Clone, Default)]
pub struct MainSchemaSelector {
    registry: ModelRegistry,
}

impl MainSchemaSelector {
    /// A selector using `registry` for filename-token matching.
    pub fn new(registry: ModelRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Run `strategy` against `catalog`.
    pub fn select<'c>(
        &self,
        catalog: &'c SchemaCatalog,
        strategy: &SelectionStrategy,
    ) -> Result<&'c SchemaDocument, SchemaError> {
        let selected = match strategy {
            SelectionStrategy::ReferenceGraph => select_by_references(catalog)?,
            SelectionStrategy::FilenameToken(hint) => {
                select_by_filename(catalog, hint, &self.registry)?
            }
        };
        tracing::info!(schema = selected.identifier(), ?strategy, "main schema detected");
        Ok(selected)
    }
}

/// Pick the only schema that no other schema references.
///
/// References are resolved through the catalog's three-tier lookup, so
/// `"phone.json"`, `"../phone.json"` and `"phone"` all count as references
/// to the schema named `phone`. Self-references are ignored. References the
/// catalog cannot resolve are ignored here and reported during resolution.
///
/// # Errors
///
/// - [`SchemaError::NoMainSchema`] if every schema is referenced.
/// - [`SchemaError::AmbiguousMainSchema`] if more than one is not.
pub fn select_by_references(catalog: &SchemaCatalog) -> Result<&SchemaDocument, SchemaError> {
    let mut referenced: HashSet<&str> = HashSet::new();
    for doc in catalog.documents() {
        for target in doc.outbound_refs() {
            if let Some(found) = catalog.lookup(target) {
                if found.identifier() != doc.identifier() {
                    referenced.insert(found.identifier());
                }
            }
        }
    }

    let candidates: Vec<&SchemaDocument> = catalog
        .documents()
        .iter()
        .filter(|d| !referenced.contains(d.identifier()))
        .collect();

    match candidates.as_slice() {
        [] => Err(SchemaError::NoMainSchema),
        [only] => Ok(*only),
        many => {
            let mut names: Vec<String> =
                many.iter().map(|d| d.identifier().to_string()).collect();
            names.sort();
            Err(SchemaError::AmbiguousMainSchema { candidates: names })
        }
    }
}

/// Match `hint` against `registry`, returning the single model name.
///
/// # Errors
///
/// - [`SchemaError::NoModelMatch`] if no registered name has the same token.
/// - [`SchemaError::AmbiguousModelMatch`] if several do.
pub fn match_model<'r>(registry: &'r ModelRegistry, hint: &str) -> Result<&'r str, SchemaError> {
    let matches = registry.matches(hint);
    match matches.as_slice() {
        [] => Err(SchemaError::NoModelMatch {
            hint: hint.to_string(),
            token: normalize_model_token(hint),
        }),
        [only] => Ok(*only),
        many => Err(SchemaError::AmbiguousModelMatch {
            hint: hint.to_string(),
            matches: many.iter().map(|m| m.to_string()).collect(),
        }),
    }
}

/// Pick the catalog entry for the model `hint` names.
///
/// # Errors
///
/// Everything [`match_model`] returns, plus
/// [`SchemaError::ModelSchemaMissing`] when the model has no schema here.
pub fn select_by_filename<'c>(
    catalog: &'c SchemaCatalog,
    hint: &str,
    registry: &ModelRegistry,
) -> Result<&'c SchemaDocument, SchemaError> {
    let model = match_model(registry, hint)?;
    catalog
        .find_case_insensitive(model)
        .ok_or_else(|| SchemaError::ModelSchemaMissing {
            model: model.to_string(),
            available: catalog.identifiers().into_iter().map(String::from).collect(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn refs(name: &str, targets: &[&str]) -> serde_json::Value {
        let props: serde_json::Map<String, serde_json::Value> = targets
            .iter()
            .map(|t| (t.to_string(), json!({"$ref": format!("{t}.json")})))
            .collect();
        json!({"name": name, "type": "object", "properties": props})
    }

    #[test]
    fn picks_the_unreferenced_root() {
        let catalog =
            SchemaCatalog::from_bodies(&[refs("b", &[]), refs("a", &["b", "c"]), refs("c", &[])])
                .unwrap();
        assert_eq!(select_by_references(&catalog).unwrap().identifier(), "a");
    }

    #[test]
    fn mutual_references_leave_no_main_schema() {
        let catalog = SchemaCatalog::from_bodies(&[refs("a", &["b"]), refs("b", &["a"])]).unwrap();
        assert_eq!(select_by_references(&catalog).unwrap_err(), SchemaError::NoMainSchema);
    }

    #[test]
    fn two_roots_are_ambiguous_and_sorted() {
        let catalog =
            SchemaCatalog::from_bodies(&[refs("z", &["c"]), refs("a", &["c"]), refs("c", &[])])
                .unwrap();
        assert_eq!(
            select_by_references(&catalog).unwrap_err(),
            SchemaError::AmbiguousMainSchema {
                candidates: vec!["a".into(), "z".into()]
            }
        );
    }

    #[test]
    fn single_schema_is_selected() {
        let catalog = SchemaCatalog::from_bodies(&[refs("solo", &[])]).unwrap();
        assert_eq!(select_by_references(&catalog).unwrap().identifier(), "solo");
    }

    #[test]
    fn self_reference_does_not_disqualify() {
        let catalog =
            SchemaCatalog::from_bodies(&[refs("tree", &["tree", "leaf"]), refs("leaf", &[])])
                .unwrap();
        assert_eq!(select_by_references(&catalog).unwrap().identifier(), "tree");
    }

    #[test]
    fn path_style_refs_count_as_references() {
        let catalog = SchemaCatalog::from_bodies(&[
            json!({"name": "service", "properties": {"org": {"$ref": "../schemas/organization.json"}}}),
            json!({"name": "organization"}),
        ])
        .unwrap();
        assert_eq!(select_by_references(&catalog).unwrap().identifier(), "service");
    }

    #[test]
    fn trailing_digit_token_has_no_model_match() {
        let registry = ModelRegistry::new(["Organization", "Organization_Identifier"]);
        let err = match_model(&registry, "organization_1.json").unwrap_err();
        assert_eq!(
            err,
            SchemaError::NoModelMatch {
                hint: "organization_1.json".into(),
                token: "organization1".into()
            }
        );
    }

    #[test]
    fn ambiguous_model_match_names_all() {
        let registry = ModelRegistry::new(["Service_Area", "ServiceArea"]);
        let err = match_model(&registry, "service_area.json").unwrap_err();
        assert_eq!(
            err,
            SchemaError::AmbiguousModelMatch {
                hint: "service_area.json".into(),
                matches: vec!["Service_Area".into(), "ServiceArea".into()]
            }
        );
    }

    #[test]
    fn filename_strategy_picks_catalog_entry_case_insensitively() {
        let catalog = SchemaCatalog::from_bodies(&[
            refs("organization", &["phone"]),
            refs("phone", &[]),
        ])
        .unwrap();
        let doc = select_by_filename(&catalog, "Phone.json", &ModelRegistry::hsds()).unwrap();
        assert_eq!(doc.identifier(), "phone");
    }

    #[test]
    fn filename_strategy_reports_missing_schema() {
        let catalog = SchemaCatalog::from_bodies(&[refs("phone", &[])]).unwrap();
        let err = select_by_filename(&catalog, "service.json", &ModelRegistry::hsds()).unwrap_err();
        assert_eq!(
            err,
            SchemaError::ModelSchemaMissing {
                model: "Service".into(),
                available: vec!["phone".into()]
            }
        );
    }

    #[test]
    fn selector_dispatches_on_strategy() {
        let catalog = SchemaCatalog::from_bodies(&[
            refs("service", &["organization"]),
            refs("organization", &[]),
        ])
        .unwrap();
        let selector = MainSchemaSelector::default();
        let by_graph = selector.select(&catalog, &SelectionStrategy::ReferenceGraph).unwrap();
        assert_eq!(by_graph.identifier(), "service");
        let by_name = selector
            .select(&catalog, &SelectionStrategy::FilenameToken("organization.json".into()))
            .unwrap();
        assert_eq!(by_name.identifier(), "organization");
    }

    #[test]
    fn strategy_kind_uses_snake_case() {
        let kind: StrategyKind = serde_json::from_value(json!("filename_token")).unwrap();
        assert_eq!(kind, StrategyKind::FilenameToken);
        assert_eq!(StrategyKind::default(), StrategyKind::ReferenceGraph);
    }
}
