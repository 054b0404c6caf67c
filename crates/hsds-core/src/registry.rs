//! # Model Registry
//!
//! The set of named data models a filename can be matched against.
//!
//! A registry is an explicit value handed to whoever needs it rather than
//! process-wide state, so tests and concurrent callers can each use their
//! own list. [`ModelRegistry::hsds`] returns the HSDS 3.1 object model.

use serde::{Deserialize, Serialize};

/// Names of the HSDS 3.1 data models.
pub const HSDS_MODEL_NAMES: &[&str] = &[
    "Organization",
    "Service",
    "Location",
    "Service_At_Location",
    "Address",
    "Phone",
    "Schedule",
    "Service_Area",
    "Language",
    "Funding",
    "Accessibility",
    "Cost_Option",
    "Program",
    "Required_Document",
    "Contact",
    "Organization_Identifier",
    "Unit",
    "Service_Capacity",
    "Attribute",
    "URL",
    "Metadata",
    "Meta_Table_Description",
    "Taxonomy",
    "Taxonomy_Term",
];

/// Normalize a file or model name into a comparison token.
///
/// Strips the final extension, lower-cases, and removes underscores:
/// `"Organization_Identifier.json"` becomes `"organizationidentifier"`.
/// A leading dot is not treated as an extension separator.
pub fn normalize_model_token(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let stem = match base.rfind('.') {
        Some(idx) if idx > 0 => &base[..idx],
        _ => base,
    };
    stem.to_lowercase().replace('_', "")
}

/// An ordered list of known model names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelRegistry {
    names: Vec<String>,
}

impl ModelRegistry {
    /// Build a registry from arbitrary names. Order is preserved.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// The HSDS 3.1 model registry.
    pub fn hsds() -> Self {
        Self::new(HSDS_MODEL_NAMES.iter().copied())
    }

    /// Registered names in registration order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Every registered name whose normalized token equals the normalized
    /// token of `filename`. Exact token equality only; no prefix matching.
    pub fn matches(&self, filename: &str) -> Vec<&str> {
        let token = normalize_model_token(filename);
        self.names
            .iter()
            .filter(|name| normalize_model_token(name) == token)
            .map(String::as_str)
            .collect()
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::hsds()
    }
}
