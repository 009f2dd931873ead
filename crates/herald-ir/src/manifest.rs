//! Module type-table manifests
//!
//! A manifest is what a compiled contract module ships alongside its
//! binary: the full table of declared types plus the names of the
//! modules it depends on. Dependency manifests are expected co-located
//! in the same directory, named `<name>.module.json`.

use crate::decl::TypeDecl;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// The type table emitted by one contract module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleManifest {
    /// Module root name (`Acme.Billing.Contracts`)
    pub name: String,
    /// Names of modules whose types this module references
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<String>,
    /// All declared types
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<TypeDecl>,
    /// Module-level documentation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

/// Errors raised by manifest validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManifestError {
    /// Module name is empty
    #[error("module name cannot be empty")]
    EmptyName,
    /// A type declaration has an empty name
    #[error("type with empty name in namespace '{0}'")]
    EmptyTypeName(String),
    /// Two declarations share a qualified name
    #[error("duplicate type: {0}")]
    DuplicateType(String),
}

impl ModuleManifest {
    /// Create an empty manifest
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            requires: vec![],
            types: vec![],
            doc: None,
        }
    }

    /// Declare a dependency on another module
    pub fn with_requires(mut self, module: impl Into<String>) -> Self {
        self.requires.push(module.into());
        self
    }

    /// Add a type declaration
    pub fn with_type(mut self, decl: TypeDecl) -> Self {
        self.types.push(decl);
        self
    }

    /// Set the module doc
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Validate the manifest structure
    pub fn validate(&self) -> Result<(), ManifestError> {
        if self.name.is_empty() {
            return Err(ManifestError::EmptyName);
        }

        let mut seen = HashSet::new();
        for decl in &self.types {
            if decl.name.is_empty() {
                return Err(ManifestError::EmptyTypeName(decl.namespace.clone()));
            }
            let qualified = decl.qualified_name();
            if !seen.insert(qualified.clone()) {
                return Err(ManifestError::DuplicateType(qualified));
            }
        }

        Ok(())
    }

    /// Parse from a JSON string
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
