//! Documentation lookup
//!
//! Human-authored descriptions come from companion `*.docs.json` files.
//! The lookup is an injectable collaborator: the discoverer asks for a
//! type's docs and always gets an answer - absence degrades to the
//! placeholder sentinel, never to an error.

use herald_ir::{DocFile, DOCS_SUFFIX, MANIFEST_SUFFIX};
use indexmap::IndexMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Placeholder used wherever no description was authored
pub const NO_DESCRIPTION: &str = "No description available.";

/// Resolved documentation for one type
#[derive(Debug, Clone)]
pub struct TypeDocs {
    /// Type-level summary
    pub summary: String,
    /// Property name -> description
    pub properties: IndexMap<String, String>,
}

impl TypeDocs {
    /// The sentinel docs used when nothing was authored
    pub fn placeholder() -> Self {
        Self {
            summary: NO_DESCRIPTION.to_string(),
            properties: IndexMap::new(),
        }
    }

    /// Description for a property, case-insensitive on the name,
    /// falling back to the placeholder
    pub fn property(&self, name: &str) -> String {
        if let Some(desc) = self.properties.get(name) {
            return desc.clone();
        }
        self.properties
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.clone())
            .unwrap_or_else(|| NO_DESCRIPTION.to_string())
    }
}

/// Injectable description source
pub trait DocLookup {
    /// Documentation for a qualified type name. Never fails; unknown
    /// types get the placeholder.
    fn describe(&self, qualified: &str) -> TypeDocs;
}

/// A lookup with no sources - always the placeholder
#[derive(Debug, Default)]
pub struct NoDocs;

impl DocLookup for NoDocs {
    fn describe(&self, _qualified: &str) -> TypeDocs {
        TypeDocs::placeholder()
    }
}

/// Lookup backed by one or more companion documentation files.
/// Earlier files win when two define the same type.
#[derive(Debug, Default)]
pub struct FileDocs {
    files: Vec<DocFile>,
}

impl FileDocs {
    /// Create an empty lookup
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a set of documentation files. Unreadable or unparseable
    /// files are skipped and reported as warnings, not errors.
    pub fn load_all(paths: &[PathBuf]) -> (Self, Vec<String>) {
        let mut docs = Self::new();
        let mut warnings = Vec::new();

        for path in paths {
            if !path.exists() {
                continue;
            }
            match fs::read_to_string(path) {
                Ok(content) => match DocFile::from_json(&content) {
                    Ok(file) => docs.files.push(file),
                    Err(e) => warnings.push(format!(
                        "documentation file {} could not be parsed: {}",
                        path.display(),
                        e
                    )),
                },
                Err(e) => warnings.push(format!(
                    "documentation file {} could not be read: {}",
                    path.display(),
                    e
                )),
            }
        }

        (docs, warnings)
    }
}

impl DocLookup for FileDocs {
    fn describe(&self, qualified: &str) -> TypeDocs {
        for file in &self.files {
            if let Some(entry) = file.entry(qualified) {
                return TypeDocs {
                    summary: entry
                        .summary
                        .clone()
                        .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
                    properties: entry.properties.clone(),
                };
            }
        }
        TypeDocs::placeholder()
    }
}

/// Companion documentation path for a module manifest path
/// (`billing.module.json` -> `billing.docs.json`)
pub fn companion_docs_path(module_path: &Path) -> PathBuf {
    let name = module_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    let stem = name.strip_suffix(MANIFEST_SUFFIX).unwrap_or(name);
    module_path.with_file_name(format!("{}{}", stem, DOCS_SUFFIX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_companion_path() {
        let p = companion_docs_path(Path::new("/contracts/billing.module.json"));
        assert_eq!(p, Path::new("/contracts/billing.docs.json"));
    }

    #[test]
    fn test_missing_files_are_silent() {
        let (docs, warnings) = FileDocs::load_all(&[PathBuf::from("/does/not/exist.docs.json")]);
        assert!(warnings.is_empty());
        assert_eq!(docs.describe("Any.Type").summary, NO_DESCRIPTION);
    }

    #[test]
    fn test_lookup_and_placeholder() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("billing.docs.json");
        fs::write(
            &path,
            r#"{"types":{"Ns.E":{"summary":"An event.","properties":{"TenantId":"The tenant."}}}}"#,
        )
        .unwrap();

        let (docs, warnings) = FileDocs::load_all(&[path]);
        assert!(warnings.is_empty());

        let found = docs.describe("Ns.E");
        assert_eq!(found.summary, "An event.");
        assert_eq!(found.property("tenantid"), "The tenant.");
        assert_eq!(found.property("Amount"), NO_DESCRIPTION);

        let missing = docs.describe("Ns.Other");
        assert_eq!(missing.summary, NO_DESCRIPTION);
    }

    #[test]
    fn test_broken_file_is_a_warning() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.docs.json");
        fs::write(&path, "{not json").unwrap();

        let (_, warnings) = FileDocs::load_all(&[path]);
        assert_eq!(warnings.len(), 1);
    }
}
