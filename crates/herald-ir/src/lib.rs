//! herald-ir: contract module type tables for the herald doc generator
//!
//! Compiled contract modules emit a machine-readable type table at build
//! time (`<name>.module.json`). This crate defines that interchange
//! format: type declarations with their annotations, properties and
//! primary-constructor parameters, plus the companion documentation file
//! format (`<name>.docs.json`).
//!
//! The generator side (herald-docgen) loads these manifests into isolated
//! per-module registries and never compares types across modules by
//! identity - all cross-module matching is by qualified-name string.

pub mod annotation;
pub mod decl;
pub mod docfile;
pub mod manifest;
pub mod types;

pub use annotation::{Annotation, AnnotationValue};
pub use decl::{CtorParam, PropertyDecl, TypeDecl, TypeDeclKind};
pub use docfile::{DocEntry, DocFile};
pub use manifest::{ManifestError, ModuleManifest};
pub use types::{Scalar, TypeRef};

/// File suffix for module type-table manifests
pub const MANIFEST_SUFFIX: &str = ".module.json";

/// File suffix for companion documentation files
pub const DOCS_SUFFIX: &str = ".docs.json";
