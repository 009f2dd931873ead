//! Module loading and isolated type resolution
//!
//! Each input module is loaded into its own `ResolutionScope`: the root
//! manifest plus any co-located dependency manifests, resolved into one
//! insertion-ordered registry that lives only as long as the module is
//! being processed. Scopes are never shared between modules, so two
//! inputs can require conflicting versions of the same dependency
//! without colliding.
//!
//! Loading degrades rather than fails: a dependency manifest that is
//! missing or unparseable is recorded as a warning and the types that
//! did load are used. Only the root manifest itself is load-bearing.

use crate::diagnostics::{HeraldError, HeraldResult};
use herald_ir::{ModuleManifest, TypeDecl, TypeRef, MANIFEST_SUFFIX};
use indexmap::IndexMap;
use std::collections::{HashSet, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Default per-module load deadline
pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// An isolated, insertion-ordered table of type declarations
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: IndexMap<String, TypeDecl>,
}

impl TypeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a declaration; the first declaration of a qualified name wins
    pub fn insert(&mut self, decl: TypeDecl) -> bool {
        let qualified = decl.qualified_name();
        if self.types.contains_key(&qualified) {
            return false;
        }
        self.types.insert(qualified, decl);
        true
    }

    /// Look up a declaration by qualified name
    pub fn get(&self, qualified: &str) -> Option<&TypeDecl> {
        self.types.get(qualified)
    }

    /// Resolve the declaration behind a type reference, if it is a
    /// named type present in this registry
    pub fn resolve(&self, ty: &TypeRef) -> Option<&TypeDecl> {
        match ty {
            TypeRef::Named { qualified, .. } => self.get(qualified),
            _ => None,
        }
    }

    /// All declarations in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &TypeDecl> {
        self.types.values()
    }

    /// Number of declarations
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// A per-module resolution scope.
///
/// Owns everything loaded for one input module. Dropping the scope
/// releases all of it; nothing leaks into the next module's iteration.
#[derive(Debug)]
pub struct ResolutionScope {
    /// Root module name
    root: String,
    /// Qualified names of the root module's own declarations
    root_decls: Vec<String>,
    /// All types resolvable within this scope
    registry: TypeRegistry,
}

impl ResolutionScope {
    /// Root module name
    pub fn root(&self) -> &str {
        &self.root
    }

    /// The scope's type registry
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Types declared by the root module itself (not its dependencies).
    /// Event discovery scans only these; dependency modules get their
    /// own scope when they are passed as inputs themselves.
    pub fn root_types(&self) -> impl Iterator<Item = &TypeDecl> {
        self.root_decls
            .iter()
            .filter_map(|q| self.registry.get(q))
    }
}

/// Tagged result of loading one module: the scope plus everything that
/// could not be brought into it
#[derive(Debug)]
pub struct LoadedModule {
    /// The isolated scope with all resolvable types
    pub scope: ResolutionScope,
    /// Required modules whose manifests could not be loaded
    pub missing: Vec<String>,
    /// Number of dependency manifests skipped (missing, unparseable,
    /// or cut off by the deadline)
    pub skipped_count: usize,
    /// Human-readable load warnings
    pub warnings: Vec<String>,
}

/// Load a module manifest and its co-located dependencies.
///
/// Fatal only when the root manifest is missing or unparseable; every
/// dependency problem is reported through `LoadedModule`. The deadline
/// is cooperative: it is checked between manifest reads, so one slow
/// filesystem cannot stall the whole run indefinitely.
pub fn load_module(path: &Path, timeout: Duration) -> HeraldResult<LoadedModule> {
    let deadline = Instant::now() + timeout;

    if !path.exists() {
        return Err(HeraldError::ModuleNotFound(path.to_path_buf()));
    }

    let root_manifest = read_manifest(path)?;
    root_manifest
        .validate()
        .map_err(|e| HeraldError::manifest(path, e.to_string()))?;

    let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    let root_name = root_manifest.name.clone();

    let mut registry = TypeRegistry::new();
    let mut warnings = Vec::new();
    let mut missing = Vec::new();
    let mut skipped_count = 0usize;

    let mut root_decls = Vec::new();
    for decl in root_manifest.types {
        root_decls.push(decl.qualified_name());
        registry.insert(decl);
    }

    // Breadth-first over transitive requires; a module queued once is
    // never queued again.
    let mut queued: HashSet<String> = HashSet::new();
    queued.insert(root_name.clone());
    let mut queue: VecDeque<String> = root_manifest.requires.into();
    queue.retain(|m| queued.insert(m.clone()));

    while let Some(required) = queue.pop_front() {
        if Instant::now() >= deadline {
            skipped_count += 1 + queue.len();
            warnings.push(format!(
                "load deadline exceeded; {} dependency manifest(s) not loaded",
                1 + queue.len()
            ));
            missing.push(required);
            missing.extend(queue.drain(..));
            break;
        }

        let dep_path = manifest_path(&dir, &required);
        if !dep_path.exists() {
            skipped_count += 1;
            missing.push(required.clone());
            warnings.push(format!(
                "dependency '{}' not found next to the module; its types will be unresolved",
                required
            ));
            continue;
        }

        match read_manifest(&dep_path) {
            Ok(manifest) => {
                for decl in manifest.types {
                    registry.insert(decl);
                }
                for next in manifest.requires {
                    if queued.insert(next.clone()) {
                        queue.push_back(next);
                    }
                }
            }
            Err(e) => {
                skipped_count += 1;
                missing.push(required.clone());
                warnings.push(format!("dependency '{}' could not be parsed: {}", required, e));
            }
        }
    }

    Ok(LoadedModule {
        scope: ResolutionScope {
            root: root_name,
            root_decls,
            registry,
        },
        missing,
        skipped_count,
        warnings,
    })
}

/// Expected manifest path for a module name inside a directory
fn manifest_path(dir: &Path, module: &str) -> PathBuf {
    dir.join(format!("{}{}", module, MANIFEST_SUFFIX))
}

fn read_manifest(path: &Path) -> HeraldResult<ModuleManifest> {
    let content = fs::read_to_string(path)?;
    ModuleManifest::from_json(&content).map_err(|e| HeraldError::manifest(path, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use herald_ir::{Scalar, TypeDecl, TypeDeclKind};
    use tempfile::TempDir;

    fn write_manifest(dir: &Path, manifest: &ModuleManifest) -> PathBuf {
        let path = manifest_path(dir, &manifest.name);
        fs::write(&path, manifest.to_json().unwrap()).unwrap();
        path
    }

    #[test]
    fn test_load_single_module() {
        let tmp = TempDir::new().unwrap();
        let manifest = ModuleManifest::new("Acme.Billing.Contracts").with_type(TypeDecl::new(
            "PaymentReceived",
            "Acme.Billing.Contracts.Payments",
            TypeDeclKind::Record,
        ));
        let path = write_manifest(tmp.path(), &manifest);

        let loaded = load_module(&path, DEFAULT_LOAD_TIMEOUT).unwrap();
        assert_eq!(loaded.scope.root(), "Acme.Billing.Contracts");
        assert_eq!(loaded.scope.registry().len(), 1);
        assert_eq!(loaded.skipped_count, 0);
        assert!(loaded.warnings.is_empty());
    }

    #[test]
    fn test_missing_dependency_is_partial_not_fatal() {
        let tmp = TempDir::new().unwrap();
        let manifest = ModuleManifest::new("Acme.Billing.Contracts")
            .with_requires("Acme.Shared.Contracts")
            .with_type(TypeDecl::new(
                "PaymentReceived",
                "Acme.Billing.Contracts.Payments",
                TypeDeclKind::Record,
            ));
        let path = write_manifest(tmp.path(), &manifest);

        let loaded = load_module(&path, DEFAULT_LOAD_TIMEOUT).unwrap();
        assert_eq!(loaded.scope.registry().len(), 1);
        assert_eq!(loaded.skipped_count, 1);
        assert_eq!(loaded.missing, vec!["Acme.Shared.Contracts".to_string()]);
        assert_eq!(loaded.warnings.len(), 1);
    }

    #[test]
    fn test_transitive_dependencies_resolve() {
        let tmp = TempDir::new().unwrap();
        let shared = ModuleManifest::new("Acme.Shared.Contracts").with_type(
            TypeDecl::new("Money", "Acme.Shared.Contracts", TypeDeclKind::Record).with_property(
                herald_ir::PropertyDecl::new("Amount", TypeRef::Scalar(Scalar::Decimal)),
            ),
        );
        let billing = ModuleManifest::new("Acme.Billing.Contracts")
            .with_requires("Acme.Shared.Contracts")
            .with_type(TypeDecl::new(
                "PaymentReceived",
                "Acme.Billing.Contracts.Payments",
                TypeDeclKind::Record,
            ));
        write_manifest(tmp.path(), &shared);
        let path = write_manifest(tmp.path(), &billing);

        let loaded = load_module(&path, DEFAULT_LOAD_TIMEOUT).unwrap();
        assert_eq!(loaded.scope.registry().len(), 2);
        assert!(loaded
            .scope
            .registry()
            .get("Acme.Shared.Contracts.Money")
            .is_some());
        assert!(loaded.missing.is_empty());
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nope.module.json");
        let err = load_module(&path, DEFAULT_LOAD_TIMEOUT).unwrap_err();
        assert!(matches!(err, HeraldError::ModuleNotFound(_)));
    }

    #[test]
    fn test_first_declaration_wins_in_registry() {
        let mut registry = TypeRegistry::new();
        let a = TypeDecl::new("Money", "Acme.Shared", TypeDeclKind::Record)
            .with_doc("first");
        let b = TypeDecl::new("Money", "Acme.Shared", TypeDeclKind::Record)
            .with_doc("second");
        assert!(registry.insert(a));
        assert!(!registry.insert(b));
        assert_eq!(
            registry.get("Acme.Shared.Money").unwrap().doc.as_deref(),
            Some("first")
        );
    }
}
