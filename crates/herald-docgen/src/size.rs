//! Payload size estimation
//!
//! Estimates the serialized size of an event property for documentation
//! purposes. Estimates are representative, not guaranteed: anything
//! depending on runtime data (strings, collections, truncated cycles)
//! carries `accurate: false` and a human-readable warning. The
//! recursion shares the classifier's visited-set discipline plus a
//! depth cap, so self-referential schemas terminate.

use crate::classify::{element_type, is_collection};
use crate::loader::TypeRegistry;
use herald_ir::{Scalar, TypeDeclKind, TypeRef};
use serde::Serialize;
use std::collections::HashSet;

/// Maximum traversal depth before an estimate is truncated
const MAX_DEPTH: usize = 32;

/// Result of estimating one type's serialized size
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadSizeResult {
    /// Estimated size in bytes
    pub bytes: u64,
    /// Whether the estimate is a hard bound. `false` means
    /// representative, not wrong.
    pub accurate: bool,
    /// Explanation when the estimate is not accurate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl PayloadSizeResult {
    fn exact(bytes: u64) -> Self {
        Self {
            bytes,
            accurate: true,
            warning: None,
        }
    }

    fn approximate(bytes: u64, warning: impl Into<String>) -> Self {
        Self {
            bytes,
            accurate: false,
            warning: Some(warning.into()),
        }
    }
}

/// Recursive payload size estimator bound to one resolution scope
pub struct SizeEstimator<'r> {
    registry: &'r TypeRegistry,
    average_string_length: u64,
    nominal_collection_length: u64,
}

impl<'r> SizeEstimator<'r> {
    /// Create an estimator with the default heuristics
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self {
            registry,
            average_string_length: 20,
            nominal_collection_length: 4,
        }
    }

    /// Override the average string length heuristic
    pub fn with_average_string_length(mut self, bytes: u64) -> Self {
        self.average_string_length = bytes;
        self
    }

    /// Override the nominal collection element count
    pub fn with_nominal_collection_length(mut self, count: u64) -> Self {
        self.nominal_collection_length = count;
        self
    }

    /// Estimate the serialized size of a type
    pub fn estimate(&self, ty: &TypeRef) -> PayloadSizeResult {
        let mut visited = HashSet::new();
        self.estimate_guarded(ty, &mut visited, 0)
    }

    fn estimate_guarded(
        &self,
        ty: &TypeRef,
        visited: &mut HashSet<String>,
        depth: usize,
    ) -> PayloadSizeResult {
        if depth > MAX_DEPTH {
            return PayloadSizeResult::approximate(0, "estimate truncated at maximum depth");
        }

        match ty {
            TypeRef::Scalar(s) => self.scalar_size(*s),
            TypeRef::Array(_) => self.collection_size(ty, visited, depth),
            TypeRef::Named { qualified, .. } => {
                if is_collection(ty) {
                    return self.collection_size(ty, visited, depth);
                }
                if let Some(scalar) = Scalar::parse(simple_name(qualified)) {
                    return self.scalar_size(scalar);
                }
                let Some(decl) = self.registry.get(qualified) else {
                    return PayloadSizeResult::approximate(
                        0,
                        format!("type '{}' could not be resolved", qualified),
                    );
                };
                if decl.kind == TypeDeclKind::Enum {
                    return PayloadSizeResult::exact(4);
                }
                if !visited.insert(qualified.clone()) {
                    return PayloadSizeResult::approximate(
                        0,
                        format!("recursive reference to '{}' truncated", qualified),
                    );
                }

                let mut total = 0u64;
                let mut accurate = true;
                let mut warning = None;
                for property in &decl.properties {
                    let member = self.estimate_guarded(&property.ty, visited, depth + 1);
                    total = total.saturating_add(member.bytes);
                    accurate &= member.accurate;
                    if warning.is_none() {
                        warning = member.warning;
                    }
                }
                visited.remove(qualified);

                if total == u64::MAX {
                    accurate = false;
                    warning
                        .get_or_insert_with(|| "size estimate exceeds representable range".to_string());
                }

                PayloadSizeResult {
                    bytes: total,
                    accurate,
                    warning,
                }
            }
        }
    }

    fn scalar_size(&self, scalar: Scalar) -> PayloadSizeResult {
        match scalar {
            Scalar::Bool => PayloadSizeResult::exact(1),
            Scalar::I32 | Scalar::U32 | Scalar::F32 => PayloadSizeResult::exact(4),
            Scalar::I64 | Scalar::U64 | Scalar::F64 => PayloadSizeResult::exact(8),
            Scalar::Decimal | Scalar::Uuid => PayloadSizeResult::exact(16),
            Scalar::DateTime | Scalar::Date | Scalar::Duration => PayloadSizeResult::exact(8),
            Scalar::String => PayloadSizeResult::approximate(
                self.average_string_length,
                "string size depends on content length",
            ),
        }
    }

    fn collection_size(
        &self,
        ty: &TypeRef,
        visited: &mut HashSet<String>,
        depth: usize,
    ) -> PayloadSizeResult {
        let element = element_type(ty).map(|el| self.estimate_guarded(el, visited, depth + 1));
        let per_element = element.as_ref().map(|e| e.bytes).unwrap_or(0);
        // Nested collections multiply; saturate instead of overflowing
        // on absurd-but-valid inputs.
        PayloadSizeResult::approximate(
            per_element.saturating_mul(self.nominal_collection_length),
            "size depends on runtime collection length",
        )
    }
}

fn simple_name(qualified: &str) -> &str {
    qualified.rsplit('.').next().unwrap_or(qualified)
}

#[cfg(test)]
mod tests {
    use super::*;
    use herald_ir::{PropertyDecl, TypeDecl};

    fn registry_with(decls: Vec<TypeDecl>) -> TypeRegistry {
        let mut reg = TypeRegistry::new();
        for d in decls {
            reg.insert(d);
        }
        reg
    }

    #[test]
    fn test_scalar_widths() {
        let reg = TypeRegistry::new();
        let est = SizeEstimator::new(&reg);
        assert_eq!(est.estimate(&TypeRef::Scalar(Scalar::Bool)).bytes, 1);
        assert_eq!(est.estimate(&TypeRef::Scalar(Scalar::Uuid)).bytes, 16);
        assert_eq!(est.estimate(&TypeRef::Scalar(Scalar::Decimal)).bytes, 16);
        assert!(est.estimate(&TypeRef::Scalar(Scalar::Decimal)).accurate);
    }

    #[test]
    fn test_string_is_heuristic() {
        let reg = TypeRegistry::new();
        let est = SizeEstimator::new(&reg).with_average_string_length(64);
        let result = est.estimate(&TypeRef::Scalar(Scalar::String));
        assert_eq!(result.bytes, 64);
        assert!(!result.accurate);
        assert!(result.warning.is_some());
    }

    #[test]
    fn test_collection_is_never_accurate() {
        let reg = TypeRegistry::new();
        let est = SizeEstimator::new(&reg).with_nominal_collection_length(3);
        let list = TypeRef::generic("List", vec![TypeRef::Scalar(Scalar::I32)]);
        let result = est.estimate(&list);
        assert_eq!(result.bytes, 12);
        assert!(!result.accurate);
        assert!(result
            .warning
            .as_deref()
            .unwrap()
            .contains("collection length"));
    }

    #[test]
    fn test_complex_type_sums_members() {
        let money = TypeDecl::new("Money", "Ns", TypeDeclKind::Record)
            .with_property(PropertyDecl::new("Amount", TypeRef::Scalar(Scalar::Decimal)))
            .with_property(PropertyDecl::new("Minor", TypeRef::Scalar(Scalar::I32)));
        let reg = registry_with(vec![money]);
        let est = SizeEstimator::new(&reg);
        let result = est.estimate(&TypeRef::named("Ns.Money"));
        assert_eq!(result.bytes, 20);
        assert!(result.accurate);
    }

    #[test]
    fn test_self_referential_type_terminates() {
        let node = TypeDecl::new("Node", "Ns", TypeDeclKind::Record)
            .with_property(PropertyDecl::new("Value", TypeRef::Scalar(Scalar::I64)))
            .with_property(PropertyDecl::new("Parent", TypeRef::named("Ns.Node")));
        let reg = registry_with(vec![node]);
        let est = SizeEstimator::new(&reg);

        let result = est.estimate(&TypeRef::named("Ns.Node"));
        assert_eq!(result.bytes, 8);
        assert!(!result.accurate);
        assert!(result.warning.as_deref().unwrap().contains("recursive"));
    }

    #[test]
    fn test_deeply_nested_collections_saturate() {
        let reg = TypeRegistry::new();
        let est = SizeEstimator::new(&reg);

        let mut ty = TypeRef::Scalar(Scalar::String);
        for _ in 0..31 {
            ty = TypeRef::generic("List", vec![ty]);
        }

        // 20 * 4^31 does not fit in u64; the estimate must clamp, not panic
        let result = est.estimate(&ty);
        assert!(!result.accurate);
        assert_eq!(result.bytes, u64::MAX);
    }

    #[test]
    fn test_unresolved_type_degrades() {
        let reg = TypeRegistry::new();
        let est = SizeEstimator::new(&reg);
        let result = est.estimate(&TypeRef::named("Gone.Widget"));
        assert_eq!(result.bytes, 0);
        assert!(!result.accurate);
    }
}
