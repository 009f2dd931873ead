//! Type classification
//!
//! Pure functions over `TypeRef` plus a scope's registry: scalar vs
//! collection vs complex, and cycle-safe recursive discovery of every
//! complex type reachable from an event's properties. All traversal is
//! guarded by a per-call visited set, so self-referential and mutually
//! referential type graphs always terminate.
//!
//! The schema set produced here is keyed by **clean name**: the simple
//! type name with generic arguments resolved recursively
//! (`Envelope<Payment>` keys as `EnvelopeOfPayment`), so each generic
//! instantiation gets its own schema page instead of raw angle-bracket
//! syntax leaking into file names.

use crate::loader::TypeRegistry;
use herald_ir::{PropertyDecl, Scalar, TypeDecl, TypeDeclKind, TypeRef};
use indexmap::IndexMap;
use std::collections::{HashSet, VecDeque};

/// Generic shapes treated as sequence/set collections
const SEQUENCE_SHAPES: &[&str] = &["list", "vec", "set", "hashset", "array"];

/// Generic shapes treated as key/value maps
const MAP_SHAPES: &[&str] = &["map", "dictionary", "hashmap"];

/// Whether a type is scalar: a primitive, an enumeration, or one of the
/// well-known value types (text, decimal, date/time, duration, uuid)
pub fn is_scalar(ty: &TypeRef, registry: &TypeRegistry) -> bool {
    match ty {
        TypeRef::Scalar(_) => true,
        TypeRef::Array(_) => false,
        TypeRef::Named { qualified, args } => {
            if !args.is_empty() {
                return false;
            }
            // Enums resolve through the registry; the allow-list covers
            // value types spelled by name rather than as primitives.
            if let Some(decl) = registry.get(qualified) {
                return decl.kind == TypeDeclKind::Enum;
            }
            Scalar::parse(simple_name(qualified)).is_some()
        }
    }
}

/// Whether a type is an array or a well-known collection shape
pub fn is_collection(ty: &TypeRef) -> bool {
    match ty {
        TypeRef::Array(_) => true,
        TypeRef::Named { qualified, args } => {
            let name = simple_name(qualified).to_ascii_lowercase();
            !args.is_empty()
                && (SEQUENCE_SHAPES.contains(&name.as_str())
                    || MAP_SHAPES.contains(&name.as_str()))
        }
        TypeRef::Scalar(_) => false,
    }
}

/// Element type of a collection. For maps this is the *value* type,
/// not the key.
pub fn element_type(ty: &TypeRef) -> Option<&TypeRef> {
    match ty {
        TypeRef::Array(el) => Some(el),
        TypeRef::Named { qualified, args } if !args.is_empty() => {
            let name = simple_name(qualified).to_ascii_lowercase();
            if MAP_SHAPES.contains(&name.as_str()) {
                args.last()
            } else if SEQUENCE_SHAPES.contains(&name.as_str()) {
                args.first()
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Whether a type is complex: a structured reference type that needs
/// its own schema page. Unresolvable references classify as non-complex
/// so that a partially loaded module degrades instead of failing.
pub fn is_complex(ty: &TypeRef, registry: &TypeRegistry) -> bool {
    let mut visited = HashSet::new();
    complex_decl_of(ty, registry, &mut visited).is_some()
        && !is_collection(ty)
        && matches!(ty, TypeRef::Named { .. })
}

/// Resolve the complex declaration a type reference ultimately points
/// at, looking through arrays and collection element types. A qualified
/// name re-encountered mid-traversal is treated as non-complex for that
/// call, which guarantees termination on cyclic graphs.
pub fn complex_decl_of<'r>(
    ty: &TypeRef,
    registry: &'r TypeRegistry,
    visited: &mut HashSet<String>,
) -> Option<&'r TypeDecl> {
    match ty {
        TypeRef::Scalar(_) => None,
        TypeRef::Array(el) => complex_decl_of(el, registry, visited),
        TypeRef::Named { qualified, .. } => {
            if is_collection(ty) {
                return element_type(ty).and_then(|el| complex_decl_of(el, registry, visited));
            }
            if is_scalar(ty, registry) {
                return None;
            }
            if !visited.insert(qualified.clone()) {
                return None;
            }
            registry.get(qualified)
        }
    }
}

/// Clean display name for a type reference, with generic argument names
/// resolved recursively instead of raw angle-bracket syntax
/// (`Envelope<Payment>` -> `EnvelopeOfPayment`)
pub fn clean_type_name(ty: &TypeRef) -> String {
    match ty {
        TypeRef::Scalar(s) => {
            let name = s.name();
            let mut chars = name.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        }
        TypeRef::Array(el) => format!("ArrayOf{}", clean_type_name(el)),
        TypeRef::Named { qualified, args } => {
            let name = simple_name(qualified);
            if args.is_empty() {
                name.to_string()
            } else {
                let inner: Vec<String> = args.iter().map(clean_type_name).collect();
                format!("{}Of{}", name, inner.join("And"))
            }
        }
    }
}

/// Collect every complex type referenced by a property list, including
/// types nested inside those types, into the accumulated set. The set
/// is keyed by clean name and owns clones of the declarations so it
/// outlives the module's resolution scope.
pub fn collect_complex_types(
    properties: &[PropertyDecl],
    registry: &TypeRegistry,
    accumulated: &mut IndexMap<String, TypeDecl>,
) {
    for property in properties {
        let mut visited = HashSet::new();
        let mut found = Vec::new();
        gather(&property.ty, registry, &mut visited, &mut found);
        for (clean, decl) in found {
            expand_complex(clean, decl, registry, accumulated);
        }
    }
}

/// Expand one complex declaration into the accumulated set under its
/// own name
pub fn collect_nested_complex_types(
    decl: &TypeDecl,
    registry: &TypeRegistry,
    accumulated: &mut IndexMap<String, TypeDecl>,
) {
    expand_complex(decl.name.clone(), decl, registry, accumulated);
}

/// Breadth-first expansion of one complex type's own structured
/// properties. A clean name already in the accumulated set is never
/// re-expanded, which is what makes the traversal cycle-safe.
fn expand_complex(
    clean: String,
    decl: &TypeDecl,
    registry: &TypeRegistry,
    accumulated: &mut IndexMap<String, TypeDecl>,
) {
    if accumulated.contains_key(&clean) {
        return;
    }
    accumulated.insert(clean, decl.clone());

    let mut queue = VecDeque::new();
    queue.push_back(decl.clone());
    while let Some(current) = queue.pop_front() {
        for property in &current.properties {
            let mut visited = HashSet::new();
            let mut found = Vec::new();
            gather(&property.ty, registry, &mut visited, &mut found);
            for (nested_clean, nested) in found {
                if !accumulated.contains_key(&nested_clean) {
                    accumulated.insert(nested_clean, nested.clone());
                    queue.push_back(nested.clone());
                }
            }
        }
    }
}

/// Gather the complex declarations directly reachable from one type
/// reference, paired with their clean names: the type itself,
/// collection elements, and generic arguments of non-collection
/// generics. Distinct instantiations of the same generic declaration
/// gather separately (`Envelope<Payment>` and `Envelope<Refund>` are
/// two schemas).
fn gather<'r>(
    ty: &TypeRef,
    registry: &'r TypeRegistry,
    visited: &mut HashSet<String>,
    out: &mut Vec<(String, &'r TypeDecl)>,
) {
    match ty {
        TypeRef::Scalar(_) => {}
        TypeRef::Array(el) => gather(el, registry, visited, out),
        TypeRef::Named { qualified, args } => {
            if is_collection(ty) {
                if let Some(el) = element_type(ty) {
                    gather(el, registry, visited, out);
                }
                return;
            }
            let clean = clean_type_name(ty);
            if !visited.insert(clean.clone()) {
                return;
            }
            if let Some(decl) = registry.get(qualified) {
                if decl.kind != TypeDeclKind::Enum {
                    out.push((clean, decl));
                }
            }
            for arg in args {
                gather(arg, registry, visited, out);
            }
        }
    }
}

fn simple_name(qualified: &str) -> &str {
    qualified.rsplit('.').next().unwrap_or(qualified)
}

#[cfg(test)]
mod tests {
    use super::*;
    use herald_ir::{Annotation, PropertyDecl};

    fn registry_with(decls: Vec<TypeDecl>) -> TypeRegistry {
        let mut reg = TypeRegistry::new();
        for d in decls {
            reg.insert(d);
        }
        reg
    }

    fn record(name: &str, ns: &str) -> TypeDecl {
        TypeDecl::new(name, ns, TypeDeclKind::Record)
    }

    #[test]
    fn test_scalars() {
        let reg = registry_with(vec![TypeDecl::new("Status", "Ns", TypeDeclKind::Enum)]);
        assert!(is_scalar(&TypeRef::Scalar(Scalar::Uuid), &reg));
        assert!(is_scalar(&TypeRef::named("Ns.Status"), &reg));
        assert!(is_scalar(&TypeRef::named("System.Guid"), &reg));
        assert!(!is_scalar(&TypeRef::named("Ns.Money"), &reg));
    }

    #[test]
    fn test_collections_and_element_types() {
        let list = TypeRef::generic("List", vec![TypeRef::named("Ns.Money")]);
        let map = TypeRef::generic(
            "Map",
            vec![TypeRef::Scalar(Scalar::String), TypeRef::named("Ns.Money")],
        );
        assert!(is_collection(&list));
        assert!(is_collection(&map));
        assert!(!is_collection(&TypeRef::named("Ns.Money")));

        // Map element is the value type, not the key
        assert_eq!(element_type(&map).unwrap().simple_name(), "Money");
        assert_eq!(element_type(&list).unwrap().simple_name(), "Money");
    }

    #[test]
    fn test_is_complex() {
        let reg = registry_with(vec![record("Money", "Ns")]);
        assert!(is_complex(&TypeRef::named("Ns.Money"), &reg));
        assert!(!is_complex(&TypeRef::Scalar(Scalar::I32), &reg));
        // Unresolvable types degrade to non-complex
        assert!(!is_complex(&TypeRef::named("Gone.Widget"), &reg));
        // Collections are reducible, not complex themselves
        let list = TypeRef::generic("List", vec![TypeRef::named("Ns.Money")]);
        assert!(!is_complex(&list, &reg));
    }

    #[test]
    fn test_clean_type_name() {
        let envelope = TypeRef::generic("Ns.Envelope", vec![TypeRef::named("Ns.Payment")]);
        assert_eq!(clean_type_name(&envelope), "EnvelopeOfPayment");

        let map = TypeRef::generic(
            "Map",
            vec![TypeRef::Scalar(Scalar::String), TypeRef::named("Ns.Money")],
        );
        assert_eq!(clean_type_name(&map), "MapOfStringAndMoney");

        let arr = TypeRef::array(TypeRef::named("Ns.Money"));
        assert_eq!(clean_type_name(&arr), "ArrayOfMoney");
    }

    #[test]
    fn test_collect_through_collections() {
        let money = record("Money", "Ns").with_property(PropertyDecl::new(
            "Amount",
            TypeRef::Scalar(Scalar::Decimal),
        ));
        let reg = registry_with(vec![money]);
        let props = vec![PropertyDecl::new(
            "Lines",
            TypeRef::generic("List", vec![TypeRef::named("Ns.Money")]),
        )];

        let mut acc = IndexMap::new();
        collect_complex_types(&props, &reg, &mut acc);
        assert_eq!(acc.len(), 1);
        assert!(acc.contains_key("Money"));
    }

    #[test]
    fn test_cyclic_graph_terminates() {
        // A references B references A
        let a = record("A", "Ns").with_property(PropertyDecl::new("B", TypeRef::named("Ns.B")));
        let b = record("B", "Ns").with_property(PropertyDecl::new("A", TypeRef::named("Ns.A")));
        let reg = registry_with(vec![a, b]);

        let props = vec![PropertyDecl::new("Root", TypeRef::named("Ns.A"))];
        let mut acc = IndexMap::new();
        collect_complex_types(&props, &reg, &mut acc);
        assert_eq!(acc.len(), 2);
        assert!(acc.contains_key("A"));
        assert!(acc.contains_key("B"));
    }

    #[test]
    fn test_self_referential_type_terminates() {
        let node =
            record("Node", "Ns").with_property(PropertyDecl::new("Parent", TypeRef::named("Ns.Node")));
        let reg = registry_with(vec![node.clone()]);

        let mut acc = IndexMap::new();
        collect_nested_complex_types(&node, &reg, &mut acc);
        assert_eq!(acc.len(), 1);
        assert!(acc.contains_key("Node"));
    }

    #[test]
    fn test_generic_instantiations_key_by_clean_name() {
        let envelope = record("Envelope", "Ns");
        let payment = record("Payment", "Ns");
        let refund = record("Refund", "Ns");
        let reg = registry_with(vec![envelope, payment, refund]);

        let props = vec![
            PropertyDecl::new(
                "Body",
                TypeRef::generic("Ns.Envelope", vec![TypeRef::named("Ns.Payment")]),
            )
            .with_annotation(Annotation::new("required")),
            PropertyDecl::new(
                "Reversal",
                TypeRef::generic("Ns.Envelope", vec![TypeRef::named("Ns.Refund")]),
            ),
        ];

        let mut acc = IndexMap::new();
        collect_complex_types(&props, &reg, &mut acc);
        // Two instantiations of the same generic are two schemas
        assert!(acc.contains_key("EnvelopeOfPayment"));
        assert!(acc.contains_key("EnvelopeOfRefund"));
        assert!(acc.contains_key("Payment"));
        assert!(acc.contains_key("Refund"));
        assert!(!acc.contains_key("Envelope"));
    }
}
