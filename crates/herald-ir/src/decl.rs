//! Type declarations in a contract module's type table

use crate::annotation::{find_marker, Annotation};
use crate::types::TypeRef;
use serde::{Deserialize, Serialize};

/// Kind of a declared type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TypeDeclKind {
    /// Positional record type; markers may sit on constructor params
    Record,
    /// Class with settable properties
    Class,
    /// Closed enumeration
    Enum,
}

/// A public property of a declared type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDecl {
    /// Property name
    pub name: String,
    /// Property type
    pub ty: TypeRef,
    /// Whether the property is declared nullable
    #[serde(default)]
    pub nullable: bool,
    /// Annotations on the property itself
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
    /// Inline doc comment, if the contract compiler captured one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

impl PropertyDecl {
    /// Create a non-nullable, unannotated property
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            nullable: false,
            annotations: vec![],
            doc: None,
        }
    }

    /// Mark nullable
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Add an annotation
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Find an annotation by marker name
    pub fn marker(&self, name: &str) -> Option<&Annotation> {
        find_marker(&self.annotations, name)
    }
}

/// A primary-constructor parameter of a record-style type.
///
/// Record types carry per-parameter annotations rather than
/// per-property ones; the discoverer falls back to the same-named
/// parameter when a property carries no marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CtorParam {
    /// Parameter name
    pub name: String,
    /// Parameter type
    pub ty: TypeRef,
    /// Annotations on the parameter
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
}

impl CtorParam {
    /// Create an unannotated parameter
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            annotations: vec![],
        }
    }

    /// Add an annotation
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Find an annotation by marker name
    pub fn marker(&self, name: &str) -> Option<&Annotation> {
        find_marker(&self.annotations, name)
    }
}

/// A single type in a module's type table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDecl {
    /// Simple type name
    pub name: String,
    /// Declaring namespace (`Acme.Billing.Contracts.Payments`)
    pub namespace: String,
    /// Declaration kind
    pub kind: TypeDeclKind,
    /// Annotations on the type
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
    /// Public properties, in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<PropertyDecl>,
    /// Primary-constructor parameters (records only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ctor_params: Vec<CtorParam>,
    /// Type-level doc comment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

impl TypeDecl {
    /// Create an empty declaration
    pub fn new(name: impl Into<String>, namespace: impl Into<String>, kind: TypeDeclKind) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            kind,
            annotations: vec![],
            properties: vec![],
            ctor_params: vec![],
            doc: None,
        }
    }

    /// Namespace-qualified name
    pub fn qualified_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    /// Add an annotation
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Add a property
    pub fn with_property(mut self, property: PropertyDecl) -> Self {
        self.properties.push(property);
        self
    }

    /// Add a constructor parameter
    pub fn with_ctor_param(mut self, param: CtorParam) -> Self {
        self.ctor_params.push(param);
        self
    }

    /// Set the doc comment
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Find a type-level annotation by marker name
    pub fn marker(&self, name: &str) -> Option<&Annotation> {
        find_marker(&self.annotations, name)
    }

    /// Find a constructor parameter by name, case-insensitively
    pub fn ctor_param(&self, name: &str) -> Option<&CtorParam> {
        self.ctor_params
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Scalar;

    #[test]
    fn test_qualified_name() {
        let t = TypeDecl::new("PaymentReceived", "Acme.Billing.Contracts", TypeDeclKind::Record);
        assert_eq!(t.qualified_name(), "Acme.Billing.Contracts.PaymentReceived");

        let bare = TypeDecl::new("Loose", "", TypeDeclKind::Class);
        assert_eq!(bare.qualified_name(), "Loose");
    }

    #[test]
    fn test_ctor_param_lookup_is_case_insensitive() {
        let t = TypeDecl::new("E", "Ns", TypeDeclKind::Record)
            .with_ctor_param(CtorParam::new("tenantId", TypeRef::Scalar(Scalar::Uuid)));
        assert!(t.ctor_param("TenantId").is_some());
        assert!(t.ctor_param("amount").is_none());
    }

    #[test]
    fn test_type_marker() {
        let t = TypeDecl::new("E", "Ns", TypeDeclKind::Record)
            .with_annotation(Annotation::new("EventTopic").with_field("topic", "payments"));
        let marker = t.marker("event_topic").unwrap();
        assert_eq!(marker.str_field("topic"), Some("payments"));
    }
}
