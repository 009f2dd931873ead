//! Shared fixtures for unit tests

use crate::discover::{EventMetadata, EventPropertyMetadata, SchemaMetadata};
use herald_ir::{Scalar, TypeRef};

/// An event in the default billing namespace
pub fn mock_event(name: &str) -> EventMetadata {
    mock_event_in(name, "Acme.Billing.Contracts")
}

/// A minimal public event with one string property
pub fn mock_event_in(name: &str, namespace: &str) -> EventMetadata {
    EventMetadata {
        name: name.to_string(),
        qualified_name: format!("{}.{}", namespace, name),
        namespace: namespace.to_string(),
        topic: "{env}.billing.public.payments.v1".to_string(),
        domain: "Billing".to_string(),
        version: "v1".to_string(),
        internal: false,
        summary: "A test event.".to_string(),
        properties: vec![EventPropertyMetadata {
            name: "TenantId".to_string(),
            type_name: "string".to_string(),
            ty: TypeRef::Scalar(Scalar::String),
            required: true,
            complex: false,
            partition_key: false,
            partition_key_order: None,
            description: "The tenant.".to_string(),
            estimated_bytes: 20,
            size_accurate: false,
            size_warning: Some("size depends on runtime string length".to_string()),
        }],
        partition_keys: vec![],
        deprecation: None,
    }
}

/// A schema with no properties
pub fn mock_schema(name: &str, namespace: &str) -> SchemaMetadata {
    SchemaMetadata {
        name: name.to_string(),
        clean_name: name.to_string(),
        qualified_name: format!("{}.{}", namespace, name),
        namespace: namespace.to_string(),
        summary: "A test schema.".to_string(),
        properties: vec![],
    }
}
