//! Event discovery
//!
//! Scans a loaded module's type table for types carrying the event
//! topic marker and derives everything the renderer needs: the resolved
//! topic string, partition keys in deterministic order, per-property
//! metadata with size estimates and descriptions.
//!
//! Markers are matched by annotation name and read through duck-typed
//! field access, never through a concrete marker type: the same marker
//! may have been compiled into the module through a different contract
//! toolchain than the one this generator knows about.

use crate::classify::complex_decl_of;
use crate::diagnostics::DiagnosticsCollector;
use crate::doclookup::DocLookup;
use crate::loader::ResolutionScope;
use crate::pipeline::GeneratorOptions;
use crate::size::SizeEstimator;
use herald_ir::{Annotation, TypeDecl, TypeRef};
use serde::Serialize;
use std::collections::HashSet;

/// Marker identifying a documented, routable event type
pub const EVENT_TOPIC_MARKER: &str = "event_topic";
/// Marker designating a routing/ordering key property or parameter
pub const PARTITION_KEY_MARKER: &str = "partition_key";
/// Marker forcing a property to be documented as required
pub const REQUIRED_MARKER: &str = "required";
/// Marker carrying a deprecation message
pub const DEPRECATED_MARKER: &str = "deprecated";

/// Environment placeholder emitted literally into topic strings;
/// resolving it is the deploying system's concern
pub const ENV_PLACEHOLDER: &str = "{env}";

/// Everything known about one discovered event type
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMetadata {
    /// Event display name
    pub name: String,
    /// Namespace-qualified name
    pub qualified_name: String,
    /// Declaring namespace
    pub namespace: String,
    /// Fully resolved topic string
    /// (`{env}.{domain}.{visibility}.{topic}.{version}`)
    pub topic: String,
    /// Routing domain (lowercased in the topic, original casing here)
    pub domain: String,
    /// Contract version segment
    pub version: String,
    /// Internal (domain-only) vs public visibility
    pub internal: bool,
    /// Event summary from the documentation lookup
    pub summary: String,
    /// Public properties, in declaration order
    pub properties: Vec<EventPropertyMetadata>,
    /// Partition keys, sorted by (order, name)
    pub partition_keys: Vec<PartitionKeyMetadata>,
    /// Deprecation message, when the type is marked deprecated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecation: Option<String>,
}

/// One public property of an event
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPropertyMetadata {
    /// Property name
    pub name: String,
    /// Friendly type name (`List<Money>`)
    pub type_name: String,
    /// Underlying type reference
    pub ty: TypeRef,
    /// Required per marker or non-nullable typing
    pub required: bool,
    /// Whether the (element) type links to a schema page
    pub complex: bool,
    /// Whether the property is a partition key
    pub partition_key: bool,
    /// Explicit partition-key order, when the marker declared one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partition_key_order: Option<i64>,
    /// Human description, placeholder when absent
    pub description: String,
    /// Estimated serialized size in bytes
    pub estimated_bytes: u64,
    /// Whether the size estimate is a hard bound
    pub size_accurate: bool,
    /// Explanation when the estimate is not accurate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_warning: Option<String>,
}

/// Where a partition-key marker was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PartitionKeySource {
    /// Marker on the property itself
    Property,
    /// Marker on the same-named primary-constructor parameter
    CtorParam,
}

/// A partition key of an event
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartitionKeyMetadata {
    /// Property name
    pub name: String,
    /// Friendly type name
    pub type_name: String,
    /// Description from the documentation lookup
    pub description: String,
    /// Explicit order, when the marker declared one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    /// Property marker vs constructor-parameter marker
    pub source: PartitionKeySource,
}

/// Documentation metadata for one shared complex type
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaMetadata {
    /// Simple type name
    pub name: String,
    /// Clean display name with generic arguments resolved
    pub clean_name: String,
    /// Namespace-qualified name
    pub qualified_name: String,
    /// Declaring namespace
    pub namespace: String,
    /// Summary from the documentation lookup
    pub summary: String,
    /// Properties, in declaration order
    pub properties: Vec<SchemaPropertyMetadata>,
}

/// One property of a shared complex type
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaPropertyMetadata {
    /// Property name
    pub name: String,
    /// Friendly type name
    pub type_name: String,
    /// Declared nullable
    pub nullable: bool,
    /// Whether the type links to another schema page
    pub complex: bool,
    /// Description, placeholder when absent
    pub description: String,
}

/// Build the schema metadata for a complex type while its declaring
/// scope is still alive; the result owns everything it needs. The
/// clean name keys the schema set and may differ from the declaration
/// name for generic instantiations (`EnvelopeOfPayment`).
pub fn describe_schema(
    decl: &TypeDecl,
    clean_name: impl Into<String>,
    scope: &ResolutionScope,
    docs: &dyn DocLookup,
) -> SchemaMetadata {
    let type_docs = docs.describe(&decl.qualified_name());
    let properties = decl
        .properties
        .iter()
        .map(|p| SchemaPropertyMetadata {
            name: p.name.clone(),
            type_name: p.ty.display(),
            nullable: p.nullable,
            complex: property_is_complex(&p.ty, scope),
            description: type_docs.property(&p.name),
        })
        .collect();

    SchemaMetadata {
        name: decl.name.clone(),
        clean_name: clean_name.into(),
        qualified_name: decl.qualified_name(),
        namespace: decl.namespace.clone(),
        summary: type_docs.summary,
        properties,
    }
}

/// Discover all events declared by a loaded module
pub fn discover_events(
    scope: &ResolutionScope,
    options: &GeneratorOptions,
    docs: &dyn DocLookup,
    diagnostics: &mut DiagnosticsCollector,
) -> Vec<EventMetadata> {
    let estimator = SizeEstimator::new(scope.registry())
        .with_average_string_length(options.average_string_length)
        .with_nominal_collection_length(options.nominal_collection_length);

    let mut events = Vec::new();
    for decl in scope.root_types() {
        let Some(marker) = decl.marker(EVENT_TOPIC_MARKER) else {
            continue;
        };

        let Some(topic) = marker.str_field("topic") else {
            diagnostics.add(
                crate::diagnostics::Diagnostic::warning(format!(
                    "event '{}' has an event topic marker without a topic; skipped",
                    decl.qualified_name()
                ))
                .in_module(scope.root()),
            );
            continue;
        };

        events.push(build_event(decl, marker, topic, scope, options, docs, &estimator));
    }

    events
}

fn build_event(
    decl: &TypeDecl,
    marker: &Annotation,
    topic: &str,
    scope: &ResolutionScope,
    options: &GeneratorOptions,
    docs: &dyn DocLookup,
    estimator: &SizeEstimator<'_>,
) -> EventMetadata {
    let internal = marker.bool_field("internal").unwrap_or(false);
    let version = marker.str_field("version").unwrap_or("v1").to_string();
    let pluralize = marker.bool_field("pluralize").unwrap_or(false);

    let domain = marker
        .str_field("domain")
        .map(str::to_string)
        .or_else(|| derive_domain(&decl.namespace, &options.boundary_tokens))
        .unwrap_or_else(|| scope.root().to_string());

    let topic_segment = if pluralize && !is_plural(topic) {
        pluralize_en(topic)
    } else {
        topic.to_string()
    };

    let visibility = if internal { "internal" } else { "public" };
    let topic_string = format!(
        "{}.{}.{}.{}.{}",
        ENV_PLACEHOLDER,
        domain.to_lowercase(),
        visibility,
        topic_segment,
        version
    );

    let type_docs = docs.describe(&decl.qualified_name());

    let mut properties = Vec::new();
    let mut partition_keys = Vec::new();
    for property in &decl.properties {
        let (pk_marker, pk_source) = partition_key_marker(decl, &property.name, property);
        let order = pk_marker.and_then(|m| m.int_field("order"));

        let required = has_required_marker(decl, property) || !property.nullable;
        let description = type_docs.property(&property.name);
        let size = estimator.estimate(&property.ty);
        let complex = property_is_complex(&property.ty, scope);

        if let Some(source) = pk_source {
            partition_keys.push(PartitionKeyMetadata {
                name: property.name.clone(),
                type_name: property.ty.display(),
                description: description.clone(),
                order,
                source,
            });
        }

        properties.push(EventPropertyMetadata {
            name: property.name.clone(),
            type_name: property.ty.display(),
            ty: property.ty.clone(),
            required,
            complex,
            partition_key: pk_source.is_some(),
            partition_key_order: order,
            description,
            estimated_bytes: size.bytes,
            size_accurate: size.accurate,
            size_warning: size.warning,
        });
    }

    // Deterministic routing-key concatenation order: explicit order
    // first, unordered keys after, ties broken by name.
    partition_keys.sort_by(|a, b| {
        let ka = (a.order.unwrap_or(i64::MAX), a.name.as_str());
        let kb = (b.order.unwrap_or(i64::MAX), b.name.as_str());
        ka.cmp(&kb)
    });

    let deprecation = decl.marker(DEPRECATED_MARKER).map(|m| {
        m.str_field("message")
            .unwrap_or("This event is deprecated.")
            .to_string()
    });

    EventMetadata {
        name: decl.name.clone(),
        qualified_name: decl.qualified_name(),
        namespace: decl.namespace.clone(),
        topic: topic_string,
        domain,
        version,
        internal,
        summary: type_docs.summary,
        properties,
        partition_keys,
        deprecation,
    }
}

/// A property links to a schema page when it, or its collection
/// element, resolves to a complex declaration in the scope
fn property_is_complex(ty: &TypeRef, scope: &ResolutionScope) -> bool {
    let mut visited = HashSet::new();
    complex_decl_of(ty, scope.registry(), &mut visited).is_some()
}

/// Resolve a partition-key marker: property first, then the same-named
/// constructor parameter (record-style types carry markers there)
fn partition_key_marker<'a>(
    decl: &'a TypeDecl,
    name: &str,
    property: &'a herald_ir::PropertyDecl,
) -> (Option<&'a Annotation>, Option<PartitionKeySource>) {
    if let Some(m) = property.marker(PARTITION_KEY_MARKER) {
        return (Some(m), Some(PartitionKeySource::Property));
    }
    if let Some(param) = decl.ctor_param(name) {
        if let Some(m) = param.marker(PARTITION_KEY_MARKER) {
            return (Some(m), Some(PartitionKeySource::CtorParam));
        }
    }
    (None, None)
}

/// Required per explicit marker, property-first then constructor param
fn has_required_marker(decl: &TypeDecl, property: &herald_ir::PropertyDecl) -> bool {
    if property.marker(REQUIRED_MARKER).is_some() {
        return true;
    }
    decl.ctor_param(&property.name)
        .map(|p| p.marker(REQUIRED_MARKER).is_some())
        .unwrap_or(false)
}

/// Derive the routing domain from a namespace: the segment immediately
/// preceding the first boundary token (`Contracts`, `Events`, ...)
pub fn derive_domain(namespace: &str, boundary_tokens: &[String]) -> Option<String> {
    let segments: Vec<&str> = namespace.split('.').collect();
    for (i, segment) in segments.iter().enumerate() {
        if boundary_tokens
            .iter()
            .any(|t| t.eq_ignore_ascii_case(segment))
        {
            if i > 0 {
                return Some(segments[i - 1].to_string());
            }
            return None;
        }
    }
    None
}

fn is_plural(word: &str) -> bool {
    word.ends_with('s')
}

/// Simple English pluralization for topic segments
fn pluralize_en(word: &str) -> String {
    let lower = word.to_lowercase();
    if let Some(stem) = word.strip_suffix('y') {
        let before = stem.chars().last().unwrap_or('a');
        if !"aeiou".contains(before) {
            return format!("{}ies", stem);
        }
    }
    if lower.ends_with('x')
        || lower.ends_with('z')
        || lower.ends_with("ch")
        || lower.ends_with("sh")
    {
        return format!("{}es", word);
    }
    format!("{}s", word)
}
