//! Declarative annotations on types, properties and constructor params
//!
//! Annotations are the marker mechanism of the contract IR: an event
//! topic marker, partition-key markers, required/deprecated markers.
//! They are matched by name and read through duck-typed field accessors,
//! never through a concrete marker type, so manifests produced by
//! different contract compilers interoperate.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single annotation field value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnnotationValue {
    /// Boolean field
    Bool(bool),
    /// Integer field
    Int(i64),
    /// String field
    String(String),
}

impl From<bool> for AnnotationValue {
    fn from(v: bool) -> Self {
        AnnotationValue::Bool(v)
    }
}

impl From<i64> for AnnotationValue {
    fn from(v: i64) -> Self {
        AnnotationValue::Int(v)
    }
}

impl From<&str> for AnnotationValue {
    fn from(v: &str) -> Self {
        AnnotationValue::String(v.to_string())
    }
}

impl From<String> for AnnotationValue {
    fn from(v: String) -> Self {
        AnnotationValue::String(v)
    }
}

/// A declarative marker with named fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Marker name as written in the contract source. May be qualified
    /// and may use either PascalCase or snake_case.
    pub name: String,
    /// Named fields, in declaration order
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub fields: IndexMap<String, AnnotationValue>,
}

impl Annotation {
    /// Create an annotation with no fields
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: IndexMap::new(),
        }
    }

    /// Add a field (builder style)
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<AnnotationValue>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Whether this annotation matches the given marker name.
    ///
    /// Matching is by simple name: any namespace qualification is
    /// stripped, underscores are ignored and the comparison is
    /// case-insensitive, so `Acme.Messaging.EventTopic`, `EventTopic`
    /// and `event_topic` all match the marker `event_topic`.
    pub fn matches(&self, marker: &str) -> bool {
        let simple = self.name.rsplit('.').next().unwrap_or(&self.name);
        normalize(simple) == normalize(marker)
    }

    /// Read a string field
    pub fn str_field(&self, key: &str) -> Option<&str> {
        match self.fields.get(key) {
            Some(AnnotationValue::String(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Read a boolean field
    pub fn bool_field(&self, key: &str) -> Option<bool> {
        match self.fields.get(key) {
            Some(AnnotationValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    /// Read an integer field
    pub fn int_field(&self, key: &str) -> Option<i64> {
        match self.fields.get(key) {
            Some(AnnotationValue::Int(i)) => Some(*i),
            _ => None,
        }
    }
}

fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Find the first annotation in a slice matching a marker name
pub fn find_marker<'a>(annotations: &'a [Annotation], marker: &str) -> Option<&'a Annotation> {
    annotations.iter().find(|a| a.matches(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_by_simple_name() {
        let a = Annotation::new("Acme.Messaging.EventTopic");
        assert!(a.matches("event_topic"));
        assert!(a.matches("EventTopic"));
        assert!(!a.matches("partition_key"));
    }

    #[test]
    fn test_matches_snake_and_pascal() {
        assert!(Annotation::new("partition_key").matches("PartitionKey"));
        assert!(Annotation::new("PartitionKey").matches("partition_key"));
    }

    #[test]
    fn test_duck_typed_fields() {
        let a = Annotation::new("event_topic")
            .with_field("topic", "payments")
            .with_field("internal", false)
            .with_field("order", 2i64);

        assert_eq!(a.str_field("topic"), Some("payments"));
        assert_eq!(a.bool_field("internal"), Some(false));
        assert_eq!(a.int_field("order"), Some(2));
        // Absent or mistyped fields read as None, never panic
        assert_eq!(a.str_field("missing"), None);
        assert_eq!(a.bool_field("topic"), None);
    }

    #[test]
    fn test_find_marker() {
        let anns = vec![
            Annotation::new("required"),
            Annotation::new("partition_key").with_field("order", 0i64),
        ];
        assert!(find_marker(&anns, "PartitionKey").is_some());
        assert!(find_marker(&anns, "deprecated").is_none());
    }
}
