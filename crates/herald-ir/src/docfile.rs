//! Companion documentation files
//!
//! A contract module may ship human-authored descriptions in a sibling
//! `<name>.docs.json` file: one entry per qualified type name with a
//! summary and per-property descriptions. Absence of the file, an
//! entry, or a property description is expected and never an error.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Documentation for one type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocEntry {
    /// Type-level summary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Property name -> description
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, String>,
}

/// A parsed companion documentation file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocFile {
    /// Qualified type name -> documentation
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub types: IndexMap<String, DocEntry>,
}

impl DocFile {
    /// Parse from a JSON string
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// Look up the entry for a qualified type name
    pub fn entry(&self, qualified: &str) -> Option<&DocEntry> {
        self.types.get(qualified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_lookup() {
        let json = r#"{
            "types": {
                "Acme.Billing.Contracts.PaymentReceived": {
                    "summary": "Raised when a payment settles.",
                    "properties": { "TenantId": "Owning tenant." }
                }
            }
        }"#;
        let docs = DocFile::from_json(json).unwrap();
        let entry = docs.entry("Acme.Billing.Contracts.PaymentReceived").unwrap();
        assert_eq!(entry.summary.as_deref(), Some("Raised when a payment settles."));
        assert_eq!(
            entry.properties.get("TenantId").map(String::as_str),
            Some("Owning tenant.")
        );
        assert!(docs.entry("Missing").is_none());
    }

    #[test]
    fn test_empty_file_is_valid() {
        let docs = DocFile::from_json("{}").unwrap();
        assert!(docs.types.is_empty());
    }
}
