//! Navigation manifest generation
//!
//! Groups every rendered event and schema into an ordered sidebar tree
//! for the documentation site. The tree is rebuilt from scratch each
//! run and its serialization is deterministic: identical input always
//! produces byte-identical output, because the manifest is committed
//! alongside the site.

use crate::diagnostics::HeraldResult;
use crate::discover::{EventMetadata, SchemaMetadata};
use crate::pipeline::GeneratorOptions;
use crate::slug::{event_link, schema_link};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Section label forced onto internal (domain-only) events
pub const DOMAIN_EVENTS_SECTION: &str = "Domain Events";

/// Label of the trailing schemas group
pub const SCHEMAS_LABEL: &str = "Schemas";

/// A node in the navigation tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SidebarItem {
    /// Display text
    pub label: String,
    /// Link target; group nodes may omit it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Whether the node starts collapsed
    pub collapsed: bool,
    /// Ordered children; leaves have none
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<SidebarItem>,
}

impl SidebarItem {
    /// A leaf page with a link
    pub fn page(label: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            link: Some(link.into()),
            collapsed: false,
            items: vec![],
        }
    }

    /// A group node with children
    pub fn group(label: impl Into<String>, items: Vec<SidebarItem>) -> Self {
        Self {
            label: label.into(),
            link: None,
            collapsed: false,
            items,
        }
    }

    /// Mark the node collapsed
    pub fn collapsed(mut self) -> Self {
        self.collapsed = true;
        self
    }
}

/// Build the full navigation tree for a run's events and schemas
pub fn build_sidebar(
    events: &[EventMetadata],
    schemas: &[SchemaMetadata],
    options: &GeneratorOptions,
) -> Vec<SidebarItem> {
    // subdomain -> section -> sorted (label, link) pairs
    let mut grouped: BTreeMap<String, BTreeMap<String, Vec<(String, String)>>> = BTreeMap::new();

    for event in events {
        let (subdomain, mut section) = split_namespace(&event.namespace, &options.boundary_tokens);
        if event.internal {
            section = DOMAIN_EVENTS_SECTION.to_string();
        }
        grouped
            .entry(subdomain)
            .or_default()
            .entry(section)
            .or_default()
            .push((event.name.clone(), event_link(&event.name)));
    }

    let mut tree = Vec::new();
    for (subdomain, sections) in grouped {
        let mut children = Vec::new();

        let single_unnamed = sections.len() == 1 && sections.keys().next().map(String::as_str) == Some("");
        for (section, mut pages) in sections {
            pages.sort();
            let leaves: Vec<SidebarItem> = pages
                .into_iter()
                .map(|(label, link)| SidebarItem::page(label, link))
                .collect();

            if single_unnamed || section.is_empty() {
                children.extend(leaves);
            } else {
                children.push(SidebarItem::group(section, leaves));
            }
        }

        tree.push(SidebarItem::group(subdomain, children));
    }

    if !schemas.is_empty() {
        tree.push(schemas_group(schemas, options));
    }

    tree
}

/// Trailing top-level group listing every shared schema by subdomain
fn schemas_group(schemas: &[SchemaMetadata], options: &GeneratorOptions) -> SidebarItem {
    let mut grouped: BTreeMap<String, Vec<(String, String)>> = BTreeMap::new();
    for schema in schemas {
        let (subdomain, _) = split_namespace(&schema.namespace, &options.boundary_tokens);
        grouped
            .entry(subdomain)
            .or_default()
            .push((schema.clean_name.clone(), schema_link(&schema.clean_name)));
    }

    let children = grouped
        .into_iter()
        .map(|(subdomain, mut pages)| {
            pages.sort();
            SidebarItem::group(
                subdomain,
                pages
                    .into_iter()
                    .map(|(label, link)| SidebarItem::page(label, link))
                    .collect(),
            )
        })
        .collect();

    SidebarItem::group(SCHEMAS_LABEL, children).collapsed()
}

/// Split a namespace into `(subdomain, section)`.
///
/// The subdomain is the second namespace segment; the section is
/// everything between the subdomain and the first boundary token
/// (empty when they are adjacent). Namespaces that do not follow the
/// convention fall back to the last meaningful segment - a best-effort
/// heuristic, which is why the boundary tokens are configurable.
pub fn split_namespace(namespace: &str, boundary_tokens: &[String]) -> (String, String) {
    let segments: Vec<&str> = namespace.split('.').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        return (String::new(), String::new());
    }

    let boundary = segments
        .iter()
        .position(|segment| {
            boundary_tokens
                .iter()
                .any(|t| t.eq_ignore_ascii_case(segment))
        })
        .unwrap_or(segments.len());

    let subdomain = if boundary > 1 {
        segments[1].to_string()
    } else {
        segments[0].to_string()
    };

    let section = if boundary > 2 {
        segments[2..boundary].join(".")
    } else {
        String::new()
    };

    (subdomain, section)
}

/// Serialize the navigation manifest
pub fn to_json(items: &[SidebarItem]) -> HeraldResult<String> {
    let mut out = serde_json::to_string_pretty(items)?;
    out.push('\n');
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{mock_event, mock_event_in, mock_schema};
    use pretty_assertions::assert_eq;

    fn options() -> GeneratorOptions {
        GeneratorOptions::default()
    }

    #[test]
    fn test_split_namespace() {
        let tokens = vec!["contracts".to_string(), "events".to_string()];
        assert_eq!(
            split_namespace("Acme.Billing.Contracts.Payments", &tokens),
            ("Billing".to_string(), String::new())
        );
        assert_eq!(
            split_namespace("Acme.Billing.Payments.Contracts", &tokens),
            ("Billing".to_string(), "Payments".to_string())
        );
        assert_eq!(
            split_namespace("Acme.Billing.Payments.Refunds.Contracts", &tokens),
            ("Billing".to_string(), "Payments.Refunds".to_string())
        );
    }

    #[test]
    fn test_empty_input_yields_empty_tree() {
        let tree = build_sidebar(&[], &[], &options());
        assert!(tree.is_empty());
        assert_eq!(to_json(&tree).unwrap(), "[]\n");
    }

    #[test]
    fn test_single_section_attaches_events_directly() {
        let events = vec![
            mock_event_in("PaymentReceived", "Acme.Billing.Contracts"),
            mock_event_in("PaymentFailed", "Acme.Billing.Contracts"),
        ];
        let tree = build_sidebar(&events, &[], &options());

        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].label, "Billing");
        // No intermediate section node
        assert_eq!(tree[0].items.len(), 2);
        assert_eq!(tree[0].items[0].label, "PaymentFailed");
        assert_eq!(tree[0].items[1].label, "PaymentReceived");
    }

    #[test]
    fn test_two_sections_under_one_subdomain() {
        let events = vec![
            mock_event_in("PaymentReceived", "Acme.Billing.Payments.Contracts"),
            mock_event_in("RefundIssued", "Acme.Billing.Refunds.Contracts"),
        ];
        let tree = build_sidebar(&events, &[], &options());

        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].label, "Billing");
        assert_eq!(tree[0].items.len(), 2);
        assert_eq!(tree[0].items[0].label, "Payments");
        assert_eq!(tree[0].items[1].label, "Refunds");
        assert_eq!(tree[0].items[0].items[0].label, "PaymentReceived");
    }

    #[test]
    fn test_internal_events_forced_into_domain_events() {
        let mut event = mock_event_in("StockAdjusted", "Acme.Warehouse.Picking.Contracts");
        event.internal = true;
        let tree = build_sidebar(&[event], &[], &options());

        assert_eq!(tree[0].label, "Warehouse");
        assert_eq!(tree[0].items[0].label, DOMAIN_EVENTS_SECTION);
    }

    #[test]
    fn test_schemas_group_is_trailing_and_sorted() {
        let events = vec![mock_event("PaymentReceived")];
        let schemas = vec![
            mock_schema("Money", "Acme.Billing.Contracts"),
            mock_schema("Address", "Acme.Billing.Contracts"),
        ];
        let tree = build_sidebar(&events, &schemas, &options());

        let last = tree.last().unwrap();
        assert_eq!(last.label, SCHEMAS_LABEL);
        assert!(last.collapsed);
        let billing = &last.items[0];
        assert_eq!(billing.items[0].label, "Address");
        assert_eq!(billing.items[1].label, "Money");
        assert_eq!(billing.items[1].link.as_deref(), Some("schemas/money"));
    }

    #[test]
    fn test_determinism() {
        let events = vec![
            mock_event_in("B", "Acme.Two.Contracts"),
            mock_event_in("A", "Acme.One.Contracts"),
        ];
        let first = to_json(&build_sidebar(&events, &[], &options())).unwrap();
        let second = to_json(&build_sidebar(&events, &[], &options())).unwrap();
        assert_eq!(first, second);
    }
}
