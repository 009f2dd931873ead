//! Template rendering
//!
//! Events and schemas render through logic-light handlebars templates.
//! Two logical templates exist: `event` and `schema`. A custom template
//! directory may override either by file name (`event.md.hbs`,
//! `schema.md.hbs`); a missing or broken custom template silently falls
//! back to the built-in default, while a default that fails to register
//! is a fatal configuration error.

use crate::diagnostics::{HeraldError, HeraldResult};
use crate::discover::{EventMetadata, SchemaMetadata};
use crate::pipeline::GeneratorOptions;
use handlebars::Handlebars;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};

/// Logical name of the per-event template
pub const EVENT_TEMPLATE: &str = "event";
/// Logical name of the per-schema template
pub const SCHEMA_TEMPLATE: &str = "schema";

const DEFAULT_EVENT_TEMPLATE: &str = include_str!("../templates/event.md.hbs");
const DEFAULT_SCHEMA_TEMPLATE: &str = include_str!("../templates/schema.md.hbs");

/// Renderer holding the compiled templates for one run
pub struct TemplateRenderer {
    registry: Handlebars<'static>,
}

impl TemplateRenderer {
    /// Compile the templates, applying custom overrides when present.
    ///
    /// Returns the renderer plus warnings for custom templates that
    /// existed but failed to compile (those fall back to the default).
    pub fn new(custom_dir: Option<&Path>) -> HeraldResult<(Self, Vec<String>)> {
        let mut registry = Handlebars::new();
        // Output is markdown, not HTML
        registry.register_escape_fn(handlebars::no_escape);

        let mut warnings = Vec::new();
        for (name, default) in [
            (EVENT_TEMPLATE, DEFAULT_EVENT_TEMPLATE),
            (SCHEMA_TEMPLATE, DEFAULT_SCHEMA_TEMPLATE),
        ] {
            let custom = custom_dir
                .map(|dir| dir.join(format!("{}.md.hbs", name)))
                .filter(|path| path.exists());

            let mut use_default = true;
            if let Some(path) = custom {
                match registry.register_template_file(name, &path) {
                    Ok(()) => use_default = false,
                    Err(e) => warnings.push(format!(
                        "custom template {} could not be compiled, using default: {}",
                        path.display(),
                        e
                    )),
                }
            }

            if use_default {
                registry
                    .register_template_string(name, default)
                    .map_err(|e| HeraldError::TemplateMissing(name.to_string(), e.to_string()))?;
            }
        }

        Ok((Self { registry }, warnings))
    }

    /// Render the document for one event
    pub fn render_event(
        &self,
        event: &EventMetadata,
        options: &GeneratorOptions,
    ) -> HeraldResult<String> {
        let payload_bytes: u64 = event.properties.iter().map(|p| p.estimated_bytes).sum();
        let payload_accurate = event.properties.iter().all(|p| p.size_accurate);

        let context = json!({
            "event": event,
            "payloadBytes": payload_bytes,
            "payloadAccurate": payload_accurate,
            "sourceUrl": source_link(options, &event.namespace, &event.name),
        });

        self.registry
            .render(EVENT_TEMPLATE, &context)
            .map_err(|e| HeraldError::Template(e.to_string()))
    }

    /// Render the document for one shared schema
    pub fn render_schema(
        &self,
        schema: &SchemaMetadata,
        options: &GeneratorOptions,
    ) -> HeraldResult<String> {
        let context = json!({
            "schema": schema,
            "sourceUrl": source_link(options, &schema.namespace, &schema.name),
        });

        self.registry
            .render(SCHEMA_TEMPLATE, &context)
            .map_err(|e| HeraldError::Template(e.to_string()))
    }
}

/// Write the built-in default templates into a directory so they can be
/// forked and customized. Existing files are only replaced with
/// `overwrite` set.
pub fn copy_default_templates(dir: &Path, overwrite: bool) -> HeraldResult<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;

    let mut written = Vec::new();
    for (name, content) in [
        (EVENT_TEMPLATE, DEFAULT_EVENT_TEMPLATE),
        (SCHEMA_TEMPLATE, DEFAULT_SCHEMA_TEMPLATE),
    ] {
        let path = dir.join(format!("{}.md.hbs", name));
        if path.exists() && !overwrite {
            return Err(HeraldError::config(format!(
                "template {} already exists; pass the overwrite flag to replace it",
                path.display()
            )));
        }
        fs::write(&path, content)?;
        written.push(path);
    }

    Ok(written)
}

fn source_link(options: &GeneratorOptions, namespace: &str, name: &str) -> Option<String> {
    options.source_link_base.as_ref().map(|base| {
        format!(
            "{}/{}/{}",
            base.trim_end_matches('/'),
            namespace.replace('.', "/"),
            name
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::mock_event;
    use tempfile::TempDir;

    #[test]
    fn test_default_templates_render() {
        let (renderer, warnings) = TemplateRenderer::new(None).unwrap();
        assert!(warnings.is_empty());

        let options = GeneratorOptions::default();
        let event = mock_event("PaymentReceived");
        let doc = renderer.render_event(&event, &options).unwrap();
        assert!(doc.contains("# PaymentReceived"));
        assert!(doc.contains(&event.topic));
    }

    #[test]
    fn test_missing_custom_dir_falls_back() {
        let tmp = TempDir::new().unwrap();
        // Directory exists but has no template files
        let (renderer, warnings) = TemplateRenderer::new(Some(tmp.path())).unwrap();
        assert!(warnings.is_empty());

        let doc = renderer
            .render_event(&mock_event("OrderShipped"), &GeneratorOptions::default())
            .unwrap();
        assert!(doc.contains("# OrderShipped"));
    }

    #[test]
    fn test_custom_template_overrides_default() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("event.md.hbs"), "custom: {{event.name}}").unwrap();

        let (renderer, _) = TemplateRenderer::new(Some(tmp.path())).unwrap();
        let doc = renderer
            .render_event(&mock_event("OrderShipped"), &GeneratorOptions::default())
            .unwrap();
        assert_eq!(doc, "custom: OrderShipped");
    }

    #[test]
    fn test_broken_custom_template_warns_and_falls_back() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("event.md.hbs"), "{{#if unclosed}}").unwrap();

        let (renderer, warnings) = TemplateRenderer::new(Some(tmp.path())).unwrap();
        assert_eq!(warnings.len(), 1);

        let doc = renderer
            .render_event(&mock_event("OrderShipped"), &GeneratorOptions::default())
            .unwrap();
        assert!(doc.contains("# OrderShipped"));
    }

    #[test]
    fn test_copy_default_templates_respects_existing() {
        let tmp = TempDir::new().unwrap();
        let written = copy_default_templates(tmp.path(), false).unwrap();
        assert_eq!(written.len(), 2);

        // Second copy without overwrite refuses
        assert!(copy_default_templates(tmp.path(), false).is_err());
        // With overwrite it succeeds
        assert!(copy_default_templates(tmp.path(), true).is_ok());
    }
}
