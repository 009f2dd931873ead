//! Generator pipeline
//!
//! Ties the stages together: load each module into its own scope,
//! discover events, accumulate shared schemas, render everything in
//! memory, then write the whole output set in one pass. Rendering
//! before writing means a fatal error part-way through a run never
//! leaves a half-written documentation tree behind.

use crate::classify::collect_complex_types;
use crate::diagnostics::{Diagnostic, DiagnosticsCollector, HeraldError, HeraldResult};
use crate::discover::{describe_schema, discover_events, EventMetadata, SchemaMetadata, EVENT_TOPIC_MARKER};
use crate::doclookup::{companion_docs_path, FileDocs};
use crate::loader::{load_module, DEFAULT_LOAD_TIMEOUT};
use crate::render::TemplateRenderer;
use crate::sidebar;
use crate::slug::{event_file_name, schema_file_name};
use indexmap::IndexMap;
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Subdirectory of the output tree holding schema documents
pub const SCHEMAS_DIR: &str = "schemas";

/// Default navigation manifest file name
pub const DEFAULT_SIDEBAR_FILE: &str = "sidebar.json";

/// Everything configurable about one generator run
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    /// Module manifest files to document, in input order
    pub module_paths: Vec<PathBuf>,
    /// Extra documentation files beyond the per-module companions
    pub docs_paths: Vec<PathBuf>,
    /// Root of the generated documentation tree
    pub output_dir: PathBuf,
    /// Navigation manifest file name, relative to the output root
    pub sidebar_file: String,
    /// Directory of custom template overrides
    pub template_dir: Option<PathBuf>,
    /// Base URL for "view source" links; omitted when unset
    pub source_link_base: Option<String>,
    /// Namespace segments treated as contract boundaries when deriving
    /// domains and navigation sections
    pub boundary_tokens: Vec<String>,
    /// Assumed string payload length in bytes
    pub average_string_length: u64,
    /// Assumed collection element count
    pub nominal_collection_length: u64,
    /// Per-module load deadline
    pub load_timeout: Duration,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            module_paths: Vec::new(),
            docs_paths: Vec::new(),
            output_dir: PathBuf::from("docs"),
            sidebar_file: DEFAULT_SIDEBAR_FILE.to_string(),
            template_dir: None,
            source_link_base: None,
            boundary_tokens: vec!["contracts".to_string(), "events".to_string()],
            average_string_length: 20,
            nominal_collection_length: 4,
            load_timeout: DEFAULT_LOAD_TIMEOUT,
        }
    }
}

/// Outcome of a completed run
#[derive(Debug)]
pub struct GenerateReport {
    /// Number of event documents written
    pub event_count: usize,
    /// Number of schema documents written
    pub schema_count: usize,
    /// Every file written, output root first
    pub files_written: Vec<PathBuf>,
    /// Warnings and info collected along the way
    pub diagnostics: DiagnosticsCollector,
}

/// The documentation generator
pub struct Generator {
    options: GeneratorOptions,
}

impl Generator {
    /// Create a generator for one set of options
    pub fn new(options: GeneratorOptions) -> Self {
        Self { options }
    }

    /// Run the full pipeline and write the documentation tree
    pub fn run(&self) -> HeraldResult<GenerateReport> {
        if self.options.module_paths.is_empty() {
            return Err(HeraldError::NoInputModules);
        }

        let mut diagnostics = DiagnosticsCollector::new();

        let (renderer, template_warnings) =
            TemplateRenderer::new(self.options.template_dir.as_deref())?;
        for warning in template_warnings {
            diagnostics.warning(warning);
        }

        let docs = self.load_docs(&mut diagnostics);

        // path relative to output root -> rendered content
        let mut pending: Vec<(PathBuf, String)> = Vec::new();
        let mut all_events: Vec<EventMetadata> = Vec::new();
        let mut schemas: IndexMap<String, SchemaMetadata> = IndexMap::new();
        let mut event_files: HashSet<String> = HashSet::new();

        // Per-module failure isolation: a module that cannot be loaded
        // is skipped with a warning, and the run fails only when no
        // module at all could be processed. A module path that does
        // not exist stays fatal.
        let mut processed = 0usize;
        let mut first_failure: Option<HeraldError> = None;

        for path in &self.options.module_paths {
            let loaded = match load_module(path, self.options.load_timeout) {
                Ok(loaded) => loaded,
                Err(e @ HeraldError::ModuleNotFound(_)) => return Err(e),
                Err(e) => {
                    diagnostics.warning(format!(
                        "module {} could not be loaded and was skipped: {}",
                        path.display(),
                        e
                    ));
                    if first_failure.is_none() {
                        first_failure = Some(e);
                    }
                    continue;
                }
            };
            processed += 1;
            let module = loaded.scope.root().to_string();
            for warning in &loaded.warnings {
                diagnostics.add(Diagnostic::warning(warning.clone()).in_module(&module));
            }

            let events = discover_events(&loaded.scope, &self.options, &docs, &mut diagnostics);
            diagnostics.add(
                Diagnostic::info(format!("{} event(s) discovered", events.len()))
                    .in_module(&module),
            );

            // Schemas referenced by this module's events, described while
            // the scope is still alive
            let mut module_decls = IndexMap::new();
            for decl in loaded.scope.root_types() {
                if decl.marker(EVENT_TOPIC_MARKER).is_some() {
                    collect_complex_types(
                        &decl.properties,
                        loaded.scope.registry(),
                        &mut module_decls,
                    );
                }
            }
            for (clean, decl) in &module_decls {
                if !schemas.contains_key(clean) {
                    let schema = describe_schema(decl, clean.clone(), &loaded.scope, &docs);
                    schemas.insert(clean.clone(), schema);
                }
            }

            for event in events {
                let file = event_file_name(&event.name);
                if !event_files.insert(file.clone()) {
                    diagnostics.add(
                        Diagnostic::warning(format!(
                            "event '{}' produces the file name '{}' already used by another event; overwriting",
                            event.qualified_name, file
                        ))
                        .in_module(&module),
                    );
                }
                let content = renderer.render_event(&event, &self.options)?;
                pending.push((PathBuf::from(file), content));
                all_events.push(event);
            }
        }

        if processed == 0 {
            if let Some(e) = first_failure {
                return Err(e);
            }
        }

        let mut schema_list: Vec<SchemaMetadata> = schemas.into_values().collect();
        schema_list.sort_by(|a, b| a.clean_name.cmp(&b.clean_name));

        for schema in &schema_list {
            let content = renderer.render_schema(schema, &self.options)?;
            let file = PathBuf::from(SCHEMAS_DIR).join(schema_file_name(&schema.clean_name));
            pending.push((file, content));
        }

        let tree = sidebar::build_sidebar(&all_events, &schema_list, &self.options);
        pending.push((
            PathBuf::from(&self.options.sidebar_file),
            sidebar::to_json(&tree)?,
        ));

        let files_written = self.write_all(&pending)?;

        Ok(GenerateReport {
            event_count: all_events.len(),
            schema_count: schema_list.len(),
            files_written,
            diagnostics,
        })
    }

    /// Load every documentation source: companions of the input modules
    /// first, then explicitly supplied files
    fn load_docs(&self, diagnostics: &mut DiagnosticsCollector) -> FileDocs {
        let mut paths: Vec<PathBuf> = self
            .options
            .module_paths
            .iter()
            .map(|p| companion_docs_path(p))
            .collect();
        paths.extend(self.options.docs_paths.iter().cloned());

        let (docs, warnings) = FileDocs::load_all(&paths);
        for warning in warnings {
            diagnostics.warning(warning);
        }
        docs
    }

    fn write_all(&self, pending: &[(PathBuf, String)]) -> HeraldResult<Vec<PathBuf>> {
        let root = &self.options.output_dir;
        fs::create_dir_all(root)?;

        let mut written = Vec::with_capacity(pending.len());
        for (relative, content) in pending {
            let target = root.join(relative);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&target, content)?;
            written.push(target);
        }
        Ok(written)
    }
}
