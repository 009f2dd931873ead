//! herald-docgen: Documentation generator for integration-event contracts
//!
//! This crate generates event documentation from contract modules by:
//! - Loading module manifests (plus co-located dependencies) into
//!   isolated per-module resolution scopes
//! - Discovering event types through their topic marker and deriving
//!   routing metadata: topic string, partition keys, version
//! - Estimating representative payload sizes, cycle-safe
//! - Rendering one markdown document per event and per shared schema
//!   through overridable handlebars templates
//! - Emitting a deterministic hierarchical navigation manifest
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐    ┌──────────────────┐
//! │ *.module.json   │    │ *.docs.json      │
//! │ (type tables)   │    │ (descriptions)   │
//! └────────┬────────┘    └────────┬─────────┘
//!          │                      │
//!          └──────────┬───────────┘
//!                     ▼
//!             ┌───────────────┐
//!             │ EventMetadata │
//!             └───────┬───────┘
//!                     │
//!          ┌──────────┴──────────┐
//!          ▼                     ▼
//!    ┌──────────┐        ┌──────────────┐
//!    │ Markdown │        │ sidebar.json │
//!    └──────────┘        └──────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use herald_docgen::{Generator, GeneratorOptions};
//!
//! let options = GeneratorOptions {
//!     module_paths: vec!["contracts/billing.module.json".into()],
//!     output_dir: "docs/events".into(),
//!     ..GeneratorOptions::default()
//! };
//! let report = Generator::new(options).run().expect("generation failed");
//! println!("{} event(s) documented", report.event_count);
//! ```

// Core stages
pub mod classify;
pub mod diagnostics;
pub mod discover;
pub mod doclookup;
pub mod loader;
pub mod size;

// Output
pub mod pipeline;
pub mod render;
pub mod sidebar;
pub mod slug;

// Test utilities
pub mod testutil;

// Re-exports for convenience
pub use diagnostics::{Diagnostic, DiagnosticSeverity, DiagnosticsCollector, HeraldError, HeraldResult};
pub use discover::{
    discover_events, EventMetadata, EventPropertyMetadata, PartitionKeyMetadata,
    PartitionKeySource, SchemaMetadata, SchemaPropertyMetadata,
};
pub use doclookup::{DocLookup, FileDocs, NoDocs, TypeDocs, NO_DESCRIPTION};
pub use loader::{load_module, LoadedModule, ResolutionScope, TypeRegistry, DEFAULT_LOAD_TIMEOUT};
pub use classify::clean_type_name;
pub use pipeline::{GenerateReport, Generator, GeneratorOptions, DEFAULT_SIDEBAR_FILE, SCHEMAS_DIR};
pub use render::{copy_default_templates, TemplateRenderer};
pub use sidebar::{build_sidebar, SidebarItem};
pub use size::{PayloadSizeResult, SizeEstimator};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
