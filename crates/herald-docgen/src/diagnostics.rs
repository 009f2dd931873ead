//! Error types and diagnostics
//!
//! Fatal conditions surface as `HeraldError`; everything recoverable is
//! collected as a diagnostic and printed at the end of the run without
//! changing the exit status.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for herald operations
pub type HeraldResult<T> = Result<T, HeraldError>;

/// Fatal errors that abort a generator run
#[derive(Debug, Error)]
pub enum HeraldError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// No input modules were supplied
    #[error("no input modules provided")]
    NoInputModules,

    /// A referenced input module file does not exist
    #[error("module file not found: {0}")]
    ModuleNotFound(PathBuf),

    /// A module manifest could not be parsed
    #[error("invalid manifest {file}: {message}")]
    Manifest { file: PathBuf, message: String },

    /// A built-in default template failed to register
    #[error("default template '{0}' could not be registered: {1}")]
    TemplateMissing(String, String),

    /// Template rendering error
    #[error("template error: {0}")]
    Template(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl HeraldError {
    /// Create a manifest error
    pub fn manifest(file: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        HeraldError::Manifest {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        HeraldError::Config(message.into())
    }
}

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticSeverity {
    /// Warning - generation continues
    Warning,
    /// Informational message
    Info,
}

impl DiagnosticSeverity {
    /// Get display string
    pub fn display(&self) -> &'static str {
        match self {
            DiagnosticSeverity::Warning => "warning",
            DiagnosticSeverity::Info => "info",
        }
    }

    /// Get ANSI color code
    pub fn color(&self) -> &'static str {
        match self {
            DiagnosticSeverity::Warning => "\x1b[33m", // Yellow
            DiagnosticSeverity::Info => "\x1b[34m",    // Blue
        }
    }
}

/// A diagnostic message, optionally tied to a module
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Severity level
    pub severity: DiagnosticSeverity,
    /// Message
    pub message: String,
    /// Module the diagnostic refers to
    pub module: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(severity: DiagnosticSeverity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            module: None,
        }
    }

    /// Create a warning diagnostic
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(DiagnosticSeverity::Warning, message)
    }

    /// Create an info diagnostic
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(DiagnosticSeverity::Info, message)
    }

    /// Attach the originating module name
    pub fn in_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    /// Format the diagnostic for display
    pub fn format(&self) -> String {
        let mut result = String::new();
        if let Some(ref module) = self.module {
            result.push_str(module);
            result.push_str(": ");
        }
        result.push_str(self.severity.display());
        result.push_str(": ");
        result.push_str(&self.message);
        result
    }

    /// Format with ANSI colors
    pub fn format_colored(&self) -> String {
        let mut result = String::new();
        let reset = "\x1b[0m";

        if let Some(ref module) = self.module {
            result.push_str("\x1b[2m");
            result.push_str(module);
            result.push_str(reset);
            result.push_str(": ");
        }

        result.push_str(self.severity.color());
        result.push_str(self.severity.display());
        result.push_str(reset);
        result.push_str(": ");
        result.push_str(&self.message);

        result
    }
}

/// Collector for diagnostics during a generator run
#[derive(Debug, Default)]
pub struct DiagnosticsCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticsCollector {
    /// Create a new collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic
    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Add a warning
    pub fn warning(&mut self, message: impl Into<String>) {
        self.add(Diagnostic::warning(message));
    }

    /// Add an info message
    pub fn info(&mut self, message: impl Into<String>) {
        self.add(Diagnostic::info(message));
    }

    /// Get all diagnostics
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Get warning count
    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == DiagnosticSeverity::Warning)
            .count()
    }

    /// Merge another collector's diagnostics into this one
    pub fn extend(&mut self, other: DiagnosticsCollector) {
        self.diagnostics.extend(other.diagnostics);
    }

    /// Print all diagnostics to stderr
    pub fn print(&self) {
        for diagnostic in &self.diagnostics {
            eprintln!("{}", diagnostic.format_colored());
        }
    }

    /// Print summary
    pub fn print_summary(&self) {
        let warnings = self.warning_count();
        if warnings > 0 {
            eprintln!("\n{} warning(s)", warnings);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_herald_error_display() {
        let err = HeraldError::manifest("billing.module.json", "unexpected token");
        assert!(err.to_string().contains("billing.module.json"));
        assert!(err.to_string().contains("unexpected token"));
    }

    #[test]
    fn test_diagnostic_format() {
        let diag = Diagnostic::warning("dependency missing").in_module("Acme.Billing.Contracts");
        assert!(diag.format().contains("Acme.Billing.Contracts"));
        assert!(diag.format().contains("warning"));
    }

    #[test]
    fn test_diagnostics_collector() {
        let mut collector = DiagnosticsCollector::new();
        collector.warning("warning 1");
        collector.info("info 1");

        assert_eq!(collector.warning_count(), 1);
        assert_eq!(collector.diagnostics().len(), 2);
    }
}
