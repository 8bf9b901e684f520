//! Error types and diagnostics
//!
//! This module provides error handling and diagnostic reporting
//! for URL planning. Fatal problems (configuration errors, output path
//! collisions) are `MarkError`s; recoverable ones are collected as
//! `Diagnostic`s and returned alongside the plan.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for forge-mark operations
pub type MarkResult<T> = Result<T, MarkError>;

/// Main error type for forge-mark
#[derive(Debug, Error)]
pub enum MarkError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Two documents were planned onto the same output path
    #[error("Duplicate output path {path}: claimed by both `{first}` and `{second}`")]
    DuplicateOutputPath {
        path: String,
        first: String,
        second: String,
    },

    /// Reflection id does not belong to the tree
    #[error("Unknown reflection id: {0}")]
    UnknownReflection(usize),

    /// Directory walk failed
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML options could not be parsed
    #[error("Invalid options file: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid path
    #[error("Invalid path: {}", .0.display())]
    InvalidPath(PathBuf),
}

impl MarkError {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        MarkError::Config(message.into())
    }

    /// Create a duplicate output path error
    pub fn duplicate_path(
        path: impl Into<String>,
        first: impl Into<String>,
        second: impl Into<String>,
    ) -> Self {
        MarkError::DuplicateOutputPath {
            path: path.into(),
            first: first.into(),
            second: second.into(),
        }
    }

    /// Whether this error stems from configuration rather than the filesystem
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            MarkError::Config(_) | MarkError::DuplicateOutputPath { .. } | MarkError::Toml(_)
        )
    }
}

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticSeverity {
    /// Warning - the output is usable but likely not what was intended
    Warning,
    /// Info - informational message
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
}

/// A diagnostic message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Severity level
    pub severity: DiagnosticSeverity,
    /// Message
    pub message: String,
    /// Qualified name of the reflection concerned
    pub reflection: Option<String>,
    /// Diagnostic code (for categorization)
    pub code: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(severity: DiagnosticSeverity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            reflection: None,
            code: None,
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

    /// Attach the reflection this diagnostic is about
    pub fn on(mut self, reflection: impl Into<String>) -> Self {
        self.reflection = Some(reflection.into());
        self
    }

    /// Set the diagnostic code
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Format the diagnostic for display
    pub fn format(&self) -> String {
        let mut result = String::new();

        if let Some(ref reflection) = self.reflection {
            result.push_str(reflection);
            result.push_str(": ");
        }

        result.push_str(self.severity.display());

        if let Some(ref code) = self.code {
            result.push('[');
            result.push_str(code);
            result.push(']');
        }

        result.push_str(": ");
        result.push_str(&self.message);

        result
    }
}

/// Collector for diagnostics raised while planning
#[derive(Debug, Default, Clone)]
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

    /// Get all diagnostics
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Consume the collector
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
