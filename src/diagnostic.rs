use crate::source::SourceLocation;
use log::warn;
use serde::Serialize;

/// Diagnostic severity levels
///
/// The projection layer only ever reports `Fatal`: its diagnostics describe
/// gaps in the compiler itself rather than problems in the user's program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DiagnosticLevel {
    Fatal,
}

impl DiagnosticLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticLevel::Fatal => "fatal",
        }
    }
}

/// A single recorded report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub location: SourceLocation,
    pub message: String,
}

/// Projection errors.
///
/// `NotListed` and `NotYetImplemented` are deliberately worded apart: the first
/// means the kind was never anticipated, the second that it is a known gap.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProjectionError {
    #[error("unsupported {family} op '{op}'")]
    UnsupportedOperator {
        family: &'static str,
        op: String,
        location: SourceLocation,
    },
    #[error("unsupported assignment op '{op}'")]
    UnsupportedAssignment { op: String, location: SourceLocation },
    #[error("unsupported constant type '{ty}' for value '{value}'")]
    UnsupportedConstant {
        ty: String,
        value: String,
        location: SourceLocation,
    },
    #[error("enum must be 'int'")]
    EnumNotInteger { location: SourceLocation },
    #[error("unsupported field access type '{marker}'")]
    UnsupportedFieldAccess { marker: String, location: SourceLocation },
    #[error("unsupported type qualifier '{qualifier}'")]
    UnsupportedQualifier { qualifier: String, location: SourceLocation },
    #[error("{kind} is not listed!")]
    NotListed { kind: String, location: SourceLocation },
    #[error("{kind} is not yet implemented!")]
    NotYetImplemented { kind: String, location: SourceLocation },
    #[error("malformed tree: expected {expected} in {context}")]
    MalformedTree {
        expected: &'static str,
        context: &'static str,
        location: SourceLocation,
    },
}

impl ProjectionError {
    pub fn location(&self) -> &SourceLocation {
        match self {
            ProjectionError::UnsupportedOperator { location, .. } => location,
            ProjectionError::UnsupportedAssignment { location, .. } => location,
            ProjectionError::UnsupportedConstant { location, .. } => location,
            ProjectionError::EnumNotInteger { location } => location,
            ProjectionError::UnsupportedFieldAccess { location, .. } => location,
            ProjectionError::UnsupportedQualifier { location, .. } => location,
            ProjectionError::NotListed { location, .. } => location,
            ProjectionError::NotYetImplemented { location, .. } => location,
            ProjectionError::MalformedTree { location, .. } => location,
        }
    }

    pub(crate) fn not_yet_implemented(kind: impl Into<String>, location: SourceLocation) -> Self {
        ProjectionError::NotYetImplemented {
            kind: kind.into(),
            location,
        }
    }
}

/// Append-only collector for one projection pass.
///
/// There is no way to remove entries and recording never halts the pass; the
/// caller inspects `has_errors` once the whole unit has been walked.
#[derive(Debug, Default)]
pub struct DiagnosticEngine {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticEngine {
    pub fn new() -> Self {
        DiagnosticEngine::default()
    }

    pub fn record(&mut self, level: DiagnosticLevel, location: SourceLocation, message: impl Into<String>) {
        let message = message.into();
        warn!("{}: {} at {}", level.as_str(), message, location);
        self.diagnostics.push(Diagnostic {
            level,
            location,
            message,
        });
    }

    pub fn report_error(&mut self, error: ProjectionError) {
        let location = error.location().clone();
        self.record(DiagnosticLevel::Fatal, location, error.to_string());
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.level == DiagnosticLevel::Fatal)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

/// Configurable plain-text formatter for diagnostics
pub struct ErrorFormatter {
    pub use_colors: bool,
}

impl Default for ErrorFormatter {
    fn default() -> Self {
        ErrorFormatter { use_colors: true }
    }
}

impl ErrorFormatter {
    /// Format a single diagnostic as `fatal: message at file:line:col`
    pub fn format_diagnostic(&self, diag: &Diagnostic) -> String {
        let level_str = if self.use_colors {
            format!("\x1b[31m{}\x1b[0m", diag.level.as_str())
        } else {
            diag.level.as_str().to_string()
        };

        if diag.location.is_sentinel() {
            format!("{}: {}", level_str, diag.message)
        } else {
            format!("{}: {} at {}", level_str, diag.message, diag.location)
        }
    }

    pub fn format_diagnostics(&self, diagnostics: &[Diagnostic]) -> String {
        diagnostics
            .iter()
            .map(|diag| self.format_diagnostic(diag))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Print all diagnostics to stderr
    pub fn print_diagnostics(&self, diagnostics: &[Diagnostic]) {
        for diag in diagnostics {
            eprintln!("{}", self.format_diagnostic(diag));
        }
    }
}
