//! Diagnostic model for compiler output

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::position::Range;

/// Source tag attached to every diagnostic produced from compiler output
pub const COMPILER_SOURCE: &str = "yarac";

/// Problem marker anchored to a document range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub range: Range,
    pub severity: DiagnosticSeverity,
    pub message: String,
    pub source: String,
}

impl Diagnostic {
    pub fn new(range: Range, severity: DiagnosticSeverity, message: impl Into<String>) -> Self {
        Self {
            range,
            severity,
            message: message.into(),
            source: COMPILER_SOURCE.to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == DiagnosticSeverity::Error
    }

    pub fn display_line(&self) -> u32 {
        self.range.start.line + 1
    }

    pub fn display_column(&self) -> u32 {
        self.range.start.character + 1
    }

    pub fn display_end_line(&self) -> u32 {
        self.range.end.line + 1
    }
}

/// Severity levels reported by the rule compiler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
}

impl DiagnosticSeverity {
    /// Map the severity field of a compiler line; anything but `error` is a warning
    pub fn from_compiler_field(field: Option<&str>) -> Self {
        match field {
            Some("error") => Self::Error,
            _ => Self::Warning,
        }
    }
}

impl std::fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

impl std::str::FromStr for DiagnosticSeverity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" | "e" => Ok(Self::Error),
            "warning" | "warn" | "w" => Ok(Self::Warning),
            _ => Err(format!(
                "Unknown severity: '{}'. Valid: error, warning",
                s
            )),
        }
    }
}

/// Outcome of one compiler invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompileReport {
    pub file: PathBuf,
    pub diagnostics: Vec<Diagnostic>,
    pub exit_code: Option<i32>,
}

impl CompileReport {
    pub fn new(file: PathBuf, diagnostics: Vec<Diagnostic>, exit_code: Option<i32>) -> Self {
        Self {
            file,
            diagnostics,
            exit_code,
        }
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics.len() - self.error_count()
    }

    /// A compile passes when there are no error-level diagnostics and the
    /// compiler did not exit with a non-zero status
    ///
    /// A failing exit with only unmarked stderr lines is still a failure.
    pub fn success(&self) -> bool {
        self.error_count() == 0 && !matches!(self.exit_code, Some(code) if code != 0)
    }
}
