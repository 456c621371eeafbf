//! Response types for CLI output
//!
//! All positions are converted to 1-indexed lines and columns here.

use std::path::Path;

use serde::Serialize;

use crate::models::completion::CompletionItem;
use crate::models::diagnostic::{CompileReport, Diagnostic};
use crate::models::position::Position;
use crate::models::symbol::{Location, RuleScope, Symbol};

/// Location in a file (relative path by default)
#[derive(Debug, Clone, Serialize)]
pub struct LocationOutput {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

impl LocationOutput {
    /// Create from an absolute path, converting to relative if within root
    pub fn from_path(path: &Path, position: Position, root: &Path) -> Self {
        let file = path
            .strip_prefix(root)
            .map(|p| p.display().to_string())
            .unwrap_or_else(|_| path.display().to_string());
        let (line, column) = position.to_display();

        Self { file, line, column }
    }

    pub fn from_location(location: &Location, root: &Path) -> Self {
        Self::from_path(&location.file, location.position, root)
    }
}

/// Line span of a rule block
#[derive(Debug, Clone, Serialize)]
pub struct ScopeOutput {
    pub start_line: u32,
    pub end_line: u32,
}

impl From<RuleScope> for ScopeOutput {
    fn from(scope: RuleScope) -> Self {
        Self {
            start_line: scope.start_line + 1,
            end_line: scope.end_line + 1,
        }
    }
}

/// Response for find symbol command
#[derive(Debug, Clone, Serialize)]
pub struct SymbolOutput {
    pub name: String,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sigil: Option<String>,
    pub text: String,
    pub location: LocationOutput,
    pub end_location: LocationOutput,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<ScopeOutput>,
}

impl SymbolOutput {
    pub fn new(symbol: &Symbol, scope: Option<RuleScope>, file: &Path, root: &Path) -> Self {
        Self {
            name: symbol.name.clone(),
            kind: symbol.kind.to_string(),
            sigil: symbol.kind.sigil().map(|s| s.to_string()),
            text: symbol.surface(),
            location: LocationOutput::from_path(file, symbol.range.start, root),
            end_location: LocationOutput::from_path(file, symbol.range.end, root),
            rule: scope.map(ScopeOutput::from),
        }
    }
}

/// Response for find refs command
#[derive(Debug, Serialize)]
pub struct ReferencesResponse {
    pub count: usize,
    pub references: Vec<LocationOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truncated: Option<bool>,
}

/// Response for find def command
#[derive(Debug, Serialize)]
pub struct DefinitionResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definition: Option<LocationOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Diagnostic output
#[derive(Debug, Serialize)]
pub struct DiagnosticOutput {
    pub severity: String,
    pub message: String,
    pub line: u32,
    pub column: u32,
    pub end_line: u32,
    pub source: String,
}

impl From<&Diagnostic> for DiagnosticOutput {
    fn from(diagnostic: &Diagnostic) -> Self {
        Self {
            severity: diagnostic.severity.to_string(),
            message: diagnostic.message.clone(),
            line: diagnostic.display_line(),
            column: diagnostic.display_column(),
            end_line: diagnostic.display_end_line(),
            source: diagnostic.source.clone(),
        }
    }
}

/// Response for compile file command, also one entry of compile all
#[derive(Debug, Serialize)]
pub struct CompileResponse {
    pub file: String,
    pub compiled: bool,
    pub error_count: usize,
    pub warning_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    pub diagnostics: Vec<DiagnosticOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CompileResponse {
    pub fn from_report(report: &CompileReport, root: &Path) -> Self {
        Self {
            file: relative(&report.file, root),
            compiled: report.success(),
            error_count: report.error_count(),
            warning_count: report.warning_count(),
            exit_code: report.exit_code,
            diagnostics: report.diagnostics.iter().map(DiagnosticOutput::from).collect(),
            error: None,
        }
    }

    pub fn failed(file: &Path, error: String, root: &Path) -> Self {
        Self {
            file: relative(file, root),
            compiled: false,
            error_count: 0,
            warning_count: 0,
            exit_code: None,
            diagnostics: Vec::new(),
            error: Some(error),
        }
    }
}

/// Response for compile all command
#[derive(Debug, Serialize)]
pub struct BatchCompileResponse {
    pub root: String,
    pub file_count: usize,
    pub failed_count: usize,
    pub files: Vec<CompileResponse>,
}

/// Response for complete command
#[derive(Debug, Serialize)]
pub struct CompletionResponse {
    pub count: usize,
    pub items: Vec<CompletionItem>,
}

fn relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::diagnostic::DiagnosticSeverity;
    use crate::models::position::Range;
    use crate::models::symbol::{Sigil, SymbolKind};
    use std::path::PathBuf;

    #[test]
    fn test_locations_are_one_indexed_and_relative() {
        let loc = Location::new(PathBuf::from("/work/rules/a.yara"), Position::new(4, 8));
        let out = LocationOutput::from_location(&loc, Path::new("/work"));
        assert_eq!(out.file, "rules/a.yara");
        assert_eq!((out.line, out.column), (5, 9));
    }

    #[test]
    fn test_symbol_output() {
        let symbol = Symbol::new(
            "hex",
            SymbolKind::Variable { sigil: Sigil::Hash },
            Range::new(Position::new(2, 9), Position::new(2, 12)),
        );
        let out = SymbolOutput::new(
            &symbol,
            Some(RuleScope::new(0, 5)),
            Path::new("/work/a.yara"),
            Path::new("/work"),
        );
        assert_eq!(out.kind, "variable");
        assert_eq!(out.sigil.as_deref(), Some("#"));
        assert_eq!(out.text, "#hex");
        assert_eq!(out.location.column, 10);
        assert_eq!(out.rule.map(|r| (r.start_line, r.end_line)), Some((1, 6)));
    }

    #[test]
    fn test_compile_response() {
        let report = CompileReport::new(
            PathBuf::from("/work/a.yara"),
            vec![Diagnostic::new(
                Range::rest_of_line(8, 4),
                DiagnosticSeverity::Error,
                "unterminated string",
            )],
            Some(1),
        );
        let out = CompileResponse::from_report(&report, Path::new("/work"));
        assert!(!out.compiled);
        assert_eq!(out.error_count, 1);
        assert_eq!(out.diagnostics[0].line, 9);
        assert_eq!(out.diagnostics[0].column, 5);
        assert_eq!(out.diagnostics[0].severity, "error");
    }
}
