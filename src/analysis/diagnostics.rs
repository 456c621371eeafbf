//! Compiler stderr parsing
//!
//! `yarac` reports problems as `<file>(<line>): <severity>: <message>`.
//! Each stderr line is parsed on its own against the compiled document.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CompileError;
use crate::infra::document::Document;
use crate::models::diagnostic::{Diagnostic, DiagnosticSeverity};
use crate::models::position::Range;

const FIELD_SEPARATOR: &str = ": ";
const UNKNOWN_OPTION: &str = "unknown option";

static LINE_MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\((\d+)\)").unwrap());

/// Turn one compiler stderr line into a diagnostic
///
/// Lines without a `(<line>)` marker yield `Ok(None)`, except for the
/// compiler's `unknown option` complaint which aborts the compile.
pub fn parse_line(line: &str, doc: &Document) -> Result<Option<Diagnostic>, CompileError> {
    let fields: Vec<&str> = line.trim().split(FIELD_SEPARATOR).collect();

    let Some(captures) = fields.first().and_then(|head| LINE_MARKER.captures(head)) else {
        if line.starts_with(UNKNOWN_OPTION) {
            return Err(CompileError::BadCompileFlag(line.to_string()));
        }
        tracing::debug!("Dropping compiler output: {}", line);
        return Ok(None);
    };

    let line_no = match captures[1].parse::<u32>() {
        Ok(n) if n > 0 => n - 1,
        _ => {
            tracing::debug!("Unusable line number in: {}", line);
            return Ok(None);
        }
    };
    let Some(first_column) = doc.first_non_whitespace(line_no) else {
        tracing::debug!("Line {} is outside the document: {}", line_no + 1, line);
        return Ok(None);
    };

    let severity = DiagnosticSeverity::from_compiler_field(fields.get(1).copied());
    let message = fields.last().copied().unwrap_or_default();

    Ok(Some(Diagnostic::new(
        Range::rest_of_line(line_no, first_column),
        severity,
        message,
    )))
}
