//! Reference enumeration
//!
//! Three policies, picked from the symbol under the cursor:
//!
//! - wildcard variable (`$hex*`): every variable in the enclosing rule whose
//!   name extends the prefix by at least one identifier character
//! - plain variable: every `$ # @ !` occurrence of the exact name, whole document
//! - rule name: every substring occurrence, whole document

use regex::Regex;
use tokio_util::sync::CancellationToken;

use super::classifier::{classify, has_wildcard_suffix};
use super::scope::locate_scope;
use crate::error::AnalysisError;
use crate::infra::document::{Document, char_column};
use crate::models::position::Position;
use crate::models::symbol::{RuleScope, Symbol, SymbolKind};

const SIGILS: &str = r"[$#@!]";
const BOUNDARY: &str = r"(?:[^A-Za-z0-9_]|$)";

/// List the positions of every reference to the symbol under `pos`
///
/// Each position points at the first character of the name, one past the
/// sigil for variables. Results are ordered by line, then column.
pub fn find_references(
    doc: &Document,
    pos: Position,
    cancel: &CancellationToken,
) -> Result<Vec<Position>, AnalysisError> {
    let symbol = classify(doc, pos).ok_or(AnalysisError::no_symbol_at(pos.line, pos.character))?;

    let references = match symbol.kind {
        SymbolKind::Variable { .. } if has_wildcard_suffix(doc, &symbol) => {
            wildcard_references(doc, pos, &symbol, cancel)?
        }
        SymbolKind::Variable { .. } => variable_references(doc, &symbol, cancel)?,
        SymbolKind::RuleName => rule_references(doc, &symbol, cancel)?,
    };

    tracing::debug!(
        "Found {} references to '{}'",
        references.len(),
        symbol.surface()
    );
    Ok(references)
}

fn wildcard_references(
    doc: &Document,
    pos: Position,
    symbol: &Symbol,
    cancel: &CancellationToken,
) -> Result<Vec<Position>, AnalysisError> {
    let scope = match locate_scope(doc, pos.line, cancel) {
        Ok(scope) => scope,
        Err(AnalysisError::NoEnclosingScope { .. }) => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    let pattern = variable_pattern(&format!(
        "{}[A-Za-z0-9_]+",
        regex::escape(&symbol.name)
    ))?;
    scan(doc, Some(scope), &pattern, cancel)
}

fn variable_references(
    doc: &Document,
    symbol: &Symbol,
    cancel: &CancellationToken,
) -> Result<Vec<Position>, AnalysisError> {
    let pattern = variable_pattern(&regex::escape(&symbol.name))?;
    scan(doc, None, &pattern, cancel)
}

fn rule_references(
    doc: &Document,
    symbol: &Symbol,
    cancel: &CancellationToken,
) -> Result<Vec<Position>, AnalysisError> {
    let mut found = Vec::new();
    for (line_no, text) in doc.lines() {
        if cancel.is_cancelled() {
            return Err(AnalysisError::Cancelled);
        }
        found.extend(
            text.match_indices(symbol.name.as_str())
                .map(|(offset, _)| Position::new(line_no, char_column(text, offset))),
        );
    }
    Ok(found)
}

/// Sigil, name, then a non-identifier character or end of line
fn variable_pattern(name: &str) -> Result<Regex, AnalysisError> {
    Regex::new(&format!("{SIGILS}{name}{BOUNDARY}"))
        .map_err(|e| AnalysisError::Task(format!("invalid reference pattern: {}", e)))
}

fn scan(
    doc: &Document,
    scope: Option<RuleScope>,
    pattern: &Regex,
    cancel: &CancellationToken,
) -> Result<Vec<Position>, AnalysisError> {
    let mut found = Vec::new();
    for (line_no, text) in doc.lines() {
        if cancel.is_cancelled() {
            return Err(AnalysisError::Cancelled);
        }
        if scope.is_some_and(|scope| !scope.contains_line(line_no)) {
            continue;
        }
        // Sigils are single-byte, so the name starts one byte after the match
        found.extend(
            pattern
                .find_iter(text)
                .map(|m| Position::new(line_no, char_column(text, m.start() + 1))),
        );
    }
    Ok(found)
}
