//! Definition lookup

use tokio_util::sync::CancellationToken;

use super::classifier::classify;
use super::scope::locate_scope;
use crate::error::AnalysisError;
use crate::infra::document::{Document, char_column};
use crate::models::position::Position;
use crate::models::symbol::{Symbol, SymbolKind};

/// Find the declaration of the symbol under `pos`
///
/// Variables are looked up inside the enclosing rule as `$name =`; the
/// returned column points at the name, one past the `$`. Rule names are
/// looked up on `rule` header lines above the query line.
///
/// `Ok(None)` means the symbol is valid but has no declaration in reach.
pub fn find_definition(
    doc: &Document,
    pos: Position,
    cancel: &CancellationToken,
) -> Result<Option<Position>, AnalysisError> {
    let symbol = classify(doc, pos).ok_or(AnalysisError::no_symbol_at(pos.line, pos.character))?;

    let found = match symbol.kind {
        SymbolKind::Variable { .. } => variable_definition(doc, pos, &symbol, cancel)?,
        SymbolKind::RuleName => rule_definition(doc, pos, &symbol, cancel)?,
    };

    match found {
        Some(def) => tracing::debug!(
            "Definition of '{}' at {}:{}",
            symbol.surface(),
            def.line,
            def.character
        ),
        None => tracing::debug!("No definition for '{}'", symbol.surface()),
    }
    Ok(found)
}

fn variable_definition(
    doc: &Document,
    pos: Position,
    symbol: &Symbol,
    cancel: &CancellationToken,
) -> Result<Option<Position>, AnalysisError> {
    let scope = match locate_scope(doc, pos.line, cancel) {
        Ok(scope) => scope,
        Err(AnalysisError::NoEnclosingScope { line }) => {
            tracing::debug!("'{}' at line {} is outside any rule", symbol.name, line);
            return Ok(None);
        }
        Err(e) => return Err(e),
    };

    let declaration = format!("${} =", symbol.name);
    for line_no in scope.lines() {
        if cancel.is_cancelled() {
            return Err(AnalysisError::Cancelled);
        }
        let Some(text) = doc.line(line_no) else {
            break;
        };
        if let Some(offset) = text.find(&declaration) {
            return Ok(Some(Position::new(line_no, char_column(text, offset) + 1)));
        }
    }
    Ok(None)
}

fn rule_definition(
    doc: &Document,
    pos: Position,
    symbol: &Symbol,
    cancel: &CancellationToken,
) -> Result<Option<Position>, AnalysisError> {
    for (line_no, text) in doc.lines().take(pos.line as usize) {
        if cancel.is_cancelled() {
            return Err(AnalysisError::Cancelled);
        }
        if !text.starts_with("rule") {
            continue;
        }
        if let Some(offset) = text.find(&symbol.name) {
            return Ok(Some(Position::new(line_no, char_column(text, offset))));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::PEEK_RULES;

    fn definition(doc: &Document, line: u32, column: u32) -> Option<Position> {
        find_definition(doc, Position::new(line, column), &CancellationToken::new()).unwrap()
    }

    fn word_at(doc: &Document, pos: Position) -> String {
        let range = doc.word_range_at(pos).unwrap();
        doc.text_in(range).unwrap()
    }

    #[test]
    fn test_rule_definition() {
        let doc = Document::new(PEEK_RULES);
        // "SyntaxExample" used in a condition on line 42 (1-indexed)
        let def = definition(&doc, 41, 14).unwrap();
        assert_eq!(def.line, 5);
        assert_eq!(word_at(&doc, def), "SyntaxExample");
    }

    #[test]
    fn test_variable_definition() {
        let doc = Document::new(PEEK_RULES);
        // "$hex_string" in the condition on line 25 (1-indexed)
        let def = definition(&doc, 24, 14).unwrap();
        assert_eq!(def, Position::new(19, 9));
        assert_eq!(word_at(&doc, def), "hex_string");
    }

    #[test]
    fn test_definition_column_skips_sigil() {
        let doc = Document::new("rule R {\n  strings:\n    $a = \"x\"\n  condition:\n    #a > 2\n}");
        let def = definition(&doc, 4, 5).unwrap();
        assert_eq!(def, Position::new(2, 5));
        assert_eq!(doc.char_before(def), Some('$'));
    }

    #[test]
    fn test_variable_resolves_inside_own_rule_only() {
        let doc = Document::new(
            "rule A {\n  strings:\n    $s = \"a\"\n  condition:\n    $s\n}\n\
             rule B {\n  strings:\n    $s = \"b\"\n  condition:\n    $s\n}",
        );
        assert_eq!(definition(&doc, 10, 5), Some(Position::new(8, 5)));
        assert_eq!(definition(&doc, 4, 5), Some(Position::new(2, 5)));
    }

    #[test]
    fn test_prefix_name_is_not_a_declaration() {
        let doc = Document::new(
            "rule R {\n  strings:\n    $hex_string2 = { AA }\n    $hex_string = { BB }\n  condition:\n    $hex_string\n}",
        );
        assert_eq!(definition(&doc, 5, 6), Some(Position::new(3, 5)));
    }

    #[test]
    fn test_variable_outside_rule_has_no_definition() {
        let doc = Document::new("$a = \"loose\"\nrule R {\n}");
        assert_eq!(definition(&doc, 0, 1), None);
    }

    #[test]
    fn test_undeclared_variable() {
        let doc = Document::new("rule R {\n  condition:\n    $missing\n}");
        assert_eq!(definition(&doc, 2, 6), None);
    }

    #[test]
    fn test_rule_name_only_searches_lines_above() {
        let doc = Document::new("rule Later {\n  condition: true\n}");
        assert_eq!(definition(&doc, 0, 6), None);

        let doc = Document::new("rule Uses {\n  condition: Later\n}\nrule Later {\n}");
        assert_eq!(definition(&doc, 1, 14), None);
    }

    #[test]
    fn test_rule_definition_skips_non_header_lines() {
        let doc = Document::new(
            "// Helper matches Base payloads\n\
             rule Early {\n  condition: Base\n}\n\
             rule Base {\n  condition: true\n}\n\
             rule Derived {\n  condition: Base\n}",
        );
        let def = definition(&doc, 8, 14).unwrap();
        assert_eq!(def, Position::new(4, 5));
        assert_eq!(word_at(&doc, def), "Base");
    }

    #[test]
    fn test_no_symbol_is_an_error() {
        let doc = Document::new("rule R {\n\n}");
        let err = find_definition(&doc, Position::new(1, 0), &CancellationToken::new())
            .unwrap_err();
        assert!(matches!(err, AnalysisError::NoSymbolAtPosition { .. }));
    }

    #[test]
    fn test_single_line_rule() {
        let doc = Document::new(
            "rule R { strings: $hex_string = {AA BB} condition: $hex_string }",
        );
        assert_eq!(definition(&doc, 0, 55), Some(Position::new(0, 19)));
    }
}
