//! Symbol classification at a cursor position

use crate::infra::document::Document;
use crate::models::position::Position;
use crate::models::symbol::{Sigil, Symbol, SymbolKind};

/// Classify the word under `pos`
///
/// A word preceded by one of `$ # @ !` is a variable; everything else,
/// including a word starting at column 0, is a rule name.
/// Returns `None` when there is no identifier at the position.
pub fn classify(doc: &Document, pos: Position) -> Option<Symbol> {
    let range = doc.word_range_at(pos)?;
    let name = doc.text_in(range).filter(|text| !text.is_empty())?;

    let kind = match doc.char_before(range.start).and_then(Sigil::from_char) {
        Some(sigil) => SymbolKind::Variable { sigil },
        None => SymbolKind::RuleName,
    };

    Some(Symbol::new(name, kind, range))
}

/// Whether the character right after the symbol is a `*` wildcard
pub fn has_wildcard_suffix(doc: &Document, symbol: &Symbol) -> bool {
    doc.char_at(symbol.range.end) == Some('*')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_each_sigil() {
        let doc = Document::new("  $a and #a > 1 and @a[1] < 10 and !a[1] == 4");
        let cases = [
            (3, Sigil::Dollar),
            (10, Sigil::Hash),
            (21, Sigil::At),
            (36, Sigil::Bang),
        ];
        for (column, expected) in cases {
            let symbol = classify(&doc, Position::new(0, column)).unwrap();
            assert_eq!(symbol.name, "a", "column {}", column);
            assert_eq!(symbol.kind, SymbolKind::Variable { sigil: expected });
        }
    }

    #[test]
    fn test_classify_rule_name() {
        let doc = Document::new("rule SyntaxExample\n    condition: SyntaxExample");
        let symbol = classify(&doc, Position::new(1, 20)).unwrap();
        assert_eq!(symbol.name, "SyntaxExample");
        assert_eq!(symbol.kind, SymbolKind::RuleName);
    }

    #[test]
    fn test_word_at_column_zero_is_rule_name() {
        let doc = Document::new("Example and $a");
        let symbol = classify(&doc, Position::new(0, 0)).unwrap();
        assert_eq!(symbol.kind, SymbolKind::RuleName);
    }

    #[test]
    fn test_no_symbol_on_whitespace() {
        let doc = Document::new("rule a {\n\n}");
        assert!(classify(&doc, Position::new(1, 0)).is_none());
        assert!(classify(&doc, Position::new(0, 7)).is_none());
    }

    #[test]
    fn test_wildcard_suffix() {
        let doc = Document::new("        any of ($hex*) and $hex");
        let wildcard = classify(&doc, Position::new(0, 18)).unwrap();
        assert!(has_wildcard_suffix(&doc, &wildcard));

        let plain = classify(&doc, Position::new(0, 29)).unwrap();
        assert!(!has_wildcard_suffix(&doc, &plain));
    }
}
