//! Symbol model definitions
//!
//! Core types for representing the token under the cursor in a rule file.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::position::{Position, Range};

/// Leading character that marks a string identifier in a rule body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sigil {
    /// `$name` - the string itself
    Dollar,
    /// `#name` - match count
    Hash,
    /// `@name` - match offset
    At,
    /// `!name` - match length
    Bang,
}

impl Sigil {
    pub const ALL: [Sigil; 4] = [Sigil::Dollar, Sigil::Hash, Sigil::At, Sigil::Bang];

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '$' => Some(Self::Dollar),
            '#' => Some(Self::Hash),
            '@' => Some(Self::At),
            '!' => Some(Self::Bang),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Self::Dollar => '$',
            Self::Hash => '#',
            Self::At => '@',
            Self::Bang => '!',
        }
    }
}

impl fmt::Display for Sigil {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Classification of a symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SymbolKind {
    /// String identifier reference such as `$a`, `#a`, `@a` or `!a`
    Variable { sigil: Sigil },
    /// Bare identifier, treated as a rule name
    #[serde(rename = "rule")]
    RuleName,
}

impl SymbolKind {
    pub fn is_variable(&self) -> bool {
        matches!(self, Self::Variable { .. })
    }

    pub fn sigil(&self) -> Option<Sigil> {
        match self {
            Self::Variable { sigil } => Some(*sigil),
            Self::RuleName => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Variable { .. } => "variable",
            Self::RuleName => "rule",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Token under the cursor, with its classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    /// Identifier text without the sigil
    pub name: String,
    #[serde(flatten)]
    pub kind: SymbolKind,
    /// Range of the identifier text (sigil excluded)
    pub range: Range,
}

impl Symbol {
    pub fn new(name: impl Into<String>, kind: SymbolKind, range: Range) -> Self {
        Self {
            name: name.into(),
            kind,
            range,
        }
    }

    /// Source text as it appears in the rule, sigil included
    pub fn surface(&self) -> String {
        match self.kind.sigil() {
            Some(sigil) => format!("{}{}", sigil, self.name),
            None => self.name.clone(),
        }
    }
}

/// Line span of one `rule ... { ... }` block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleScope {
    pub start_line: u32,
    pub end_line: u32,
}

impl RuleScope {
    pub fn new(start_line: u32, end_line: u32) -> Self {
        Self {
            start_line,
            end_line: end_line.max(start_line),
        }
    }

    pub fn contains_line(&self, line: u32) -> bool {
        self.start_line <= line && line <= self.end_line
    }

    pub fn lines(&self) -> std::ops::RangeInclusive<u32> {
        self.start_line..=self.end_line
    }
}

/// Position inside a specific file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub file: PathBuf,
    pub position: Position,
}

impl Location {
    pub fn new(file: PathBuf, position: Position) -> Self {
        Self { file, position }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sigil_roundtrip() {
        for sigil in Sigil::ALL {
            assert_eq!(Sigil::from_char(sigil.as_char()), Some(sigil));
        }
        assert_eq!(Sigil::from_char('%'), None);
    }

    #[test]
    fn test_symbol_surface() {
        let range = Range::point(Position::new(0, 1));
        let var = Symbol::new(
            "hex_string",
            SymbolKind::Variable { sigil: Sigil::Hash },
            range,
        );
        assert_eq!(var.surface(), "#hex_string");

        let rule = Symbol::new("SyntaxExample", SymbolKind::RuleName, range);
        assert_eq!(rule.surface(), "SyntaxExample");
    }

    #[test]
    fn test_symbol_serializes_flat() {
        let symbol = Symbol::new(
            "a",
            SymbolKind::Variable {
                sigil: Sigil::Dollar,
            },
            Range::point(Position::new(2, 5)),
        );
        let json = serde_json::to_value(&symbol).unwrap();
        assert_eq!(json["kind"], "variable");
        assert_eq!(json["sigil"], "dollar");
        assert_eq!(json["name"], "a");
    }

    #[test]
    fn test_rule_scope_never_inverted() {
        let scope = RuleScope::new(10, 4);
        assert_eq!(scope.end_line, 10);
        assert!(scope.contains_line(10));
        assert!(!scope.contains_line(11));
    }
}
