//! Completion model for module member access

use serde::{Deserialize, Serialize};

/// Kind of a module schema entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionKind {
    /// Nested structure (any object node of the schema)
    Class,
    Enum,
    Property,
    Method,
}

impl CompletionKind {
    /// Map a schema leaf value to a kind; unrecognised leaves are treated as structures
    pub fn from_schema_value(value: &str) -> Self {
        match value {
            "enum" => Self::Enum,
            "property" => Self::Property,
            "method" => Self::Method,
            _ => Self::Class,
        }
    }
}

impl std::fmt::Display for CompletionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Class => write!(f, "class"),
            Self::Enum => write!(f, "enum"),
            Self::Property => write!(f, "property"),
            Self::Method => write!(f, "method"),
        }
    }
}

/// Single `(name, kind)` completion candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionItem {
    pub name: String,
    pub kind: CompletionKind,
}

impl CompletionItem {
    pub fn new(name: impl Into<String>, kind: CompletionKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}
