//! Static YARA module schema for member completion
//!
//! The schema is a JSON tree embedded at build time. Objects are namespaces
//! (structures, arrays of structures); leaves are `"enum"`, `"property"` or
//! `"method"`.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::infra::document::{Document, is_ident_char};
use crate::models::completion::{CompletionItem, CompletionKind};
use crate::models::position::Position;

/// Modules the schema knows about, in `import` order of the docs
pub const MODULES: &[&str] = &[
    "pe", "elf", "cuckoo", "magic", "hash", "math", "dotnet", "time",
];

static SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    serde_json::from_str(include_str!("modules_schema.json")).unwrap_or_else(|e| {
        tracing::error!("Embedded module schema is invalid: {}", e);
        Value::Null
    })
});

static IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r#"^import "({})"\s*$"#, MODULES.join("|"))).unwrap()
});

/// Modules imported by `import "<module>"` lines
pub fn imported_modules(doc: &Document) -> Vec<String> {
    doc.lines()
        .filter_map(|(_, line)| IMPORT.captures(line))
        .map(|captures| captures[1].to_string())
        .collect()
}

/// Member-access path ending at the cursor, e.g. `["pe", "sections", ""]`
///
/// Takes the trailing run of identifier characters, dots and array
/// subscripts before the cursor; subscripts are dropped from each segment.
pub fn access_path(prefix: &str) -> Vec<String> {
    let start = prefix
        .char_indices()
        .rev()
        .find(|(_, c)| !(is_ident_char(*c) || matches!(c, '.' | '[' | ']')))
        .map_or(0, |(idx, c)| idx + c.len_utf8());

    prefix[start..]
        .split('.')
        .map(|segment| segment.split('[').next().unwrap_or_default().to_string())
        .collect()
}

/// List the members at the end of `path`
///
/// Every segment but the last must name a nested object; the last one is the
/// partial word being typed and does not filter the result. An unknown path
/// yields an empty list.
pub fn members(path: &[String]) -> Vec<CompletionItem> {
    let Some((_, parents)) = path.split_last() else {
        return Vec::new();
    };

    let mut node = &*SCHEMA;
    for segment in parents {
        match node.get(segment.as_str()) {
            Some(child @ Value::Object(_)) => node = child,
            _ => return Vec::new(),
        }
    }

    node.as_object().map(list_members).unwrap_or_default()
}

fn list_members(object: &Map<String, Value>) -> Vec<CompletionItem> {
    object
        .iter()
        .map(|(name, value)| {
            let kind = match value {
                Value::String(leaf) => CompletionKind::from_schema_value(leaf),
                _ => CompletionKind::Class,
            };
            CompletionItem::new(name, kind)
        })
        .collect()
}

/// Completion candidates at `pos`
///
/// With `require_imports`, returns `None` unless the root module of the
/// access path is imported by the document.
pub fn complete(doc: &Document, pos: Position, require_imports: bool) -> Option<Vec<CompletionItem>> {
    let prefix = doc.prefix_before(pos)?;
    let path = access_path(&prefix);

    if require_imports {
        let root = path.first()?;
        if !imported_modules(doc).iter().any(|module| module == root) {
            tracing::debug!("Module '{}' is not imported", root);
            return None;
        }
    }

    let items = members(&path);
    tracing::debug!("{} completions for {:?}", items.len(), path);
    Some(items)
}
