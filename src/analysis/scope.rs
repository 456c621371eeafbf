//! Rule block delimitation

use tokio_util::sync::CancellationToken;

use crate::error::AnalysisError;
use crate::infra::document::Document;
use crate::models::symbol::RuleScope;

/// Rule headers start at column 0 with the keyword and a space
const RULE_START: &str = "rule ";

pub(crate) fn is_rule_start(line: &str) -> bool {
    line.starts_with(RULE_START)
}

/// Closing brace of a rule: an unindented `}` with nothing after it but whitespace
pub(crate) fn is_rule_end(line: &str) -> bool {
    line.trim_end() == "}"
}

/// Find the rule block that contains `line`
///
/// Scans upward for the nearest rule header, then downward from the header
/// for the closing brace. A rule that is never closed extends to the last
/// line of the document.
pub fn locate_scope(
    doc: &Document,
    line: u32,
    cancel: &CancellationToken,
) -> Result<RuleScope, AnalysisError> {
    let from = line.min(doc.last_line());

    let mut start = None;
    for idx in (0..=from).rev() {
        if cancel.is_cancelled() {
            return Err(AnalysisError::Cancelled);
        }
        if doc.line(idx).is_some_and(is_rule_start) {
            start = Some(idx);
            break;
        }
    }
    let Some(start) = start else {
        return Err(AnalysisError::NoEnclosingScope { line });
    };

    let mut end = doc.last_line();
    for (idx, text) in doc.lines().skip(start as usize) {
        if cancel.is_cancelled() {
            return Err(AnalysisError::Cancelled);
        }
        if is_rule_end(text) {
            end = idx;
            break;
        }
    }

    tracing::debug!("Rule scope for line {}: {}..={}", line, start, end);
    Ok(RuleScope::new(start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULES: &str = "\
import \"pe\"

rule First
{
    strings:
        $a = \"first\"
    condition:
        $a
}

rule Second : tag
{
    strings:
        $a = \"second\"
    condition:
        $a
    }
}
";

    fn scope(doc: &Document, line: u32) -> Result<RuleScope, AnalysisError> {
        locate_scope(doc, line, &CancellationToken::new())
    }

    #[test]
    fn test_scope_of_first_rule() {
        let doc = Document::new(RULES);
        let found = scope(&doc, 7).unwrap();
        assert_eq!(found, RuleScope::new(2, 8));
    }

    #[test]
    fn test_indented_brace_does_not_close_rule() {
        let doc = Document::new(RULES);
        let found = scope(&doc, 13).unwrap();
        assert_eq!(found, RuleScope::new(10, 17));
    }

    #[test]
    fn test_header_line_is_its_own_start() {
        let doc = Document::new(RULES);
        assert_eq!(scope(&doc, 10).unwrap().start_line, 10);
    }

    #[test]
    fn test_no_enclosing_rule() {
        let doc = Document::new(RULES);
        let err = scope(&doc, 0).unwrap_err();
        assert!(matches!(err, AnalysisError::NoEnclosingScope { line: 0 }));
    }

    #[test]
    fn test_keyword_must_start_line() {
        let doc = Document::new("  rule Indented {\n  $a\n}\nprivate rule P {\n}");
        assert!(scope(&doc, 1).is_err());
        assert!(scope(&doc, 4).is_err());
    }

    #[test]
    fn test_unclosed_rule_runs_to_end() {
        let doc = Document::new("rule Open {\n  strings:\n    $a = \"x\"");
        assert_eq!(scope(&doc, 2).unwrap(), RuleScope::new(0, 2));
    }

    #[test]
    fn test_line_past_end_is_clamped() {
        let doc = Document::new("rule R {\n}");
        assert_eq!(scope(&doc, 40).unwrap(), RuleScope::new(0, 1));
    }

    #[test]
    fn test_cancelled_scan() {
        let doc = Document::new(RULES);
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = locate_scope(&doc, 7, &cancel).unwrap_err();
        assert!(err.is_cancelled());
    }
}
