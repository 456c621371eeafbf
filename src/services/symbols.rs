//! Symbol lookup service
//!
//! Loads the rule file, then runs the analysis on the blocking pool so long
//! scans never stall the runtime.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::analysis::{classify, find_definition, find_references, locate_scope};
use crate::error::AnalysisError;
use crate::infra::document::Document;
use crate::models::position::Position;
use crate::models::symbol::{Location, RuleScope, Symbol};

/// Symbol under the cursor together with the rule it sits in
#[derive(Debug, Clone, Serialize)]
pub struct SymbolInfo {
    pub symbol: Symbol,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<RuleScope>,
}

#[async_trait]
pub trait SymbolService: Send + Sync {
    async fn inspect(&self, file: &Path, pos: Position) -> Result<SymbolInfo, AnalysisError>;
    async fn definition(&self, file: &Path, pos: Position)
    -> Result<Option<Location>, AnalysisError>;
    async fn references(&self, file: &Path, pos: Position) -> Result<Vec<Location>, AnalysisError>;
}

pub struct DefaultSymbolService {
    cancel: CancellationToken,
}

impl DefaultSymbolService {
    pub fn new(cancel: CancellationToken) -> Self {
        Self { cancel }
    }

    async fn analyze<T, F>(&self, file: &Path, analysis: F) -> Result<T, AnalysisError>
    where
        F: FnOnce(&Document, &CancellationToken) -> Result<T, AnalysisError> + Send + 'static,
        T: Send + 'static,
    {
        let doc = Document::load(file).await?;
        let cancel = self.cancel.child_token();

        tokio::task::spawn_blocking(move || analysis(&doc, &cancel))
            .await
            .map_err(|e| AnalysisError::Task(e.to_string()))?
    }
}

#[async_trait]
impl SymbolService for DefaultSymbolService {
    async fn inspect(&self, file: &Path, pos: Position) -> Result<SymbolInfo, AnalysisError> {
        self.analyze(file, move |doc, cancel| {
            let symbol =
                classify(doc, pos).ok_or(AnalysisError::no_symbol_at(pos.line, pos.character))?;
            let scope = match locate_scope(doc, pos.line, cancel) {
                Ok(scope) => Some(scope),
                Err(AnalysisError::NoEnclosingScope { .. }) => None,
                Err(e) => return Err(e),
            };
            Ok(SymbolInfo { symbol, scope })
        })
        .await
    }

    async fn definition(
        &self,
        file: &Path,
        pos: Position,
    ) -> Result<Option<Location>, AnalysisError> {
        let path = file.to_path_buf();
        let found = self
            .analyze(file, move |doc, cancel| find_definition(doc, pos, cancel))
            .await?;
        Ok(found.map(|position| Location::new(path, position)))
    }

    async fn references(&self, file: &Path, pos: Position) -> Result<Vec<Location>, AnalysisError> {
        let path: PathBuf = file.to_path_buf();
        let found = self
            .analyze(file, move |doc, cancel| find_references(doc, pos, cancel))
            .await?;
        Ok(found
            .into_iter()
            .map(|position| Location::new(path.clone(), position))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::symbol::SymbolKind;
    use tempfile::TempDir;

    const RULES: &str = "rule Base\n{\n    strings:\n        $a = \"x\"\n        $a2 = \"y\"\n    condition:\n        $a and #a2 > 1\n}\n\nrule Derived\n{\n    condition:\n        Base\n}\n";

    async fn rule_file(temp: &TempDir) -> PathBuf {
        let path = temp.path().join("rules.yara");
        tokio::fs::write(&path, RULES).await.unwrap();
        path
    }

    #[tokio::test]
    async fn test_inspect_variable() {
        let temp = TempDir::new().unwrap();
        let file = rule_file(&temp).await;
        let service = DefaultSymbolService::new(CancellationToken::new());

        let info = service.inspect(&file, Position::new(6, 9)).await.unwrap();
        assert_eq!(info.symbol.name, "a");
        assert!(info.symbol.kind.is_variable());
        assert_eq!(info.scope, Some(RuleScope::new(0, 7)));
    }

    #[tokio::test]
    async fn test_definition_location() {
        let temp = TempDir::new().unwrap();
        let file = rule_file(&temp).await;
        let service = DefaultSymbolService::new(CancellationToken::new());

        let def = service.definition(&file, Position::new(12, 10)).await.unwrap().unwrap();
        assert_eq!(def.file, file);
        assert_eq!(def.position, Position::new(0, 5));

        let info = service.inspect(&file, Position::new(12, 10)).await.unwrap();
        assert_eq!(info.symbol.kind, SymbolKind::RuleName);
    }

    #[tokio::test]
    async fn test_references_locations() {
        let temp = TempDir::new().unwrap();
        let file = rule_file(&temp).await;
        let service = DefaultSymbolService::new(CancellationToken::new());

        let refs = service.references(&file, Position::new(6, 9)).await.unwrap();
        let lines: Vec<u32> = refs.iter().map(|loc| loc.position.line).collect();
        assert_eq!(lines, vec![3, 6]);
    }

    #[tokio::test]
    async fn test_cancelled_service() {
        let temp = TempDir::new().unwrap();
        let file = rule_file(&temp).await;
        let cancel = CancellationToken::new();
        cancel.cancel();
        let service = DefaultSymbolService::new(cancel);

        let err = service.references(&file, Position::new(6, 9)).await.unwrap_err();
        assert!(err.is_cancelled());
    }

    #[tokio::test]
    async fn test_missing_file() {
        let service = DefaultSymbolService::new(CancellationToken::new());
        let err = service
            .definition(Path::new("/nonexistent/rules.yara"), Position::new(0, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Io(_)));
    }
}
