//! Module member completion service

use std::path::Path;

use async_trait::async_trait;

use crate::error::AnalysisError;
use crate::infra::document::Document;
use crate::infra::schema;
use crate::models::completion::CompletionItem;
use crate::models::config::CompletionConfig;
use crate::models::position::Position;

#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Members for the access path ending at `pos`
    ///
    /// `None` means completion does not apply here, e.g. the module is not
    /// imported while imports are required.
    async fn complete(
        &self,
        file: &Path,
        pos: Position,
    ) -> Result<Option<Vec<CompletionItem>>, AnalysisError>;
}

pub struct DefaultCompletionService {
    require_imports: bool,
}

impl DefaultCompletionService {
    pub fn new(config: &CompletionConfig) -> Self {
        Self {
            require_imports: config.require_imports,
        }
    }
}

#[async_trait]
impl CompletionService for DefaultCompletionService {
    async fn complete(
        &self,
        file: &Path,
        pos: Position,
    ) -> Result<Option<Vec<CompletionItem>>, AnalysisError> {
        let doc = Document::load(file).await?;
        Ok(schema::complete(&doc, pos, self.require_imports))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::completion::CompletionKind;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_complete_from_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("r.yara");
        tokio::fs::write(&file, "rule R {\n  condition:\n    math.\n}\n")
            .await
            .unwrap();

        let relaxed = DefaultCompletionService::new(&CompletionConfig::default());
        let items = relaxed.complete(&file, Position::new(2, 9)).await.unwrap().unwrap();
        let entropy = items.iter().find(|item| item.name == "entropy").unwrap();
        assert_eq!(entropy.kind, CompletionKind::Method);

        let strict = DefaultCompletionService::new(&CompletionConfig {
            require_imports: true,
        });
        assert!(strict.complete(&file, Position::new(2, 9)).await.unwrap().is_none());
    }
}
