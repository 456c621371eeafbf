//! Compile service: runs `yarac` on one file or on every rule file of a tree

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures::stream::{self, StreamExt};

use crate::error::{YaraLensError, YaraLensResult};
use crate::infra::compiler::Compiler;
use crate::infra::document::Document;
use crate::infra::file_filter::FileFilter;
use crate::models::config::{CompilerConfig, WorkspaceConfig};
use crate::models::diagnostic::CompileReport;

/// Per-file outcome of a batch compile, in path order
pub type BatchReport = Vec<(PathBuf, YaraLensResult<CompileReport>)>;

#[async_trait]
pub trait CompileService: Send + Sync {
    async fn compile_file(&self, file: &Path) -> YaraLensResult<CompileReport>;

    /// Compile up to `limit` rule files under `root`
    ///
    /// Missing compiler and rejected flags fail the whole batch; other
    /// failures are reported per file.
    async fn compile_all(&self, root: &Path, limit: usize) -> YaraLensResult<BatchReport>;

    fn compiler(&self) -> &Compiler;
}

pub struct DefaultCompileService {
    compiler: Compiler,
    workspace: WorkspaceConfig,
    max_concurrent: usize,
}

impl DefaultCompileService {
    pub fn new(compiler: &CompilerConfig, workspace: &WorkspaceConfig) -> Self {
        Self {
            compiler: Compiler::new(compiler),
            workspace: workspace.clone(),
            max_concurrent: crate::config::max_concurrent_compiles(),
        }
    }
}

#[async_trait]
impl CompileService for DefaultCompileService {
    async fn compile_file(&self, file: &Path) -> YaraLensResult<CompileReport> {
        let doc = Document::load(file).await?;
        let report = self.compiler.compile(file, &doc).await?;
        tracing::info!(
            "{}: {} errors, {} warnings",
            file.display(),
            report.error_count(),
            report.warning_count()
        );
        Ok(report)
    }

    async fn compile_all(&self, root: &Path, limit: usize) -> YaraLensResult<BatchReport> {
        let filter = FileFilter::for_workspace(root, &self.workspace);
        let files = filter.discover_rules(limit);

        let mut results: BatchReport = stream::iter(files)
            .map(|file| async move {
                let outcome = self.compile_file(&file).await;
                (file, outcome)
            })
            .buffer_unordered(self.max_concurrent.max(1))
            .collect()
            .await;

        let fatal = results.iter().position(|(_, outcome)| {
            matches!(outcome, Err(YaraLensError::Compile(e)) if e.is_configuration())
        });
        if let Some(index) = fatal
            && let (_, Err(e)) = results.swap_remove(index)
        {
            return Err(e);
        }

        results.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(results)
    }

    fn compiler(&self) -> &Compiler {
        &self.compiler
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::error::CompileError;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn service_with(body: &str) -> (TempDir, DefaultCompileService) {
        let bin = TempDir::new().unwrap();
        let script = bin.path().join("yarac");
        fs::write(&script, format!("#!/bin/sh\n{}\n", body)).unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

        let compiler = CompilerConfig {
            install_path: Some(bin.path().to_path_buf()),
            ..Default::default()
        };
        let service = DefaultCompileService::new(&compiler, &WorkspaceConfig::default());
        (bin, service)
    }

    fn write_rules(root: &Path) {
        fs::write(root.join("a.yara"), "rule a {\n  condition: true\n}\n").unwrap();
        fs::write(root.join("b.yar"), "rule b {\n  condition: false\n}\n").unwrap();
        fs::write(root.join("readme.md"), "# rules").unwrap();
    }

    #[tokio::test]
    async fn test_compile_all_reports_every_file() {
        let (_bin, service) = service_with("echo \"$1(2): warning: always false\" >&2");
        let rules = TempDir::new().unwrap();
        write_rules(rules.path());

        let batch = service.compile_all(rules.path(), 100).await.unwrap();
        let files: Vec<&PathBuf> = batch.iter().map(|(file, _)| file).collect();
        assert_eq!(files, vec![&rules.path().join("a.yara"), &rules.path().join("b.yar")]);

        for (_, outcome) in &batch {
            let report = outcome.as_ref().unwrap();
            assert_eq!(report.warning_count(), 1);
            assert!(report.success());
        }
    }

    #[tokio::test]
    async fn test_missing_compiler_fails_batch() {
        let (bin, _) = service_with("exit 0");
        fs::remove_file(bin.path().join("yarac")).unwrap();
        let compiler = CompilerConfig {
            install_path: Some(bin.path().to_path_buf()),
            ..Default::default()
        };
        let service = DefaultCompileService::new(&compiler, &WorkspaceConfig::default());
        let rules = TempDir::new().unwrap();
        write_rules(rules.path());

        let err = service.compile_all(rules.path(), 100).await.unwrap_err();
        assert!(matches!(
            err,
            YaraLensError::Compile(CompileError::CompilerNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_compile_file_missing_rule() {
        let (_bin, service) = service_with("exit 0");
        let err = service
            .compile_file(Path::new("/nonexistent/rule.yara"))
            .await
            .unwrap_err();
        assert!(matches!(err, YaraLensError::Analysis(_)));
    }
}
