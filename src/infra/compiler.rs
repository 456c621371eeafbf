//! `yarac` process invocation
//!
//! The compiler is run as `yarac [flags...] <rule-file> <output>`, with the
//! compiled output going to a temporary file that is removed afterwards.
//! Diagnostics are read from stderr line by line while the child runs.

use std::path::{Path, PathBuf};
use std::process::{Command as StdCommand, Stdio};
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, ChildStderr, Command};

use crate::analysis::diagnostics::parse_line;
use crate::error::CompileError;
use crate::infra::document::Document;
use crate::models::config::CompilerConfig;
use crate::models::diagnostic::{CompileReport, Diagnostic};

const VERSION_ARG: &str = "--version";

#[derive(Debug, Clone)]
pub struct Compiler {
    command: PathBuf,
    flags: Vec<String>,
    timeout: Option<Duration>,
}

impl Compiler {
    pub fn new(config: &CompilerConfig) -> Self {
        Self {
            command: config.compiler_command(),
            flags: config.flag_args(),
            timeout: crate::config::compile_timeout(),
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn command(&self) -> &Path {
        &self.command
    }

    pub fn flags(&self) -> &[String] {
        &self.flags
    }

    /// Compile `file` and collect the diagnostics anchored in `doc`
    pub async fn compile(&self, file: &Path, doc: &Document) -> Result<CompileReport, CompileError> {
        let output = tempfile::NamedTempFile::new()?;

        tracing::info!(
            "Compiling {} with {} {:?}",
            file.display(),
            self.command.display(),
            self.flags
        );

        let mut child = Command::new(&self.command)
            .args(&self.flags)
            .arg(file)
            .arg(output.path())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| CompileError::spawn_failure(self.command.clone(), e))?;

        let stderr = child.stderr.take().ok_or_else(|| CompileError::Spawn {
            command: self.command.clone(),
            message: "Failed to get stderr".to_string(),
        })?;

        let (diagnostics, exit_code) = match self.timeout {
            Some(limit) => {
                let outcome = tokio::time::timeout(limit, collect(&mut child, stderr, doc)).await;
                let Ok(collected) = outcome else {
                    let _ = child.start_kill();
                    tracing::warn!("Compiler timed out on {}", file.display());
                    return Err(CompileError::Timeout(limit.as_secs()));
                };
                collected?
            }
            None => collect(&mut child, stderr, doc).await?,
        };

        tracing::debug!(
            "Compiler exited with {:?}, {} diagnostics",
            exit_code,
            diagnostics.len()
        );
        Ok(CompileReport::new(file.to_path_buf(), diagnostics, exit_code))
    }

    /// Whether the compiler can be found on disk or on `$PATH`
    pub fn is_installed(&self) -> bool {
        if self.command.components().count() > 1 {
            return self.command.is_file();
        }

        #[cfg(unix)]
        if let Ok(output) = StdCommand::new("which").arg(&self.command).output()
            && output.status.success()
        {
            return true;
        }

        #[cfg(windows)]
        if let Ok(output) = StdCommand::new("where").arg(&self.command).output()
            && output.status.success()
        {
            return true;
        }

        self.version().is_some()
    }

    /// First non-empty line of `yarac --version`
    pub fn version(&self) -> Option<String> {
        let output = StdCommand::new(&self.command)
            .arg(VERSION_ARG)
            .output()
            .ok()?;

        if !output.status.success() {
            return None;
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let text = if stdout.trim().is_empty() {
            stderr
        } else {
            stdout
        };

        text.lines()
            .find(|line| !line.trim().is_empty())
            .map(|s| s.trim().to_string())
    }
}

async fn collect(
    child: &mut Child,
    stderr: ChildStderr,
    doc: &Document,
) -> Result<(Vec<Diagnostic>, Option<i32>), CompileError> {
    // Raw byte lines: yarac may echo paths that are not valid UTF-8
    let mut lines = BufReader::new(stderr).split(b'\n');
    let mut diagnostics = Vec::new();

    while let Some(raw) = lines.next_segment().await? {
        let text = String::from_utf8_lossy(&raw);
        let line = text.strip_suffix('\r').unwrap_or(&text);
        match parse_line(line, doc) {
            Ok(Some(diagnostic)) => diagnostics.push(diagnostic),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("Aborting compile: {}", e);
                let _ = child.kill().await;
                return Err(e);
            }
        }
    }

    let status = child.wait().await?;
    Ok((diagnostics, status.code()))
}
