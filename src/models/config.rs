//! Configuration model for yaralens
//!
//! Compiler location and flags, completion behaviour, workspace limits.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// yaralens configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct YaraLensConfig {
    #[serde(default)]
    pub compiler: CompilerConfig,

    #[serde(default)]
    pub completion: CompletionConfig,

    #[serde(default)]
    pub workspace: WorkspaceConfig,
}

/// Rule compiler configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// Directory containing the `yarac` executable; `$PATH` lookup when unset
    #[serde(default)]
    pub install_path: Option<PathBuf>,

    /// Extra flags placed before the rule file on the command line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compile_flags: Option<CompileFlags>,

    #[serde(default = "defaults::timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            install_path: None,
            compile_flags: None,
            timeout_secs: defaults::timeout_secs(),
        }
    }
}

impl CompilerConfig {
    /// Path of the compiler executable to spawn
    pub fn compiler_command(&self) -> PathBuf {
        let exe = format!("yarac{}", std::env::consts::EXE_SUFFIX);
        match &self.install_path {
            Some(dir) => dir.join(exe),
            None => PathBuf::from(exe),
        }
    }

    /// Configured flags as command-line arguments
    pub fn flag_args(&self) -> Vec<String> {
        self.compile_flags
            .as_ref()
            .map(CompileFlags::to_args)
            .unwrap_or_default()
    }
}

/// Compiler flags, written either as a single string or as a list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CompileFlags {
    One(String),
    Many(Vec<String>),
}

impl CompileFlags {
    /// Flags as command-line arguments, passed through verbatim
    pub fn to_args(&self) -> Vec<String> {
        match self {
            Self::One(flag) if flag.is_empty() => Vec::new(),
            Self::One(flag) => vec![flag.clone()],
            Self::Many(flags) => flags.iter().filter(|f| !f.is_empty()).cloned().collect(),
        }
    }
}

/// Completion configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CompletionConfig {
    /// Only complete members of modules the document imports
    #[serde(default)]
    pub require_imports: bool,
}

/// Workspace configuration for batch compilation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    #[serde(default = "defaults::max_files")]
    pub max_files: usize,

    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,

    #[serde(default = "defaults::max_file_size_mb")]
    pub max_file_size_mb: u32,

    /// Paths to ignore
    #[serde(default = "default_ignored_paths")]
    pub ignored_paths: Vec<String>,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            max_files: defaults::max_files(),
            max_concurrent: defaults::max_concurrent(),
            max_file_size_mb: defaults::max_file_size_mb(),
            ignored_paths: default_ignored_paths(),
        }
    }
}

impl WorkspaceConfig {
    pub fn max_file_size_bytes(&self) -> u64 {
        if self.max_file_size_mb == 0 {
            u64::MAX
        } else {
            self.max_file_size_mb as u64 * 1024 * 1024
        }
    }
}

fn default_ignored_paths() -> Vec<String> {
    vec![
        ".git".to_string(),
        "node_modules".to_string(),
        "target".to_string(),
        ".yaralens".to_string(),
    ]
}

mod defaults {
    // Compiler
    pub fn timeout_secs() -> u64 {
        30
    }

    // Workspace
    pub fn max_files() -> usize {
        100
    }
    pub fn max_concurrent() -> usize {
        4
    }
    pub fn max_file_size_mb() -> u32 {
        5
    }
}
