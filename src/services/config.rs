//! Configuration service for yaralens

use std::path::{Path, PathBuf};
use std::process::Command;

use async_trait::async_trait;

use crate::error::ConfigError;
use crate::models::config::{
    CompileFlags, CompilerConfig, CompletionConfig, WorkspaceConfig, YaraLensConfig,
};

pub const ENV_INSTALL_PATH: &str = "YARALENS_INSTALL_PATH";
pub const ENV_COMPILE_FLAGS: &str = "YARALENS_COMPILE_FLAGS";
pub const ENV_COMPILE_TIMEOUT: &str = "YARALENS_COMPILE_TIMEOUT";

#[async_trait]
pub trait ConfigService: Send + Sync {
    async fn load(&self, global_only: bool) -> Result<YaraLensConfig, ConfigError>;
    fn config_path(&self, global: bool) -> PathBuf;
    async fn init(&self, global: bool, force: bool) -> Result<PathBuf, ConfigError>;
    async fn edit(&self, global: bool) -> Result<PathBuf, ConfigError>;
}

pub struct DefaultConfigService {
    root: PathBuf,
}

impl DefaultConfigService {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    fn global_config_path() -> PathBuf {
        // XDG standard: ~/.config/yaralens/config.toml
        std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .ok()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("yaralens")
            .join("config.toml")
    }

    fn project_config_path(&self) -> PathBuf {
        self.root.join(".yaralens").join("config.toml")
    }

    async fn load_from_path(path: &Path) -> Result<YaraLensConfig, ConfigError> {
        if !path.exists() {
            return Ok(YaraLensConfig::default());
        }
        let content = tokio::fs::read_to_string(path).await?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    async fn write_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let config = YaraLensConfig::default();
        let content =
            toml::to_string_pretty(&config).map_err(|e| ConfigError::Parse(e.to_string()))?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }

    fn get_editor() -> String {
        std::env::var("EDITOR").unwrap_or_else(|_| {
            if cfg!(target_os = "macos") {
                "open".to_string()
            } else if cfg!(target_os = "windows") {
                "notepad".to_string()
            } else {
                "vi".to_string()
            }
        })
    }
}

#[async_trait]
impl ConfigService for DefaultConfigService {
    async fn load(&self, global_only: bool) -> Result<YaraLensConfig, ConfigError> {
        if global_only {
            return Self::load_from_path(&Self::global_config_path()).await;
        }

        let global = Self::load_from_path(&Self::global_config_path()).await?;
        let project = Self::load_from_path(&self.project_config_path()).await?;
        let config = merge_config(global, project);
        apply_env_overrides(config, |key| std::env::var(key).ok())
    }

    fn config_path(&self, global: bool) -> PathBuf {
        if global {
            Self::global_config_path()
        } else {
            self.project_config_path()
        }
    }

    async fn init(&self, global: bool, force: bool) -> Result<PathBuf, ConfigError> {
        let path = self.config_path(global);

        if path.exists() && !force {
            return Err(ConfigError::InvalidValue {
                key: "config".to_string(),
                message: format!(
                    "Config already exists: {}. Use --force to overwrite.",
                    path.display()
                ),
            });
        }

        Self::write_default_config(&path).await?;
        tracing::info!("Wrote default config to {}", path.display());
        Ok(path)
    }

    async fn edit(&self, global: bool) -> Result<PathBuf, ConfigError> {
        let path = self.config_path(global);

        if !path.exists() {
            return Err(ConfigError::NotFound(format!(
                "Config file does not exist: {}\nRun: yaralens config init{}",
                path.display(),
                if global { " --global" } else { "" }
            )));
        }

        let editor = Self::get_editor();
        let status =
            Command::new(&editor)
                .arg(&path)
                .status()
                .map_err(|e| ConfigError::InvalidValue {
                    key: "editor".to_string(),
                    message: format!("Failed to launch editor '{}': {}", editor, e),
                })?;

        if !status.success() {
            return Err(ConfigError::InvalidValue {
                key: "editor".to_string(),
                message: "Editor exited with error".to_string(),
            });
        }

        Ok(path)
    }
}

/// Overlay project settings on global ones
///
/// Optional values fall back to the global file; plain values are taken from
/// the project file only when it changed them from the default.
fn merge_config(base: YaraLensConfig, overlay: YaraLensConfig) -> YaraLensConfig {
    let compiler_defaults = CompilerConfig::default();
    let workspace_defaults = WorkspaceConfig::default();

    fn pick<T: PartialEq>(base: T, overlay: T, default: &T) -> T {
        if overlay != *default { overlay } else { base }
    }

    YaraLensConfig {
        compiler: CompilerConfig {
            install_path: overlay.compiler.install_path.or(base.compiler.install_path),
            compile_flags: overlay.compiler.compile_flags.or(base.compiler.compile_flags),
            timeout_secs: pick(
                base.compiler.timeout_secs,
                overlay.compiler.timeout_secs,
                &compiler_defaults.timeout_secs,
            ),
        },
        completion: CompletionConfig {
            require_imports: base.completion.require_imports
                || overlay.completion.require_imports,
        },
        workspace: WorkspaceConfig {
            max_files: pick(
                base.workspace.max_files,
                overlay.workspace.max_files,
                &workspace_defaults.max_files,
            ),
            max_concurrent: pick(
                base.workspace.max_concurrent,
                overlay.workspace.max_concurrent,
                &workspace_defaults.max_concurrent,
            ),
            max_file_size_mb: pick(
                base.workspace.max_file_size_mb,
                overlay.workspace.max_file_size_mb,
                &workspace_defaults.max_file_size_mb,
            ),
            ignored_paths: pick(
                base.workspace.ignored_paths,
                overlay.workspace.ignored_paths,
                &workspace_defaults.ignored_paths,
            ),
        },
    }
}

fn apply_env_overrides(
    mut config: YaraLensConfig,
    env: impl Fn(&str) -> Option<String>,
) -> Result<YaraLensConfig, ConfigError> {
    if let Some(val) = env(ENV_INSTALL_PATH).filter(|v| !v.is_empty()) {
        config.compiler.install_path = Some(PathBuf::from(val));
    }
    if let Some(val) = env(ENV_COMPILE_FLAGS) {
        let flags: Vec<String> = val.split_whitespace().map(String::from).collect();
        config.compiler.compile_flags = Some(CompileFlags::Many(flags));
    }
    if let Some(val) = env(ENV_COMPILE_TIMEOUT) {
        config.compiler.timeout_secs = val.parse().map_err(|_| ConfigError::InvalidValue {
            key: ENV_COMPILE_TIMEOUT.to_string(),
            message: format!("expected seconds, got '{}'", val),
        })?;
    }
    Ok(config)
}
