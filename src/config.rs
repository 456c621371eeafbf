//! Global Configuration Singleton

use std::sync::OnceLock;
use std::time::Duration;

use crate::models::config::YaraLensConfig;

static CONFIG: OnceLock<RuntimeConfig> = OnceLock::new();

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    compile_timeout: Duration,
    pub max_file_size_bytes: u64,
    pub max_concurrent_compiles: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            compile_timeout: Duration::from_secs(30),
            max_file_size_bytes: 5 * 1024 * 1024,
            max_concurrent_compiles: 4,
        }
    }
}

impl From<&YaraLensConfig> for RuntimeConfig {
    fn from(config: &YaraLensConfig) -> Self {
        Self {
            compile_timeout: Duration::from_secs(config.compiler.timeout_secs),
            max_file_size_bytes: config.workspace.max_file_size_bytes(),
            max_concurrent_compiles: config.workspace.max_concurrent.max(1),
        }
    }
}

impl RuntimeConfig {
    /// Upper bound for one compiler run; zero disables the limit
    pub fn compile_timeout(&self) -> Option<Duration> {
        if self.compile_timeout.is_zero() {
            None
        } else {
            Some(self.compile_timeout)
        }
    }
}

pub fn init(config: &YaraLensConfig) {
    let _ = CONFIG.set(RuntimeConfig::from(config));
}

pub fn compile_timeout() -> Option<Duration> {
    config().compile_timeout()
}

pub fn max_file_size_bytes() -> u64 {
    config().max_file_size_bytes
}

pub fn max_concurrent_compiles() -> usize {
    config().max_concurrent_compiles
}

fn config() -> RuntimeConfig {
    CONFIG.get().cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_from_config() {
        let mut config = YaraLensConfig::default();
        config.compiler.timeout_secs = 5;
        config.workspace.max_concurrent = 0;
        config.workspace.max_file_size_mb = 1;

        let runtime = RuntimeConfig::from(&config);
        assert_eq!(runtime.compile_timeout(), Some(Duration::from_secs(5)));
        assert_eq!(runtime.max_concurrent_compiles, 1);
        assert_eq!(runtime.max_file_size_bytes, 1024 * 1024);
    }

    #[test]
    fn test_zero_timeout_disables_limit() {
        let mut config = YaraLensConfig::default();
        config.compiler.timeout_secs = 0;
        assert_eq!(RuntimeConfig::from(&config).compile_timeout(), None);
    }

    #[test]
    fn test_unlimited_file_size() {
        let mut config = YaraLensConfig::default();
        config.workspace.max_file_size_mb = 0;
        assert_eq!(RuntimeConfig::from(&config).max_file_size_bytes, u64::MAX);
    }
}
