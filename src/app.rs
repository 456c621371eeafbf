//! Application container for yaralens

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::cli::OutputContext;
use crate::config;
use crate::models::config::YaraLensConfig;
use crate::services::compile::{CompileService, DefaultCompileService};
use crate::services::completion::{CompletionService, DefaultCompletionService};
use crate::services::config::{ConfigService, DefaultConfigService};
use crate::services::symbols::{DefaultSymbolService, SymbolService};

pub struct App {
    root: PathBuf,
    pub(crate) output: OutputContext,
    pub(crate) symbols: Arc<dyn SymbolService>,
    pub(crate) compile: Arc<dyn CompileService>,
    pub(crate) completion: Arc<dyn CompletionService>,
    pub(crate) config_service: Arc<dyn ConfigService>,
    pub(crate) config: YaraLensConfig,
    cancel: CancellationToken,
}

impl App {
    pub async fn new() -> anyhow::Result<Self> {
        let root = std::env::current_dir()?;

        tracing::debug!("Initializing yaralens at {:?}", root);

        let output = OutputContext::new(root.clone());
        let config_service = Arc::new(DefaultConfigService::new(&root));
        let config = match config_service.load(false).await {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Using default configuration: {}", e);
                YaraLensConfig::default()
            }
        };

        config::init(&config);

        let cancel = CancellationToken::new();
        let symbols = Arc::new(DefaultSymbolService::new(cancel.clone()));
        let compile = Arc::new(DefaultCompileService::new(
            &config.compiler,
            &config.workspace,
        ));
        let completion = Arc::new(DefaultCompletionService::new(&config.completion));

        tracing::info!(
            "yaralens initialized (compiler: {})",
            compile.compiler().command().display()
        );

        Ok(Self {
            root,
            output,
            symbols,
            compile,
            completion,
            config_service,
            config,
            cancel,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &YaraLensConfig {
        &self.config
    }

    /// Cancels in-flight analyses when triggered
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}
