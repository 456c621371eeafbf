//! Config command implementation

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::app::App;
use crate::models::config::YaraLensConfig;

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Initialize configuration file
    Init {
        /// Initialize global config (~/.config/yaralens)
        #[arg(long)]
        global: bool,

        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Show current configuration
    Show {
        /// Show global config only
        #[arg(long)]
        global: bool,
    },

    /// Show config file path
    Path {
        /// Show global config path
        #[arg(long)]
        global: bool,
    },

    /// Edit configuration with default editor
    Edit {
        /// Edit global config
        #[arg(long)]
        global: bool,
    },
}

#[derive(Serialize)]
struct ConfigInitResponse {
    status: String,
    path: String,
    level: &'static str,
}

#[derive(Serialize)]
struct ConfigShowResponse {
    level: &'static str,
    config: serde_json::Value,
}

#[derive(Serialize)]
struct ConfigPathResponse {
    level: &'static str,
    path: String,
    exists: bool,
}

#[derive(Serialize)]
struct ConfigEditResponse {
    status: String,
    path: String,
}

fn config_to_json(config: &YaraLensConfig) -> serde_json::Value {
    serde_json::json!({
        "compiler": {
            "command": config.compiler.compiler_command(),
            "install_path": config.compiler.install_path,
            "compile_flags": config.compiler.flag_args(),
            "timeout_secs": config.compiler.timeout_secs,
        },
        "completion": {
            "require_imports": config.completion.require_imports,
        },
        "workspace": {
            "max_files": config.workspace.max_files,
            "max_concurrent": config.workspace.max_concurrent,
            "max_file_size_mb": config.workspace.max_file_size_mb,
            "ignored_paths": config.workspace.ignored_paths,
        },
    })
}

pub async fn execute(args: ConfigArgs, app: &App) -> Result<()> {
    let ctx = &app.output;

    let display_path = |path: &std::path::Path, global: bool| {
        if global {
            path.display().to_string()
        } else {
            ctx.relative_path(path)
        }
    };

    match args.command {
        ConfigCommand::Init { global, force } => {
            let level = if global { "global" } else { "project" };
            match app.config_service.init(global, force).await {
                Ok(path) => {
                    let response = ConfigInitResponse {
                        status: "created".to_string(),
                        path: display_path(&path, global),
                        level,
                    };
                    ctx.print_success_flat(response);
                }
                Err(e) => ctx.print_error(&e.to_string()),
            }
        }

        ConfigCommand::Show { global } => {
            let level = if global { "global" } else { "merged" };
            match app.config_service.load(global).await {
                Ok(config) => {
                    let response = ConfigShowResponse {
                        level,
                        config: config_to_json(&config),
                    };
                    ctx.print_success_flat(response);
                }
                Err(e) => ctx.print_error(&e.to_string()),
            }
        }

        ConfigCommand::Path { global } => {
            let level = if global { "global" } else { "project" };
            let path = app.config_service.config_path(global);
            let response = ConfigPathResponse {
                level,
                path: display_path(&path, global),
                exists: path.exists(),
            };
            ctx.print_success_flat(response);
        }

        ConfigCommand::Edit { global } => match app.config_service.edit(global).await {
            Ok(path) => {
                let response = ConfigEditResponse {
                    status: "opened".to_string(),
                    path: display_path(&path, global),
                };
                ctx.print_success_flat(response);
            }
            Err(e) => ctx.print_error(&e.to_string()),
        },
    }

    Ok(())
}
