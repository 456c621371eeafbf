//! Doctor command - compiler and configuration health check

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::app::App;
use crate::infra::compiler::Compiler;

#[derive(Args, Debug)]
pub struct DoctorArgs {
    /// Only list what is missing
    #[arg(long)]
    pub missing_only: bool,
}

#[derive(Serialize)]
struct DoctorResponse {
    summary: DoctorSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    compiler: Option<CompilerEntry>,
    configs: Vec<ConfigEntry>,
}

#[derive(Serialize)]
struct DoctorSummary {
    compiler_installed: bool,
    configs_found: usize,
}

#[derive(Serialize)]
struct CompilerEntry {
    command: String,
    installed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    flags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    install_command: Option<String>,
}

#[derive(Serialize)]
struct ConfigEntry {
    level: &'static str,
    path: String,
    exists: bool,
}

fn check_compiler(compiler: &Compiler) -> CompilerEntry {
    let installed = compiler.is_installed();
    CompilerEntry {
        command: compiler.command().display().to_string(),
        installed,
        version: installed.then(|| compiler.version()).flatten(),
        flags: compiler.flags().to_vec(),
        install_command: (!installed).then(install_command),
    }
}

fn install_command() -> String {
    #[cfg(target_os = "macos")]
    {
        "brew install yara  OR  set compiler.install_path".to_string()
    }
    #[cfg(target_os = "linux")]
    {
        "apt install yara  OR  set compiler.install_path".to_string()
    }
    #[cfg(target_os = "windows")]
    {
        "choco install yara  OR  set compiler.install_path".to_string()
    }
    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        "build yara from source and set compiler.install_path".to_string()
    }
}

pub fn execute(args: DoctorArgs, app: &App) -> Result<()> {
    let ctx = &app.output;

    let compiler = check_compiler(app.compile.compiler());
    let compiler_installed = compiler.installed;

    let configs: Vec<ConfigEntry> = [("global", true), ("project", false)]
        .into_iter()
        .map(|(level, global)| {
            let path = app.config_service.config_path(global);
            ConfigEntry {
                level,
                exists: path.exists(),
                path: path.display().to_string(),
            }
        })
        .collect();
    let configs_found = configs.iter().filter(|c| c.exists).count();

    let response = DoctorResponse {
        summary: DoctorSummary {
            compiler_installed,
            configs_found,
        },
        compiler: (!args.missing_only || !compiler_installed).then_some(compiler),
        configs: configs
            .into_iter()
            .filter(|c| !args.missing_only || !c.exists)
            .collect(),
    };

    ctx.print_success_flat(response);
    Ok(())
}
