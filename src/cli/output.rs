//! JSON output for CLI commands

use std::path::{Path, PathBuf};

use serde::Serialize;

/// Output context shared by every command
///
/// Paths under `root` are printed relative to it.
#[derive(Debug, Clone)]
pub struct OutputContext {
    root: PathBuf,
}

impl OutputContext {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path relative to the root, or unchanged when outside it
    pub fn relative_path(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .map(|p| p.display().to_string())
            .unwrap_or_else(|_| path.display().to_string())
    }

    /// Print `data` with its fields at top level plus `"success": true`
    pub fn print_success_flat<T: Serialize>(&self, data: T) {
        print_json(&flatten_success(data));
    }

    pub fn print_error(&self, message: &str) {
        print_json(&error_value(message));
    }
}

fn flatten_success<T: Serialize>(data: T) -> serde_json::Value {
    let mut response = serde_json::to_value(data).unwrap_or(serde_json::json!({}));
    if let Some(obj) = response.as_object_mut() {
        obj.insert("success".to_string(), serde_json::json!(true));
    }
    response
}

fn error_value(message: &str) -> serde_json::Value {
    serde_json::json!({
        "success": false,
        "error": message
    })
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("Failed to serialize output: {e}"),
    }
}
