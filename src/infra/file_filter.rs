//! Rule file discovery with .gitignore integration
//!
//! Uses the `ignore` crate for gitignore-style pattern matching,
//! plus an optional `.yaralens/ignore` file in the same syntax.

use std::path::{Component, Path, PathBuf};

use ignore::WalkBuilder;
use ignore::gitignore::{Gitignore, GitignoreBuilder};

use crate::models::config::WorkspaceConfig;

/// Extensions recognised as YARA rule files
pub const RULE_EXTENSIONS: &[&str] = &["yara", "yar"];

const PROJECT_DIR: &str = ".yaralens";

#[derive(Debug, Clone)]
pub struct FileFilterConfig {
    pub root: PathBuf,
    pub respect_gitignore: bool,
    /// Directory or file names skipped anywhere under the root (`*.ext` globs allowed)
    pub ignored_names: Vec<String>,
    pub include_hidden: bool,
}

impl Default for FileFilterConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::new(),
            respect_gitignore: true,
            ignored_names: Vec::new(),
            include_hidden: false,
        }
    }
}

pub struct FileFilter {
    config: FileFilterConfig,
    project_ignore: Option<Gitignore>,
}

impl FileFilter {
    pub fn new(config: FileFilterConfig) -> Self {
        let project_ignore = Self::load_project_ignore(&config.root);
        Self {
            config,
            project_ignore,
        }
    }

    /// Filter for `root` using the workspace ignore list
    pub fn for_workspace(root: impl AsRef<Path>, workspace: &WorkspaceConfig) -> Self {
        Self::new(FileFilterConfig {
            root: root.as_ref().to_path_buf(),
            ignored_names: workspace.ignored_paths.clone(),
            ..Default::default()
        })
    }

    /// Load .yaralens/ignore
    fn load_project_ignore(root: &Path) -> Option<Gitignore> {
        let ignore_path = root.join(PROJECT_DIR).join("ignore");
        if !ignore_path.exists() {
            return None;
        }

        let mut builder = GitignoreBuilder::new(root);
        if let Some(err) = builder.add(&ignore_path) {
            tracing::warn!("Failed to parse .yaralens/ignore: {}", err);
        }

        builder.build().ok()
    }

    fn matches_ignored_name(&self, name: &str) -> bool {
        self.config.ignored_names.iter().any(|pattern| {
            match pattern.strip_prefix('*') {
                Some(suffix) => name.ends_with(suffix),
                None => name == pattern,
            }
        })
    }

    pub fn is_ignored(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.config.root).unwrap_or(path);

        for component in relative.components() {
            if let Component::Normal(name) = component
                && let Some(name) = name.to_str()
            {
                if self.matches_ignored_name(name) {
                    return true;
                }
                if !self.config.include_hidden && name.starts_with('.') {
                    return true;
                }
            }
        }

        if let Some(ref ignore) = self.project_ignore {
            match ignore.matched(relative, path.is_dir()) {
                ignore::Match::Ignore(_) => return true,
                ignore::Match::Whitelist(_) => return false,
                ignore::Match::None => {}
            }
        }

        false
    }

    pub fn should_include(&self, path: &Path) -> bool {
        !self.is_ignored(path)
    }

    pub fn walk_builder(&self) -> WalkBuilder {
        let mut builder = WalkBuilder::new(&self.config.root);

        builder
            .hidden(!self.config.include_hidden)
            .git_ignore(self.config.respect_gitignore)
            .git_global(self.config.respect_gitignore)
            .git_exclude(self.config.respect_gitignore)
            .require_git(false)
            .sort_by_file_name(|a, b| a.cmp(b));

        builder
    }

    /// Rule files under the root, in path order, at most `limit` of them
    pub fn discover_rules(&self, limit: usize) -> Vec<PathBuf> {
        let mut files = Vec::new();

        for entry in self.walk_builder().build().filter_map(|e| e.ok()) {
            if files.len() >= limit {
                tracing::debug!("Stopped discovery at {} files", limit);
                break;
            }

            let path = entry.path();
            if !path.is_file() || !is_rule_file(path) {
                continue;
            }
            if self.should_include(path) {
                files.push(path.to_path_buf());
            }
        }

        tracing::debug!(
            "Discovered {} rule files under {}",
            files.len(),
            self.config.root.display()
        );
        files
    }
}

pub fn is_rule_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| RULE_EXTENSIONS.contains(&ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn workspace_filter(root: &Path) -> FileFilter {
        FileFilter::for_workspace(root, &WorkspaceConfig::default())
    }

    #[test]
    fn test_discovers_both_extensions() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir(root.join("malware")).unwrap();
        fs::write(root.join("a.yara"), "rule a {}").unwrap();
        fs::write(root.join("malware/b.yar"), "rule b {}").unwrap();
        fs::write(root.join("notes.txt"), "not a rule").unwrap();

        let files = workspace_filter(root).discover_rules(100);
        assert_eq!(files, vec![root.join("a.yara"), root.join("malware/b.yar")]);
    }

    #[test]
    fn test_gitignore_and_ignored_names() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join(".gitignore"), "generated/\n").unwrap();
        fs::create_dir(root.join("generated")).unwrap();
        fs::create_dir(root.join("node_modules")).unwrap();
        fs::write(root.join("generated/g.yara"), "rule g {}").unwrap();
        fs::write(root.join("node_modules/n.yara"), "rule n {}").unwrap();
        fs::write(root.join("keep.yara"), "rule k {}").unwrap();

        let files = workspace_filter(root).discover_rules(100);
        assert_eq!(files, vec![root.join("keep.yara")]);
    }

    #[test]
    fn test_project_ignore_file() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir(root.join(".yaralens")).unwrap();
        fs::write(root.join(".yaralens/ignore"), "*_test.yar\n").unwrap();
        fs::write(root.join("main.yar"), "rule m {}").unwrap();
        fs::write(root.join("main_test.yar"), "rule t {}").unwrap();

        let filter = workspace_filter(root);
        assert!(filter.should_include(&root.join("main.yar")));
        assert!(!filter.should_include(&root.join("main_test.yar")));
    }

    #[test]
    fn test_discovery_limit() {
        let temp = TempDir::new().unwrap();
        for idx in 0..5 {
            fs::write(temp.path().join(format!("r{}.yara", idx)), "rule r {}").unwrap();
        }
        assert_eq!(workspace_filter(temp.path()).discover_rules(3).len(), 3);
    }
}
