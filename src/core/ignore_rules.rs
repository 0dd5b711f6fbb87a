//! Ignore rules
//!
//! Patterns come from `.gitignore` and `.tacosignore` at the scan root, in
//! that order, followed by the built-in names. Later patterns win, so the
//! built-ins cannot be negated away.

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::fs;
use std::path::Path;

/// Ignore files read from the scan root, in load order
pub const IGNORE_FILES: &[&str] = &[".gitignore", ".tacosignore"];

/// Always ignored regardless of ignore file content
pub const BUILTIN_IGNORES: &[&str] = &[".git", "node_modules"];

/// Answers "is this root-relative path ignored?"
#[derive(Debug, Clone)]
pub struct IgnoreMatcher {
    gitignore: Gitignore,
}

impl IgnoreMatcher {
    /// Load ignore files from `root`. Missing or unreadable files contribute
    /// nothing.
    pub fn load(root: &Path) -> Self {
        let mut builder = GitignoreBuilder::new(root);

        for file_name in IGNORE_FILES {
            let path = root.join(file_name);
            let content = match fs::read_to_string(&path) {
                Ok(c) => c,
                Err(_) => continue,
            };
            tracing::debug!(path = %path.display(), "loading ignore file");
            for line in content.lines().filter(|l| !l.trim().is_empty()) {
                if let Err(e) = builder.add_line(Some(path.clone()), line) {
                    tracing::warn!(path = %path.display(), line, error = %e, "invalid ignore pattern");
                }
            }
        }

        for name in BUILTIN_IGNORES {
            if let Err(e) = builder.add_line(None, name) {
                tracing::warn!(pattern = *name, error = %e, "invalid built-in ignore pattern");
            }
        }

        let gitignore = builder.build().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to build ignore rules, ignoring nothing");
            Gitignore::empty()
        });

        Self { gitignore }
    }

    /// Check a '/'-separated path relative to the scan root
    pub fn is_ignored(&self, relative_path: &str, is_dir: bool) -> bool {
        if relative_path.is_empty() {
            return false;
        }
        self.gitignore
            .matched_path_or_any_parents(Path::new(relative_path), is_dir)
            .is_ignore()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_builtins_without_ignore_files() {
        let temp = tempdir().unwrap();
        let matcher = IgnoreMatcher::load(temp.path());

        assert!(matcher.is_ignored("node_modules", true));
        assert!(matcher.is_ignored(".git", true));
        assert!(matcher.is_ignored("pkg/node_modules", true));
        assert!(!matcher.is_ignored("src", true));
        assert!(!matcher.is_ignored("main.rs", false));
    }

    #[test]
    fn test_gitignore_patterns() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join(".gitignore"), "*.log\n/build\ntarget/\n").unwrap();
        let matcher = IgnoreMatcher::load(temp.path());

        assert!(matcher.is_ignored("debug.log", false));
        assert!(matcher.is_ignored("logs/debug.log", false));
        assert!(matcher.is_ignored("build", true));
        assert!(!matcher.is_ignored("src/build", true));
        assert!(matcher.is_ignored("target", true));
        assert!(!matcher.is_ignored("target", false));
    }

    #[test]
    fn test_double_star() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join(".gitignore"), "docs/**/*.png\n").unwrap();
        let matcher = IgnoreMatcher::load(temp.path());

        assert!(matcher.is_ignored("docs/a/b/c.png", false));
        assert!(!matcher.is_ignored("img/c.png", false));
    }

    #[test]
    fn test_override_file_negates_primary() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join(".gitignore"), "*.md\n").unwrap();
        fs::write(temp.path().join(".tacosignore"), "!README.md\n").unwrap();
        let matcher = IgnoreMatcher::load(temp.path());

        assert!(matcher.is_ignored("NOTES.md", false));
        assert!(!matcher.is_ignored("README.md", false));
    }

    #[test]
    fn test_builtins_cannot_be_negated() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join(".tacosignore"), "!node_modules\n").unwrap();
        let matcher = IgnoreMatcher::load(temp.path());

        assert!(matcher.is_ignored("node_modules", true));
    }

    #[test]
    fn test_children_of_ignored_dir() {
        let temp = tempdir().unwrap();
        let matcher = IgnoreMatcher::load(temp.path());
        assert!(matcher.is_ignored("node_modules/x.txt", false));
    }

    #[test]
    fn test_empty_path_is_not_ignored() {
        let temp = tempdir().unwrap();
        let matcher = IgnoreMatcher::load(temp.path());
        assert!(!matcher.is_ignored("", true));
    }
}
