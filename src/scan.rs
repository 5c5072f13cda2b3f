//! Directory scanning
//!
//! Walks a directory with `ignore`, wraps every file a registered grammar
//! handles and renders its element tree. Failures are collected per file
//! instead of aborting the walk.

use crate::config::TreeplusConfig;
use crate::language::{Grammar, GrammarRegistry};
use crate::render::{render, RenderedElement};
use anyhow::Context;
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Directories never worth descending into, in gitignore syntax
const DEFAULT_EXCLUDES: &[&str] = &[
    "target/",
    "node_modules/",
    "venv/",
    ".venv/",
    "vendor/",
    "dist/",
    "build/",
    "__pycache__/",
    ".git/",
];

/// Gitignore-style matcher for the paths `scan` skips
///
/// Combines the root's `.gitignore` and `.ignore`, the default excludes and
/// the configured `exclude` patterns.
#[derive(Debug, Clone)]
pub struct IgnoreFilter {
    inner: Gitignore,
}

impl IgnoreFilter {
    pub fn new(root: &Path, excludes: &[String]) -> Self {
        let mut builder = GitignoreBuilder::new(root);

        for file in [".gitignore", ".ignore"] {
            let path = root.join(file);
            if !path.exists() {
                continue;
            }
            if let Some(e) = builder.add(&path) {
                tracing::warn!(path = %path.display(), error = %e, "failed to read ignore file");
            }
        }

        let patterns = DEFAULT_EXCLUDES.iter().copied().chain(excludes.iter().map(String::as_str));
        for pattern in patterns {
            if let Err(e) = builder.add_line(None, pattern) {
                tracing::warn!(pattern = %pattern, error = %e, "ignoring invalid exclude pattern");
            }
        }

        let inner = builder.build().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to build ignore rules");
            Gitignore::empty()
        });
        Self { inner }
    }

    pub fn is_ignored(&self, path: &Path, is_dir: bool) -> bool {
        self.inner.matched(path, is_dir).is_ignore()
    }
}

/// Parse a file and render its element tree
pub fn render_file(grammar: &Grammar, path: &Path, max_depth: Option<usize>) -> anyhow::Result<RenderedElement> {
    let content = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let parsed = grammar.parse(content)?;
    if parsed.has_errors() {
        tracing::debug!(path = %path.display(), "source has syntax errors");
    }
    let mapper = grammar.mapper();
    let root = mapper.root(grammar.root(&parsed))?;
    Ok(render(&root, max_depth)?)
}

#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: PathBuf,
    pub grammar: String,
    pub elements: usize,
}

#[derive(Debug, Default)]
pub struct ScanReport {
    pub files: Vec<FileReport>,
    pub failures: Vec<(PathBuf, String)>,
    /// Files no grammar handles
    pub skipped: usize,
}

impl ScanReport {
    pub fn total_elements(&self) -> usize {
        self.files.iter().map(|f| f.elements).sum()
    }
}

/// Wrap and render every supported file under `root`
pub fn scan(root: &Path, registry: &GrammarRegistry, config: &TreeplusConfig) -> ScanReport {
    let mut report = ScanReport::default();

    let filter = IgnoreFilter::new(root, &config.exclude);
    let walker = WalkBuilder::new(root)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(move |entry| {
            let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
            entry.depth() == 0 || !filter.is_ignored(entry.path(), is_dir)
        })
        .build();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }

        let path = entry.path();
        let Some(grammar) = registry.find_for_path(path) else {
            report.skipped += 1;
            continue;
        };

        match render_file(grammar, path, None) {
            Ok(outline) => {
                tracing::debug!(path = %path.display(), elements = outline.count(), "wrapped file");
                report.files.push(FileReport {
                    path: path.to_path_buf(),
                    grammar: grammar.name().to_string(),
                    elements: outline.count(),
                });
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to wrap file");
                report.failures.push((path.to_path_buf(), format!("{:#}", e)));
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::default_registry;
    use tempfile::TempDir;

    fn write(dir: &Path, relative: &str, content: &str) {
        let path = dir.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn test_scan_wraps_supported_files() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "app.py", "def f(a):\n    return a + 1\n");
        write(dir.path(), "main.go", "package main\n\nfunc main() {}\n");
        write(dir.path(), "notes.txt", "not code");
        write(dir.path(), "node_modules/dep/index.js", "module.exports = 1;\n");
        write(dir.path(), "generated/api.py", "x = 1\n");

        let registry = default_registry().unwrap();
        let config = TreeplusConfig {
            exclude: vec!["generated/**".to_string()],
            ..Default::default()
        };
        let report = scan(dir.path(), &registry, &config);

        let names: Vec<_> = report
            .files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["app.py", "main.go"]);
        assert_eq!(report.skipped, 1);
        assert!(report.failures.is_empty(), "{:?}", report.failures);
        assert!(report.total_elements() > 2);
    }

    #[test]
    fn test_scan_honours_ignore_files() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), ".gitignore", "scratch.py\n");
        write(dir.path(), "app.py", "x = 1\n");
        write(dir.path(), "scratch.py", "y = 2\n");
        write(dir.path(), "build/out.py", "z = 3\n");

        let registry = default_registry().unwrap();
        let report = scan(dir.path(), &registry, &TreeplusConfig::default());

        let names: Vec<_> = report
            .files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["app.py"]);
    }

    #[test]
    fn test_ignore_filter_combines_defaults_and_excludes() {
        let dir = TempDir::new().unwrap();
        let filter = IgnoreFilter::new(dir.path(), &["*_pb2.py".to_string(), "generated/".to_string()]);

        assert!(filter.is_ignored(&dir.path().join("node_modules"), true));
        assert!(filter.is_ignored(&dir.path().join("src/messages_pb2.py"), false));
        assert!(filter.is_ignored(&dir.path().join("src/generated"), true));
        assert!(!filter.is_ignored(&dir.path().join("src/app.py"), false));
        assert!(!filter.is_ignored(&dir.path().join("build.py"), false));
    }

    #[test]
    fn test_render_file_respects_depth() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "app.py", "x = 1\ny = 2\n");
        let registry = default_registry().unwrap();
        let grammar = registry.find_by_name("python").unwrap();

        let outline = render_file(grammar, &dir.path().join("app.py"), Some(0)).unwrap();
        assert_eq!(outline.entity, "module");
        assert_eq!(outline.count(), 1);
        assert_eq!(outline.values.len(), 2);
    }

    #[test]
    fn test_render_missing_file_fails() {
        let registry = default_registry().unwrap();
        let grammar = registry.find_by_name("python").unwrap();
        assert!(render_file(grammar, Path::new("/nonexistent/app.py"), None).is_err());
    }
}
