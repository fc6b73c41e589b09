use crate::config::Config;
use crate::syntax::Language;
use anyhow::{Context, Result};
use ignore::WalkBuilder;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Directories that hold vendored, generated or test code.
const SKIP_DIRS: &[&str] = &[
    "node_modules",
    "web_modules",
    "jspm_packages",
    "bower_components",
    "dist",
    "build",
    ".npm",
    ".yarn",
    ".cache",
    "public",
    "static",
    "assets",
    "libs",
    "__tests__",
    "tests",
    ".featurex",
];

#[derive(Debug, Clone)]
pub struct ScannedFile {
    pub rel_path: String,
    pub abs_path: PathBuf,
    pub size: u64,
    pub language: Language,
}

#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    pub no_ignore: bool,
    pub max_file_bytes: u64,
    pub extra_skip_dirs: Vec<String>,
}

impl ScanOptions {
    pub fn new(no_ignore: bool) -> Self {
        let config = Config::get();
        Self {
            no_ignore,
            max_file_bytes: config.max_file_bytes,
            extra_skip_dirs: config.extra_skip_dirs.clone(),
        }
    }

    fn skips_dir(&self, name: &str) -> bool {
        name.starts_with(".git")
            || SKIP_DIRS.contains(&name)
            || self.extra_skip_dirs.iter().any(|extra| extra == name)
    }
}

#[derive(Debug, Default)]
pub struct ScanResult {
    pub files: Vec<ScannedFile>,
    /// Source files left out for their size.
    pub skipped: usize,
}

pub fn scan_repo(repo_root: &Path, options: &ScanOptions) -> Result<ScanResult> {
    let mut result = ScanResult::default();
    let mut builder = WalkBuilder::new(repo_root);
    if options.no_ignore {
        builder
            .ignore(false)
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false)
            .parents(false);
    } else {
        builder
            .ignore(true)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .parents(true)
            .require_git(false);
    }
    let skip = options.clone();
    let walker = builder
        .hidden(false)
        .follow_links(false)
        .filter_entry(move |entry| {
            let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
            !(is_dir && entry.depth() > 0 && skip.skips_dir(&entry.file_name().to_string_lossy()))
        })
        .build();

    for entry in walker {
        let entry = match entry {
            Ok(value) => value,
            Err(err) => {
                warn!("walk error: {err}");
                continue;
            }
        };
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        let path = entry.path();
        let Some(language) = source_language(path) else {
            continue;
        };
        let size = fs::metadata(path)
            .with_context(|| format!("stat {}", path.display()))?
            .len();
        if size > options.max_file_bytes {
            debug!(path = %path.display(), size, "skipping large file");
            result.skipped += 1;
            continue;
        }
        result.files.push(ScannedFile {
            rel_path: crate::util::normalize_rel_path(repo_root, path)?,
            abs_path: path.to_path_buf(),
            size,
            language,
        });
    }
    result.files.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
    Ok(result)
}

/// Language of an extractable source file; bundles, loaders and declaration
/// files are left out.
pub fn source_language(path: &Path) -> Option<Language> {
    let name = path.file_name()?.to_str()?;
    if name.ends_with(".min.js") || name == "require.js" || name.ends_with(".d.ts") {
        return None;
    }
    Language::from_path(name)
}

/// Repositories under `dir`: the folder itself when it holds source files
/// directly, otherwise each visible sub-directory.
pub fn discover_repositories(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut children = Vec::new();
    let mut has_sources = false;
    for entry in fs::read_dir(dir).with_context(|| format!("read dir {}", dir.display()))? {
        let entry = entry?;
        let path = entry.path();
        let file_type = entry.file_type()?;
        if file_type.is_file() && source_language(&path).is_some() {
            has_sources = true;
        } else if file_type.is_dir() && !entry.file_name().to_string_lossy().starts_with('.') {
            children.push(path);
        }
    }
    if has_sources {
        return Ok(vec![dir.to_path_buf()]);
    }
    children.sort();
    Ok(children)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn skips_vendored_and_bundled_files() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "src/app.js", "app.get('/a', h);");
        write(root, "src/types.d.ts", "declare const x: number;");
        write(root, "src/vendor.min.js", "x()");
        write(root, "node_modules/express/index.js", "module.exports = 1;");
        write(root, "dist/app.js", "x()");
        write(root, "lib/server.ts", "export const s = 1;");
        write(root, "README.md", "# readme");

        let result = scan_repo(root, &ScanOptions::default_for_tests()).unwrap();
        let paths: Vec<&str> = result.files.iter().map(|f| f.rel_path.as_str()).collect();
        assert_eq!(paths, vec!["lib/server.ts", "src/app.js"]);
        assert_eq!(result.files[0].language, Language::Typescript);
    }

    #[test]
    fn large_files_are_counted_as_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "big.js", &"x();\n".repeat(100));
        write(dir.path(), "small.js", "x();");
        let options = ScanOptions {
            max_file_bytes: 64,
            ..ScanOptions::default_for_tests()
        };
        let result = scan_repo(dir.path(), &options).unwrap();
        assert_eq!(result.files.len(), 1);
        assert_eq!(result.skipped, 1);
    }

    #[test]
    fn extra_skip_dirs_apply() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "generated/api.js", "x(1);");
        write(dir.path(), "src/api.js", "x(1);");
        let options = ScanOptions {
            extra_skip_dirs: vec!["generated".to_string()],
            ..ScanOptions::default_for_tests()
        };
        let result = scan_repo(dir.path(), &options).unwrap();
        assert_eq!(result.files.len(), 1);
        assert_eq!(result.files[0].rel_path, "src/api.js");
    }

    #[test]
    fn repositories_are_sub_directories() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "beta/index.js", "x(1);");
        write(dir.path(), "alpha/index.ts", "x(1);");
        write(dir.path(), ".featurex/summary.json", "{}");
        let repos = discover_repositories(dir.path()).unwrap();
        assert_eq!(repos, vec![dir.path().join("alpha"), dir.path().join("beta")]);

        write(dir.path(), "server.js", "x(1);");
        let repos = discover_repositories(dir.path()).unwrap();
        assert_eq!(repos, vec![dir.path().to_path_buf()]);
    }

    impl ScanOptions {
        fn default_for_tests() -> Self {
            Self {
                no_ignore: true,
                max_file_bytes: 1_000_000,
                extra_skip_dirs: Vec::new(),
            }
        }
    }
}
