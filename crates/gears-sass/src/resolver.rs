use std::path::{Path, PathBuf};

/// Extensions probed when a reference has none, in precedence order
pub const STYLESHEET_EXTENSIONS: &[&str] = &["scss", "sass", "css"];

/// Index file names tried when a reference names a directory
const INDEX_FILES: &[&str] = &["_index.scss", "index.scss", "_index.sass", "index.sass"];

/// Maps an import reference to a stylesheet on disk using Sass naming rules:
/// partials (`_name`) before bare names, extension probing, the importing
/// file's directory before any load path.
pub struct ImportResolver {
    load_paths: Vec<PathBuf>,
}

impl ImportResolver {
    pub fn new(load_paths: Vec<PathBuf>) -> Self {
        Self { load_paths }
    }

    pub fn load_paths(&self) -> &[PathBuf] {
        &self.load_paths
    }

    /// Resolve `reference` as imported from `from`.
    ///
    /// Returns the canonical path of the first existing candidate.
    pub fn resolve(&self, from: &Path, reference: &str) -> Option<PathBuf> {
        let importer_dir = from.parent();
        let bases = importer_dir.into_iter().chain(self.load_paths.iter().map(PathBuf::as_path));

        for base in bases {
            for candidate in candidates(base, reference) {
                if candidate.is_file() {
                    if let Ok(path) = candidate.canonicalize() {
                        tracing::trace!(reference, resolved = %path.display(), "resolved import");
                        return Some(path);
                    }
                }
            }
        }

        None
    }
}

impl Default for ImportResolver {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// Candidate paths for `reference` inside `base`, most preferred first
fn candidates(base: &Path, reference: &str) -> Vec<PathBuf> {
    let target = base.join(reference);
    let Some(name) = target.file_name().and_then(|n| n.to_str()).map(str::to_string) else {
        return Vec::new();
    };
    let dir = target.parent().unwrap_or(base);

    let has_extension = Path::new(&name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| STYLESHEET_EXTENSIONS.contains(&ext));

    let mut paths = Vec::new();
    if has_extension {
        paths.push(dir.join(format!("_{name}")));
        paths.push(dir.join(&name));
    } else {
        for ext in STYLESHEET_EXTENSIONS {
            paths.push(dir.join(format!("_{name}.{ext}")));
            paths.push(dir.join(format!("{name}.{ext}")));
        }
        for index in INDEX_FILES {
            paths.push(target.join(index));
        }
    }
    paths
}
