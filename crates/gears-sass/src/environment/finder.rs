use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use rustc_hash::FxHashSet;
use std::path::{Path, PathBuf};

/// A source file selected for building
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    /// Path relative to the finder directory, also used for the output path
    pub relative: PathBuf,
    /// Canonical path on disk
    pub absolute: PathBuf,
}

/// Compile a list of glob patterns into a GlobSet for efficient matching
pub fn compile_globset(patterns: &[String]) -> Result<GlobSet, globset::Error> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    builder.build()
}

/// Partials are only ever compiled through an import
fn is_partial(path: &Path) -> bool {
    path.file_name().and_then(|n| n.to_str()).is_some_and(|n| n.starts_with('_'))
}

/// Finds public assets below a set of source directories
pub struct FileSystemFinder {
    directories: Vec<PathBuf>,
}

impl FileSystemFinder {
    pub fn new(directories: Vec<PathBuf>) -> Self {
        Self { directories }
    }

    pub fn directories(&self) -> &[PathBuf] {
        &self.directories
    }

    /// Walk every directory and collect files matching `public`, sorted by
    /// relative path
    pub fn find(&self, public: &GlobSet) -> Vec<Asset> {
        let mut assets = Vec::new();

        for dir in &self.directories {
            let mut walker_builder = WalkBuilder::new(dir);
            walker_builder.hidden(false).git_ignore(true);

            for entry in walker_builder.build().flatten() {
                let path = entry.path();

                if !path.is_file() || is_partial(path) {
                    continue;
                }

                let relative = path.strip_prefix(dir).unwrap_or(path);
                if !public.is_match(relative) {
                    continue;
                }

                let absolute = match path.canonicalize() {
                    Ok(c) => c,
                    Err(_) => continue,
                };

                assets.push(Asset { relative: relative.to_path_buf(), absolute });
            }
        }

        assets.sort_by(|a, b| a.relative.cmp(&b.relative));
        assets
    }
}

/// Ordered set of finders; earlier finders shadow later ones for the same
/// relative path
#[derive(Default)]
pub struct FinderRegistry {
    finders: Vec<FileSystemFinder>,
}

impl FinderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, finder: FileSystemFinder) {
        self.finders.push(finder);
    }

    pub fn len(&self) -> usize {
        self.finders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.finders.is_empty()
    }

    pub fn find(&self, public: &GlobSet) -> Vec<Asset> {
        let mut seen = FxHashSet::default();
        let mut assets = Vec::new();

        for finder in &self.finders {
            for asset in finder.find(public) {
                if seen.insert(asset.relative.clone()) {
                    assets.push(asset);
                } else {
                    tracing::debug!(asset = %asset.absolute.display(), "shadowed by earlier finder");
                }
            }
        }

        assets
    }
}
