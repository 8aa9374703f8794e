use crate::module_cache::ModuleCache;
use crate::parser::ParseError;
use crate::resolver::ImportResolver;
use rustc_hash::FxHashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Error types for dependency resolution
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Can't find stylesheet to import \"{reference}\" from {}:{line}", importer.display())]
    Unresolved { reference: String, importer: PathBuf, line: usize },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<ParseError> for ResolveError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::Io { path, source } => ResolveError::Io { path, source },
        }
    }
}

/// A file whose resolved imports are still being walked
struct Frame {
    children: std::vec::IntoIter<PathBuf>,
}

/// Walks the import graph of a stylesheet
pub struct DependencyGraph {
    resolver: Arc<ImportResolver>,
    module_cache: Arc<ModuleCache>,
}

impl DependencyGraph {
    pub fn new(resolver: Arc<ImportResolver>, module_cache: Arc<ModuleCache>) -> Self {
        Self { resolver, module_cache }
    }

    /// Every file transitively imported by `root`, in depth-first pre-order,
    /// each path once. `root` itself is never part of the result, even when
    /// an import cycle leads back to it.
    pub fn resolve_dependencies(&self, root: &Path) -> Result<Vec<PathBuf>, ResolveError> {
        let root = root
            .canonicalize()
            .map_err(|source| ResolveError::Io { path: root.to_path_buf(), source })?;

        let mut visited: FxHashSet<PathBuf> = FxHashSet::default();
        visited.insert(root.clone());
        let mut dependencies = Vec::new();
        let mut stack = vec![Frame { children: self.direct_imports(&root)?.into_iter() }];

        while let Some(frame) = stack.last_mut() {
            let Some(child) = frame.children.next() else {
                stack.pop();
                continue;
            };

            if !visited.insert(child.clone()) {
                continue;
            }

            let nested = self.direct_imports(&child)?;
            dependencies.push(child);
            stack.push(Frame { children: nested.into_iter() });
        }

        tracing::debug!(
            root = %root.display(),
            count = dependencies.len(),
            "resolved stylesheet dependencies"
        );
        Ok(dependencies)
    }

    /// Resolved direct imports of one file, in source order
    fn direct_imports(&self, file: &Path) -> Result<Vec<PathBuf>, ResolveError> {
        let imports = self.module_cache.get_or_scan(file)?;
        let mut resolved = Vec::with_capacity(imports.len());

        for import in imports.iter() {
            match self.resolver.resolve(file, &import.source) {
                Some(path) => resolved.push(path),
                None => {
                    return Err(ResolveError::Unresolved {
                        reference: import.source.clone(),
                        importer: file.to_path_buf(),
                        line: import.line,
                    });
                }
            }
        }

        Ok(resolved)
    }
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new(Arc::new(ImportResolver::default()), Arc::new(ModuleCache::new()))
    }
}

/// Resolve the dependencies of `root` with a fresh resolver and no load paths
pub fn resolve_dependencies(root: &Path) -> Result<Vec<PathBuf>, ResolveError> {
    DependencyGraph::default().resolve_dependencies(root)
}
