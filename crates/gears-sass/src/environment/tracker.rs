use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};

/// Host side of dependency declaration: "asset depends on dependency"
pub trait DependencyTracker {
    fn add_dependency(&mut self, asset: &Path, dependency: &Path);
}

/// Asset -> ordered dependency list, as declared by compilers
#[derive(Debug, Default)]
pub struct DependencyRegistry {
    dependencies: FxHashMap<PathBuf, Vec<PathBuf>>,
}

impl DependencyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dependencies declared for `asset`, in declaration order
    pub fn dependencies_of(&self, asset: &Path) -> &[PathBuf] {
        self.dependencies.get(asset).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Forget everything declared for `asset`, before it is rebuilt
    pub fn clear_for(&mut self, asset: &Path) {
        self.dependencies.remove(asset);
    }

    /// Number of assets with declared dependencies
    pub fn len(&self) -> usize {
        self.dependencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }
}

impl DependencyTracker for DependencyRegistry {
    fn add_dependency(&mut self, asset: &Path, dependency: &Path) {
        let deps = self.dependencies.entry(asset.to_path_buf()).or_default();
        if !deps.iter().any(|d| d == dependency) {
            deps.push(dependency.to_path_buf());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_declaration_order_without_duplicates() {
        let mut registry = DependencyRegistry::new();
        let asset = Path::new("/src/main.scss");
        registry.add_dependency(asset, Path::new("/src/_b.scss"));
        registry.add_dependency(asset, Path::new("/src/_a.scss"));
        registry.add_dependency(asset, Path::new("/src/_b.scss"));

        assert_eq!(
            registry.dependencies_of(asset),
            &[PathBuf::from("/src/_b.scss"), PathBuf::from("/src/_a.scss")]
        );
    }

    #[test]
    fn test_clear_for() {
        let mut registry = DependencyRegistry::new();
        let asset = Path::new("/src/main.scss");
        registry.add_dependency(asset, Path::new("/src/_a.scss"));
        assert_eq!(registry.len(), 1);

        registry.clear_for(asset);
        assert!(registry.dependencies_of(asset).is_empty());
        assert!(registry.is_empty());
    }
}
