use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// Combined fingerprint of the source and its declared dependencies
    pub fingerprint: u64,
    pub output_path: PathBuf,
}

/// Last successful build of each asset
#[derive(Debug, Default)]
pub struct BuildCache {
    entries: FxHashMap<PathBuf, CacheEntry>,
}

impl BuildCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, asset: &Path) -> Option<&CacheEntry> {
        self.entries.get(asset)
    }

    pub fn insert(&mut self, asset: PathBuf, entry: CacheEntry) {
        self.entries.insert(asset, entry);
    }

    pub fn invalidate(&mut self, asset: &Path) {
        self.entries.remove(asset);
    }

    /// True when `asset` was built from exactly this fingerprint and its
    /// output is still on disk
    pub fn is_fresh(&self, asset: &Path, fingerprint: u64) -> bool {
        self.get(asset).is_some_and(|entry| {
            entry.fingerprint == fingerprint && entry.output_path.is_file()
        })
    }

    /// True when `path` is the output of some cached asset
    pub fn is_output(&self, path: &Path) -> bool {
        self.entries.values().any(|entry| entry.output_path == path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_output() {
        let mut cache = BuildCache::new();
        cache.insert(
            PathBuf::from("/src/main.scss"),
            CacheEntry { fingerprint: 1, output_path: PathBuf::from("/src/main.css") },
        );

        assert!(cache.is_output(Path::new("/src/main.css")));
        assert!(!cache.is_output(Path::new("/src/main.scss")));

        cache.invalidate(Path::new("/src/main.scss"));
        assert!(!cache.is_output(Path::new("/src/main.css")));
    }
}
