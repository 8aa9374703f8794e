use crate::parser::{ImportInfo, ParseError, Syntax, scan_imports};
use dashmap::DashMap;
use rustc_hash::FxHasher;
use std::hash::Hasher;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Hash of file content, used to detect edits between builds
pub fn content_fingerprint(bytes: &[u8]) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write(bytes);
    hasher.write_usize(bytes.len());
    hasher.finish()
}

/// Scanned directives of one stylesheet, tagged with the content they came from
#[derive(Debug, Clone)]
struct ModuleInfo {
    fingerprint: u64,
    imports: Arc<[ImportInfo]>,
}

/// Thread-safe cache of scanned import directives.
///
/// Each lookup re-reads the file and compares fingerprints, so an edited file
/// is rescanned while unchanged files skip the scan.
pub struct ModuleCache {
    cache: DashMap<PathBuf, ModuleInfo>,
}

impl ModuleCache {
    pub fn new() -> Self {
        Self { cache: DashMap::new() }
    }

    /// Get or compute the directives of a file
    pub fn get_or_scan(&self, path: &Path) -> Result<Arc<[ImportInfo]>, ParseError> {
        let content = std::fs::read_to_string(path)
            .map_err(|source| ParseError::Io { path: path.to_path_buf(), source })?;
        let fingerprint = content_fingerprint(content.as_bytes());

        // Fast path: already scanned this exact content
        if let Some(info) = self.cache.get(path) {
            if info.fingerprint == fingerprint {
                return Ok(Arc::clone(&info.imports));
            }
        }

        let imports: Arc<[ImportInfo]> = scan_imports(&content, Syntax::from_path(path)).into();
        self.cache.insert(
            path.to_path_buf(),
            ModuleInfo { fingerprint, imports: Arc::clone(&imports) },
        );
        Ok(imports)
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Check if cache is empty
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn clear(&self) {
        self.cache.clear();
    }
}

impl Default for ModuleCache {
    fn default() -> Self {
        Self::new()
    }
}
