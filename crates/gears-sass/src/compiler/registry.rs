use super::{Compiler, SassCompiler, SassOptions};
use rustc_hash::FxHashMap;
use std::path::Path;
use std::sync::Arc;

/// Registry of compilers mapped by file extension
pub struct CompilerRegistry {
    /// Map of extension (with dot) -> compiler
    compilers: FxHashMap<String, Arc<dyn Compiler>>,
}

impl CompilerRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self { compilers: FxHashMap::default() }
    }

    /// Associate one extension (with dot, e.g. ".scss") with a compiler
    pub fn register(&mut self, extension: &str, compiler: Arc<dyn Compiler>) {
        self.compilers.insert(normalize(extension), compiler);
    }

    /// Register a compiler for all its supported extensions
    pub fn register_all(&mut self, compiler: Arc<dyn Compiler>) {
        for ext in compiler.extensions() {
            self.compilers.insert(normalize(ext), Arc::clone(&compiler));
        }
    }

    /// Register the built-in Sass compiler
    pub fn register_builtins(&mut self, options: SassOptions) {
        self.register_all(Arc::new(SassCompiler::new(options)));
    }

    /// Get compiler for a file extension (with dot, e.g., ".scss")
    pub fn get(&self, extension: &str) -> Option<&Arc<dyn Compiler>> {
        self.compilers.get(&normalize(extension))
    }

    /// Compiler for a path, chosen by its last extension
    pub fn for_path(&self, path: &Path) -> Option<&Arc<dyn Compiler>> {
        self.get(path.extension()?.to_str()?)
    }

    /// Get all registered extensions
    pub fn extensions(&self) -> impl Iterator<Item = &String> {
        self.compilers.keys()
    }

    /// Check if a compiler is registered for the given extension
    pub fn has_compiler(&self, extension: &str) -> bool {
        self.compilers.contains_key(&normalize(extension))
    }
}

impl Default for CompilerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize(extension: &str) -> String {
    let ext = extension.to_ascii_lowercase();
    if ext.starts_with('.') { ext } else { format!(".{ext}") }
}
