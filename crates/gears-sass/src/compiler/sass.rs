use super::{Compiler, CompilerError};
use crate::environment::DependencyTracker;
use crate::graph::DependencyGraph;
use crate::module_cache::ModuleCache;
use crate::resolver::ImportResolver;
use crate::types::OutputStyle;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Options handed to the Sass engine
#[derive(Debug, Clone, Default)]
pub struct SassOptions {
    /// Extra directories searched for imports after the importing file's directory
    pub load_paths: Vec<PathBuf>,
    pub style: OutputStyle,
    /// Silence `@warn` and `@debug` output from the engine
    pub quiet: bool,
}

/// Sass/SCSS compiler backed by `grass`.
///
/// The adapter resolves imports itself only to declare them as dependencies;
/// the engine does its own import resolution while compiling.
pub struct SassCompiler {
    options: SassOptions,
    graph: DependencyGraph,
}

impl SassCompiler {
    pub fn new(options: SassOptions) -> Self {
        let resolver = Arc::new(ImportResolver::new(options.load_paths.clone()));
        let graph = DependencyGraph::new(resolver, Arc::new(ModuleCache::new()));
        Self { options, graph }
    }

    pub fn options(&self) -> &SassOptions {
        &self.options
    }

    fn engine_options(&self, source: &Path) -> grass::Options<'static> {
        let style = match self.options.style {
            OutputStyle::Expanded => grass::OutputStyle::Expanded,
            OutputStyle::Compressed => grass::OutputStyle::Compressed,
        };

        let mut options = grass::Options::default().style(style).quiet(self.options.quiet);
        if let Some(dir) = source.parent() {
            options = options.load_path(dir);
        }
        for path in &self.options.load_paths {
            options = options.load_path(path);
        }
        options
    }
}

impl Default for SassCompiler {
    fn default() -> Self {
        Self::new(SassOptions::default())
    }
}

impl Compiler for SassCompiler {
    fn extensions(&self) -> &[&str] {
        &[".scss", ".sass"]
    }

    fn output_extension(&self) -> &str {
        ".css"
    }

    fn resolve_dependencies(&self, source: &Path) -> Result<Vec<PathBuf>, CompilerError> {
        Ok(self.graph.resolve_dependencies(source)?)
    }

    fn compile(
        &self,
        source: &Path,
        tracker: &mut dyn DependencyTracker,
    ) -> Result<String, CompilerError> {
        for dependency in self.resolve_dependencies(source)? {
            tracker.add_dependency(source, &dependency);
        }

        tracing::debug!(source = %source.display(), "compiling stylesheet");
        grass::from_path(source, &self.engine_options(source)).map_err(|err| {
            CompilerError::Engine { path: source.to_path_buf(), message: err.to_string() }
        })
    }
}
