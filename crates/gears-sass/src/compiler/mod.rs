mod registry;
mod sass;

pub use registry::CompilerRegistry;
pub use sass::{SassCompiler, SassOptions};

use crate::environment::DependencyTracker;
use crate::graph::ResolveError;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error types for compiler operations
#[derive(Error, Debug)]
pub enum CompilerError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("Compilation of {} failed: {message}", path.display())]
    Engine { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A compiler turns one source asset into its output text
pub trait Compiler: Send + Sync {
    /// File extensions this compiler handles (e.g., [".scss", ".sass"])
    fn extensions(&self) -> &[&str];

    /// Extension of the produced asset (e.g., ".css")
    fn output_extension(&self) -> &str;

    /// Every file the output of `source` depends on, in discovery order
    fn resolve_dependencies(&self, source: &Path) -> Result<Vec<PathBuf>, CompilerError>;

    /// Compile `source`, declaring its dependencies to `tracker` first
    fn compile(
        &self,
        source: &Path,
        tracker: &mut dyn DependencyTracker,
    ) -> Result<String, CompilerError>;
}
