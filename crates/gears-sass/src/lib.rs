pub mod cli;
pub mod compiler;
pub mod environment;
pub mod graph;
pub mod module_cache;
pub mod parser;
pub mod reporter;
pub mod resolver;
pub mod types;

use std::sync::Once;

pub use compiler::{Compiler, CompilerError, CompilerRegistry, SassCompiler, SassOptions};
pub use environment::{DependencyRegistry, DependencyTracker, Environment, FileSystemFinder};
pub use graph::{DependencyGraph, ResolveError, resolve_dependencies};
pub use reporter::BuildReport;
pub use types::{DEFAULT_PUBLIC_ASSETS, EnvironmentConfig, FileConfig, OutputStyle, PipelineError};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. `RUST_LOG` wins when set; otherwise `verbose`
/// enables `gears_sass=debug` and warnings are shown by default.
pub fn init_tracing(verbose: bool) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{EnvFilter, fmt, prelude::*};

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(if verbose { "gears_sass=debug" } else { "warn" })
        });
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_level(true).with_writer(std::io::stderr))
            .with(filter)
            .init();
    });
}

/// Build every public asset of a one-shot environment
///
/// # Example
/// ```no_run
/// use gears_sass::{EnvironmentConfig, build};
/// use std::path::PathBuf;
///
/// let config = EnvironmentConfig { root: PathBuf::from("static"), ..Default::default() };
///
/// let report = build(config, vec![PathBuf::from("assets")]).unwrap();
/// println!("Built {} assets", report.built.len());
/// ```
pub fn build(
    config: EnvironmentConfig,
    sources: Vec<std::path::PathBuf>,
) -> Result<BuildReport, PipelineError> {
    let mut environment = Environment::new(config);
    environment.register_builtins();
    environment.finders.register(FileSystemFinder::new(sources));
    environment.save()
}
