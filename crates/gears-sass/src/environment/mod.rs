//! Minimal asset pipeline host.
//!
//! An [`Environment`] is the explicit context of one build setup: which
//! compiler handles which extension, where sources are found, which files
//! every output depends on, and what was built last time. [`Environment::save`]
//! rebuilds an asset only when its source or one of its declared dependencies
//! changed content, or when its imports now resolve to different files.

mod cache;
mod finder;
mod tracker;

pub use cache::{BuildCache, CacheEntry};
pub use finder::{Asset, FileSystemFinder, FinderRegistry, compile_globset};
pub use tracker::{DependencyRegistry, DependencyTracker};

use crate::compiler::{Compiler, CompilerRegistry, SassOptions};
use crate::module_cache::content_fingerprint;
use crate::reporter::{BuildOutcome, BuildReport};
use crate::types::{EnvironmentConfig, PipelineError};
use rustc_hash::FxHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct Environment {
    config: EnvironmentConfig,
    pub compilers: CompilerRegistry,
    pub finders: FinderRegistry,
    dependencies: DependencyRegistry,
    cache: BuildCache,
}

impl Environment {
    /// Create an environment with no compilers and no finders registered
    pub fn new(config: EnvironmentConfig) -> Self {
        Self {
            config,
            compilers: CompilerRegistry::new(),
            finders: FinderRegistry::new(),
            dependencies: DependencyRegistry::new(),
            cache: BuildCache::new(),
        }
    }

    /// Register the Sass compiler configured from this environment's load
    /// paths and output style
    pub fn register_builtins(&mut self) {
        self.compilers.register_builtins(SassOptions {
            load_paths: self.config.load_paths.clone(),
            style: self.config.style,
            quiet: false,
        });
    }

    pub fn config(&self) -> &EnvironmentConfig {
        &self.config
    }

    /// Dependencies declared for `asset` by its last compilation
    pub fn dependencies_of(&self, asset: &Path) -> &[PathBuf] {
        self.dependencies.dependencies_of(asset)
    }

    /// Build every public asset whose inputs changed since the last save
    pub fn save(&mut self) -> Result<BuildReport, PipelineError> {
        let public = compile_globset(&self.config.public_assets)?;
        let assets = self.finders.find(&public);
        let mut report = BuildReport::default();

        for asset in assets {
            if self.cache.is_output(&asset.absolute) {
                tracing::trace!(asset = %asset.absolute.display(), "written by this environment");
                continue;
            }
            let outcome = self.build(&asset)?;
            report.record(asset.relative, outcome);
        }

        tracing::debug!(
            built = report.built.len(),
            skipped = report.skipped.len(),
            copied = report.copied.len(),
            "environment saved"
        );
        Ok(report)
    }

    fn build(&mut self, asset: &Asset) -> Result<BuildOutcome, PipelineError> {
        let source = &asset.absolute;
        let compiler = self.compilers.for_path(source).map(Arc::clone);
        let output_path = match &compiler {
            Some(compiler) => {
                self.config.root.join(output_name(&asset.relative, compiler.output_extension()))
            }
            None => self.config.root.join(&asset.relative),
        };

        // The output root may also be a source directory
        if output_path.canonicalize().is_ok_and(|output| &output == source) {
            tracing::debug!(asset = %source.display(), "asset is its own output");
            return Ok(BuildOutcome::Skipped);
        }

        if self.cache.is_fresh(source, self.fingerprint(source, compiler.as_deref())?) {
            tracing::trace!(asset = %source.display(), "up to date");
            return Ok(BuildOutcome::Skipped);
        }

        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|source| PipelineError::Io { path: parent.to_path_buf(), source })?;
        }

        let outcome = match &compiler {
            Some(compiler) => {
                self.dependencies.clear_for(source);
                let css = compiler.compile(source, &mut self.dependencies).map_err(|err| {
                    self.cache.invalidate(source);
                    PipelineError::Compiler { path: source.clone(), source: err }
                })?;
                write_output(&output_path, &css)?;
                BuildOutcome::Built
            }
            None => {
                fs::copy(source, &output_path)
                    .map_err(|err| PipelineError::Io { path: source.clone(), source: err })?;
                BuildOutcome::Copied
            }
        };

        tracing::debug!(
            asset = %source.display(),
            output = %output_path.display(),
            ?outcome,
            "asset written"
        );

        let output_path = output_path.canonicalize().unwrap_or(output_path);
        let fingerprint = self.fingerprint(source, compiler.as_deref())?;
        self.cache.insert(source.clone(), CacheEntry { fingerprint, output_path });
        Ok(outcome)
    }

    /// Fingerprint of `asset`, every dependency declared for it, and the list
    /// its imports resolve to now (a new partial can shadow a declared file).
    /// A dependency that no longer exists, or a resolution failure, contributes
    /// a marker so it also forces a rebuild.
    fn fingerprint(
        &self,
        asset: &Path,
        compiler: Option<&dyn Compiler>,
    ) -> Result<u64, PipelineError> {
        let mut hasher = FxHasher::default();
        hasher.write_u64(file_fingerprint(asset)?);

        for dependency in self.dependencies.dependencies_of(asset) {
            match file_fingerprint(dependency) {
                Ok(fingerprint) => hasher.write_u64(fingerprint),
                Err(_) => hasher.write_u8(0xff),
            }
        }

        if let Some(compiler) = compiler {
            match compiler.resolve_dependencies(asset) {
                Ok(resolved) => resolved.hash(&mut hasher),
                Err(_) => hasher.write_u8(0xfe),
            }
        }

        Ok(hasher.finish())
    }
}

fn file_fingerprint(path: &Path) -> Result<u64, PipelineError> {
    let bytes =
        fs::read(path).map_err(|source| PipelineError::Io { path: path.to_path_buf(), source })?;
    Ok(content_fingerprint(&bytes))
}

fn write_output(path: &Path, content: &str) -> Result<(), PipelineError> {
    fs::write(path, content).map_err(|source| PipelineError::Io { path: path.to_path_buf(), source })
}

/// Output path of a compiled asset: the compiler's extension is dropped, and
/// the output extension is added unless it is already there
/// (`main.css.scss` -> `main.css`, `main.scss` -> `main.css`)
fn output_name(relative: &Path, output_extension: &str) -> PathBuf {
    let stripped = relative.with_extension("");
    let ext = output_extension.trim_start_matches('.');

    if stripped.extension().and_then(|e| e.to_str()) == Some(ext) {
        return stripped;
    }

    let mut name = stripped.into_os_string();
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}
