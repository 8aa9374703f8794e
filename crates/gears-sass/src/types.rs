use crate::compiler::CompilerError;
use clap::ValueEnum;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default public asset patterns, relative to a finder directory
pub const DEFAULT_PUBLIC_ASSETS: &[&str] = &["**/*.scss", "**/*.sass"];

/// CSS output style of the Sass engine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputStyle {
    #[default]
    Expanded,
    Compressed,
}

/// Configuration for one build environment
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    /// Output directory; built assets are written under it
    pub root: PathBuf,

    /// Glob patterns selecting the source files to build
    pub public_assets: Vec<String>,

    /// Directories searched for imports after the importing file's directory
    pub load_paths: Vec<PathBuf>,

    pub style: OutputStyle,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("static"),
            public_assets: DEFAULT_PUBLIC_ASSETS.iter().map(|s| (*s).to_string()).collect(),
            load_paths: Vec::new(),
            style: OutputStyle::default(),
        }
    }
}

/// Error types for pipeline operations
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("failed to build {}: {source}", path.display())]
    Compiler {
        path: PathBuf,
        #[source]
        source: CompilerError,
    },

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Config(String),

    #[error("Invalid public asset pattern: {0}")]
    Glob(#[from] globset::Error),
}

/// Config file structure for gears.json / gears.jsonc
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    /// Output directory
    pub root: Option<PathBuf>,

    /// Source directories searched for public assets
    #[serde(default)]
    pub sources: Vec<PathBuf>,

    #[serde(default)]
    pub public_assets: Vec<String>,

    #[serde(default)]
    pub load_paths: Vec<PathBuf>,

    pub style: Option<OutputStyle>,
}

impl FileConfig {
    /// Load a config file; `//` and `/* */` comments are allowed
    pub fn from_path(path: &Path) -> Result<Self, PipelineError> {
        let mut content = fs::read_to_string(path)
            .map_err(|source| PipelineError::Io { path: path.to_path_buf(), source })?;
        json_strip_comments::strip(&mut content)
            .map_err(|err| PipelineError::Config(format!("{}: {err}", path.display())))?;
        serde_json::from_str(&content)
            .map_err(|err| PipelineError::Config(format!("{}: {err}", path.display())))
    }
}
