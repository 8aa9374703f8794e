use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use gears_sass::cli::{Cli, OutputFormat};
use gears_sass::module_cache::ModuleCache;
use gears_sass::reporter::{report_dependencies, report_json, report_text};
use gears_sass::resolver::ImportResolver;
use gears_sass::{DependencyGraph, EnvironmentConfig, FileConfig, build, init_tracing};

/// Find default config file in directory
fn find_default_config(dir: &Path) -> Option<PathBuf> {
    let json_path = dir.join("gears.json");
    if json_path.exists() {
        return Some(json_path);
    }

    let jsonc_path = dir.join("gears.jsonc");
    if jsonc_path.exists() {
        return Some(jsonc_path);
    }

    None
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Load config file
    let file_config = if let Some(config_path) = &cli.config {
        // Use specified config file (error if not found)
        if !config_path.exists() {
            eprintln!("Error: Config file not found: {}", config_path.display());
            std::process::exit(1);
        }
        FileConfig::from_path(config_path)?
    } else {
        // Look for default config file in the current directory
        match find_default_config(Path::new(".")) {
            Some(path) => match FileConfig::from_path(&path) {
                Ok(cfg) => cfg,
                Err(e) => {
                    eprintln!("Warning: {e}");
                    FileConfig::default()
                }
            },
            None => FileConfig::default(),
        }
    };

    // Merge config: CLI args override file config
    let load_paths =
        if !cli.load_path.is_empty() { cli.load_path } else { file_config.load_paths };

    if let Some(stylesheet) = &cli.deps {
        let resolver = Arc::new(ImportResolver::new(load_paths));
        let graph = DependencyGraph::new(resolver, Arc::new(ModuleCache::new()));
        match graph.resolve_dependencies(stylesheet) {
            Ok(deps) => match cli.format {
                OutputFormat::Text => report_dependencies(&deps),
                OutputFormat::Json => report_json(&deps)?,
            },
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    let defaults = EnvironmentConfig::default();
    let sources = if !cli.source.is_empty() {
        cli.source
    } else if !file_config.sources.is_empty() {
        file_config.sources
    } else {
        vec![PathBuf::from(".")]
    };

    let public_assets = if !cli.public.is_empty() {
        cli.public
    } else if !file_config.public_assets.is_empty() {
        file_config.public_assets
    } else {
        defaults.public_assets
    };

    let config = EnvironmentConfig {
        root: cli.output.or(file_config.root).unwrap_or(defaults.root),
        public_assets,
        load_paths,
        style: cli.style.or(file_config.style).unwrap_or(defaults.style),
    };

    match build(config, sources) {
        Ok(report) => match cli.format {
            OutputFormat::Text => report_text(&report),
            OutputFormat::Json => report_json(&report)?,
        },
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }

    Ok(())
}
