use crate::types::OutputStyle;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gears-sass")]
#[command(about = "Build Sass/SCSS assets, rebuilding only what changed")]
pub struct Cli {
    /// Path to config file (gears.json or gears.jsonc)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Source directories searched for public assets [default: .]
    #[arg(short, long)]
    pub source: Vec<PathBuf>,

    /// Output directory [default: static]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Public asset glob patterns [default: **/*.scss, **/*.sass]
    #[arg(short, long)]
    pub public: Vec<String>,

    /// Extra import load paths
    #[arg(short = 'I', long = "load-path")]
    pub load_path: Vec<PathBuf>,

    /// CSS output style
    #[arg(long)]
    pub style: Option<OutputStyle>,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,

    /// Print the import dependencies of one stylesheet instead of building
    #[arg(long, value_name = "FILE")]
    pub deps: Option<PathBuf>,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_build_args() {
        let cli = Cli::parse_from([
            "gears-sass",
            "-s",
            "assets",
            "-o",
            "public",
            "-I",
            "vendor",
            "--style",
            "compressed",
            "--format",
            "json",
        ]);

        assert_eq!(cli.source, vec![PathBuf::from("assets")]);
        assert_eq!(cli.output, Some(PathBuf::from("public")));
        assert_eq!(cli.load_path, vec![PathBuf::from("vendor")]);
        assert_eq!(cli.style, Some(OutputStyle::Compressed));
        assert!(matches!(cli.format, OutputFormat::Json));
        assert!(cli.deps.is_none());
    }

    #[test]
    fn test_parse_deps_mode() {
        let cli = Cli::parse_from(["gears-sass", "--deps", "main.scss", "-v"]);
        assert_eq!(cli.deps, Some(PathBuf::from("main.scss")));
        assert!(cli.verbose);
    }
}
