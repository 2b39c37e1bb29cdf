//! pyrefdoc: generate API reference pages from a Python package.
//!
//! Imports a root package in an embedded Python interpreter, walks its direct
//! submodules, keeps the classes declared in a base module and writes one
//! reStructuredText page for Sphinx:
//!
//! - **defaults**: `pyrefdoc` documents `antelop.analysis` into
//!   `docs/source/api/analysis.rst` and `docs/source/python/stlib.rst`
//! - **explicit**: `pyrefdoc -P src -b lab.base -o docs/api.rst lab.analysis`

mod config;
mod diagnostics;
mod error;
mod extract;
mod filter;
mod interpreter;
mod model;
mod pipeline;
mod postprocess;
mod render;
mod walker;

use anyhow::{Context, Result};
use clap::Parser;
use config::Config;
use diagnostics::{Diagnostic, Reporter, TracingReporter};
use pipeline::Outcome;
use pyo3::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "pyrefdoc",
    about = "Generate reStructuredText API pages from a Python package's classes"
)]
struct Cli {
    /// Root package to document
    root_module: Option<String>,

    /// TOML configuration file (default: ./pyrefdoc.toml if present)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Primary output file
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Document title
    #[arg(short = 't', long)]
    title: Option<String>,

    /// Module documented classes must be declared in
    #[arg(short = 'b', long)]
    base_module: Option<String>,

    /// Module search path entry (glob patterns supported).
    /// Can be specified multiple times; replaces the configured path.
    #[arg(short = 'P', long = "python-path")]
    python_path: Vec<String>,

    /// Class predicate: module, module:<name>, subclass:<module.Class> or attr:<name>
    #[arg(long)]
    predicate: Option<String>,

    /// Secondary (re-titled) output file
    #[arg(long)]
    secondary: Option<PathBuf>,

    /// Title of the secondary output
    #[arg(long)]
    secondary_title: Option<String>,

    /// Do not write the secondary output
    #[arg(long)]
    no_secondary: bool,

    /// Output format: rst (default), json
    #[arg(short = 'f', long)]
    format: Option<String>,

    /// Show debug diagnostics
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    apply_overrides(&mut config, cli);
    run(&config)
}

/// Log to stderr. `RUST_LOG` wins unless `--verbose` asks for debug output.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Command-line flags take precedence over the configuration file.
fn apply_overrides(config: &mut Config, cli: Cli) {
    if let Some(root) = cli.root_module {
        config.root_module = root;
    }
    if let Some(output) = cli.output {
        config.output = output;
    }
    if let Some(title) = cli.title {
        config.title = title;
    }
    if let Some(base) = cli.base_module {
        config.base_module = base;
    }
    if !cli.python_path.is_empty() {
        config.python_path = cli.python_path;
    }
    if let Some(predicate) = cli.predicate {
        config.predicate = predicate;
    }
    if let Some(path) = cli.secondary {
        config.secondary.path = path;
    }
    if let Some(title) = cli.secondary_title {
        config.secondary.title = title;
    }
    if cli.no_secondary {
        config.secondary.enabled = false;
    }
    if let Some(format) = cli.format {
        config.format = format;
    }
}

fn run(config: &Config) -> Result<()> {
    let renderer = render::create_renderer(&config.format)?;
    let predicate = filter::create_predicate(&config.predicate, &config.base_module)?;
    let search_paths = config.search_paths()?;
    let reporter = TracingReporter;

    let outcome = Python::with_gil(|py| -> Result<Outcome> {
        interpreter::prepare(py, &search_paths).context("failed to set up the Python interpreter")?;
        Ok(pipeline::generate(
            py,
            &config.root_module,
            &config.title,
            predicate.as_ref(),
            &reporter,
        )?)
    })?;
    let doc = match outcome {
        Outcome::Generated(doc) => doc,
        Outcome::NothingToDocument => return Ok(()),
    };

    let output = output_path(&config.output, renderer.file_extension());
    write_file(&output, &renderer.render(&doc))?;
    reporter.report(Diagnostic::OutputWritten {
        path: output.display().to_string(),
    });

    if config.secondary.enabled {
        if renderer.file_extension() != "rst" {
            tracing::info!(output_format = %config.format, "secondary output only applies to rst, skipping");
            return Ok(());
        }
        postprocess::write_retitled(
            &output,
            &config.secondary.path,
            &config.title,
            &config.secondary.title,
        )
        .with_context(|| format!("failed to write {}", config.secondary.path.display()))?;
        reporter.report(Diagnostic::OutputWritten {
            path: config.secondary.path.display().to_string(),
        });
    }

    Ok(())
}

/// The configured path, with the renderer's extension when it has none.
fn output_path(path: &Path, extension: &str) -> PathBuf {
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension(extension)
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory: {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_extension_added_when_missing() {
        assert_eq!(output_path(Path::new("docs/api"), "json"), PathBuf::from("docs/api.json"));
        assert_eq!(
            output_path(Path::new("docs/api.rst"), "json"),
            PathBuf::from("docs/api.rst")
        );
    }

    #[test]
    fn flags_override_config() {
        let cli = Cli::parse_from([
            "pyrefdoc",
            "lab.analysis",
            "-P",
            "src",
            "-P",
            "vendor/*",
            "--no-secondary",
            "-t",
            "Reference",
        ]);
        let mut config = Config::default();
        apply_overrides(&mut config, cli);
        assert_eq!(config.root_module, "lab.analysis");
        assert_eq!(config.python_path, vec!["src", "vendor/*"]);
        assert_eq!(config.title, "Reference");
        assert!(!config.secondary.enabled);
        assert_eq!(config.base_module, "antelop.utils.analysis_base");
    }

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
