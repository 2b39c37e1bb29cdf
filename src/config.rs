//! Configuration handling for pyrefdoc.
//!
//! Settings come from `pyrefdoc.toml` (or the file given with `--config`),
//! then command-line flags override individual values. Every setting has a
//! default, so an empty or missing file documents `antelop.analysis`.

use crate::error::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "pyrefdoc.toml";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Package whose submodules are documented.
    pub root_module: String,

    /// Module classes must be declared in to be documented.
    pub base_module: String,

    /// Heading of the generated page.
    pub title: String,

    /// Primary output file.
    pub output: PathBuf,

    /// `rst` or `json`.
    pub format: String,

    /// Module search path; entries may be glob patterns.
    pub python_path: Vec<String>,

    /// Class predicate, see [`crate::filter::create_predicate`].
    pub predicate: String,

    pub secondary: SecondaryConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_module: "antelop.analysis".to_string(),
            base_module: "antelop.utils.analysis_base".to_string(),
            title: "Analysis".to_string(),
            output: PathBuf::from("docs/source/api/analysis.rst"),
            format: "rst".to_string(),
            python_path: vec![".".to_string()],
            predicate: "module".to_string(),
            secondary: SecondaryConfig::default(),
        }
    }
}

/// Re-titled copy of the primary page
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SecondaryConfig {
    pub enabled: bool,
    pub path: PathBuf,
    pub title: String,
}

impl Default for SecondaryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: PathBuf::from("docs/source/python/stlib.rst"),
            title: "Analysis standard library".to_string(),
        }
    }
}

impl Config {
    /// Load `path`, or `pyrefdoc.toml` when it exists, or the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let candidate = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !candidate.is_file() {
                    return Ok(Self::default());
                }
                candidate
            }
        };
        let text = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        Self::from_toml_str(&text, &path)
    }

    pub fn from_toml_str(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            details: e.to_string(),
        })
    }

    /// Search path directories with glob patterns expanded.
    ///
    /// Existing directories are taken as they are; anything else is matched
    /// as a glob and contributes its directory matches in sorted order.
    /// Order is preserved and duplicates keep their first position.
    pub fn search_paths(&self) -> Result<Vec<PathBuf>, ConfigError> {
        let mut dirs: Vec<PathBuf> = Vec::new();
        for pattern in &self.python_path {
            let path = Path::new(pattern);
            if path.is_dir() {
                if !dirs.iter().any(|d| d == path) {
                    dirs.push(path.to_path_buf());
                }
                continue;
            }
            let mut matches: Vec<PathBuf> = glob::glob(pattern)
                .map_err(|e| ConfigError::PythonPath {
                    pattern: pattern.clone(),
                    details: e.to_string(),
                })?
                .filter_map(|r| r.ok())
                .filter(|p| p.is_dir())
                .collect();
            if matches.is_empty() {
                tracing::warn!(%pattern, "no directories matched python path entry");
            }
            matches.sort();
            for dir in matches {
                if !dirs.contains(&dir) {
                    dirs.push(dir);
                }
            }
        }
        Ok(dirs)
    }
}
