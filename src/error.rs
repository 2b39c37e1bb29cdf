//! Error types for module import, generation, configuration and post-processing.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A module that cannot be imported or inspected.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The exception raised by `import_module`, as `Type: message`.
    #[error("{reason}")]
    Import { module: String, reason: String },

    #[error("failed to inspect '{module}': {reason}")]
    Inspect { module: String, reason: String },
}

impl ResolveError {
    /// The module that failed.
    pub fn module(&self) -> &str {
        match self {
            ResolveError::Import { module, .. } | ResolveError::Inspect { module, .. } => module,
        }
    }
}

/// Failure of the generation pipeline as a whole.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("unable to import root module '{module}'")]
    RootUnresolved {
        module: String,
        #[source]
        source: ResolveError,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse configuration {}: {details}", path.display())]
    Parse { path: PathBuf, details: String },

    #[error("invalid predicate '{0}': expected module, module:<name>, subclass:<module.Class> or attr:<name>")]
    Predicate(String),

    #[error("invalid python path pattern '{pattern}': {details}")]
    PythonPath { pattern: String, details: String },
}

#[derive(Debug, Error)]
pub enum PostProcessError {
    #[error("{} does not start with the heading '{title}'", path.display())]
    TitleMismatch { path: PathBuf, title: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
