//! Diagnostic events emitted while generating documentation.
//!
//! The pipeline never prints; it hands [`Diagnostic`] values to a
//! [`Reporter`]. The binary installs [`TracingReporter`], tests capture
//! events with [`RecordingReporter`].

#[cfg(test)]
use std::cell::RefCell;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    Started { root: String },
    ImportingRoot { root: String },
    SubmoduleFound { module: String },
    InspectingModule { module: String },
    SubmoduleSkipped { module: String, reason: String },
    ClassMatched { class: String, module: String, predicate: String },
    SourceUnavailable { class: String, reason: String },
    NothingToDocument { root: String, predicate: String },
    SectionRendered { module: String },
    OutputWritten { path: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::Started { root } => write!(f, "starting documentation for module: {root}"),
            Diagnostic::ImportingRoot { root } => write!(f, "importing module: {root}"),
            Diagnostic::SubmoduleFound { module } => write!(f, "found submodule: {module}"),
            Diagnostic::InspectingModule { module } => write!(f, "inspecting submodule: {module}"),
            Diagnostic::SubmoduleSkipped { module, reason } => {
                write!(f, "unable to import submodule '{module}', skipping: {reason}")
            }
            Diagnostic::ClassMatched {
                class,
                module,
                predicate,
            } => write!(f, "found class: {class} in {module} ({predicate})"),
            Diagnostic::SourceUnavailable { class, reason } => {
                write!(f, "no source for {class}.run: {reason}")
            }
            Diagnostic::NothingToDocument { root, predicate } => {
                write!(f, "no classes found ({predicate}) in any submodule of {root}; nothing to document")
            }
            Diagnostic::SectionRendered { module } => {
                write!(f, "writing documentation for submodule: {module}")
            }
            Diagnostic::OutputWritten { path } => {
                write!(f, "documentation has been written to '{path}'")
            }
        }
    }
}

/// Sink for pipeline diagnostics.
pub trait Reporter {
    fn report(&self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to `tracing` at a level matching their severity.
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, diagnostic: Diagnostic) {
        match &diagnostic {
            Diagnostic::SubmoduleSkipped { module, reason } => {
                tracing::warn!(%module, %reason, "{}", diagnostic)
            }
            Diagnostic::SourceUnavailable { class, .. } => {
                tracing::warn!(%class, "{}", diagnostic)
            }
            Diagnostic::ClassMatched { class, module, .. } => {
                tracing::debug!(%class, %module, "{}", diagnostic)
            }
            Diagnostic::SubmoduleFound { module } | Diagnostic::InspectingModule { module } => {
                tracing::debug!(%module, "{}", diagnostic)
            }
            _ => tracing::info!("{}", diagnostic),
        }
    }
}

/// Keeps every diagnostic in memory.
#[cfg(test)]
#[derive(Default)]
pub struct RecordingReporter {
    events: RefCell<Vec<Diagnostic>>,
}

#[cfg(test)]
impl RecordingReporter {
    pub fn events(&self) -> Vec<Diagnostic> {
        self.events.borrow().clone()
    }
}

#[cfg(test)]
impl Reporter for RecordingReporter {
    fn report(&self, diagnostic: Diagnostic) {
        self.events.borrow_mut().push(diagnostic);
    }
}
