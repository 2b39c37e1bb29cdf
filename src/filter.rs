//! Class Filter: pick the documentable classes among a module's members.
//!
//! The default predicate keeps classes whose declaring module equals the base
//! module exactly; subclasses declared anywhere else are not documented.
//! Subclass and tag-attribute predicates are available for packages where
//! membership is the wrong test.

use crate::diagnostics::{Diagnostic, Reporter};
use crate::error::ConfigError;
use crate::interpreter;
use pyo3::prelude::*;
use pyo3::types::{PyModule, PyType};

/// Decides whether a class belongs in the generated documentation.
pub trait ClassPredicate {
    fn accepts(&self, class: &Bound<'_, PyType>) -> PyResult<bool>;
    /// Short description for diagnostics.
    fn describe(&self) -> String;
}

/// `cls.__module__ == module`
pub struct DeclaringModule(pub String);

impl ClassPredicate for DeclaringModule {
    fn accepts(&self, class: &Bound<'_, PyType>) -> PyResult<bool> {
        let module = class.getattr("__module__")?;
        Ok(module.extract::<String>().is_ok_and(|m| m == self.0))
    }

    fn describe(&self) -> String {
        format!("part of '{}'", self.0)
    }
}

/// Strict subclasses of `module.name`.
pub struct SubclassOf {
    pub module: String,
    pub name: String,
}

impl ClassPredicate for SubclassOf {
    fn accepts(&self, class: &Bound<'_, PyType>) -> PyResult<bool> {
        let Ok(module) = interpreter::import_module(class.py(), &self.module) else {
            return Ok(false);
        };
        let Some(base) = interpreter::attribute(module.as_any(), &self.name)? else {
            return Ok(false);
        };
        if class.as_ptr() == base.as_ptr() || !base.is_instance_of::<PyType>() {
            return Ok(false);
        }
        class.is_subclass(&base)
    }

    fn describe(&self) -> String {
        format!("subclass of '{}.{}'", self.module, self.name)
    }
}

/// Classes that define (or inherit) a non-`None` attribute.
pub struct HasAttribute(pub String);

impl ClassPredicate for HasAttribute {
    fn accepts(&self, class: &Bound<'_, PyType>) -> PyResult<bool> {
        Ok(interpreter::attribute(class.as_any(), &self.0)?.is_some())
    }

    fn describe(&self) -> String {
        format!("defines '{}'", self.0)
    }
}

/// Build a predicate from its textual form.
///
/// `module` uses `base_module`; `module:<name>`, `subclass:<module.Class>`
/// and `attr:<name>` carry their own argument.
pub fn create_predicate(text: &str, base_module: &str) -> Result<Box<dyn ClassPredicate>, ConfigError> {
    let invalid = || ConfigError::Predicate(text.to_string());
    let (kind, arg) = match text.split_once(':') {
        Some((kind, arg)) => (kind.trim(), Some(arg.trim()).filter(|a| !a.is_empty())),
        None => (text.trim(), None),
    };
    match (kind, arg) {
        ("module", None) => Ok(Box::new(DeclaringModule(base_module.to_string()))),
        ("module", Some(module)) => Ok(Box::new(DeclaringModule(module.to_string()))),
        ("subclass", Some(qualified)) => {
            let (module, name) = qualified.rsplit_once('.').ok_or_else(invalid)?;
            Ok(Box::new(SubclassOf {
                module: module.to_string(),
                name: name.to_string(),
            }))
        }
        ("attr", Some(attr)) => Ok(Box::new(HasAttribute(attr.to_string()))),
        _ => Err(invalid()),
    }
}

/// Class-valued members of `module` accepted by `predicate`, in
/// `inspect.getmembers` order (sorted by member name).
pub fn collect_matching_classes<'py>(
    module: &Bound<'py, PyModule>,
    module_name: &str,
    predicate: &dyn ClassPredicate,
    reporter: &dyn Reporter,
) -> PyResult<Vec<(String, Bound<'py, PyType>)>> {
    let members = module
        .py()
        .import("inspect")?
        .call_method1("getmembers", (module,))?;
    let mut matches = Vec::new();
    for member in members.try_iter()? {
        let (name, value): (String, Bound<'py, PyAny>) = member?.extract()?;
        let Ok(class) = value.downcast_into::<PyType>() else {
            continue;
        };
        if !predicate.accepts(&class)? {
            continue;
        }
        reporter.report(Diagnostic::ClassMatched {
            class: name.clone(),
            module: module_name.to_string(),
            predicate: predicate.describe(),
        });
        matches.push((name, class));
    }
    Ok(matches)
}
