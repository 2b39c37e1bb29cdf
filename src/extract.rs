//! Metadata Extractor: turn a documentable class into a [`ClassRecord`].
//!
//! Extraction only talks to [`ClassDescriptor`]; [`RuntimeClass`] implements
//! it over a live class object.

use crate::diagnostics::{Diagnostic, Reporter};
use crate::interpreter;
use crate::model::{ClassRecord, Field};
use pyo3::prelude::*;
use pyo3::types::PyType;
use std::collections::BTreeMap;

const ARGUMENTS: &str = "Arguments";

/// What the extractor needs to know about a class.
pub trait ClassDescriptor {
    /// `cls.__name__`
    fn intrinsic_name(&self) -> &str;
    /// `cls.__module__`
    fn declaring_module(&self) -> &str;
    /// The `name` attribute if the class has one.
    fn display_name(&self) -> Option<String>;
    /// Cleaned docstring, inherited when the class has none of its own.
    fn doc_text(&self) -> Option<String>;
    /// Value of a documented attribute, `None` when absent, `None` or empty.
    fn field(&self, field: Field) -> Option<String>;
    /// Source of the `run` method. `Ok(None)` when there is no `run`.
    fn run_source(&self) -> Result<Option<String>, String>;
}

/// Paragraph-separate every line and embolden `Arguments`.
pub fn format_docstring(doc: &str) -> String {
    doc.replace('\n', "\n\n")
        .replace(ARGUMENTS, &format!("**{ARGUMENTS}**"))
}

/// Collect the documentation record for one class.
pub fn extract(class: &dyn ClassDescriptor, reporter: &dyn Reporter) -> ClassRecord {
    let docstring = class.doc_text().map(|doc| format_docstring(&doc));

    let mut fields = BTreeMap::new();
    let documents_arguments = docstring
        .as_deref()
        .is_some_and(|doc| doc.contains(ARGUMENTS));
    if !documents_arguments {
        if let Some(value) = class.field(Field::Arguments) {
            fields.insert(Field::Arguments, value);
        }
    }
    for field in Field::ATTRIBUTES {
        if let Some(value) = class.field(field) {
            fields.insert(field, value);
        }
    }

    let run_source = match class.run_source() {
        Ok(source) => source,
        Err(reason) => {
            reporter.report(Diagnostic::SourceUnavailable {
                class: class.intrinsic_name().to_string(),
                reason,
            });
            None
        }
    };

    ClassRecord {
        display_name: class
            .display_name()
            .unwrap_or_else(|| class.intrinsic_name().to_string()),
        docstring,
        declaring_module: class.declaring_module().to_string(),
        fields,
        run_source,
    }
}

/// An imported class; attributes are read with `getattr`, so the MRO,
/// metaclasses and descriptors all apply.
pub struct RuntimeClass<'py> {
    class: Bound<'py, PyType>,
    name: String,
    module: String,
}

impl<'py> RuntimeClass<'py> {
    pub fn new(class: Bound<'py, PyType>) -> PyResult<Self> {
        let name = class.getattr("__name__")?.extract()?;
        let module = class.getattr("__module__")?.extract()?;
        Ok(Self {
            class,
            name,
            module,
        })
    }

    /// `str(getattr(cls, attr, None))`, or `None` for a missing or `None` value.
    fn attribute_text(&self, attr: &str) -> Option<String> {
        interpreter::attribute(self.class.as_any(), attr)
            .ok()
            .flatten()
            .and_then(|value| interpreter::display(&value).ok())
    }
}

impl ClassDescriptor for RuntimeClass<'_> {
    fn intrinsic_name(&self) -> &str {
        &self.name
    }

    fn declaring_module(&self) -> &str {
        &self.module
    }

    fn display_name(&self) -> Option<String> {
        self.attribute_text("name")
    }

    fn doc_text(&self) -> Option<String> {
        interpreter::getdoc(self.class.as_any()).ok().flatten()
    }

    fn field(&self, field: Field) -> Option<String> {
        self.attribute_text(field.attribute()).filter(|v| !v.is_empty())
    }

    fn run_source(&self) -> Result<Option<String>, String> {
        let run = match interpreter::attribute(self.class.as_any(), "run") {
            Ok(Some(run)) => run,
            Ok(None) => return Ok(None),
            Err(err) => return Err(err.to_string()),
        };
        // properties and other non-callables get no code dropdown
        if !run.is_truthy().map_err(|e| e.to_string())? || !run.is_callable() {
            return Ok(None);
        }
        interpreter::getsource(&run).map(Some).map_err(|e| e.to_string())
    }
}
