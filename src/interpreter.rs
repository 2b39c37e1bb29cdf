//! Embedded CPython: search path setup and the `importlib` and `inspect`
//! calls the generator is built on.
//!
//! Classes are imported and inspected live, so decorators, conditional
//! imports and inherited attributes behave exactly as they do for the
//! package's users.

use crate::error::ResolveError;
use pyo3::exceptions::PyAttributeError;
use pyo3::prelude::*;
use pyo3::types::{PyList, PyModule};
use std::path::PathBuf;

/// Put `search_paths` in front of `sys.path`, in the given order.
///
/// Bytecode writing is switched off so documenting a package never leaves
/// `__pycache__` directories behind in its source tree.
pub fn prepare(py: Python<'_>, search_paths: &[PathBuf]) -> PyResult<()> {
    let sys = py.import("sys")?;
    sys.setattr("dont_write_bytecode", true)?;
    let path = sys.getattr("path")?.downcast_into::<PyList>()?;
    for dir in search_paths.iter().rev() {
        path.insert(0, dir.to_string_lossy().as_ref())?;
    }
    py.import("importlib")?.call_method0("invalidate_caches")?;
    Ok(())
}

/// `importlib.import_module(name)`.
///
/// Any exception raised by the import is a failure, not only `ImportError`:
/// a submodule with a syntax error must not abort the run.
pub fn import_module<'py>(py: Python<'py>, name: &str) -> Result<Bound<'py, PyModule>, ResolveError> {
    py.import("importlib")
        .and_then(|importlib| importlib.call_method1("import_module", (name,)))
        .and_then(|module| Ok(module.downcast_into::<PyModule>()?))
        .map_err(|err| ResolveError::Import {
            module: name.to_string(),
            reason: err.to_string(),
        })
}

/// `getattr(obj, name, None)`, with `None` values reported as absent.
pub fn attribute<'py>(obj: &Bound<'py, PyAny>, name: &str) -> PyResult<Option<Bound<'py, PyAny>>> {
    match obj.getattr(name) {
        Ok(value) if value.is_none() => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_instance_of::<PyAttributeError>(obj.py()) => Ok(None),
        Err(err) => Err(err),
    }
}

/// `str(value)`
pub fn display(value: &Bound<'_, PyAny>) -> PyResult<String> {
    value.str()?.extract()
}

/// `inspect.getdoc(obj)`: cleaned, inherited for classes, `None` when empty.
pub fn getdoc(obj: &Bound<'_, PyAny>) -> PyResult<Option<String>> {
    let doc = obj.py().import("inspect")?.call_method1("getdoc", (obj,))?;
    if doc.is_none() {
        return Ok(None);
    }
    let doc: String = doc.extract()?;
    Ok(Some(doc).filter(|d| !d.is_empty()))
}

/// `inspect.getsource(obj)`
pub fn getsource(obj: &Bound<'_, PyAny>) -> PyResult<String> {
    obj.py()
        .import("inspect")?
        .call_method1("getsource", (obj,))?
        .extract()
}
