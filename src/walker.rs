//! Module Walker: import the root package and list its direct submodules.

use crate::error::ResolveError;
use crate::interpreter;
use pyo3::prelude::*;
use pyo3::types::PyModule;

/// Direct children of `module`, in `pkgutil.iter_modules` order.
///
/// Plain modules have no `__path__` and therefore no children.
pub fn submodules(module: &Bound<'_, PyModule>, name: &str) -> PyResult<Vec<String>> {
    let Some(path) = interpreter::attribute(module.as_any(), "__path__")? else {
        return Ok(Vec::new());
    };
    let mut names = Vec::new();
    let infos = module
        .py()
        .import("pkgutil")?
        .call_method1("iter_modules", (path,))?;
    for info in infos.try_iter()? {
        let child: String = info?.getattr("name")?.extract()?;
        names.push(format!("{name}.{child}"));
    }
    Ok(names)
}

/// Import the root module and list the modules to inspect: its direct
/// submodules followed by the root itself.
pub fn discover<'py>(
    py: Python<'py>,
    root: &str,
) -> Result<(Bound<'py, PyModule>, Vec<String>), ResolveError> {
    let module = interpreter::import_module(py, root)?;
    let mut modules = submodules(&module, root).map_err(|err| ResolveError::Inspect {
        module: root.to_string(),
        reason: err.to_string(),
    })?;
    modules.push(root.to_string());
    Ok((module, modules))
}
