//! Generation pipeline: discover modules, filter classes, extract records.

use crate::diagnostics::{Diagnostic, Reporter};
use crate::error::{GenerateError, ResolveError};
use crate::extract::{self, RuntimeClass};
use crate::filter::{self, ClassPredicate};
use crate::interpreter;
use crate::model::{Document, ModuleSection};
use crate::walker;
use pyo3::prelude::*;

/// Result of a successful run.
#[derive(Debug)]
pub enum Outcome {
    Generated(Document),
    /// No module contained a matching class; nothing should be written.
    NothingToDocument,
}

/// Build the document for `root`.
///
/// Only a root that fails to import is an error. Submodules that fail are
/// skipped, and modules without matching classes get no section.
pub fn generate(
    py: Python<'_>,
    root: &str,
    title: &str,
    predicate: &dyn ClassPredicate,
    reporter: &dyn Reporter,
) -> Result<Outcome, GenerateError> {
    reporter.report(Diagnostic::Started {
        root: root.to_string(),
    });
    reporter.report(Diagnostic::ImportingRoot {
        root: root.to_string(),
    });

    let (root_module, modules) =
        walker::discover(py, root).map_err(|source| GenerateError::RootUnresolved {
            module: root.to_string(),
            source,
        })?;
    for module in modules.iter().filter(|m| m.as_str() != root) {
        reporter.report(Diagnostic::SubmoduleFound {
            module: module.clone(),
        });
    }

    let mut sections = Vec::new();
    for name in &modules {
        reporter.report(Diagnostic::InspectingModule {
            module: name.clone(),
        });
        match inspect_module(py, name, predicate, reporter) {
            Ok(Some(section)) => sections.push(section),
            Ok(None) => {}
            Err(e) => reporter.report(Diagnostic::SubmoduleSkipped {
                module: e.module().to_string(),
                reason: e.to_string(),
            }),
        }
    }

    if sections.is_empty() {
        reporter.report(Diagnostic::NothingToDocument {
            root: root.to_string(),
            predicate: predicate.describe(),
        });
        return Ok(Outcome::NothingToDocument);
    }

    for section in &sections {
        reporter.report(Diagnostic::SectionRendered {
            module: section.short_name().to_string(),
        });
    }

    Ok(Outcome::Generated(Document {
        title: title.to_string(),
        description: interpreter::getdoc(root_module.as_any()).ok().flatten(),
        sections,
    }))
}

/// The section for one module, `None` when no class in it matches.
fn inspect_module(
    py: Python<'_>,
    name: &str,
    predicate: &dyn ClassPredicate,
    reporter: &dyn Reporter,
) -> Result<Option<ModuleSection>, ResolveError> {
    let module = interpreter::import_module(py, name)?;
    let failed = |err: PyErr| ResolveError::Inspect {
        module: name.to_string(),
        reason: err.to_string(),
    };

    let classes = filter::collect_matching_classes(&module, name, predicate, reporter).map_err(failed)?;
    if classes.is_empty() {
        return Ok(None);
    }
    let mut records = Vec::with_capacity(classes.len());
    for (_, class) in classes {
        let class = RuntimeClass::new(class).map_err(failed)?;
        records.push(extract::extract(&class, reporter));
    }
    Ok(Some(ModuleSection {
        module: name.to_string(),
        description: interpreter::getdoc(module.as_any()).map_err(failed)?,
        classes: records,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::RecordingReporter;
    use crate::filter::DeclaringModule;
    use crate::model::Field;
    use crate::interpreter::testing::with_tree;
    use crate::render::{rst::RstRenderer, Renderer};

    fn run(files: &[(&str, &str)], root: &str) -> (Result<Outcome, GenerateError>, Vec<Diagnostic>) {
        with_tree(files, |py| {
            let reporter = RecordingReporter::default();
            let outcome = generate(
                py,
                root,
                "Analysis",
                &DeclaringModule("pkg.base".to_string()),
                &reporter,
            );
            (outcome, reporter.events())
        })
    }

    fn section_modules(doc: &Document) -> Vec<&str> {
        doc.sections.iter().map(|s| s.module.as_str()).collect()
    }

    fn document(outcome: Result<Outcome, GenerateError>) -> Document {
        match outcome {
            Ok(Outcome::Generated(doc)) => doc,
            other => panic!("expected a document, got {other:?}"),
        }
    }

    const FOO: &str = concat!(
        "class Foo:\n",
        "    \"\"\"Foo docs.\"\"\"\n",
        "    __module__ = \"pkg.base\"\n",
        "    query = \"select x\"\n",
        "\n",
        "    def run(self):\n",
        "        x = 1\n",
        "        return x\n",
    );

    #[test]
    fn pkg_sub_foo_scenario() {
        let (outcome, _) = run(
            &[("pkg/__init__.py", ""), ("pkg/base.py", ""), ("pkg/sub.py", FOO)],
            "pkg",
        );
        let doc = document(outcome);
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].module, "pkg.sub");

        let expected = concat!(
            "Analysis\n",
            "========\n",
            "\n",
            "\n",
            "Sub\n",
            "---\n",
            "\n",
            ".. class:: Foo\n",
            "   :noindex:\n",
            "\n",
            "   Foo docs.\n",
            "\n",
            "\n",
            "   **Query**: select x\n",
            "\n",
            "   .. dropdown:: See Code\n",
            "\n",
            "      .. code-block:: python\n",
            "\n",
            "             def run(self):\n",
            "                 x = 1\n",
            "                 return x\n",
            "\n",
            "\n",
        );
        assert_eq!(RstRenderer.render(&doc), expected);
    }

    #[test]
    fn other_modules_never_appear() {
        let (outcome, _) = run(
            &[
                ("pkg/__init__.py", ""),
                ("pkg/base.py", ""),
                ("pkg/sub.py", FOO),
                ("pkg/other.py", "class Elsewhere:\n    query = 'x'\n"),
            ],
            "pkg",
        );
        let doc = document(outcome);
        let names: Vec<&str> = doc
            .sections
            .iter()
            .flat_map(|s| s.classes.iter().map(|c| c.display_name.as_str()))
            .collect();
        assert_eq!(names, vec!["Foo"]);
    }

    #[test]
    fn root_docstring_is_cleaned() {
        let (outcome, _) = run(
            &[
                ("pkg/__init__.py", "\"\"\"Root docs.\n\n    More.\n\"\"\"\n"),
                ("pkg/base.py", ""),
                ("pkg/sub.py", "\"\"\"Sub docs.\"\"\"\n"),
                ("pkg/zz.py", FOO),
            ],
            "pkg",
        );
        let doc = document(outcome);
        assert_eq!(section_modules(&doc), vec!["pkg.zz"]);
        assert_eq!(doc.description.as_deref(), Some("Root docs.\n\nMore."));
    }

    #[test]
    fn root_reexports_get_their_own_section() {
        let (outcome, _) = run(
            &[
                ("pkg/__init__.py", "from .sub import Foo\n"),
                ("pkg/base.py", ""),
                ("pkg/sub.py", FOO),
            ],
            "pkg",
        );
        let doc = document(outcome);
        assert_eq!(section_modules(&doc), vec!["pkg.sub", "pkg"]);
        assert_eq!(doc.sections[1].short_name(), "pkg");
    }

    #[test]
    fn broken_submodule_is_skipped() {
        let (outcome, events) = run(
            &[
                ("pkg/__init__.py", ""),
                ("pkg/base.py", ""),
                ("pkg/broken.py", "x = '''never closed\n"),
                ("pkg/sub.py", FOO),
            ],
            "pkg",
        );
        let doc = document(outcome);
        assert_eq!(doc.sections.len(), 1);
        assert!(events.iter().any(|e| matches!(
            e,
            Diagnostic::SubmoduleSkipped { module, reason } if module == "pkg.broken" && reason.starts_with("SyntaxError")
        )));
    }

    #[test]
    fn submodule_raising_at_import_is_skipped() {
        let (outcome, events) = run(
            &[
                ("pkg/__init__.py", ""),
                ("pkg/base.py", ""),
                ("pkg/needs.py", "import not_installed_anywhere\n"),
                ("pkg/sub.py", FOO),
            ],
            "pkg",
        );
        assert_eq!(section_modules(&document(outcome)), vec!["pkg.sub"]);
        assert!(events.iter().any(|e| matches!(
            e,
            Diagnostic::SubmoduleSkipped { module, reason } if module == "pkg.needs" && reason.starts_with("ModuleNotFoundError")
        )));
    }

    #[test]
    fn class_factory_decorator_from_base_is_documented() {
        let (outcome, _) = run(
            &[
                ("pkg/__init__.py", ""),
                (
                    "pkg/base.py",
                    concat!(
                        "def analysis(cls):\n",
                        "    class Wrapped(cls):\n",
                        "        pass\n",
                        "    Wrapped.__name__ = cls.__name__\n",
                        "    Wrapped.__doc__ = cls.__doc__\n",
                        "    return Wrapped\n",
                    ),
                ),
                (
                    "pkg/sub.py",
                    concat!(
                        "from pkg.base import analysis\n",
                        "\n",
                        "@analysis\n",
                        "class Foo:\n",
                        "    \"\"\"Wrapped docs.\"\"\"\n",
                        "    query = 'select x'\n",
                    ),
                ),
            ],
            "pkg",
        );
        let doc = document(outcome);
        assert_eq!(section_modules(&doc), vec!["pkg.sub"]);
        let class = &doc.sections[0].classes[0];
        assert_eq!(class.display_name, "Foo");
        assert_eq!(class.declaring_module, "pkg.base");
        assert_eq!(class.docstring.as_deref(), Some("Wrapped docs."));
        assert_eq!(class.fields.get(&Field::Query).map(String::as_str), Some("select x"));
    }

    #[test]
    fn guarded_reexport_binds_the_imported_class() {
        let (outcome, _) = run(
            &[
                (
                    "pkg/__init__.py",
                    "try:\n    from .sub import Foo\nexcept ImportError:\n    Foo = None\n",
                ),
                ("pkg/base.py", ""),
                ("pkg/sub.py", FOO),
            ],
            "pkg",
        );
        let doc = document(outcome);
        assert_eq!(section_modules(&doc), vec!["pkg.sub", "pkg"]);
        assert_eq!(doc.sections[1].classes[0].display_name, "Foo");
    }

    #[test]
    fn nothing_to_document() {
        let (outcome, events) = run(
            &[("pkg/__init__.py", ""), ("pkg/sub.py", "class Plain:\n    pass\n")],
            "pkg",
        );
        assert!(matches!(outcome, Ok(Outcome::NothingToDocument)));
        assert!(matches!(
            events.last(),
            Some(Diagnostic::NothingToDocument { root, .. }) if root == "pkg"
        ));
    }

    #[test]
    fn missing_root_is_fatal() {
        let (outcome, _) = run(&[], "pkg");
        assert!(matches!(
            outcome,
            Err(GenerateError::RootUnresolved { source: ResolveError::Import { .. }, .. })
        ));
    }

    #[test]
    fn only_calls_field() {
        let (outcome, _) = run(
            &[
                ("pkg/__init__.py", ""),
                (
                    "pkg/sub.py",
                    "class Foo:\n    __module__ = 'pkg.base'\n    calls = 'other'\n",
                ),
            ],
            "pkg",
        );
        let doc = document(outcome);
        let class = &doc.sections[0].classes[0];
        assert_eq!(class.fields.keys().copied().collect::<Vec<_>>(), vec![Field::Calls]);
        assert_eq!(class.docstring, None);
    }
}
