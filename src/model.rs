//! Format-agnostic data model for generated documentation.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Complete document produced by one run.
#[derive(Debug, Default, Serialize)]
pub struct Document {
    pub title: String,
    /// Cleaned docstring of the root module.
    pub description: Option<String>,
    pub sections: Vec<ModuleSection>,
}

/// Documented classes of one module, in member order.
#[derive(Debug, Default, Serialize)]
pub struct ModuleSection {
    /// Full dotted module name.
    pub module: String,
    /// Cleaned module docstring.
    pub description: Option<String>,
    pub classes: Vec<ClassRecord>,
}

impl ModuleSection {
    /// Last dotted component of the module name.
    pub fn short_name(&self) -> &str {
        self.module.rsplit('.').next().unwrap_or(&self.module)
    }
}

/// A single documented class.
#[derive(Debug, Default, Serialize)]
pub struct ClassRecord {
    pub display_name: String,
    /// Docstring after paragraph doubling and `Arguments` emphasis.
    pub docstring: Option<String>,
    pub declaring_module: String,
    /// Present fields, iterated in rendering order.
    pub fields: BTreeMap<Field, String>,
    /// Verbatim source of `run`.
    pub run_source: Option<String>,
}

/// Documented class attributes. Declaration order is rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Arguments,
    Query,
    Returns,
    Calls,
}

impl Field {
    /// The plain attributes read from every class; `arguments` is handled separately.
    pub const ATTRIBUTES: [Field; 3] = [Field::Query, Field::Returns, Field::Calls];

    /// Class attribute name.
    pub fn attribute(self) -> &'static str {
        match self {
            Field::Arguments => "arguments",
            Field::Query => "query",
            Field::Returns => "returns",
            Field::Calls => "calls",
        }
    }

    /// Rendered label.
    pub fn label(self) -> &'static str {
        match self {
            Field::Arguments => "Arguments",
            Field::Query => "Query",
            Field::Returns => "Returns",
            Field::Calls => "Calls",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.attribute())
    }
}
