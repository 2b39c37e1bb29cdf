//! reStructuredText renderer for Sphinx API pages.
//!
//! Classes become `.. class::` directives, documented attributes become bold
//! labelled paragraphs and `run` is shown in a sphinx-design dropdown.

use crate::model::*;
use crate::render::Renderer;

const CLASS_INDENT: &str = "   ";
const CODE_INDENT: &str = "         ";

pub struct RstRenderer;

impl Renderer for RstRenderer {
    fn render(&self, doc: &Document) -> String {
        let mut output = String::new();

        output.push_str(&doc.title);
        output.push('\n');
        output.push_str(&underline(&doc.title, '='));
        output.push_str("\n\n");

        if let Some(ref desc) = doc.description {
            output.push_str(desc);
            output.push_str("\n\n");
        }

        for section in &doc.sections {
            output.push_str(&render_section(section));
        }

        output
    }

    fn file_extension(&self) -> &str {
        "rst"
    }
}

/// A heading marker line as long as `text` has characters.
pub fn underline(text: &str, marker: char) -> String {
    std::iter::repeat(marker).take(text.chars().count()).collect()
}

/// `str.capitalize`: first character upper case, the rest lower case.
fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn render_section(section: &ModuleSection) -> String {
    let short = section.short_name();
    let mut out = format!("\n{}\n{}\n\n", capitalize(short), underline(short, '-'));

    if let Some(ref desc) = section.description {
        out.push_str(desc);
        out.push_str("\n\n");
    }

    for class in &section.classes {
        out.push_str(&render_class(class));
    }
    out
}

/// Render one class directive block, trailing blank line included.
fn render_class(class: &ClassRecord) -> String {
    let mut out = format!(".. class:: {}\n{CLASS_INDENT}:noindex:\n\n", class.display_name);

    if let Some(ref doc) = class.docstring {
        for line in doc.lines() {
            out.push_str(CLASS_INDENT);
            out.push_str(line);
            out.push('\n');
        }
        out.push('\n');
    }
    out.push('\n');

    for (field, value) in &class.fields {
        out.push_str(&format!("{CLASS_INDENT}**{}**: {}\n\n", field.label(), value));
    }

    if let Some(ref source) = class.run_source {
        out.push_str(&format!("{CLASS_INDENT}.. dropdown:: See Code\n\n"));
        out.push_str(&format!("{CLASS_INDENT}   .. code-block:: python\n\n"));
        for line in source.lines() {
            out.push_str(CODE_INDENT);
            out.push_str(line);
            out.push('\n');
        }
        out.push('\n');
    }

    out.push('\n');
    out
}
