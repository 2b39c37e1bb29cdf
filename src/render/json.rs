//! JSON renderer: structured output for tooling integration.
//!
//! Serializes the Document model directly as JSON.

use crate::model::Document;
use crate::render::Renderer;

pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, doc: &Document) -> String {
        // Document holds only strings and maps with string keys.
        let mut out = serde_json::to_string_pretty(doc).unwrap_or_default();
        out.push('\n');
        out
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}
