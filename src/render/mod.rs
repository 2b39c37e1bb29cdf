//! Renderer module: trait-based format dispatch.

pub mod json;
pub mod rst;

use crate::model::Document;
use anyhow::{anyhow, Result};

/// Trait for rendering a Document into a specific output format.
pub trait Renderer {
    fn render(&self, doc: &Document) -> String;
    fn file_extension(&self) -> &str;
}

/// Create a renderer for the given format name.
pub fn create_renderer(format: &str) -> Result<Box<dyn Renderer>> {
    match format {
        "rst" | "restructuredtext" => Ok(Box::new(rst::RstRenderer)),
        "json" => Ok(Box::new(json::JsonRenderer)),
        _ => Err(anyhow!("unknown format: {}. Use rst or json", format)),
    }
}
