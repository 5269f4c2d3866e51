//! Trait-based dispatch over output formats.

pub mod json;
pub mod markdown;

use crate::anchor::AnchorStyle;
use crate::error::{Error, Result};
use crate::orchestrator::OutputUnit;
use crate::tree::{NodeId, Tree};

/// Settings shared by every renderer.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Language tag for code fences.
    pub language: String,
    pub anchors: AnchorStyle,
}

/// Trait for rendering compounds into a specific output format.
pub trait Renderer {
    /// Render one compound. `None` means the compound is skipped.
    fn render(&self, tree: &Tree, node: NodeId) -> Result<Option<String>>;
    /// Render every compound of an output unit into one document.
    fn render_unit(&self, tree: &Tree, unit: &OutputUnit) -> Result<String>;
    fn file_extension(&self) -> &str;
}

/// Create a renderer for the given format name.
pub fn create_renderer(format: &str, options: &RenderOptions) -> Result<Box<dyn Renderer>> {
    match format {
        "markdown" | "md" => Ok(Box::new(markdown::MarkdownRenderer::new(options))),
        "json" => Ok(Box::new(json::JsonRenderer)),
        _ => Err(Error::UnknownFormat(format.to_string())),
    }
}
