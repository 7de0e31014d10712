//! Renderer module: trait-based output format dispatch.

pub mod asciidoc;

use crate::model::RenderableClass;
use crate::parser::Ecosystem;

/// Trait for rendering one symbol into a documentation page.
pub trait Renderer: Send + Sync {
    fn render(&self, class: &RenderableClass) -> String;
    fn file_extension(&self) -> &str;
}

/// Create the renderer for pages of the given ecosystem.
pub fn create_renderer(ecosystem: Ecosystem) -> Box<dyn Renderer> {
    Box::new(asciidoc::AsciiDocRenderer::new(ecosystem.language()))
}

/// Output file name for a symbol: spaces become underscores.
pub fn output_name(class: &RenderableClass, renderer: &dyn Renderer) -> String {
    format!("{}.{}", class.name.replace(' ', "_"), renderer.file_extension())
}
