//! Output writers for flamegraphs and folded stacks.
//!
//! This module handles writing data to disk in various formats:
//! - SVG flamegraphs
//! - HTML documents embedding the flamegraph and its tree
//! - JSON profiles
//! - Folded stacks (`<output>.collapse`)
//!
//! The renderer is picked from the output file's extension.

pub mod folded;
pub mod html;
pub mod json;
pub mod svg;

// Re-export main functions
pub use folded::{folded_path, write_folded, write_folded_to};
pub use json::{read_profile, to_profile, FlameProfile, FrameEntry};

use crate::flamegraph::{FlamegraphConfig, FrameRect, Layout};
use crate::tree::{FlameTree, NodeId};
use crate::utils::error::RenderError;
use log::{debug, info};
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Everything a renderer needs from one pipeline run
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'r, 'a> {
    pub tree: &'r FlameTree<'a>,
    pub layout: &'r Layout,
    pub config: &'r FlamegraphConfig,
    pub total_weight: u64,

    /// Name of the parser that produced the samples
    pub parser: &'r str,
}

impl RenderContext<'_, '_> {
    /// Display label of a node: `root`, or the frame's display name
    pub fn label(&self, id: NodeId) -> Cow<'_, str> {
        match self.tree.node(id).frame() {
            Some(frame) => frame.display_name(),
            None => Cow::Borrowed("root"),
        }
    }

    /// Tooltip like `malloc (42 samples, 12.50%)`
    pub fn tooltip(&self, rect: &FrameRect) -> String {
        let weight = self.tree.node(rect.node).total_weight();
        let count_name = if self.config.count_name.is_empty() {
            "samples"
        } else {
            self.config.count_name.as_str()
        };
        let percent = if self.total_weight > 0 {
            weight as f64 / self.total_weight as f64 * 100.0
        } else {
            0.0
        };

        format!(
            "{} ({} {}, {:.2}%)",
            self.label(rect.node),
            weight,
            count_name,
            percent
        )
    }
}

/// Output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Renderer {
    Svg,
    Html,
    Json,
}

impl Renderer {
    /// Pick a renderer from the file extension
    ///
    /// `svg`, `html`/`htm` and `json` are recognized; anything else, including
    /// no extension, falls back to HTML.
    pub fn for_path(path: impl AsRef<Path>) -> Self {
        let extension = path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("svg") => Renderer::Svg,
            Some("html") | Some("htm") => Renderer::Html,
            Some("json") => Renderer::Json,
            _ => Renderer::Html,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Renderer::Svg => "svg",
            Renderer::Html => "html",
            Renderer::Json => "json",
        }
    }

    /// Render to an in-memory document
    ///
    /// # Errors
    /// * `RenderError::EmptyTree` - nothing to draw
    /// * `RenderError::SerializationFailed` - embedded JSON could not be built
    pub fn render_to_string(&self, ctx: &RenderContext<'_, '_>) -> Result<String, RenderError> {
        if ctx.total_weight == 0 {
            return Err(RenderError::EmptyTree);
        }

        match self {
            Renderer::Svg => Ok(svg::render_svg(ctx)),
            Renderer::Html => html::render_html(ctx),
            Renderer::Json => json::render_json(ctx),
        }
    }

    /// Render and write to `output_path`
    ///
    /// **Public** - main entry point for flamegraph output
    ///
    /// # Errors
    /// * `RenderError::WriteFailed` - I/O error during write
    /// * `RenderError::InvalidPath` - path is empty, a directory, or its
    ///   parent cannot be created
    pub fn render(
        &self,
        ctx: &RenderContext<'_, '_>,
        output_path: impl AsRef<Path>,
    ) -> Result<(), RenderError> {
        let output_path = output_path.as_ref();
        info!("Writing {} to: {}", self.name(), output_path.display());

        let content = self.render_to_string(ctx)?;
        write_text(&content, output_path)?;

        info!(
            "{} written successfully ({} bytes, {:.2} KB)",
            self.name(),
            content.len(),
            content.len() as f64 / 1024.0
        );
        Ok(())
    }
}

/// Write `content` to `output_path`, creating parent directories
///
/// **Private** - shared by every renderer
pub(crate) fn write_text(content: &str, output_path: &Path) -> Result<(), RenderError> {
    let mut writer = create_writer(output_path)?;
    writer.write_all(content.as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Validate `output_path`, create its parent and open a buffered writer
pub(crate) fn create_writer(output_path: &Path) -> Result<BufWriter<File>, RenderError> {
    validate_output_path(output_path)?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                RenderError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let file = File::create(output_path)?;
    Ok(BufWriter::new(file))
}

/// Validate that output path is writable
///
/// **Private** - internal validation
fn validate_output_path(path: &Path) -> Result<(), RenderError> {
    if path.as_os_str().is_empty() {
        return Err(RenderError::InvalidPath("Path is empty".to_string()));
    }

    if path.is_dir() {
        return Err(RenderError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

/// Escape text for XML/HTML content and attributes
pub(crate) fn escape_xml(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renderer_dispatch_by_extension() {
        assert_eq!(Renderer::for_path("out/graph.svg"), Renderer::Svg);
        assert_eq!(Renderer::for_path("graph.SVG"), Renderer::Svg);
        assert_eq!(Renderer::for_path("graph.html"), Renderer::Html);
        assert_eq!(Renderer::for_path("graph.htm"), Renderer::Html);
        assert_eq!(Renderer::for_path("profile.json"), Renderer::Json);
        assert_eq!(Renderer::for_path("graph.png"), Renderer::Html);
        assert_eq!(Renderer::for_path("graph"), Renderer::Html);
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("main"), "main");
        assert_eq!(
            escape_xml("std::vector<int>::push_back & \"x\""),
            "std::vector&lt;int&gt;::push_back &amp; &quot;x&quot;"
        );
    }

    #[test]
    fn test_validate_output_path_empty() {
        assert!(validate_output_path(Path::new("")).is_err());
    }

    #[test]
    fn test_validate_output_path_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = validate_output_path(temp_dir.path());
        assert!(matches!(result, Err(RenderError::InvalidPath(_))));
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested = temp_dir.path().join("nested/dirs/graph.svg");

        write_text("<svg/>", &nested).unwrap();
        assert_eq!(std::fs::read_to_string(&nested).unwrap(), "<svg/>");
    }
}
