//! SVG flamegraph document.
//!
//! Static markup only: every frame is a `<g>` holding a `<title>` tooltip,
//! a `<rect>` and a label that is clipped to the frame's width.

use super::{escape_xml, RenderContext};
use crate::flamegraph::FrameRect;

/// Render a standalone SVG document
///
/// **Public** - used for `.svg` outputs
pub fn render_svg(ctx: &RenderContext<'_, '_>) -> String {
    let mut svg = String::with_capacity(256 + ctx.layout.rects.len() * 192);
    svg.push_str("<?xml version=\"1.0\" standalone=\"no\"?>\n");
    svg.push_str(
        "<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" \
         \"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\">\n",
    );
    svg.push_str(&svg_element(ctx));
    svg
}

/// The `<svg>` element alone, for embedding in other documents
///
/// **Private** - shared with the HTML renderer
pub(crate) fn svg_element(ctx: &RenderContext<'_, '_>) -> String {
    let config = ctx.config;
    let width = config.width;
    let height = ctx.layout.image_height;
    let font_size = config.font_size;

    let mut svg = String::with_capacity(256 + ctx.layout.rects.len() * 192);

    svg.push_str(&format!(
        "<svg version=\"1.1\" width=\"{}\" height=\"{}\" viewBox=\"0 0 {} {}\" \
         xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\">\n",
        width, height, width, height
    ));

    // Background gradient
    svg.push_str("<defs>\n");
    svg.push_str("  <linearGradient id=\"background\" y1=\"0\" y2=\"1\" x1=\"0\" x2=\"0\">\n");
    svg.push_str(&format!(
        "    <stop stop-color=\"{}\" offset=\"5%\"/>\n",
        escape_xml(&config.bgcolor1)
    ));
    svg.push_str(&format!(
        "    <stop stop-color=\"{}\" offset=\"95%\"/>\n",
        escape_xml(&config.bgcolor2)
    ));
    svg.push_str("  </linearGradient>\n");
    svg.push_str("</defs>\n");

    svg.push_str("<style type=\"text/css\">\n");
    svg.push_str(&format!(
        "  text {{ font-family: {}; font-size: {}px; fill: rgb(0,0,0); }}\n",
        escape_xml(&config.font_type),
        font_size
    ));
    svg.push_str("  #title { text-anchor: middle; font-size: 17px; }\n");
    svg.push_str("  #subtitle { text-anchor: middle; fill: rgb(160,160,160); }\n");
    svg.push_str("  #frames > g > rect { stroke: none; }\n");
    svg.push_str("</style>\n");

    svg.push_str(&format!(
        "<rect x=\"0\" y=\"0\" width=\"{}\" height=\"{}\" fill=\"url(#background)\"/>\n",
        width, height
    ));

    svg.push_str(&format!(
        "<text id=\"title\" x=\"{:.2}\" y=\"{}\">{}</text>\n",
        width as f64 / 2.0,
        font_size * 2,
        escape_xml(&config.title)
    ));
    if let Some(subtitle) = config.subtitle.as_deref().filter(|s| !s.is_empty()) {
        svg.push_str(&format!(
            "<text id=\"subtitle\" x=\"{:.2}\" y=\"{}\">{}</text>\n",
            width as f64 / 2.0,
            font_size * 4,
            escape_xml(subtitle)
        ));
    }

    svg.push_str(&format!(
        "<text id=\"details\" x=\"{}\" y=\"{:.2}\">Parser: {}, total: {} {}</text>\n",
        config.xpad,
        height - (font_size / 2) as f64,
        escape_xml(ctx.parser),
        ctx.total_weight,
        escape_xml(&config.count_name)
    ));

    svg.push_str("<g id=\"frames\">\n");
    for rect in &ctx.layout.rects {
        push_frame(&mut svg, ctx, rect);
    }
    svg.push_str("</g>\n");
    svg.push_str("</svg>\n");

    svg
}

/// Append one frame group
fn push_frame(svg: &mut String, ctx: &RenderContext<'_, '_>, rect: &FrameRect) {
    let config = ctx.config;
    let frame_height = config.frame_height.saturating_sub(1);

    svg.push_str("<g>");
    svg.push_str(&format!("<title>{}</title>", escape_xml(&ctx.tooltip(rect))));
    svg.push_str(&format!(
        "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{}\" fill=\"{}\" rx=\"2\" ry=\"2\"/>",
        rect.x, rect.y, rect.width, frame_height, rect.color
    ));

    let label = ctx.label(rect.node);
    let fitted = fit_label(&label, rect.width, config.font_size, config.font_width);
    svg.push_str(&format!(
        "<text x=\"{:.2}\" y=\"{:.2}\">{}</text>",
        rect.x + 3.0,
        rect.y + config.frame_height as f64 - 5.0,
        escape_xml(&fitted)
    ));
    svg.push_str("</g>\n");
}

/// Shorten `label` to what fits in `width` pixels
///
/// Labels that do not fit are cut and end in `..`. Frames too narrow for
/// three glyphs get no label at all.
pub(crate) fn fit_label(label: &str, width: f64, font_size: usize, font_width: f64) -> String {
    let glyph = font_size as f64 * font_width;
    if glyph <= 0.0 {
        return String::new();
    }

    let fits = ((width - 6.0) / glyph).floor();
    if fits < 3.0 {
        return String::new();
    }

    let fits = fits as usize;
    if label.chars().count() <= fits {
        return label.to_string();
    }

    let mut cut: String = label.chars().take(fits - 2).collect();
    cut.push_str("..");
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::CollapsedStacks;
    use crate::flamegraph::{compute_layout, FlamegraphConfig};
    use crate::parser::Frame;
    use crate::tree::TreeBuilder;

    #[test]
    fn test_fit_label() {
        // 12 * 0.5 = 6px per glyph
        assert_eq!(fit_label("main", 60.0, 12, 0.5), "main");
        assert_eq!(fit_label("a_long_function_name", 60.0, 12, 0.5), "a_long_..");
        assert_eq!(fit_label("main", 20.0, 12, 0.5), "");
    }

    #[test]
    fn test_svg_document_structure() {
        let mut stacks = CollapsedStacks::new();
        stacks.add(&[Frame::function("main"), Frame::function("a<b>")], 3);
        stacks.add(&[Frame::function("main"), Frame::module("libc.so")], 1);
        let tree = TreeBuilder::default().build(&stacks).unwrap();

        let config = FlamegraphConfig::new().with_subtitle("release");
        let layout = compute_layout(&tree, &config.layout_options()).unwrap();
        let ctx = RenderContext {
            tree: &tree,
            layout: &layout,
            config: &config,
            total_weight: tree.total_weight(),
            parser: "GenericTextParser",
        };

        let svg = render_svg(&ctx);
        assert!(svg.starts_with("<?xml"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains("<text id=\"subtitle\""));
        assert_eq!(svg.matches("rx=\"2\"").count(), layout.rects.len());
        assert!(svg.contains("<title>a&lt;b&gt; (3 samples, 75.00%)</title>"));
        assert!(svg.contains("<title>[libc.so] (1 samples, 25.00%)</title>"));
        assert!(svg.contains("<title>root (4 samples, 100.00%)</title>"));
        assert!(!svg.contains("<script"));
    }
}
