//! HTML document with an inline flamegraph.
//!
//! The nested tree is embedded as a JSON data block next to the SVG so the
//! page carries the full profile even where frames were too narrow to draw.

use super::{escape_xml, svg, RenderContext};
use crate::utils::error::RenderError;

/// Render an HTML page
///
/// # Errors
/// * `RenderError::SerializationFailed` - tree data could not be serialized
pub fn render_html(ctx: &RenderContext<'_, '_>) -> Result<String, RenderError> {
    let tree_json = serde_json::to_string(&ctx.tree.to_json_value())?;
    let title = escape_xml(&ctx.config.title);

    let mut html = String::with_capacity(512 + tree_json.len() + ctx.layout.rects.len() * 192);
    html.push_str("<!DOCTYPE html>\n");
    html.push_str("<html lang=\"en\">\n");
    html.push_str("<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", title));
    html.push_str("<style>\n");
    html.push_str(&format!(
        "  body {{ margin: 0; padding: 10px; background: {}; }}\n",
        escape_xml(&ctx.config.bgcolor1)
    ));
    html.push_str("  svg { display: block; margin: 0 auto; }\n");
    html.push_str("</style>\n");
    html.push_str("</head>\n");
    html.push_str("<body>\n");
    html.push_str(&svg::svg_element(ctx));
    html.push_str("<script type=\"application/json\" id=\"flamegraph-data\">\n");
    html.push_str(&escape_script(&tree_json));
    html.push_str("\n</script>\n");
    html.push_str("</body>\n");
    html.push_str("</html>\n");

    Ok(html)
}

/// Keep embedded JSON from closing the script element
fn escape_script(json: &str) -> String {
    json.replace("</", "<\\/")
}
