//! JSON profile output.
//!
//! A profile carries the laid-out frames and the full nested tree, plus
//! enough metadata to tell where it came from.

use super::RenderContext;
use crate::tree::TreeStats;
use crate::utils::config::SCHEMA_VERSION;
use crate::utils::error::RenderError;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Serialized flamegraph profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlameProfile {
    /// Schema version
    pub version: String,

    pub title: String,

    /// Parser that produced the samples
    pub parser: String,

    pub total_weight: u64,
    pub stats: TreeStats,

    /// Drawn frames in layout order
    pub frames: Vec<FrameEntry>,

    /// Nested `{name, value, children}` tree
    pub tree: Value,

    /// RFC 3339 timestamp
    pub generated_at: String,
}

/// One drawn frame of a [`FlameProfile`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameEntry {
    pub name: String,
    pub depth: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,

    /// `rgb(r,g,b)`
    pub color: String,

    pub total_weight: u64,
    pub self_weight: u64,
}

/// Build a profile from a finished render context
///
/// **Public** - also used by tests and library callers that want the data
/// without writing a file
pub fn to_profile(ctx: &RenderContext<'_, '_>) -> FlameProfile {
    let frames = ctx
        .layout
        .rects
        .iter()
        .map(|rect| {
            let node = ctx.tree.node(rect.node);
            FrameEntry {
                name: ctx.label(rect.node).into_owned(),
                depth: rect.depth,
                x: rect.x,
                y: rect.y,
                width: rect.width,
                color: rect.color.to_string(),
                total_weight: node.total_weight(),
                self_weight: node.self_weight(),
            }
        })
        .collect();

    FlameProfile {
        version: SCHEMA_VERSION.to_string(),
        title: ctx.config.title.clone(),
        parser: ctx.parser.to_string(),
        total_weight: ctx.total_weight,
        stats: ctx.tree.stats(),
        frames,
        tree: ctx.tree.to_json_value(),
        generated_at: chrono::Utc::now().to_rfc3339(),
    }
}

/// Render the profile as pretty JSON
///
/// # Errors
/// * `RenderError::SerializationFailed` - JSON serialization error
pub fn render_json(ctx: &RenderContext<'_, '_>) -> Result<String, RenderError> {
    let profile = to_profile(ctx);
    Ok(serde_json::to_string_pretty(&profile)?)
}

/// Read a profile from a JSON file
///
/// **Public** - useful for validation and testing
///
/// # Errors
/// * `RenderError::WriteFailed` - File read error (reusing WriteFailed for I/O)
/// * `RenderError::SerializationFailed` - JSON parse error
pub fn read_profile(input_path: impl AsRef<Path>) -> Result<FlameProfile, RenderError> {
    let input_path = input_path.as_ref();

    debug!("Reading profile from: {}", input_path.display());

    let file = File::open(input_path)?;
    let profile: FlameProfile = serde_json::from_reader(BufReader::new(file))?;

    info!(
        "Profile loaded: version {}, {} frames",
        profile.version,
        profile.frames.len()
    );

    Ok(profile)
}
