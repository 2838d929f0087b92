//! Geometry and color for every visible node.
//!
//! The root spans the whole inner canvas. Children are placed left to right
//! in frame order starting at their parent's x. The running offset always
//! advances by a child's nominal width, even when that child is too narrow
//! to draw, so later siblings stay aligned.

use super::color::{ColorScheme, Rgb};
use crate::tree::{FlameTree, NodeId};
use crate::utils::config::{
    DEFAULT_FONT_SIZE, DEFAULT_FRAME_HEIGHT, DEFAULT_MIN_WIDTH, DEFAULT_WIDTH, DEFAULT_XPAD,
};
use crate::utils::error::RenderError;
use log::debug;
use serde::Serialize;

/// Which way the stacks grow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Orientation {
    /// Root at the bottom, children above
    #[default]
    Flamegraph,

    /// Root at the top, children below
    Icicle,
}

/// Inputs of [`compute_layout`]
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOptions {
    pub canvas_width: f64,

    /// Left and right margin
    pub margin: f64,

    pub row_height: f64,
    pub top_padding: f64,
    pub bottom_padding: f64,
    pub orientation: Orientation,

    /// Nodes narrower than this (in pixels), the root included, are neither
    /// drawn nor descended into
    pub min_width: f64,

    pub color_scheme: ColorScheme,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            canvas_width: DEFAULT_WIDTH as f64,
            margin: DEFAULT_XPAD as f64,
            row_height: DEFAULT_FRAME_HEIGHT as f64,
            top_padding: (DEFAULT_FONT_SIZE * 3) as f64,
            bottom_padding: (DEFAULT_FONT_SIZE * 2 + 10) as f64,
            orientation: Orientation::Flamegraph,
            min_width: DEFAULT_MIN_WIDTH,
            color_scheme: ColorScheme::Hot,
        }
    }
}

/// One drawn frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameRect {
    pub node: NodeId,

    /// 0 for the root
    pub depth: usize,

    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub color: Rgb,
}

/// Rectangles in pre-order (parents before children, left to right)
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub rects: Vec<FrameRect>,
    pub image_height: f64,
    pub width_per_weight: f64,
}

/// Lay out every visible node of `tree`
///
/// **Public** - main entry point for geometry
///
/// # Errors
/// * `RenderError::EmptyTree` - the root carries no weight
pub fn compute_layout(tree: &FlameTree<'_>, options: &LayoutOptions) -> Result<Layout, RenderError> {
    let total = tree.total_weight();
    if total == 0 {
        return Err(RenderError::EmptyTree);
    }

    let inner_width = (options.canvas_width - 2.0 * options.margin).max(0.0);
    let width_per_weight = inner_width / total as f64;
    let height = tree.height();
    let image_height =
        (height + 1) as f64 * options.row_height + options.top_padding + options.bottom_padding;

    let y_at = |depth: usize| match options.orientation {
        Orientation::Flamegraph => {
            image_height - options.bottom_padding - (depth + 1) as f64 * options.row_height
        }
        Orientation::Icicle => options.top_padding + depth as f64 * options.row_height,
    };
    let heat_at = |depth: usize| {
        if height == 0 {
            0.0
        } else {
            depth as f64 / height as f64
        }
    };

    let mut rects = Vec::with_capacity(tree.len());
    let mut stack: Vec<(NodeId, usize, f64)> = Vec::new();
    if total as f64 * width_per_weight >= options.min_width {
        stack.push((NodeId::ROOT, 0, options.margin));
    }
    let mut visible: Vec<(NodeId, usize, f64)> = Vec::new();

    while let Some((id, depth, x)) = stack.pop() {
        let node = tree.node(id);

        rects.push(FrameRect {
            node: id,
            depth,
            x,
            y: y_at(depth),
            width: node.total_weight() as f64 * width_per_weight,
            color: options.color_scheme.color(node.frame(), heat_at(depth)),
        });

        let mut offset = x;
        for child in node.children() {
            let width = tree.node(child).total_weight() as f64 * width_per_weight;
            if width >= options.min_width {
                visible.push((child, depth + 1, offset));
            }
            offset += width;
        }

        // Reversed so the leftmost child is popped first
        stack.extend(visible.drain(..).rev());
    }

    debug!(
        "Laid out {} of {} nodes, image height {}",
        rects.len(),
        tree.len(),
        image_height
    );

    Ok(Layout {
        rects,
        image_height,
        width_per_weight,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::CollapsedStacks;
    use crate::flamegraph::color::ROOT_COLOR;
    use crate::parser::Frame;
    use crate::tree::TreeBuilder;
    use pretty_assertions::assert_eq;

    fn tree(paths: &[(&'static str, u64)]) -> FlameTree<'static> {
        let mut stacks = CollapsedStacks::new();
        for &(path, weight) in paths {
            let frames: Vec<_> = path.split(';').map(Frame::function).collect();
            stacks.add(&frames, weight);
        }
        TreeBuilder::default().build(&stacks).unwrap()
    }

    fn options() -> LayoutOptions {
        LayoutOptions {
            canvas_width: 120.0,
            margin: 10.0,
            row_height: 16.0,
            top_padding: 36.0,
            bottom_padding: 34.0,
            min_width: 0.1,
            ..Default::default()
        }
    }

    #[test]
    fn test_flamegraph_geometry() {
        let tree = tree(&[("main;foo;bar", 1), ("main;foo;baz", 1)]);
        let layout = compute_layout(&tree, &options()).unwrap();

        // height 3 → 4 rows
        assert_eq!(layout.image_height, 4.0 * 16.0 + 36.0 + 34.0);
        assert_eq!(layout.width_per_weight, 50.0);

        let summary: Vec<(usize, f64, f64, f64)> = layout
            .rects
            .iter()
            .map(|r| (r.depth, r.x, r.y, r.width))
            .collect();
        assert_eq!(
            summary,
            vec![
                (0, 10.0, 84.0, 100.0),
                (1, 10.0, 68.0, 100.0),
                (2, 10.0, 52.0, 100.0),
                (3, 10.0, 36.0, 50.0),
                (3, 60.0, 36.0, 50.0),
            ]
        );
        assert_eq!(layout.rects[0].color, ROOT_COLOR);
    }

    #[test]
    fn test_icicle_grows_down_from_top() {
        let tree = tree(&[("main;foo", 1)]);
        let layout = compute_layout(
            &tree,
            &LayoutOptions {
                orientation: Orientation::Icicle,
                ..options()
            },
        )
        .unwrap();

        let ys: Vec<f64> = layout.rects.iter().map(|r| r.y).collect();
        assert_eq!(ys, vec![36.0, 52.0, 68.0]);
    }

    #[test]
    fn test_narrow_children_are_skipped_but_keep_alignment() {
        let tree = tree(&[("a;deep", 1), ("b", 98), ("c", 1)]);
        let layout = compute_layout(
            &tree,
            &LayoutOptions {
                min_width: 2.0,
                ..options()
            },
        )
        .unwrap();

        assert_eq!(layout.rects.len(), 2);
        let b = &layout.rects[1];
        assert_eq!(tree.node(b.node).frame().map(|f| f.name()), Some("b"));
        assert_eq!(b.x, 11.0);
        assert_eq!(b.width, 98.0);
    }

    #[test]
    fn test_narrow_root_is_not_drawn() {
        let tree = tree(&[("main;foo", 1)]);
        let layout = compute_layout(
            &tree,
            &LayoutOptions {
                min_width: 1e9,
                ..options()
            },
        )
        .unwrap();

        assert!(layout.rects.is_empty());
    }

    #[test]
    fn test_layout_is_deterministic() {
        let tree = tree(&[("main;foo;bar", 3), ("main;qux", 2), ("other", 1)]);
        let first = compute_layout(&tree, &options()).unwrap();
        let second = compute_layout(&tree, &options()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_tree_is_error() {
        let result = compute_layout(&FlameTree::new(), &options());
        assert!(matches!(result, Err(RenderError::EmptyTree)));
    }
}
