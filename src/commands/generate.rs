//! Generate command implementation.
//!
//! The generate command:
//! 1. Validates the configuration
//! 2. Loads the input as a byte view
//! 3. Parses and collapses the stacks (partitioned for large inputs)
//! 4. Builds and prunes the call tree
//! 5. Computes the layout
//! 6. Renders the output, plus the folded byproduct if requested

use super::collapse::parse_and_collapse;
use crate::flamegraph::{compute_layout, FlamegraphConfig};
use crate::output::{folded_path, write_folded, RenderContext, Renderer};
use crate::tree::TreeBuilder;
use crate::utils::error::FlameGraphError;
use crate::utils::input::InputBuffer;
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// What one pipeline run produced
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateReport {
    pub parser: String,
    pub sample_count: usize,
    pub unique_stacks: usize,
    pub total_weight: u64,
    pub tree_nodes: usize,

    /// Frames wide enough to be drawn
    pub drawn_frames: usize,

    pub parallel: bool,
    pub renderer: Renderer,
    pub output: PathBuf,
    pub folded: Option<PathBuf>,
}

impl GenerateReport {
    /// One-line summary for the CLI
    pub fn summary(&self) -> String {
        format!(
            "{} samples, {} unique stacks, {} nodes ({} drawn), total {} [{}{}]",
            self.sample_count,
            self.unique_stacks,
            self.tree_nodes,
            self.drawn_frames,
            self.total_weight,
            self.parser,
            if self.parallel { ", parallel" } else { "" }
        )
    }
}

/// Execute the generate command
///
/// **Public** - main entry point called from main.rs
///
/// # Arguments
/// * `input` - Input file, `-` for stdin
/// * `output` - Output file; its extension selects the renderer
/// * `config` - Flamegraph configuration
///
/// # Errors
/// Every stage error, rewrapped into [`FlameGraphError`]
pub fn generate(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &FlamegraphConfig,
) -> Result<GenerateReport, FlameGraphError> {
    let input = input.as_ref();

    info!("Step 1/6: Validating configuration...");
    config.validate()?;

    info!("Step 2/6: Loading input from {}...", input.display());
    let buffer = InputBuffer::open(input)?;

    run_pipeline(buffer.as_bytes(), output.as_ref(), config)
}

/// Run the pipeline over bytes already in memory
///
/// **Public** - for library callers that hold the trace themselves
///
/// # Errors
/// Every stage error, rewrapped into [`FlameGraphError`]
pub fn generate_from_bytes(
    bytes: &[u8],
    output: impl AsRef<Path>,
    config: &FlamegraphConfig,
) -> Result<GenerateReport, FlameGraphError> {
    info!("Step 1/6: Validating configuration...");
    config.validate()?;

    info!("Step 2/6: Using {} bytes of in-memory input", bytes.len());
    run_pipeline(bytes, output.as_ref(), config)
}

/// Steps 3 to 6
///
/// **Private** - shared tail of both entry points
fn run_pipeline(
    bytes: &[u8],
    output: &Path,
    config: &FlamegraphConfig,
) -> Result<GenerateReport, FlameGraphError> {
    let start_time = Instant::now();
    let text = String::from_utf8_lossy(bytes);

    info!("Step 3/6: Parsing and collapsing stacks...");
    let collapsed = parse_and_collapse(&text, config)?;
    debug!(
        "Collapsed {} samples into {} unique stacks",
        collapsed.sample_count,
        collapsed.stacks.len()
    );

    info!("Step 4/6: Building call tree...");
    let tree = TreeBuilder::new(config.build_options()).build(&collapsed.stacks)?;
    debug!("Tree has {} nodes, height {}", tree.len(), tree.height());

    info!("Step 5/6: Computing layout...");
    let layout = compute_layout(&tree, &config.layout_options())?;

    let renderer = Renderer::for_path(output);
    info!("Step 6/6: Rendering {}...", renderer.name());
    let ctx = RenderContext {
        tree: &tree,
        layout: &layout,
        config,
        total_weight: tree.total_weight(),
        parser: &collapsed.parser,
    };
    renderer.render(&ctx, output)?;

    let folded = if config.write_folded {
        let path = folded_path(output);
        write_folded(&collapsed.stacks, &path)?;
        Some(path)
    } else {
        None
    };

    info!(
        "Generate completed in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );

    Ok(GenerateReport {
        parser: collapsed.parser.clone(),
        sample_count: collapsed.sample_count,
        unique_stacks: collapsed.stacks.len(),
        total_weight: tree.total_weight(),
        tree_nodes: tree.len(),
        drawn_frames: layout.rects.len(),
        parallel: collapsed.parallel,
        renderer,
        output: output.to_path_buf(),
        folded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::Stage;

    #[test]
    fn test_generate_from_bytes_writes_svg() {
        let temp_dir = tempfile::tempdir().unwrap();
        let output = temp_dir.path().join("graph.svg");

        let report = generate_from_bytes(
            b"main\nfoo\nbar\n\nmain\nfoo\nbaz\n",
            &output,
            &FlamegraphConfig::new().with_folded(true),
        )
        .unwrap();

        assert_eq!(report.renderer, Renderer::Svg);
        assert_eq!(report.total_weight, 2);
        assert_eq!(report.tree_nodes, 5);
        assert_eq!(report.folded, Some(temp_dir.path().join("graph.svg.collapse")));
        assert!(output.exists());
    }

    #[test]
    fn test_invalid_config_fails_before_input() {
        let err = generate(
            "/nonexistent/input.txt",
            "out.svg",
            &FlamegraphConfig::new().with_width(0),
        )
        .unwrap_err();
        assert_eq!(err.stage(), Stage::Config);
    }

    #[test]
    fn test_missing_input_is_resource_error() {
        let err = generate("/nonexistent/input.txt", "out.svg", &FlamegraphConfig::new())
            .unwrap_err();
        assert_eq!(err.stage(), Stage::Input);
    }

    #[test]
    fn test_comment_only_input_is_parse_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = generate_from_bytes(
            b"# nothing here\n\n",
            temp_dir.path().join("graph.svg"),
            &FlamegraphConfig::new(),
        )
        .unwrap_err();
        assert_eq!(err.stage(), Stage::Parse);
    }
}
