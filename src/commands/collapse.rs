//! Collapse command implementation.
//!
//! Parses the input and writes the folded histogram, either to a file or
//! to stdout. The parse + collapse half is shared with `generate`.

use crate::aggregator::{collapse, CollapsedStacks};
use crate::flamegraph::FlamegraphConfig;
use crate::output::{write_folded, write_folded_to};
use crate::parallel::{collapse_concurrent, parse_parallel, LineIndex};
use crate::utils::error::FlameGraphError;
use crate::utils::input::InputBuffer;
use log::{debug, info};
use std::io::Write;
use std::path::Path;

/// Histogram of one input plus how it was produced
#[derive(Debug)]
pub struct Collapsed<'a> {
    pub stacks: CollapsedStacks<'a>,

    /// Parser name, e.g. `AutoDetect(GenericTextParser)`
    pub parser: String,

    /// Valid samples that went into the histogram
    pub sample_count: usize,

    /// Whether the partitioned path ran
    pub parallel: bool,
}

/// Parse `text` and collapse it into a histogram
///
/// Takes the partitioned path when parallelism is enabled and the input has
/// at least `parallel_line_threshold` lines. Both paths yield the same
/// histogram.
///
/// **Public** - shared by the generate and collapse commands
///
/// # Errors
/// * `FlameGraphError::ParseFailed` - no valid sample in the input
/// * `FlameGraphError::CollapseEmpty` - nothing survived the collapse filters
pub fn parse_and_collapse<'a>(
    text: &'a str,
    config: &FlamegraphConfig,
) -> Result<Collapsed<'a>, FlameGraphError> {
    let parser = config.stack_parser();
    let options = config.collapse_options();

    if config.parallel {
        let index = LineIndex::new(text);
        if index.len() >= config.parallel_line_threshold {
            let parsed = parse_parallel(
                text,
                &index,
                parser,
                config.min_lines_per_worker,
                config.max_workers,
            )?;
            let stacks = collapse_concurrent(&parsed.samples, &options)?;

            return Ok(Collapsed {
                stacks,
                parser: parsed.parser,
                sample_count: parsed.samples.len(),
                parallel: true,
            });
        }
        debug!(
            "{} lines is below the parallel threshold of {}",
            index.len(),
            config.parallel_line_threshold
        );
    }

    let parsed = parser.parse(text)?;
    let stacks = collapse(&parsed.samples, &options)?;

    Ok(Collapsed {
        stacks,
        parser: parsed.parser,
        sample_count: parsed.samples.len(),
        parallel: false,
    })
}

/// Execute the collapse command
///
/// Writes folded stacks to `output`, or to `writer` when no output file is
/// given. Returns the number of unique paths written.
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// Any stage error of input loading, parsing, collapsing or writing
pub fn execute_collapse(
    input: impl AsRef<Path>,
    output: Option<&Path>,
    config: &FlamegraphConfig,
    writer: impl Write,
) -> Result<usize, FlameGraphError> {
    config.validate()?;

    let buffer = InputBuffer::open(input.as_ref())?;
    let text = String::from_utf8_lossy(buffer.as_bytes());
    let collapsed = parse_and_collapse(&text, config)?;

    info!(
        "Collapsed {} samples into {} unique stacks ({})",
        collapsed.sample_count,
        collapsed.stacks.len(),
        collapsed.parser
    );

    match output {
        Some(path) => write_folded(&collapsed.stacks, path)?,
        None => write_folded_to(&collapsed.stacks, writer)?,
    }

    Ok(collapsed.stacks.len())
}
