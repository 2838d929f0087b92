//! Partitioned parsing and concurrent collapsing for large inputs.
//!
//! Everything downstream of the histogram is unaware of which path ran:
//! both produce the same [`CollapsedStacks`](crate::aggregator::CollapsedStacks).

pub mod collapse;
pub mod partition;

// Re-export main types and functions
pub use collapse::{collapse_concurrent, ConcurrentStacks};
pub use partition::{parse_partitioned, LineIndex, PartitionPlan};

use crate::parser::{ParsedSamples, StackParser};
use crate::utils::error::ParseError;
use log::info;

/// Parse `index` with `parser` across a partition plan
///
/// # Errors
/// * `ParseError::NoSamples` - no valid sample in the input
pub fn parse_parallel<'a>(
    text: &'a str,
    index: &LineIndex<'a>,
    parser: StackParser,
    min_lines_per_worker: usize,
    max_workers: Option<usize>,
) -> Result<ParsedSamples<'a>, ParseError> {
    let (dialect, name) = parser.resolve(text);
    let plan = PartitionPlan::for_lines(index.len(), min_lines_per_worker, max_workers);

    info!(
        "Using parser: {} ({} lines, {} workers)",
        name,
        index.len(),
        plan.worker_count()
    );

    let samples = parse_partitioned(index, &plan, dialect);
    if samples.is_empty() {
        return Err(ParseError::NoSamples { parser: name });
    }

    Ok(ParsedSamples {
        samples,
        parser: name,
        dialect,
    })
}
