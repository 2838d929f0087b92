//! Configuration constants shared across the pipeline.

/// Current JSON profile schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Number of leading lines the format detector looks at
pub const MAX_PREVIEW_LINES: usize = 128;

/// Inputs with fewer lines than this are parsed on a single thread
pub const PARALLEL_LINE_THRESHOLD: usize = 20_000;

/// Smallest line range handed to one parse worker
pub const MIN_LINES_PER_WORKER: usize = 10_000;

/// Suffix appended to the output path for the folded byproduct
pub const FOLDED_SUFFIX: &str = ".collapse";

// Counter names perf prints in sample headers (`... 250000 cycles:u:`)
pub const COUNTER_EVENT_MARKERS: &[&str] = &[
    "cycles:",
    "instructions:",
    "cpu-clock:",
    "task-clock:",
    "cache-misses:",
    "branch-misses:",
];

/// Frame names drawn as separators rather than real frames
pub const SEPARATOR_FRAMES: &[&str] = &["-", "--"];

/// Defaults for [`FlamegraphConfig`](crate::flamegraph::FlamegraphConfig)
pub const DEFAULT_WIDTH: usize = 1200;
pub const DEFAULT_FRAME_HEIGHT: usize = 16;
pub const DEFAULT_XPAD: usize = 10;
pub const DEFAULT_FONT_SIZE: usize = 12;
pub const DEFAULT_FONT_WIDTH: f64 = 0.59;
pub const DEFAULT_MIN_WIDTH: f64 = 0.1;
