//! flamefold CLI
//!
//! Turns profiler stack dumps into flame graphs and folded stacks.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use flamefold::commands::{execute_collapse, execute_detect, generate};
use flamefold::flamegraph::FlamegraphConfig;
use flamefold::output::read_profile;
use flamefold::utils::config::SCHEMA_VERSION;

/// flamefold - flame graphs from sampled call stacks
#[derive(Parser, Debug)]
#[command(name = "flamefold")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a flame graph (SVG, HTML or JSON by output extension)
    Generate {
        /// Input file, `-` for stdin
        input: PathBuf,

        /// Output file
        #[arg(short, long, default_value = "flamegraph.svg")]
        output: PathBuf,

        /// Flamegraph title
        #[arg(long)]
        title: Option<String>,

        /// Subtitle shown under the title
        #[arg(long)]
        subtitle: Option<String>,

        /// Canvas width in pixels
        #[arg(long, default_value = "1200")]
        width: usize,

        /// Row height in pixels
        #[arg(long, default_value = "16")]
        frame_height: usize,

        /// Draw an icicle graph (root at top)
        #[arg(long)]
        inverted: bool,

        /// Frames narrower than this many pixels are not drawn
        #[arg(long, default_value = "0.1")]
        min_width: f64,

        /// Truncate stacks deeper than this (0 = unlimited)
        #[arg(long, default_value = "0")]
        max_depth: usize,

        /// Prune frames below this share of their parent (0..1)
        #[arg(long, default_value = "0")]
        prune: f64,

        /// Color scheme
        #[arg(long, default_value = "hot")]
        colors: String,

        /// Unit shown in tooltips
        #[arg(long, default_value = "samples")]
        count_name: String,

        /// Also write folded stacks to `<output>.collapse`
        #[arg(long)]
        folded: bool,

        #[command(flatten)]
        collapse: CollapseArgs,
    },

    /// Write folded stacks
    Collapse {
        /// Input file, `-` for stdin
        input: PathBuf,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        collapse: CollapseArgs,
    },

    /// Print the detected input dialect
    Detect {
        /// Input file, `-` for stdin
        input: PathBuf,
    },

    /// Validate a JSON profile written by `generate`
    Validate {
        /// Path to profile JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display version information
    Version,
}

/// Parsing and collapsing options shared by `generate` and `collapse`
#[derive(Args, Debug)]
struct CollapseArgs {
    /// Parser: auto, perf or generic
    #[arg(long, default_value = "auto")]
    parser: String,

    /// Always parse on a single thread
    #[arg(long)]
    no_parallel: bool,

    /// Maximum worker threads (default: available parallelism)
    #[arg(long)]
    threads: Option<usize>,

    /// Drop stacks seen fewer than this many times
    #[arg(long, default_value = "1")]
    min_count: u64,

    /// Drop stacks containing this frame name substring (repeatable)
    #[arg(long)]
    exclude: Vec<String>,
}

impl CollapseArgs {
    fn apply(self, mut config: FlamegraphConfig) -> FlamegraphConfig {
        config = config
            .with_parser(self.parser)
            .with_parallel(!self.no_parallel)
            .with_min_count(self.min_count)
            .with_exclude_patterns(self.exclude);

        if let Some(threads) = self.threads {
            config = config.with_max_workers(threads);
        }
        config
    }
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Generate {
            input,
            output,
            title,
            subtitle,
            width,
            frame_height,
            inverted,
            min_width,
            max_depth,
            prune,
            colors,
            count_name,
            folded,
            collapse,
        } => {
            let mut config = FlamegraphConfig::new()
                .with_width(width)
                .with_frame_height(frame_height)
                .with_inverted(inverted)
                .with_min_width(min_width)
                .with_max_depth(max_depth)
                .with_prune_threshold(prune)
                .with_colors(colors)
                .with_count_name(count_name)
                .with_folded(folded);

            if let Some(title) = title {
                config = config.with_title(title);
            }
            if let Some(subtitle) = subtitle {
                config = config.with_subtitle(subtitle);
            }
            let config = collapse.apply(config);

            let report = generate(&input, &output, &config)
                .with_context(|| format!("Failed to generate flamegraph from {}", input.display()))?;

            println!("✓ Flamegraph written to: {}", report.output.display());
            if let Some(folded) = &report.folded {
                println!("✓ Folded stacks written to: {}", folded.display());
            }
            println!("  {}", report.summary());
        }

        Commands::Collapse {
            input,
            output,
            collapse,
        } => {
            let config = collapse.apply(FlamegraphConfig::new());
            let stdout = std::io::stdout();

            execute_collapse(&input, output.as_deref(), &config, stdout.lock())
                .with_context(|| format!("Failed to collapse {}", input.display()))?;
        }

        Commands::Detect { input } => {
            let dialect = execute_detect(&input)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            println!("{}", dialect.parser_name());
        }

        Commands::Validate { file } => {
            validate_profile_file(file)?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}

/// Validate a profile JSON file
///
/// **Private** - internal command implementation
fn validate_profile_file(file_path: PathBuf) -> Result<()> {
    println!("Validating profile: {}", file_path.display());

    let profile = read_profile(&file_path).context("Failed to read profile JSON")?;

    println!("✓ Valid profile JSON");
    println!("  Version: {}", profile.version);
    println!("  Title: {}", profile.title);
    println!("  Parser: {}", profile.parser);
    println!("  Total weight: {}", profile.total_weight);
    println!(
        "  Nodes: {} ({} leaves, depth {})",
        profile.stats.total_nodes, profile.stats.leaf_nodes, profile.stats.max_depth
    );
    println!("  Frames: {}", profile.frames.len());

    Ok(())
}

/// Display version information
///
/// **Private** - internal command implementation
fn display_version() {
    println!("flamefold v{}", env!("CARGO_PKG_VERSION"));
    println!("Profile Schema: v{}", SCHEMA_VERSION);
}
