//! Error types for the entire pipeline.
//!
//! We use `thiserror` for library-style errors with one enum per stage,
//! and `anyhow` for application-level error propagation in main.rs.
//! The pipeline driver rewraps every stage error into [`FlameGraphError`]
//! so callers only ever see one taxonomy.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while validating a [`FlamegraphConfig`](crate::flamegraph::FlamegraphConfig)
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0}")]
    Invalid(String),
}

/// Errors that can occur while obtaining the input as a byte view
#[derive(Error, Debug)]
pub enum InputError {
    #[error("cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot map {path} into memory: {source}")]
    Map {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read input: {0}")]
    Read(#[source] std::io::Error),
}

/// Errors that can occur during stack parsing
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("no valid samples found in input ({parser})")]
    NoSamples { parser: String },
}

/// Errors that can occur while collapsing samples into a histogram
#[derive(Error, Debug)]
pub enum CollapseError {
    #[error("no samples to collapse")]
    NoSamples,

    #[error("no stacks remained after collapsing")]
    EmptyHistogram,
}

/// Errors that can occur while building the call tree
#[derive(Error, Debug)]
pub enum TreeError {
    #[error("tree has no samples")]
    Empty,
}

/// Errors that can occur during layout and file output
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("root node has no samples to render")]
    EmptyTree,

    #[error("failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("invalid output path: {0}")]
    InvalidPath(String),
}

/// Pipeline stage that produced a [`FlameGraphError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Config,
    Input,
    Parse,
    Collapse,
    Build,
    Render,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Config => "config",
            Stage::Input => "input",
            Stage::Parse => "parse",
            Stage::Collapse => "collapse",
            Stage::Build => "build",
            Stage::Render => "render",
        };
        f.write_str(name)
    }
}

/// Top-level error returned by the pipeline driver
#[derive(Error, Debug)]
pub enum FlameGraphError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("input unavailable: {0}")]
    ResourceUnavailable(#[from] InputError),

    #[error("parse failed: {0}")]
    ParseFailed(#[from] ParseError),

    #[error("collapse failed: {0}")]
    CollapseEmpty(#[from] CollapseError),

    #[error("tree build failed: {0}")]
    TreeEmpty(#[from] TreeError),

    #[error("render failed: {0}")]
    RenderFailed(#[from] RenderError),
}

impl FlameGraphError {
    /// Stage the underlying failure came from
    pub fn stage(&self) -> Stage {
        match self {
            FlameGraphError::Config(_) => Stage::Config,
            FlameGraphError::ResourceUnavailable(_) => Stage::Input,
            FlameGraphError::ParseFailed(_) => Stage::Parse,
            FlameGraphError::CollapseEmpty(_) => Stage::Collapse,
            FlameGraphError::TreeEmpty(_) => Stage::Build,
            FlameGraphError::RenderFailed(_) => Stage::Render,
        }
    }
}
