//! Flamegraph geometry, colors and configuration.
//!
//! This module converts a finished call tree into positioned, colored
//! rectangles. Turning those into markup is left to [`crate::output`].

pub mod color;
pub mod config;
pub mod layout;

// Re-export main types
pub use color::{ColorScheme, Rgb};
pub use config::FlamegraphConfig;
pub use layout::{compute_layout, FrameRect, Layout, LayoutOptions, Orientation};
