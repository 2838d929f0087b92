//! Command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the library components to perform user tasks and
//! report failures as [`FlameGraphError`](crate::utils::error::FlameGraphError).

pub mod collapse;
pub mod detect;
pub mod generate;

// Re-export main command functions
pub use collapse::{execute_collapse, parse_and_collapse, Collapsed};
pub use detect::execute_detect;
pub use generate::{generate, generate_from_bytes, GenerateReport};
