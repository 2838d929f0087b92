//! Shared utilities: constants, error types and input loading.

pub mod config;
pub mod error;
pub mod input;

pub use error::{
    CollapseError, ConfigError, FlameGraphError, InputError, ParseError, RenderError, Stage,
    TreeError,
};
pub use input::InputBuffer;
