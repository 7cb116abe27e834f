//! Core types - pure abstractions shared across the codebase.

mod error;
mod mode;

pub use error::BuildError;
pub use mode::BuildMode;
