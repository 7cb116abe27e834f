//! Shared helpers.

pub mod exec;
pub mod path;
pub mod plural;
