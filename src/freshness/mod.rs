//! Freshness detection: mtime comparison between a source and its target.

pub mod mtime;

pub use mtime::should_skip;
