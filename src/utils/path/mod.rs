//! Path utilities.

mod fs;

pub use fs::{is_within, normalize_path};
