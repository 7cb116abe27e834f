//! Source tree mirroring.
//!
//! | Module        | Purpose                                      |
//! |---------------|----------------------------------------------|
//! | `entry`       | One-pass walk of the source root             |
//! | `route`       | Source path → target path                    |
//! | `kind`        | Transpile vs copy, by extension              |
//! | `fs`          | Target filesystem port and atomic writes     |
//! | `materialize` | One file: freshness check, transpile or copy |
//! | `tree`        | Whole tree: directory barrier, file fan-out  |

mod entry;
mod fs;
mod kind;
mod materialize;
mod route;
mod tree;

#[cfg(test)]
pub(crate) mod testing;

pub use fs::{StdFs, TargetFs};
pub use materialize::Materializer;
pub use route::TreeRoute;
pub use tree::{MirrorStats, mirror_tree};
