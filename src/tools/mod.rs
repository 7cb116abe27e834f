//! External build tools.
//!
//! | Module       | Purpose                                         |
//! |--------------|-------------------------------------------------|
//! | `transpiler` | Per-file script transform (`npx babel` default) |
//! | `bundler`    | One-shot UI bundle (`npx webpack` default)      |
//! | `vars`       | `$KILN_*` environment and argument expansion    |

mod bundler;
mod transpiler;
mod vars;

pub use bundler::{BundleProfile, Bundler, CommandBundler};
pub use transpiler::{CommandTranspiler, Transpiler};
pub use vars::{build_kiln_vars, resolve_args};
