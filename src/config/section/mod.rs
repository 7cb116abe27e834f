//! Configuration section definitions.
//!
//! Each module corresponds to a section in `kiln.toml`:
//!
//! | Module       | TOML Section    | Purpose                              |
//! |--------------|-----------------|--------------------------------------|
//! | `build`      | `[build]`       | Source/target roots, mode, jobs      |
//! | `transpiler` | `[transpiler]`  | Per-file transform command           |
//! | `bundler`    | `[bundler]`     | Bundler command and mode profiles    |

mod build;
mod bundler;
mod transpiler;

pub use build::BuildConfig;
pub use bundler::BundlerConfig;
pub use transpiler::TranspilerConfig;

use super::{ConfigDiagnostics, FieldPath};

/// Check that the program of `command` is on PATH.
///
/// Only the first word is looked up; a package behind a runner such as
/// `npx babel` is resolved by the runner at build time.
pub(crate) fn validate_command(field: FieldPath, command: &[String], diag: &mut ConfigDiagnostics) {
    let Some(program) = command.first() else {
        diag.error(field, format!("{field} is empty"));
        return;
    };

    if which::which(program).is_ok() {
        return;
    }

    diag.error_with_hint(
        field,
        format!("`{program}` not found"),
        format!("install the command or update {field}"),
    );
}
