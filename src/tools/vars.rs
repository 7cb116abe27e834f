//! Tool environment variables.
//!
//! Every tool process sees:
//!
//! | Variable          | Value                                  |
//! |-------------------|----------------------------------------|
//! | `KILN_ROOT`       | project root (directory of kiln.toml)  |
//! | `KILN_SOURCE_DIR` | absolute source root                   |
//! | `KILN_TARGET_DIR` | absolute target root                   |
//! | `KILN_MODE`       | `development` or `production`          |

use crate::config::ProjectConfig;
use crate::core::BuildMode;
use rustc_hash::FxHashMap;

/// `KILN_*` variables for one build, keyed without the `$`.
pub fn build_kiln_vars(config: &ProjectConfig, mode: BuildMode) -> FxHashMap<String, String> {
    let build = &config.build;
    [
        ("KILN_ROOT", config.get_root().display().to_string()),
        ("KILN_SOURCE_DIR", build.source.display().to_string()),
        ("KILN_TARGET_DIR", build.target.display().to_string()),
        ("KILN_MODE", mode.name().to_string()),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_string(), value))
    .collect()
}

/// Expand `$KILN_*` references in `args`.
///
/// Longer names go first, so a short name never eats the prefix of a longer
/// one. Unknown `$NAME`s are left untouched.
pub fn resolve_args(args: &[String], vars: &FxHashMap<String, String>) -> Vec<String> {
    let mut patterns: Vec<(String, &str)> = vars
        .iter()
        .map(|(key, value)| (format!("${key}"), value.as_str()))
        .collect();
    patterns.sort_by_key(|(pattern, _)| std::cmp::Reverse(pattern.len()));

    args.iter()
        .map(|arg| {
            patterns
                .iter()
                .fold(arg.clone(), |acc, (pattern, value)| acc.replace(pattern, value))
        })
        .collect()
}
