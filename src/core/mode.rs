//! Build mode: selects the bundler profile for a build.

use serde::Deserialize;
use std::fmt;

/// Build mode, resolved once per invocation and passed explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    /// Development profile: unminified bundles, source maps.
    #[default]
    #[serde(alias = "dev")]
    #[value(alias = "dev")]
    Development,
    /// Production profile: optimized bundles.
    #[serde(alias = "prod")]
    #[value(alias = "prod")]
    Production,
}

impl BuildMode {
    /// Canonical name, also exported to tools as `KILN_MODE`.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
