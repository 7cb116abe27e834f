//! `[transpiler]` section.
//!
//! # Example
//!
//! ```toml
//! [transpiler]
//! command = ["npx", "babel"]        # source path is appended
//! args = ["--config-file", "$KILN_ROOT/babel.config.json"]
//! extensions = ["js", "jsx"]        # everything else is copied
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TranspilerConfig {
    /// Transpiler command, e.g. `["babel"]` or `["npx", "babel"]`.
    pub command: Vec<String>,
    /// Fixed arguments placed before the source path.
    pub args: Vec<String>,
    /// Final extensions (without the dot) routed through the transpiler.
    pub extensions: Vec<String>,
}

impl Default for TranspilerConfig {
    fn default() -> Self {
        Self {
            command: vec!["npx".into(), "babel".into()],
            args: Vec::new(),
            extensions: vec!["js".into(), "jsx".into()],
        }
    }
}

pub struct TranspilerConfigFields {
    pub command: FieldPath,
    pub extensions: FieldPath,
}

impl TranspilerConfig {
    pub const FIELDS: TranspilerConfigFields = TranspilerConfigFields {
        command: FieldPath::new("transpiler.command"),
        extensions: FieldPath::new("transpiler.extensions"),
    };

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        super::validate_command(Self::FIELDS.command, &self.command, diag);

        if self.extensions.is_empty() {
            diag.error_with_hint(
                Self::FIELDS.extensions,
                format!("{} is empty", Self::FIELDS.extensions),
                "list at least one extension, e.g. [\"js\"]",
            );
        }

        for ext in &self.extensions {
            if ext.is_empty() || ext.starts_with('.') {
                diag.error_with_hint(
                    Self::FIELDS.extensions,
                    format!("invalid extension `{ext}`"),
                    format!("write `{}` without the leading dot", ext.trim_start_matches('.')),
                );
            }
        }
    }
}
