//! Config field path.

use std::fmt;

/// Dotted path of a `kiln.toml` field (`"bundler.production.config"`).
///
/// Sections list theirs in a `FIELDS` constant so diagnostics and the
/// unknown-field warning spell them the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath(&'static str);

impl FieldPath {
    pub const fn new(path: &'static str) -> Self {
        Self(path)
    }

    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}`", self.0)
    }
}
