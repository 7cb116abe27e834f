//! Configuration error types.

use super::FieldPath;
use owo_colors::OwoColorize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{}`", .0.display())]
    Io(PathBuf, #[source] std::io::Error),

    #[error("config file `{}` not found", .0.display())]
    NotFound(PathBuf),

    #[error("config file parsing error")]
    Toml(#[from] toml::de::Error),

    // No #[from]: a source() here would print every problem twice
    #[error("{0}")]
    Diagnostics(ConfigDiagnostics),
}

/// One invalid field.
#[derive(Debug, Clone)]
pub struct Problem {
    pub field: FieldPath,
    pub message: String,
    pub hint: Option<String>,
}

/// Problems collected across every section of `kiln.toml`.
///
/// Validation keeps going after the first problem so the user can fix them
/// all in one pass.
#[derive(Debug, Default)]
pub struct ConfigDiagnostics {
    problems: Vec<Problem>,
}

impl ConfigDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, field: FieldPath, message: impl Into<String>) {
        self.push(field, message.into(), None);
    }

    pub fn error_with_hint(
        &mut self,
        field: FieldPath,
        message: impl Into<String>,
        hint: impl Into<String>,
    ) {
        self.push(field, message.into(), Some(hint.into()));
    }

    fn push(&mut self, field: FieldPath, message: String, hint: Option<String>) {
        self.problems.push(Problem {
            field,
            message,
            hint,
        });
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    pub fn errors(&self) -> &[Problem] {
        &self.problems
    }

    /// `Ok` when nothing was collected.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ConfigDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.len();
        let noun = if count == 1 { "problem" } else { "problems" };
        write!(f, "{}", format!("invalid kiln.toml ({count} {noun}):").red().bold())?;

        for (i, problem) in self.errors().iter().enumerate() {
            write!(
                f,
                "\n{:>3}. {} {}",
                i + 1,
                problem.field.as_str().cyan(),
                problem.message
            )?;
            if let Some(hint) = &problem.hint {
                write!(f, "\n     {} {hint}", "hint:".yellow())?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ConfigDiagnostics {}
