//! Project identifiers
//!
//! A project key names one unit of fetch work. It keys the checkpoint file and,
//! in lowercase form, the per-project issue file.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors produced when parsing a project key
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProjectKeyError {
    #[error("Project key must not be empty")]
    Empty,

    #[error("Invalid character '{ch}' in project key '{key}' (allowed: letters, digits, '-')")]
    InvalidChar { key: String, ch: char },
}

/// Uppercase project identifier such as `HADOOP`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectKey(String);

impl ProjectKey {
    /// Parses and normalizes a project key
    ///
    /// Surrounding whitespace is trimmed and the key is uppercased.
    pub fn parse(raw: &str) -> Result<Self, ProjectKeyError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ProjectKeyError::Empty);
        }

        // '_' separates the key from the issue file suffix, so it cannot appear in a key
        if let Some(ch) = trimmed
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-'))
        {
            return Err(ProjectKeyError::InvalidChar {
                key: trimmed.to_string(),
                ch,
            });
        }

        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercase form used for issue file names
    pub fn file_stem(&self) -> String {
        self.0.to_ascii_lowercase()
    }
}

impl fmt::Display for ProjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ProjectKey {
    type Err = ProjectKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
