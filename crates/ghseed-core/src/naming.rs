//! Validation for project and organization names.
//!
//! A validated name is safe to pass as a single argument to `git` and `gh`
//! and to join onto a directory path: it cannot start with `-`, cannot
//! contain shell metacharacters or path separators, and cannot contain `..`.

use crate::error::GhseedError;

/// Longest accepted name, in characters.
pub const MAX_NAME_LEN: usize = 100;

/// The first rule a candidate name violates.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    #[error("name cannot be empty")]
    Empty,

    #[error("name is {len} characters long (maximum is 100)")]
    TooLong { len: usize },

    #[error("name cannot start with '.'")]
    LeadingDot,

    #[error("name cannot start with '-'")]
    LeadingDash,

    #[error("character {ch:?} is not allowed (use letters, digits, '.', '_' or '-')")]
    InvalidChar { ch: char },

    #[error("name cannot contain '..'")]
    ParentTraversal,
}

/// A project or organization name that passed [`validate`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoName(String);

impl RepoName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for RepoName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RepoName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_allowed(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-')
}

fn check(name: &str) -> Result<(), NameError> {
    if name.is_empty() {
        return Err(NameError::Empty);
    }
    let len = name.chars().count();
    if len > MAX_NAME_LEN {
        return Err(NameError::TooLong { len });
    }
    if name.starts_with('.') {
        return Err(NameError::LeadingDot);
    }
    if name.starts_with('-') {
        return Err(NameError::LeadingDash);
    }
    if let Some(ch) = name.chars().find(|c| !is_allowed(*c)) {
        return Err(NameError::InvalidChar { ch });
    }
    if name.contains("..") {
        return Err(NameError::ParentTraversal);
    }
    Ok(())
}

/// Validate a project or organization name, returning it trimmed.
///
/// Rules are checked in order and the first violation is reported.
pub fn validate(name: &str) -> Result<RepoName, GhseedError> {
    let trimmed = name.trim();
    check(trimmed).map_err(|reason| GhseedError::InvalidName {
        name: name.to_string(),
        reason,
    })?;
    Ok(RepoName(trimmed.to_string()))
}
