//! Reasons a definition produces no code

use tspec_analysis::InternalError;

/// Why a definition was left out of the generated source
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SkipReason {
    /// The definition, or a definition it depends on, has errors
    #[error("`{0}` has errors")]
    Erroneous(String),
    /// The check results needed for generation are missing or out of date
    #[error(transparent)]
    Internal(#[from] InternalError),
}

/// A definition left out of a generated unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    name: String,
    reason: SkipReason,
}

impl Skipped {
    /// Records that `name` was left out for `reason`
    #[must_use]
    pub const fn new(name: String, reason: SkipReason) -> Self {
        Self { name, reason }
    }

    /// Returns `Module.name` of the skipped definition
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns why the definition was left out
    #[must_use]
    pub const fn reason(&self) -> &SkipReason {
        &self.reason
    }

    /// Returns whether the skip points at a bug rather than at user errors
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self.reason, SkipReason::Internal(_))
    }
}
