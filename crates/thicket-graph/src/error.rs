//! Store errors

use crate::id::{StatementId, ThingId};

/// Failure reported by a store collaborator
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Store could not be reached or refused the operation
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Write conflicted with concurrent modification
    #[error("conflicting write: {0}")]
    Conflict(String),

    /// Referenced thing does not exist
    #[error("thing \"{0}\" does not exist in the store")]
    MissingThing(ThingId),

    /// Referenced statement does not exist
    #[error("statement \"{0}\" does not exist in the store")]
    MissingStatement(StatementId),
}

impl StoreError {
    /// Check if error is retryable by the caller
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Conflict(_))
    }
}
