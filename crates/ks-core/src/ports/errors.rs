use thiserror::Error;

use crate::ids::ProjectId;

/// Failures reported by the alignment store boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("project not found: {0}")]
    NotFound(ProjectId),

    /// Network failure, server error or any other reason the store could not answer.
    #[error("alignment store unavailable: {0}")]
    Unavailable(String),

    #[error("unexpected response from alignment store: {0}")]
    Decode(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}
