use ks_core::ports::StoreError;
use ks_core::{ProjectId, ProjectStatus, TimingError, WordPosition};
use thiserror::Error;

use crate::usecases::OpenProjectError;

/// Errors surfaced by [`super::EditorSession`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("no project is open")]
    NoProjectOpen,

    /// `commit` was called with no word selected.
    #[error("no correction in progress")]
    NothingToCommit,

    #[error("no word at {0}")]
    WordOutOfRange(WordPosition),

    /// The draft was refused; the selection is kept so it can be fixed.
    #[error("invalid timing: {0}")]
    InvalidTiming(#[from] TimingError),

    #[error("project not found: {0}")]
    NotFound(ProjectId),

    #[error("project {project_id} is not ready for editing (status: {status})")]
    NotReady {
        project_id: ProjectId,
        status: ProjectStatus,
    },

    #[error("alignment store unavailable: {0}")]
    Unavailable(String),

    /// Another open/close happened while this project was loading.
    #[error("loading {0} was superseded by a newer request")]
    Superseded(ProjectId),

    #[error("correction push queue is closed")]
    PushQueueClosed,
}

impl From<StoreError> for SessionError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => SessionError::NotFound(id),
            StoreError::Unavailable(reason) => SessionError::Unavailable(reason),
            StoreError::Decode(reason) => SessionError::Unavailable(reason),
        }
    }
}

impl From<OpenProjectError> for SessionError {
    fn from(err: OpenProjectError) -> Self {
        match err {
            OpenProjectError::NotFound(id) => SessionError::NotFound(id),
            OpenProjectError::NotReady {
                project_id, status, ..
            } => SessionError::NotReady { project_id, status },
            OpenProjectError::Store(err) => err.into(),
        }
    }
}
