use std::sync::Arc;

use ks_core::ports::{AlignmentStorePort, StoreError};
use ks_core::timing::validate_segment;
use ks_core::{Project, ProjectId, ProjectStatus};
use thiserror::Error;
use tracing::{info, warn};

/// Errors produced when opening a project for editing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OpenProjectError {
    #[error("project not found: {0}")]
    NotFound(ProjectId),

    /// The editor view is unavailable; callers should show a status view instead.
    #[error("project {project_id} is not ready for editing (status: {status})")]
    NotReady {
        project_id: ProjectId,
        status: ProjectStatus,
        error_message: Option<String>,
    },

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for OpenProjectError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => OpenProjectError::NotFound(id),
            other => OpenProjectError::Store(other),
        }
    }
}

/// Use case for fetching a completed project's full detail.
pub struct OpenProject {
    store: Arc<dyn AlignmentStorePort>,
}

impl OpenProject {
    pub fn from_arc(store: Arc<dyn AlignmentStorePort>) -> Self {
        Self { store }
    }

    /// Fetches `id` and checks it can be edited.
    ///
    /// Segments breaking the timing invariants are reported but still
    /// returned; the store owns the data and the operator may want to fix
    /// them.
    #[tracing::instrument(name = "usecase.open_project.execute", skip(self), fields(project_id = %id))]
    pub async fn execute(&self, id: &ProjectId) -> Result<Project, OpenProjectError> {
        let project = self.store.get_project(id).await?;

        if project.status != ProjectStatus::Completed {
            info!(status = %project.status, "project not ready for editing");
            return Err(OpenProjectError::NotReady {
                project_id: project.id,
                status: project.status,
                error_message: project.error_message,
            });
        }

        for (segment_index, segment) in project.segments().iter().enumerate() {
            if let Err(err) = validate_segment(segment) {
                warn!(segment_index, error = %err, "segment violates timing invariants");
            }
        }

        info!(
            segments = project.segments().len(),
            words = project.word_count(),
            "project loaded"
        );
        Ok(project)
    }
}
