use std::sync::Arc;
use std::time::Duration;

use ks_core::config::EditorConfig;
use ks_core::ports::{AlignmentStorePort, StoreError};
use ks_core::{Project, ProjectId, ProjectStatus};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WaitForProcessingError {
    #[error("project not found: {0}")]
    NotFound(ProjectId),

    #[error("project still {status} after {attempts} polls")]
    StillProcessing {
        status: ProjectStatus,
        attempts: u32,
    },

    /// Every poll failed; carries the last store error.
    #[error("gave up after {attempts} polls: {last_error}")]
    Unavailable {
        attempts: u32,
        last_error: StoreError,
    },
}

/// Use case for waiting until the pipeline finished with a freshly uploaded project.
///
/// Polls the project status at a fixed interval. Transient store failures are
/// logged and polling continues; a missing project stops immediately.
pub struct WaitForProcessing {
    store: Arc<dyn AlignmentStorePort>,
    interval: Duration,
    max_attempts: u32,
}

impl WaitForProcessing {
    pub fn from_arc(store: Arc<dyn AlignmentStorePort>, config: &EditorConfig) -> Self {
        Self {
            store,
            interval: config.poll_interval(),
            max_attempts: config.poll_max_attempts.max(1),
        }
    }

    /// Returns the project once its status is `completed` or `error`.
    #[tracing::instrument(name = "usecase.wait_for_processing.execute", skip(self), fields(project_id = %id))]
    pub async fn execute(&self, id: &ProjectId) -> Result<Project, WaitForProcessingError> {
        let mut last_status = None;
        let mut last_error = None;

        for attempt in 1..=self.max_attempts {
            match self.store.get_project(id).await {
                Ok(project) if project.status.is_terminal() => {
                    info!(attempt, status = %project.status, "processing finished");
                    return Ok(project);
                }
                Ok(project) => {
                    debug!(attempt, status = %project.status, "still processing");
                    last_status = Some(project.status);
                }
                Err(StoreError::NotFound(id)) => return Err(WaitForProcessingError::NotFound(id)),
                Err(err) => {
                    warn!(attempt, error = %err, "status poll failed");
                    last_error = Some(err);
                }
            }

            if attempt < self.max_attempts {
                tokio::time::sleep(self.interval).await;
            }
        }

        match (last_status, last_error) {
            (Some(status), _) => Err(WaitForProcessingError::StillProcessing {
                status,
                attempts: self.max_attempts,
            }),
            (None, Some(last_error)) => Err(WaitForProcessingError::Unavailable {
                attempts: self.max_attempts,
                last_error,
            }),
            (None, None) => Err(WaitForProcessingError::StillProcessing {
                status: ProjectStatus::Processing,
                attempts: self.max_attempts,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::test_support::{la_la_project, MockStore};
    use std::sync::atomic::Ordering;

    fn config(max_attempts: u32) -> EditorConfig {
        EditorConfig {
            poll_interval_ms: 2_000,
            poll_max_attempts: max_attempts,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_execute_returns_once_completed() {
        let store = Arc::new(MockStore::with_projects(vec![la_la_project("p1")]));
        store.status_script.lock().unwrap().extend([
            Ok(ProjectStatus::Uploaded),
            Ok(ProjectStatus::Processing),
        ]);
        let use_case = WaitForProcessing::from_arc(store.clone(), &config(10));

        let project = use_case.execute(&"p1".into()).await.unwrap();

        assert_eq!(project.status, ProjectStatus::Completed);
        assert_eq!(store.get_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_execute_returns_error_status_as_finished() {
        let store = Arc::new(MockStore::with_projects(vec![la_la_project("p1")]));
        store
            .status_script
            .lock()
            .unwrap()
            .push_back(Ok(ProjectStatus::Error));
        let use_case = WaitForProcessing::from_arc(store, &config(10));

        let project = use_case.execute(&"p1".into()).await.unwrap();

        assert_eq!(project.status, ProjectStatus::Error);
    }

    #[tokio::test(start_paused = true)]
    async fn test_execute_gives_up_after_max_attempts() {
        let store = Arc::new(MockStore::with_projects(vec![la_la_project("p1")]));
        store
            .status_script
            .lock()
            .unwrap()
            .extend((0..5).map(|_| Ok(ProjectStatus::Processing)));
        let use_case = WaitForProcessing::from_arc(store.clone(), &config(3));

        let result = use_case.execute(&"p1".into()).await;

        assert_eq!(
            result,
            Err(WaitForProcessingError::StillProcessing {
                status: ProjectStatus::Processing,
                attempts: 3,
            })
        );
        assert_eq!(store.get_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_execute_keeps_polling_through_transient_failures() {
        let store = Arc::new(MockStore::with_projects(vec![la_la_project("p1")]));
        store.status_script.lock().unwrap().extend([
            Err(StoreError::Unavailable("503".to_string())),
            Ok(ProjectStatus::Processing),
        ]);
        let use_case = WaitForProcessing::from_arc(store, &config(5));

        let project = use_case.execute(&"p1".into()).await.unwrap();

        assert_eq!(project.status, ProjectStatus::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_execute_stops_on_missing_project() {
        let store = Arc::new(MockStore::default());
        let use_case = WaitForProcessing::from_arc(store.clone(), &config(5));

        let result = use_case.execute(&"gone".into()).await;

        assert_eq!(result, Err(WaitForProcessingError::NotFound("gone".into())));
        assert_eq!(store.get_calls.load(Ordering::SeqCst), 1);
    }
}
