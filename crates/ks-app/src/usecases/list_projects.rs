use std::sync::Arc;

use ks_core::ports::{AlignmentStorePort, StoreError};
use ks_core::ProjectSummary;
use tracing::debug;

/// Use case for browsing the projects known to the alignment store.
pub struct ListProjects {
    store: Arc<dyn AlignmentStorePort>,
}

impl ListProjects {
    pub fn from_arc(store: Arc<dyn AlignmentStorePort>) -> Self {
        Self { store }
    }

    /// Returns the store's current snapshot. Nothing is cached between calls.
    #[tracing::instrument(name = "usecase.list_projects.execute", skip(self))]
    pub async fn execute(&self) -> Result<Vec<ProjectSummary>, StoreError> {
        let projects = self.store.list_projects().await?;
        debug!(count = projects.len(), "listed projects");
        Ok(projects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::test_support::{la_la_project, processing_project, MockStore};
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn test_execute_returns_every_project() {
        let store = Arc::new(MockStore::with_projects(vec![
            la_la_project("a"),
            processing_project("b"),
        ]));
        let use_case = ListProjects::from_arc(store);

        let projects = use_case.execute().await.unwrap();

        assert_eq!(projects.len(), 2);
        assert_eq!(projects[1].status, ks_core::ProjectStatus::Processing);
    }

    #[tokio::test]
    async fn test_execute_reads_through_each_time() {
        let store = Arc::new(MockStore::with_projects(vec![la_la_project("a")]));
        let use_case = ListProjects::from_arc(store.clone());
        assert_eq!(use_case.execute().await.unwrap().len(), 1);

        store
            .projects
            .lock()
            .unwrap()
            .insert("b".into(), la_la_project("b"));
        assert_eq!(use_case.execute().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_execute_propagates_unavailable_store() {
        let store = Arc::new(MockStore::default());
        store.unavailable.store(true, Ordering::SeqCst);
        let use_case = ListProjects::from_arc(store);

        let result = use_case.execute().await;

        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }
}
