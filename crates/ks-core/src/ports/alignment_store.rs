use crate::ids::ProjectId;
use crate::ports::errors::StoreError;
use crate::project::{ExportFormat, ExportPayload, Project, ProjectSummary};
use crate::timing::TimingCorrection;

/// The external alignment pipeline/store.
///
/// It owns project creation, long-term persistence and export rendering. The
/// editor reads snapshots from it and sends corrections to it; nothing here
/// is cached.
#[async_trait::async_trait]
pub trait AlignmentStorePort: Send + Sync {
    /// Banner message of the store's root endpoint.
    async fn health(&self) -> Result<String, StoreError>;

    async fn list_projects(&self) -> Result<Vec<ProjectSummary>, StoreError>;

    /// Full detail, including segments when processing completed.
    async fn get_project(&self, id: &ProjectId) -> Result<Project, StoreError>;

    /// Applies corrections server-side, in order.
    async fn submit_corrections(
        &self,
        id: &ProjectId,
        corrections: &[TimingCorrection],
    ) -> Result<(), StoreError>;

    async fn download_export(
        &self,
        id: &ProjectId,
        format: ExportFormat,
    ) -> Result<ExportPayload, StoreError>;

    /// Location of the media stream the playback device should load.
    fn audio_url(&self, id: &ProjectId) -> String;
}
