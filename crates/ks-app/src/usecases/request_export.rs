use std::sync::Arc;

use ks_core::ports::{AlignmentStorePort, StoreError};
use ks_core::{ExportFormat, ExportPayload, ProjectId};
use tracing::info;

/// Use case for downloading a rendered subtitle file.
///
/// Pure pass-through: the payload is handed back untouched for the caller to
/// save or offer for download.
pub struct RequestExport {
    store: Arc<dyn AlignmentStorePort>,
}

impl RequestExport {
    pub fn from_arc(store: Arc<dyn AlignmentStorePort>) -> Self {
        Self { store }
    }

    #[tracing::instrument(
        name = "usecase.request_export.execute",
        skip(self),
        fields(project_id = %id, format = %format)
    )]
    pub async fn execute(
        &self,
        id: &ProjectId,
        format: ExportFormat,
    ) -> Result<ExportPayload, StoreError> {
        let payload = self.store.download_export(id, format).await?;
        info!(bytes = payload.len(), "export downloaded");
        Ok(payload)
    }
}
