use async_trait::async_trait;
use ks_core::config::StoreConfig;
use ks_core::ports::{AlignmentStorePort, StoreError};
use ks_core::{
    ExportFormat, ExportPayload, Project, ProjectId, ProjectSummary, TimingCorrection,
};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use super::mapper::ProjectDtoMapper;
use super::models::{MessageDto, ProjectDto};

/// [`AlignmentStorePort`] backed by the store's HTTP JSON API.
pub struct HttpAlignmentStore {
    client: reqwest::Client,
    api_base: String,
    mapper: ProjectDtoMapper,
}

impl HttpAlignmentStore {
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| StoreError::Unavailable(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(client, &config.base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            api_base: format!("{}/api", base_url.trim_end_matches('/')),
            mapper: ProjectDtoMapper,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    fn project_url(&self, id: &ProjectId, suffix: &str) -> String {
        self.url(&format!("/projects/{}{}", id.as_str(), suffix))
    }
}

#[async_trait]
impl AlignmentStorePort for HttpAlignmentStore {
    #[instrument(name = "store.health", skip(self))]
    async fn health(&self) -> Result<String, StoreError> {
        let response = send(self.client.get(self.url("/"))).await?;
        let body: MessageDto = read_json(check_status(response, None)?).await?;
        Ok(body.message)
    }

    #[instrument(name = "store.list_projects", skip(self))]
    async fn list_projects(&self) -> Result<Vec<ProjectSummary>, StoreError> {
        let response = send(self.client.get(self.url("/projects"))).await?;
        let dtos: Vec<ProjectDto> = read_json(check_status(response, None)?).await?;
        debug!(count = dtos.len(), "projects listed");
        dtos.iter().map(|dto| self.mapper.to_summary(dto)).collect()
    }

    #[instrument(name = "store.get_project", skip(self), fields(project_id = %id))]
    async fn get_project(&self, id: &ProjectId) -> Result<Project, StoreError> {
        let response = send(self.client.get(self.project_url(id, ""))).await?;
        let dto: ProjectDto = read_json(check_status(response, Some(id))?).await?;
        self.mapper.to_domain(&dto)
    }

    #[instrument(name = "store.submit_corrections", skip(self, corrections), fields(project_id = %id, count = corrections.len()))]
    async fn submit_corrections(
        &self,
        id: &ProjectId,
        corrections: &[TimingCorrection],
    ) -> Result<(), StoreError> {
        let request = self
            .client
            .post(self.project_url(id, "/correct"))
            .json(corrections);
        let response = send(request).await?;
        check_status(response, Some(id))?;
        Ok(())
    }

    #[instrument(name = "store.download_export", skip(self), fields(project_id = %id, format = %format))]
    async fn download_export(
        &self,
        id: &ProjectId,
        format: ExportFormat,
    ) -> Result<ExportPayload, StoreError> {
        let url = self.project_url(id, &format!("/download/{}", format.as_str()));
        let response = check_status(send(self.client.get(url)).await?, Some(id))?;
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let bytes = response
            .bytes()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        debug!(size = bytes.len(), "export downloaded");
        Ok(ExportPayload {
            format,
            bytes,
            content_type,
        })
    }

    fn audio_url(&self, id: &ProjectId) -> String {
        self.project_url(id, "/audio")
    }
}

async fn send(request: reqwest::RequestBuilder) -> Result<Response, StoreError> {
    request.send().await.map_err(map_transport_error)
}

/// 404 on a project route means the project is gone; every other non-2xx
/// status is the store failing to answer.
fn check_status(response: Response, project: Option<&ProjectId>) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    match (status, project) {
        (StatusCode::NOT_FOUND, Some(id)) => Err(StoreError::NotFound(id.clone())),
        _ => Err(StoreError::Unavailable(format!(
            "unexpected status {} from {}",
            status,
            response.url()
        ))),
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, StoreError> {
    let body = response.bytes().await.map_err(map_transport_error)?;
    serde_json::from_slice(&body).map_err(|e| StoreError::Decode(e.to_string()))
}

fn map_transport_error(error: reqwest::Error) -> StoreError {
    if error.is_timeout() {
        StoreError::Unavailable("request timed out".to_string())
    } else {
        StoreError::Unavailable(error.to_string())
    }
}
