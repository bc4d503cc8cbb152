//! Hand-written port doubles shared by the unit tests of this crate.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use ks_core::ports::{AlignmentStorePort, SessionEvent, SessionEventPort, StoreError};
use ks_core::{
    ExportFormat, ExportPayload, Project, ProjectId, ProjectStatus, ProjectSummary, Segment,
    TimingCorrection, Word,
};
use tokio::sync::Semaphore;

pub(crate) fn la_la_project(id: &str) -> Project {
    Project {
        id: ProjectId::from(id),
        name: format!("Song {id}"),
        audio_filename: "song.wav".to_string(),
        text_filename: "song.txt".to_string(),
        language: "en".to_string(),
        status: ProjectStatus::Completed,
        created_at: None,
        audio_duration: Some(3.0),
        error_message: None,
        segments: Some(vec![Segment::from_words(vec![
            Word::new("la", 1.0, 1.4),
            Word::new("la", 1.4, 1.8),
        ])]),
    }
}

pub(crate) fn processing_project(id: &str) -> Project {
    Project {
        status: ProjectStatus::Processing,
        segments: None,
        ..la_la_project(id)
    }
}

#[derive(Default)]
pub(crate) struct MockStore {
    pub projects: Mutex<HashMap<ProjectId, Project>>,
    /// Statuses handed out by successive `get_project` calls before falling back to `projects`.
    pub status_script: Mutex<VecDeque<Result<ProjectStatus, StoreError>>>,
    pub submitted: Mutex<Vec<(ProjectId, Vec<TimingCorrection>)>>,
    pub get_calls: AtomicUsize,
    pub unavailable: AtomicBool,
    pub fail_submit: AtomicBool,
    /// When set, each submit waits for one permit.
    pub submit_gate: Option<Arc<Semaphore>>,
    /// When set, each `get_project` waits for one permit.
    pub load_gate: Option<Arc<Semaphore>>,
}

impl MockStore {
    pub(crate) fn with_projects(projects: Vec<Project>) -> Self {
        Self {
            projects: Mutex::new(projects.into_iter().map(|p| (p.id.clone(), p)).collect()),
            ..Default::default()
        }
    }

    pub(crate) fn gated(mut self, gate: Arc<Semaphore>) -> Self {
        self.submit_gate = Some(gate);
        self
    }

    pub(crate) fn gated_loads(mut self, gate: Arc<Semaphore>) -> Self {
        self.load_gate = Some(gate);
        self
    }

    pub(crate) fn submitted(&self) -> Vec<(ProjectId, Vec<TimingCorrection>)> {
        self.submitted.lock().unwrap().clone()
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl AlignmentStorePort for MockStore {
    async fn health(&self) -> Result<String, StoreError> {
        self.check_available()?;
        Ok("Karaoke Subtitles API".to_string())
    }

    async fn list_projects(&self) -> Result<Vec<ProjectSummary>, StoreError> {
        self.check_available()?;
        let mut summaries: Vec<_> = self
            .projects
            .lock()
            .unwrap()
            .values()
            .map(Project::summary)
            .collect();
        summaries.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
        Ok(summaries)
    }

    async fn get_project(&self, id: &ProjectId) -> Result<Project, StoreError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.load_gate {
            gate.acquire().await.expect("gate closed").forget();
        }
        self.check_available()?;
        let scripted = self.status_script.lock().unwrap().pop_front();
        let mut project = self
            .projects
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        if let Some(status) = scripted {
            project.status = status?;
        }
        Ok(project)
    }

    async fn submit_corrections(
        &self,
        id: &ProjectId,
        corrections: &[TimingCorrection],
    ) -> Result<(), StoreError> {
        if let Some(gate) = &self.submit_gate {
            gate.acquire().await.expect("gate closed").forget();
        }
        self.submitted
            .lock()
            .unwrap()
            .push((id.clone(), corrections.to_vec()));
        if self.fail_submit.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("502 Bad Gateway".to_string()));
        }
        Ok(())
    }

    async fn download_export(
        &self,
        id: &ProjectId,
        format: ExportFormat,
    ) -> Result<ExportPayload, StoreError> {
        self.check_available()?;
        if !self.projects.lock().unwrap().contains_key(id) {
            return Err(StoreError::NotFound(id.clone()));
        }
        let bytes = match format {
            ExportFormat::Ttml => Bytes::from_static(b"<tt xmlns=\"http://www.w3.org/ns/ttml\"/>"),
            ExportFormat::Lrc => Bytes::from_static(b"[ti:Song]\n[ar:Generated]\n"),
        };
        Ok(ExportPayload {
            format,
            bytes,
            content_type: None,
        })
    }

    fn audio_url(&self, id: &ProjectId) -> String {
        format!("http://store.test/api/projects/{id}/audio")
    }
}

#[derive(Default)]
pub(crate) struct RecordingEvents {
    pub events: Mutex<Vec<SessionEvent>>,
}

impl RecordingEvents {
    pub(crate) fn snapshot(&self) -> Vec<SessionEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl SessionEventPort for RecordingEvents {
    async fn emit(&self, event: SessionEvent) {
        self.events.lock().unwrap().push(event);
    }
}
