use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::ProjectId;
use crate::timing::{Segment, Word, WordPosition};

/// Processing status reported by the alignment pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Uploaded,
    Processing,
    Completed,
    Error,
}

impl ProjectStatus {
    /// `true` once the pipeline will not change the status again.
    pub fn is_terminal(self) -> bool {
        matches!(self, ProjectStatus::Completed | ProjectStatus::Error)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProjectStatus::Uploaded => "uploaded",
            ProjectStatus::Processing => "processing",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Error => "error",
        }
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Listing entry for the project browser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub id: ProjectId,
    pub name: String,
    pub audio_filename: String,
    pub text_filename: String,
    pub language: String,
    pub status: ProjectStatus,
    pub created_at: Option<DateTime<Utc>>,
}

/// Full project detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub audio_filename: String,
    pub text_filename: String,
    pub language: String,
    pub status: ProjectStatus,
    pub created_at: Option<DateTime<Utc>>,
    /// Media length in seconds, when the pipeline measured it.
    pub audio_duration: Option<f64>,
    pub error_message: Option<String>,
    /// Present only when `status` is `Completed`.
    pub segments: Option<Vec<Segment>>,
}

impl Project {
    pub fn summary(&self) -> ProjectSummary {
        ProjectSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            audio_filename: self.audio_filename.clone(),
            text_filename: self.text_filename.clone(),
            language: self.language.clone(),
            status: self.status,
            created_at: self.created_at,
        }
    }

    pub fn is_editable(&self) -> bool {
        self.status == ProjectStatus::Completed
    }

    pub fn segments(&self) -> &[Segment] {
        self.segments.as_deref().unwrap_or(&[])
    }

    pub fn segment(&self, index: usize) -> Option<&Segment> {
        self.segments().get(index)
    }

    pub fn word(&self, position: WordPosition) -> Option<&Word> {
        self.segment(position.segment_index)?.word(position.word_index)
    }

    /// Replaces one segment in place. Returns `false` if the index does not exist.
    pub fn replace_segment(&mut self, index: usize, segment: Segment) -> bool {
        match self.segments.as_mut().and_then(|s| s.get_mut(index)) {
            Some(slot) => {
                *slot = segment;
                true
            }
            None => false,
        }
    }

    pub fn word_count(&self) -> usize {
        self.segments().iter().map(|s| s.words.len()).sum()
    }
}
