use serde::{Deserialize, Serialize};

/// Project document as served by `GET /api/projects[/{id}]`.
///
/// The store returns raw database documents, so extra keys (`_id`,
/// `user_corrections`, ...) are expected and ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDto {
    pub id: String,
    pub project_name: String,
    #[serde(default)]
    pub audio_filename: String,
    #[serde(default)]
    pub text_filename: String,
    #[serde(default)]
    pub language: String,
    pub status: String,
    /// Naive UTC timestamp or RFC 3339, depending on how the document was stored.
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub audio_duration: Option<f64>,
    #[serde(default)]
    pub aligned_segments: Option<Vec<SegmentDto>>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentDto {
    pub start: f64,
    pub end: f64,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub words: Vec<WordDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordDto {
    pub word: String,
    pub start: f64,
    pub end: f64,
    #[serde(default)]
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct MessageDto {
    pub message: String,
}
