use chrono::{DateTime, NaiveDateTime, Utc};
use ks_core::ports::StoreError;
use ks_core::{Project, ProjectId, ProjectStatus, ProjectSummary, Segment, Word};
use tracing::debug;

use super::models::{ProjectDto, SegmentDto, WordDto};

/// Maps store documents to domain types.
pub struct ProjectDtoMapper;

impl ProjectDtoMapper {
    pub fn to_domain(&self, dto: &ProjectDto) -> Result<Project, StoreError> {
        let status = parse_status(&dto.status)?;
        Ok(Project {
            id: ProjectId::from(dto.id.as_str()),
            name: dto.project_name.clone(),
            audio_filename: dto.audio_filename.clone(),
            text_filename: dto.text_filename.clone(),
            language: dto.language.clone(),
            status,
            created_at: dto.created_at.as_deref().and_then(parse_timestamp),
            audio_duration: dto.audio_duration,
            error_message: dto.error_message.clone(),
            segments: dto
                .aligned_segments
                .as_ref()
                .map(|segments| segments.iter().map(segment_to_domain).collect()),
        })
    }

    pub fn to_summary(&self, dto: &ProjectDto) -> Result<ProjectSummary, StoreError> {
        Ok(ProjectSummary {
            id: ProjectId::from(dto.id.as_str()),
            name: dto.project_name.clone(),
            audio_filename: dto.audio_filename.clone(),
            text_filename: dto.text_filename.clone(),
            language: dto.language.clone(),
            status: parse_status(&dto.status)?,
            created_at: dto.created_at.as_deref().and_then(parse_timestamp),
        })
    }
}

fn segment_to_domain(dto: &SegmentDto) -> Segment {
    Segment {
        start: dto.start,
        end: dto.end,
        text: dto.text.clone(),
        words: dto.words.iter().map(word_to_domain).collect(),
    }
}

fn word_to_domain(dto: &WordDto) -> Word {
    Word {
        text: dto.word.clone(),
        start: dto.start,
        end: dto.end,
        confidence: dto.confidence,
    }
}

fn parse_status(raw: &str) -> Result<ProjectStatus, StoreError> {
    match raw {
        "uploaded" => Ok(ProjectStatus::Uploaded),
        "processing" => Ok(ProjectStatus::Processing),
        "completed" => Ok(ProjectStatus::Completed),
        "error" => Ok(ProjectStatus::Error),
        other => Err(StoreError::Decode(format!("unknown project status '{other}'"))),
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    match NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        Ok(naive) => Some(naive.and_utc()),
        Err(err) => {
            debug!(raw, error = %err, "ignoring unparsable created_at");
            None
        }
    }
}
