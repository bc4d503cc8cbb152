use std::str::FromStr;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Subtitle formats the alignment store can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Ttml,
    Lrc,
}

impl ExportFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Ttml => "ttml",
            ExportFormat::Lrc => "lrc",
        }
    }

    pub fn file_extension(self) -> &'static str {
        self.as_str()
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown export format: {0}")]
pub struct UnknownExportFormat(pub String);

impl FromStr for ExportFormat {
    type Err = UnknownExportFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ttml" => Ok(ExportFormat::Ttml),
            "lrc" => Ok(ExportFormat::Lrc),
            _ => Err(UnknownExportFormat(s.to_string())),
        }
    }
}

/// Rendered subtitle file as returned by the store. Never interpreted locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPayload {
    pub format: ExportFormat,
    pub bytes: Bytes,
    pub content_type: Option<String>,
}

impl ExportPayload {
    /// `{project_name}.{ext}`, the name the store itself suggests for downloads.
    pub fn suggested_file_name(&self, project_name: &str) -> String {
        format!("{}.{}", project_name, self.format.file_extension())
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
