use serde::Serialize;

use crate::correction::CorrectionState;
use crate::ids::ProjectId;
use crate::playback::Highlight;
use crate::timing::{TimingCorrection, TimingError};

/// Everything the operator-facing layer is notified about.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A load started; it stays pending until `ProjectOpened` or
    /// `ProjectLoadFailed` for the same project, or until a newer open/close.
    ProjectLoading {
        project_id: ProjectId,
    },
    ProjectLoadFailed {
        project_id: ProjectId,
        reason: String,
    },
    ProjectOpened {
        project_id: ProjectId,
        name: String,
        segment_count: usize,
    },
    ProjectClosed {
        project_id: ProjectId,
    },
    /// The project list changed upstream and should be fetched again.
    ProjectsInvalidated,
    HighlightChanged {
        project_id: ProjectId,
        position: f64,
        highlight: Highlight,
    },
    CorrectionStateChanged {
        project_id: ProjectId,
        state: CorrectionState,
    },
    /// The draft was refused locally; the operator stays in the editor.
    CorrectionRejected {
        project_id: ProjectId,
        error: TimingError,
    },
    CorrectionApplied {
        project_id: ProjectId,
        correction: TimingCorrection,
    },
    /// A push was queued; `pending` counts pushes not yet answered.
    PushPending {
        project_id: ProjectId,
        correction: TimingCorrection,
        pending: usize,
    },
    PushSucceeded {
        project_id: ProjectId,
        correction: TimingCorrection,
    },
    /// The local edit is kept but the store may not have it.
    PushFailed {
        project_id: ProjectId,
        correction: TimingCorrection,
        reason: String,
    },
}

#[async_trait::async_trait]
pub trait SessionEventPort: Send + Sync {
    async fn emit(&self, event: SessionEvent);
}
