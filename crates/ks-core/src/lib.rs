//! # ks-core
//!
//! Core domain models and business logic for karaoke-sync.
//!
//! This crate contains pure business logic without any infrastructure dependencies:
//! the word/segment timing model, the playback synchronizer, the correction
//! state machine and the ports the application layer talks to.

// Public module exports
pub mod config;
pub mod correction;
pub mod ids;
pub mod playback;
pub mod ports;
pub mod project;
pub mod timing;

// Re-export commonly used types at the crate root
pub use config::AppConfig;
pub use correction::{
    CorrectionAction, CorrectionEvent, CorrectionState, CorrectionStateMachine, EditSelection,
};
pub use ids::ProjectId;
pub use playback::{Highlight, PlaybackClock, PlaybackSynchronizer, TimelineIndex};
pub use project::{ExportFormat, ExportPayload, Project, ProjectStatus, ProjectSummary};
pub use timing::{Segment, TimingCorrection, TimingError, Word, WordPosition};
