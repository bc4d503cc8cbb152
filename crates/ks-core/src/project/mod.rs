//! Project domain module.
//!
//! A project is one song: its source files, its processing status and, once
//! the alignment pipeline completed, its timed segments.

mod export;
mod model;

pub use export::{ExportFormat, ExportPayload, UnknownExportFormat};
pub use model::{Project, ProjectStatus, ProjectSummary};
