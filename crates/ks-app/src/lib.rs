//! karaoke-sync application orchestration layer
//!
//! Use cases that read through to the alignment store, and the editor session
//! that ties one open project to the playback clock and the correction flow.

pub mod session;
pub mod usecases;

pub use session::{EditorSession, SessionError, ViewTicket};
pub use usecases::{
    CheckStoreHealth, ListProjects, OpenProject, OpenProjectError, RequestExport,
    WaitForProcessing, WaitForProcessingError,
};
