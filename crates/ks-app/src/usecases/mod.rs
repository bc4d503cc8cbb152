//! Business logic use cases
//!
//! Each use case is a thin, stateless read-through to the alignment store.
//! Session state (open project, playback, corrections) lives in
//! [`crate::session::EditorSession`].

pub mod check_store_health;
pub mod list_projects;
pub mod open_project;
pub mod request_export;
pub mod wait_for_processing;

pub use check_store_health::CheckStoreHealth;
pub use list_projects::ListProjects;
pub use open_project::{OpenProject, OpenProjectError};
pub use request_export::RequestExport;
pub use wait_for_processing::{WaitForProcessing, WaitForProcessingError};

#[cfg(test)]
pub(crate) mod test_support;
