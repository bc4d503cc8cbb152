//! ID type wrappers for type safety.

mod id_macro;
pub mod project_id;

pub use project_id::ProjectId;
