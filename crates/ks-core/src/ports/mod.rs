//! Port interfaces for the application layer
//!
//! Ports define the contract between the editor logic (use cases, session)
//! and infrastructure implementations. The alignment store is reached only
//! through [`AlignmentStorePort`]; everything the operator must be told about
//! goes out through [`SessionEventPort`].

mod alignment_store;
mod errors;
mod session_event;

pub use alignment_store::AlignmentStorePort;
pub use errors::StoreError;
pub use session_event::{SessionEvent, SessionEventPort};
