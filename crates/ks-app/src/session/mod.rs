//! Editor session.
//!
//! One session holds at most one open project view: its segments, the
//! playback clock, the highlight and the correction flow. Corrections are
//! applied locally first and then pushed to the alignment store by a
//! background worker, in commit order.

mod context;
mod error;
mod orchestrator;
mod push_worker;

pub use context::ViewTicket;
pub use error::SessionError;
pub use orchestrator::EditorSession;
