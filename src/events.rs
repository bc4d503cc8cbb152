//! Session notifications for the command-line front end.

use async_trait::async_trait;
use ks_core::ports::{SessionEvent, SessionEventPort};
use tracing::{debug, info, warn};

/// Writes every session event to the log as structured JSON.
///
/// Failures are logged at `warn` so they reach the console at the default
/// filter level; the rest stay at `info`/`debug`.
pub struct LoggingSessionEvents;

#[async_trait]
impl SessionEventPort for LoggingSessionEvents {
    async fn emit(&self, event: SessionEvent) {
        let payload = serde_json::to_string(&event).unwrap_or_else(|e| format!("<{e}>"));
        match &event {
            SessionEvent::PushFailed { .. }
            | SessionEvent::CorrectionRejected { .. }
            | SessionEvent::ProjectLoadFailed { .. } => {
                warn!(event = %payload, "session event")
            }
            SessionEvent::HighlightChanged { .. } | SessionEvent::CorrectionStateChanged { .. } => {
                debug!(event = %payload, "session event")
            }
            _ => info!(event = %payload, "session event"),
        }
    }
}
