use std::sync::Arc;

use ks_core::ports::{AlignmentStorePort, SessionEvent, SessionEventPort};
use ks_core::TimingCorrection;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, info_span, warn, Instrument};

use super::context::{SessionContext, ViewTicket};

pub(crate) struct PushJob {
    pub ticket: ViewTicket,
    pub correction: TimingCorrection,
}

pub(crate) enum PushCommand {
    Push(PushJob),
    /// Answered once every command queued before it has been handled.
    Flush(oneshot::Sender<()>),
}

/// Spawns the worker that sends corrections to the store one at a time.
///
/// A single consumer keeps pushes in commit order. The worker stops when the
/// last sender is dropped.
pub(crate) fn spawn_push_worker(
    store: Arc<dyn AlignmentStorePort>,
    events: Arc<dyn SessionEventPort>,
    context: Arc<SessionContext>,
) -> mpsc::UnboundedSender<PushCommand> {
    let (tx, mut rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        while let Some(command) = rx.recv().await {
            match command {
                PushCommand::Push(job) => {
                    push_correction(store.as_ref(), events.as_ref(), &context, job).await
                }
                PushCommand::Flush(done) => {
                    let _ = done.send(());
                }
            }
        }
        debug!("correction push worker stopped");
    });

    tx
}

async fn push_correction(
    store: &dyn AlignmentStorePort,
    events: &dyn SessionEventPort,
    context: &SessionContext,
    job: PushJob,
) {
    let PushJob { ticket, correction } = job;
    let span = info_span!(
        "session.push_correction",
        project_id = %ticket.project_id,
        segment_index = correction.segment_index,
        word_index = correction.word_index,
    );

    async move {
        let outcome = store
            .submit_corrections(&ticket.project_id, &[correction])
            .await;
        let failed = outcome.as_ref().err().map(|_| correction);
        let current = context.finish_push(&ticket, failed).await;

        match outcome {
            Ok(()) if current => {
                info!("correction persisted");
                events
                    .emit(SessionEvent::PushSucceeded {
                        project_id: ticket.project_id,
                        correction,
                    })
                    .await;
            }
            Ok(()) => {
                debug!("correction persisted after its view was closed");
            }
            Err(err) => {
                // Reported even for a closed view; only view state is left alone.
                warn!(error = %err, current, "correction push failed, local edit kept");
                events
                    .emit(SessionEvent::PushFailed {
                        project_id: ticket.project_id,
                        correction,
                        reason: err.to_string(),
                    })
                    .await;
            }
        }
    }
    .instrument(span)
    .await
}
