//! Editor session orchestrator.
//!
//! This module coordinates the correction state machine, the playback
//! synchronizer and the alignment store for the one project that is open.

use std::sync::Arc;

use ks_core::ports::{AlignmentStorePort, SessionEvent, SessionEventPort};
use ks_core::{
    CorrectionAction, CorrectionEvent, CorrectionState, CorrectionStateMachine, ExportFormat,
    ExportPayload, Highlight, Project, ProjectId, ProjectSummary, TimingCorrection, WordPosition,
};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, info_span, trace, warn, Instrument};

use super::context::{OpenView, SessionContext, ViewTicket};
use super::error::SessionError;
use super::push_worker::{spawn_push_worker, PushCommand, PushJob};
use crate::usecases::{ListProjects, OpenProject, RequestExport};

/// Orchestrator for one operator's editing session.
///
/// Holds at most one open project. Local state changes happen under the
/// session lock; everything that talks to the store either runs before the
/// lock is taken (loads) or is queued to the push worker (corrections).
pub struct EditorSession {
    context: Arc<SessionContext>,
    store: Arc<dyn AlignmentStorePort>,
    events: Arc<dyn SessionEventPort>,
    list_projects: ListProjects,
    open_project: OpenProject,
    request_export: RequestExport,
    push_tx: mpsc::UnboundedSender<PushCommand>,
}

enum PlayheadMove {
    Tick,
    Seek,
}

impl EditorSession {
    /// Creates the session and spawns its push worker; call from within a tokio runtime.
    pub fn new(store: Arc<dyn AlignmentStorePort>, events: Arc<dyn SessionEventPort>) -> Self {
        let context = SessionContext::new().arc();
        let push_tx = spawn_push_worker(store.clone(), events.clone(), context.clone());
        Self {
            list_projects: ListProjects::from_arc(store.clone()),
            open_project: OpenProject::from_arc(store.clone()),
            request_export: RequestExport::from_arc(store.clone()),
            context,
            store,
            events,
            push_tx,
        }
    }

    // ----- project browsing -------------------------------------------------

    pub async fn list_projects(&self) -> Result<Vec<ProjectSummary>, SessionError> {
        Ok(self.list_projects.execute().await?)
    }

    /// Tells listeners the project list is stale (e.g. after an upload) and re-reads it.
    pub async fn refresh_projects(&self) -> Result<Vec<ProjectSummary>, SessionError> {
        self.events.emit(SessionEvent::ProjectsInvalidated).await;
        self.list_projects().await
    }

    pub async fn request_export(
        &self,
        id: &ProjectId,
        format: ExportFormat,
    ) -> Result<ExportPayload, SessionError> {
        Ok(self.request_export.execute(id, format).await?)
    }

    /// Loads `id` and makes it the open project, replacing any previous one.
    ///
    /// `ProjectLoading` is emitted before the store is asked and
    /// [`loading`](Self::loading) reports the project until the load settles,
    /// so a store that never answers shows up as a pending load. If another
    /// open or a close starts while this load is in flight, the loaded project
    /// is discarded and `Superseded` is returned. A failed load leaves the
    /// previously open project in place.
    pub async fn open_project(&self, id: &ProjectId) -> Result<ViewTicket, SessionError> {
        let generation = self.context.begin_load(id).await;
        let span = info_span!("session.open_project", project_id = %id, generation);

        async {
            self.events
                .emit(SessionEvent::ProjectLoading {
                    project_id: id.clone(),
                })
                .await;

            let project = match self.open_project.execute(id).await {
                Ok(project) => project,
                Err(err) => {
                    let err = SessionError::from(err);
                    if self.context.finish_load(generation).await {
                        warn!(error = %err, "project load failed");
                        self.events
                            .emit(SessionEvent::ProjectLoadFailed {
                                project_id: id.clone(),
                                reason: err.to_string(),
                            })
                            .await;
                    }
                    return Err(err);
                }
            };
            let name = project.name.clone();
            let segment_count = project.segments().len();

            let installed = self.context.install(project, generation).await;
            self.context.finish_load(generation).await;
            let (ticket, replaced) = match installed {
                Ok(installed) => installed,
                Err(_) => {
                    warn!("discarding project load superseded by a newer request");
                    return Err(SessionError::Superseded(id.clone()));
                }
            };

            if let Some(old) = replaced {
                info!(closed = %old.project_id, "previous project closed");
                self.events
                    .emit(SessionEvent::ProjectClosed {
                        project_id: old.project_id,
                    })
                    .await;
            }
            info!(segment_count, "project opened");
            self.events
                .emit(SessionEvent::ProjectOpened {
                    project_id: ticket.project_id.clone(),
                    name,
                    segment_count,
                })
                .await;
            Ok(ticket)
        }
        .instrument(span)
        .await
    }

    /// Project whose load is still waiting for the store.
    pub async fn loading(&self) -> Option<ProjectId> {
        self.context.loading().await
    }

    /// Closes the open project, dropping any draft. Pushes already queued still
    /// reach the store but no longer touch session state.
    pub async fn close_project(&self) -> Option<ProjectId> {
        let closed = self.context.close().await?;
        info!(project_id = %closed.project_id, "project closed");
        self.events
            .emit(SessionEvent::ProjectClosed {
                project_id: closed.project_id.clone(),
            })
            .await;
        Some(closed.project_id)
    }

    // ----- playback ---------------------------------------------------------

    /// Media time update. Emits `HighlightChanged` only when the highlight moves.
    pub async fn on_playback_tick(&self, t: f64) -> Result<Highlight, SessionError> {
        self.move_playhead(t, PlayheadMove::Tick).await
    }

    /// Jumps to `t` (clamped to the media range) keeping play/pause state.
    pub async fn seek(&self, t: f64) -> Result<Highlight, SessionError> {
        self.move_playhead(t, PlayheadMove::Seek).await
    }

    pub async fn play(&self) -> Result<(), SessionError> {
        self.with_view(|view| view.clock.play()).await
    }

    pub async fn pause(&self) -> Result<(), SessionError> {
        self.with_view(|view| view.clock.pause()).await
    }

    pub async fn is_playing(&self) -> Option<bool> {
        self.read_view(|view| view.clock.is_playing()).await
    }

    pub async fn position(&self) -> Option<f64> {
        self.read_view(|view| view.clock.position()).await
    }

    pub async fn highlight(&self) -> Option<Highlight> {
        self.read_view(|view| view.synchronizer.current()).await
    }

    async fn move_playhead(&self, t: f64, kind: PlayheadMove) -> Result<Highlight, SessionError> {
        let (highlight, changed) = {
            let mut guard = self.context.view().await;
            let view = guard.as_mut().ok_or(SessionError::NoProjectOpen)?;
            let position = match kind {
                PlayheadMove::Tick => {
                    trace!(t, "playback tick");
                    view.clock.tick(t)
                }
                PlayheadMove::Seek => {
                    debug!(requested = t, "seek");
                    view.clock.seek(t)
                }
            };
            let changed = view.resync().map(|highlight| SessionEvent::HighlightChanged {
                project_id: view.ticket.project_id.clone(),
                position,
                highlight,
            });
            (view.synchronizer.current(), changed)
        };

        if let Some(event) = changed {
            self.events.emit(event).await;
        }
        Ok(highlight)
    }

    // ----- corrections ------------------------------------------------------

    /// Starts editing a word. Ignored while another word is being edited.
    pub async fn select(
        &self,
        segment_index: usize,
        word_index: usize,
    ) -> Result<CorrectionState, SessionError> {
        let position = WordPosition::new(segment_index, word_index);
        self.dispatch(move |view| {
            if !view.correction.is_idle() {
                debug!(%position, "selection already active, ignoring select");
                return Ok(None);
            }
            let word = view
                .project
                .word(position)
                .ok_or(SessionError::WordOutOfRange(position))?;
            Ok(Some(CorrectionEvent::Select {
                position,
                start: word.start,
                end: word.end,
            }))
        })
        .await
    }

    /// Changes the draft boundaries. The project is not touched until commit.
    pub async fn update_draft(&self, start: f64, end: f64) -> Result<CorrectionState, SessionError> {
        self.dispatch(move |_| Ok(Some(CorrectionEvent::UpdateDraft { start, end })))
            .await
    }

    /// Discards the draft.
    pub async fn cancel(&self) -> Result<CorrectionState, SessionError> {
        self.dispatch(|_| Ok(Some(CorrectionEvent::Cancel))).await
    }

    /// Applies the draft locally and queues it for the store.
    ///
    /// Returns `NothingToCommit` when no word is selected and `InvalidTiming`
    /// when the draft breaks the segment invariants; in the latter case the
    /// selection and draft are kept so the operator can adjust them. A
    /// successful commit returns `Idle` without waiting for the store.
    pub async fn commit(&self) -> Result<CorrectionState, SessionError> {
        let state = self
            .dispatch(|view| {
                if view.correction.is_idle() {
                    return Err(SessionError::NothingToCommit);
                }
                Ok(Some(CorrectionEvent::Commit))
            })
            .await?;
        match state.error() {
            Some(error) => Err(SessionError::InvalidTiming(error.clone())),
            None => Ok(state),
        }
    }

    pub async fn correction_state(&self) -> Option<CorrectionState> {
        self.read_view(|view| view.correction.clone()).await
    }

    async fn dispatch<F>(&self, capture: F) -> Result<CorrectionState, SessionError>
    where
        F: FnOnce(&OpenView) -> Result<Option<CorrectionEvent>, SessionError>,
    {
        // Serialise dispatch so a transition chain and its actions run atomically.
        let _dispatch_guard = self.context.acquire_dispatch_lock().await;
        let span = info_span!("session.correction.dispatch");

        async {
            let mut outbox = Vec::new();
            let state = {
                let mut guard = self.context.view().await;
                let view = guard.as_mut().ok_or(SessionError::NoProjectOpen)?;
                match capture(view)? {
                    Some(event) => self.run_transitions(view, event, &mut outbox),
                    None => view.correction.clone(),
                }
            };

            for event in outbox {
                self.events.emit(event).await;
            }
            Ok(state)
        }
        .instrument(span)
        .await
    }

    fn run_transitions(
        &self,
        view: &mut OpenView,
        event: CorrectionEvent,
        outbox: &mut Vec<SessionEvent>,
    ) -> CorrectionState {
        let project_id = view.ticket.project_id.clone();
        let initial = view.correction.clone();
        let mut pending_events = vec![event];

        while let Some(event) = pending_events.pop() {
            let from = view.correction.clone();
            let event_name = format!("{:?}", event);
            let (next, actions) = CorrectionStateMachine::transition(from.clone(), event);
            info!(from = ?from, to = ?next, event = %event_name, "correction state transition");
            view.correction = next;

            for action in actions {
                debug!(?action, "correction executing action");
                match action {
                    CorrectionAction::ApplyCorrection(correction) => {
                        match view.apply_correction(&correction) {
                            Ok(()) => {
                                outbox.push(SessionEvent::CorrectionApplied {
                                    project_id: project_id.clone(),
                                    correction,
                                });
                                if let Some(highlight) = view.resync() {
                                    outbox.push(SessionEvent::HighlightChanged {
                                        project_id: project_id.clone(),
                                        position: view.clock.position(),
                                        highlight,
                                    });
                                }
                                pending_events.push(CorrectionEvent::CommitApplied);
                            }
                            Err(error) => {
                                info!(error = %error, "correction rejected");
                                outbox.push(SessionEvent::CorrectionRejected {
                                    project_id: project_id.clone(),
                                    error: error.clone(),
                                });
                                pending_events.push(CorrectionEvent::CommitRejected { error });
                            }
                        }
                    }
                    CorrectionAction::PushCorrection(correction) => {
                        self.queue_push(view, correction, outbox);
                    }
                }
            }
        }

        if view.correction != initial {
            outbox.push(SessionEvent::CorrectionStateChanged {
                project_id,
                state: view.correction.clone(),
            });
        }
        view.correction.clone()
    }

    fn queue_push(
        &self,
        view: &mut OpenView,
        correction: TimingCorrection,
        outbox: &mut Vec<SessionEvent>,
    ) {
        let job = PushJob {
            ticket: view.ticket.clone(),
            correction,
        };
        match self.push_tx.send(PushCommand::Push(job)) {
            Ok(()) => {
                view.pending_pushes += 1;
                outbox.push(SessionEvent::PushPending {
                    project_id: view.ticket.project_id.clone(),
                    correction,
                    pending: view.pending_pushes,
                });
            }
            Err(_) => {
                error!("correction push worker is gone, local edit kept");
                view.unsynced.push(correction);
                outbox.push(SessionEvent::PushFailed {
                    project_id: view.ticket.project_id.clone(),
                    correction,
                    reason: SessionError::PushQueueClosed.to_string(),
                });
            }
        }
    }

    // ----- status -----------------------------------------------------------

    /// Snapshot of the open project including local corrections.
    pub async fn project(&self) -> Option<Project> {
        self.read_view(|view| view.project.clone()).await
    }

    pub async fn open_ticket(&self) -> Option<ViewTicket> {
        self.read_view(|view| view.ticket.clone()).await
    }

    /// Pushes of the open project still waiting for the store.
    pub async fn pending_pushes(&self) -> usize {
        self.read_view(|view| view.pending_pushes)
            .await
            .unwrap_or(0)
    }

    /// Corrections of the open project that the store may not have.
    pub async fn unsynced_corrections(&self) -> Vec<TimingCorrection> {
        self.read_view(|view| view.unsynced.clone())
            .await
            .unwrap_or_default()
    }

    pub async fn audio_url(&self) -> Option<String> {
        let id = self.read_view(|view| view.project.id.clone()).await?;
        Some(self.store.audio_url(&id))
    }

    /// Waits until every push queued so far has been answered.
    pub async fn flush_pushes(&self) -> Result<(), SessionError> {
        let (done_tx, done_rx) = oneshot::channel();
        self.push_tx
            .send(PushCommand::Flush(done_tx))
            .map_err(|_| SessionError::PushQueueClosed)?;
        done_rx.await.map_err(|_| SessionError::PushQueueClosed)
    }

    async fn read_view<T>(&self, read: impl FnOnce(&OpenView) -> T) -> Option<T> {
        self.context.view().await.as_ref().map(read)
    }

    async fn with_view(&self, write: impl FnOnce(&mut OpenView)) -> Result<(), SessionError> {
        let mut guard = self.context.view().await;
        let view = guard.as_mut().ok_or(SessionError::NoProjectOpen)?;
        write(view);
        Ok(())
    }
}
