use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use ks_core::timing::apply_correction;
use ks_core::{
    CorrectionState, Highlight, PlaybackClock, PlaybackSynchronizer, Project, ProjectId,
    TimingCorrection, TimingError,
};
use tokio::sync::{Mutex, MutexGuard};

/// Tag identifying one open project view.
///
/// Asynchronous results (loads, pushes) carry the ticket they were started
/// under and are only applied while the same view is still open.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ViewTicket {
    pub project_id: ProjectId,
    pub generation: u64,
}

/// State of the project currently open in the editor.
pub(crate) struct OpenView {
    pub ticket: ViewTicket,
    pub project: Project,
    pub clock: PlaybackClock,
    pub synchronizer: PlaybackSynchronizer,
    pub correction: CorrectionState,
    /// Pushes queued for this view and not answered yet.
    pub pending_pushes: usize,
    /// Corrections kept locally whose push failed.
    pub unsynced: Vec<TimingCorrection>,
}

impl OpenView {
    fn new(project: Project, generation: u64) -> Self {
        Self {
            ticket: ViewTicket {
                project_id: project.id.clone(),
                generation,
            },
            clock: PlaybackClock::new(project.audio_duration),
            synchronizer: PlaybackSynchronizer::new(project.segments()),
            correction: CorrectionState::Idle,
            pending_pushes: 0,
            unsynced: Vec::new(),
            project,
        }
    }

    /// Validates `correction` against its segment and stores the result.
    pub fn apply_correction(&mut self, correction: &TimingCorrection) -> Result<(), TimingError> {
        let segment = self
            .project
            .segment(correction.segment_index)
            .ok_or(TimingError::WordOutOfRange {
                word_index: correction.word_index,
                len: 0,
            })?;
        let corrected = apply_correction(
            segment,
            correction.word_index,
            correction.new_start_time,
            correction.new_end_time,
        )?;
        self.project.replace_segment(correction.segment_index, corrected);
        self.synchronizer.reindex(self.project.segments());
        Ok(())
    }

    /// Recomputes the highlight for the current clock position.
    pub fn resync(&mut self) -> Option<Highlight> {
        self.synchronizer.update(self.clock.position())
    }
}

/// Shared session context containing the open view and the dispatch lock.
///
/// ## Lock Ordering
/// When acquiring both locks, acquire `dispatch_lock` first, then `view`.
/// - `dispatch_lock`: serialises correction dispatch so one transition chain
///   (transition + actions + state update) runs atomically.
/// - `view`: guards every read and write of the open view.
///
/// `loading` is a leaf lock and is never held together with `view`.
pub(crate) struct SessionContext {
    view: Mutex<Option<OpenView>>,
    /// The load in flight, if the latest open has not finished yet.
    loading: Mutex<Option<ViewTicket>>,
    /// Bumped by every open and close; a load only installs if it is unchanged.
    generation: AtomicU64,
    dispatch_lock: Mutex<()>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self {
            view: Mutex::new(None),
            loading: Mutex::new(None),
            generation: AtomicU64::new(0),
            dispatch_lock: Mutex::new(()),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Starts an open/close and returns its generation.
    pub fn begin_transition(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Starts loading `project_id` and marks it as the pending load.
    pub async fn begin_load(&self, project_id: &ProjectId) -> u64 {
        let mut loading = self.loading.lock().await;
        let generation = self.begin_transition();
        *loading = Some(ViewTicket {
            project_id: project_id.clone(),
            generation,
        });
        generation
    }

    /// Clears the pending load started under `generation`. Returns `false`
    /// when a newer open or a close already replaced it.
    pub async fn finish_load(&self, generation: u64) -> bool {
        let mut loading = self.loading.lock().await;
        match loading.as_ref() {
            Some(ticket) if ticket.generation == generation => {
                *loading = None;
                true
            }
            _ => false,
        }
    }

    pub async fn loading(&self) -> Option<ProjectId> {
        self.loading
            .lock()
            .await
            .as_ref()
            .map(|ticket| ticket.project_id.clone())
    }

    pub async fn view(&self) -> MutexGuard<'_, Option<OpenView>> {
        self.view.lock().await
    }

    pub async fn acquire_dispatch_lock(&self) -> MutexGuard<'_, ()> {
        self.dispatch_lock.lock().await
    }

    /// Opens `project` if no newer open/close started since `generation`.
    ///
    /// Returns the new ticket and the ticket of the view it replaced, or hands
    /// the project back when the load is stale.
    pub async fn install(
        &self,
        project: Project,
        generation: u64,
    ) -> Result<(ViewTicket, Option<ViewTicket>), Box<Project>> {
        let mut guard = self.view.lock().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            return Err(Box::new(project));
        }
        let view = OpenView::new(project, generation);
        let ticket = view.ticket.clone();
        let replaced = guard.replace(view).map(|old| old.ticket);
        Ok((ticket, replaced))
    }

    pub async fn close(&self) -> Option<ViewTicket> {
        {
            let mut loading = self.loading.lock().await;
            self.begin_transition();
            *loading = None;
        }
        self.view.lock().await.take().map(|view| view.ticket)
    }

    /// Records the outcome of a push. Returns `false` when the view it was
    /// started under is gone, in which case nothing is recorded.
    pub async fn finish_push(&self, ticket: &ViewTicket, failed: Option<TimingCorrection>) -> bool {
        let mut guard = self.view.lock().await;
        match guard.as_mut() {
            Some(view) if &view.ticket == ticket => {
                view.pending_pushes = view.pending_pushes.saturating_sub(1);
                view.unsynced.extend(failed);
                true
            }
            _ => false,
        }
    }
}
