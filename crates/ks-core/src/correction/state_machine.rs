//! Correction state machine.
//!
//! Defines a pure state transition function for editing one word's boundaries.

use serde::{Deserialize, Serialize};

use crate::timing::{TimingCorrection, TimingError, WordPosition};

/// The word being edited and its uncommitted boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EditSelection {
    pub position: WordPosition,
    pub draft_start: f64,
    pub draft_end: f64,
}

impl EditSelection {
    pub fn correction(&self) -> TimingCorrection {
        TimingCorrection::new(self.position, self.draft_start, self.draft_end)
    }
}

/// Correction flow state.
///
/// 校正流程状态。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum CorrectionState {
    /// No word selected.
    ///
    /// 未选中任何词。
    #[default]
    Idle,
    /// Operator is editing a draft. `error` holds the last rejected commit.
    ///
    /// 正在编辑草稿时间。
    Selecting {
        selection: EditSelection,
        error: Option<TimingError>,
    },
    /// Draft handed to the timing model, waiting for the outcome.
    ///
    /// 草稿已提交，等待校验结果。
    Committing { selection: EditSelection },
}

impl CorrectionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, CorrectionState::Idle)
    }

    pub fn selection(&self) -> Option<&EditSelection> {
        match self {
            CorrectionState::Idle => None,
            CorrectionState::Selecting { selection, .. }
            | CorrectionState::Committing { selection } => Some(selection),
        }
    }

    pub fn error(&self) -> Option<&TimingError> {
        match self {
            CorrectionState::Selecting { error, .. } => error.as_ref(),
            _ => None,
        }
    }
}

/// Events that drive the correction flow.
///
/// 驱动校正流程的事件。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CorrectionEvent {
    /// Operator activates a word; `start`/`end` are its committed boundaries.
    ///
    /// 用户选中一个词。
    Select {
        position: WordPosition,
        start: f64,
        end: f64,
    },
    /// Operator edits the draft boundaries.
    ///
    /// 修改草稿起止时间。
    UpdateDraft { start: f64, end: f64 },
    /// Operator discards the draft.
    ///
    /// 放弃草稿。
    Cancel,
    /// Operator commits the draft.
    ///
    /// 提交草稿。
    Commit,
    /// Timing model refused the draft.
    ///
    /// 时间校验失败。
    CommitRejected { error: TimingError },
    /// Timing model accepted the draft and the project now holds it.
    ///
    /// 校正已写入项目。
    CommitApplied,
}

/// Side-effects produced by state transitions.
///
/// 状态转换产生的副作用。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CorrectionAction {
    /// Validate and apply the correction to the in-memory project.
    ApplyCorrection(TimingCorrection),
    /// Send the correction to the alignment store.
    PushCorrection(TimingCorrection),
}

/// Pure correction state machine: no side effects.
pub struct CorrectionStateMachine;

impl CorrectionStateMachine {
    pub fn transition(
        state: CorrectionState,
        event: CorrectionEvent,
    ) -> (CorrectionState, Vec<CorrectionAction>) {
        match (state, event) {
            (CorrectionState::Idle, CorrectionEvent::Select { position, start, end }) => (
                CorrectionState::Selecting {
                    selection: EditSelection {
                        position,
                        draft_start: start,
                        draft_end: end,
                    },
                    error: None,
                },
                Vec::new(),
            ),
            (
                CorrectionState::Selecting { selection, .. },
                CorrectionEvent::UpdateDraft { start, end },
            ) => (
                CorrectionState::Selecting {
                    selection: EditSelection {
                        draft_start: start,
                        draft_end: end,
                        ..selection
                    },
                    error: None,
                },
                Vec::new(),
            ),
            (CorrectionState::Selecting { .. }, CorrectionEvent::Cancel) => {
                (CorrectionState::Idle, Vec::new())
            }
            (CorrectionState::Selecting { selection, .. }, CorrectionEvent::Commit) => (
                CorrectionState::Committing { selection },
                vec![CorrectionAction::ApplyCorrection(selection.correction())],
            ),
            (
                CorrectionState::Committing { selection },
                CorrectionEvent::CommitRejected { error },
            ) => (
                CorrectionState::Selecting {
                    selection,
                    error: Some(error),
                },
                Vec::new(),
            ),
            (CorrectionState::Committing { selection }, CorrectionEvent::CommitApplied) => (
                CorrectionState::Idle,
                vec![CorrectionAction::PushCorrection(selection.correction())],
            ),
            (state, _event) => (state, Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selecting() -> CorrectionState {
        let (state, _) = CorrectionStateMachine::transition(
            CorrectionState::Idle,
            CorrectionEvent::Select {
                position: WordPosition::new(0, 0),
                start: 1.0,
                end: 1.4,
            },
        );
        state
    }

    #[test]
    fn correction_state_machine_select_populates_draft_from_current_values() {
        let state = selecting();
        assert_eq!(
            state,
            CorrectionState::Selecting {
                selection: EditSelection {
                    position: WordPosition::new(0, 0),
                    draft_start: 1.0,
                    draft_end: 1.4,
                },
                error: None,
            }
        );
    }

    #[test]
    fn correction_state_machine_second_select_is_ignored() {
        let state = selecting();
        let (next, actions) = CorrectionStateMachine::transition(
            state.clone(),
            CorrectionEvent::Select {
                position: WordPosition::new(0, 1),
                start: 1.4,
                end: 1.8,
            },
        );
        assert_eq!(next, state);
        assert!(actions.is_empty());
    }

    #[test]
    fn correction_state_machine_update_draft_outside_selecting_is_ignored() {
        let (next, actions) = CorrectionStateMachine::transition(
            CorrectionState::Idle,
            CorrectionEvent::UpdateDraft {
                start: 0.0,
                end: 1.0,
            },
        );
        assert_eq!(next, CorrectionState::Idle);
        assert!(actions.is_empty());
    }

    #[test]
    fn correction_state_machine_cancel_returns_to_idle_without_actions() {
        let (state, _) = CorrectionStateMachine::transition(
            selecting(),
            CorrectionEvent::UpdateDraft {
                start: 1.1,
                end: 1.3,
            },
        );
        let (next, actions) = CorrectionStateMachine::transition(state, CorrectionEvent::Cancel);
        assert_eq!(next, CorrectionState::Idle);
        assert!(actions.is_empty());
    }

    #[test]
    fn correction_state_machine_commit_requests_apply_with_draft() {
        let (state, _) = CorrectionStateMachine::transition(
            selecting(),
            CorrectionEvent::UpdateDraft {
                start: 1.0,
                end: 1.35,
            },
        );
        let (next, actions) = CorrectionStateMachine::transition(state, CorrectionEvent::Commit);
        assert!(matches!(next, CorrectionState::Committing { .. }));
        assert_eq!(
            actions,
            vec![CorrectionAction::ApplyCorrection(TimingCorrection {
                segment_index: 0,
                word_index: 0,
                new_start_time: 1.0,
                new_end_time: 1.35,
            })]
        );
    }

    #[test]
    fn correction_state_machine_rejection_keeps_draft_and_error() {
        let (state, _) = CorrectionStateMachine::transition(
            selecting(),
            CorrectionEvent::UpdateDraft {
                start: 1.0,
                end: 1.6,
            },
        );
        let (state, _) = CorrectionStateMachine::transition(state, CorrectionEvent::Commit);
        let error = TimingError::Overlap {
            word_index: 0,
            end: 1.6,
            next_start: 1.4,
        };
        let (next, actions) = CorrectionStateMachine::transition(
            state,
            CorrectionEvent::CommitRejected {
                error: error.clone(),
            },
        );
        assert!(actions.is_empty());
        assert_eq!(next.error(), Some(&error));
        assert_eq!(next.selection().map(|s| s.draft_end), Some(1.6));
    }

    #[test]
    fn correction_state_machine_applied_commit_pushes_exactly_one_correction() {
        let (state, _) = CorrectionStateMachine::transition(selecting(), CorrectionEvent::Commit);
        let (next, actions) =
            CorrectionStateMachine::transition(state, CorrectionEvent::CommitApplied);
        assert_eq!(next, CorrectionState::Idle);
        assert_eq!(actions.len(), 1);
        assert!(matches!(actions[0], CorrectionAction::PushCorrection(_)));
    }

    #[test]
    fn correction_state_machine_new_draft_clears_previous_error() {
        let state = CorrectionState::Selecting {
            selection: EditSelection {
                position: WordPosition::new(0, 0),
                draft_start: 1.0,
                draft_end: 1.6,
            },
            error: Some(TimingError::InvertedRange {
                word_index: 0,
                start: 1.0,
                end: 0.5,
            }),
        };
        let (next, _) = CorrectionStateMachine::transition(
            state,
            CorrectionEvent::UpdateDraft {
                start: 1.0,
                end: 1.2,
            },
        );
        assert_eq!(next.error(), None);
    }
}
