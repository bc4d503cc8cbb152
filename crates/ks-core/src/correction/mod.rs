//! Correction protocol.
//!
//! Defines the word-retiming state machine types. The machine itself is pure;
//! applying a correction to the project and pushing it to the store are
//! actions executed by the session that drives it.

pub mod state_machine;

pub use state_machine::{
    CorrectionAction, CorrectionEvent, CorrectionState, CorrectionStateMachine, EditSelection,
};
