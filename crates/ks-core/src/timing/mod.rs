//! Timing model.
//!
//! Segments of words with `[start, end]` intervals in seconds, plus the
//! validation and correction rules that keep those intervals monotonic and
//! non-overlapping. Pure data, no I/O.

mod correction;
mod error;
mod model;
mod validation;

pub use correction::{apply_correction, TimingCorrection};
pub use error::TimingError;
pub use model::{derived_bounds, Segment, Word, WordPosition};
pub use validation::validate_segment;
