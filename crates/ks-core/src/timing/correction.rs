use serde::{Deserialize, Serialize};

use super::error::TimingError;
use super::model::{Segment, WordPosition};
use super::validation::validate_segment;

/// One operator correction of one word's interval.
///
/// Field names follow the alignment store's correction payload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimingCorrection {
    pub segment_index: usize,
    pub word_index: usize,
    pub new_start_time: f64,
    pub new_end_time: f64,
}

impl TimingCorrection {
    pub fn new(position: WordPosition, new_start_time: f64, new_end_time: f64) -> Self {
        Self {
            segment_index: position.segment_index,
            word_index: position.word_index,
            new_start_time,
            new_end_time,
        }
    }

    pub fn position(&self) -> WordPosition {
        WordPosition::new(self.segment_index, self.word_index)
    }
}

/// Returns a copy of `segment` with word `word_index` retimed to `[new_start, new_end]`.
///
/// Neighbours are never shifted: a correction that would overlap an adjacent
/// word is rejected. Segment bounds are widened to cover the corrected word
/// when it falls outside them and are otherwise left as authored. On error the
/// input segment is untouched.
pub fn apply_correction(
    segment: &Segment,
    word_index: usize,
    new_start: f64,
    new_end: f64,
) -> Result<Segment, TimingError> {
    if word_index >= segment.words.len() {
        return Err(TimingError::WordOutOfRange {
            word_index,
            len: segment.words.len(),
        });
    }

    let mut corrected = segment.clone();
    {
        let word = &mut corrected.words[word_index];
        word.start = new_start;
        word.end = new_end;
    }
    if new_start.is_finite() && new_end.is_finite() {
        corrected.start = corrected.start.min(new_start);
        corrected.end = corrected.end.max(new_end);
    }

    validate_segment(&corrected)?;
    Ok(corrected)
}
