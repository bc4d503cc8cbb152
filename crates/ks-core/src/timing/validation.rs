use super::error::TimingError;
use super::model::{derived_bounds, Segment};

/// Checks every timing invariant of a segment.
///
/// Per word: non-empty text, finite boundaries, `0 <= start < end`.
/// Per adjacent pair: non-decreasing start and no overlap
/// (`words[i].end <= words[i + 1].start`, touching is allowed).
/// Finally the segment bounds must cover all of its words.
pub fn validate_segment(segment: &Segment) -> Result<(), TimingError> {
    for (word_index, word) in segment.words.iter().enumerate() {
        if word.text.trim().is_empty() {
            return Err(TimingError::EmptyText { word_index });
        }
        if !word.start.is_finite() || !word.end.is_finite() {
            return Err(TimingError::NotFinite { word_index });
        }
        if word.start < 0.0 {
            return Err(TimingError::NegativeStart {
                word_index,
                start: word.start,
            });
        }
        if word.start >= word.end {
            return Err(TimingError::InvertedRange {
                word_index,
                start: word.start,
                end: word.end,
            });
        }
    }

    for (word_index, pair) in segment.words.windows(2).enumerate() {
        let (current, next) = (&pair[0], &pair[1]);
        if next.start < current.start {
            return Err(TimingError::OutOfOrder {
                word_index: word_index + 1,
            });
        }
        if current.end > next.start {
            return Err(TimingError::Overlap {
                word_index,
                end: current.end,
                next_start: next.start,
            });
        }
    }

    match derived_bounds(&segment.words) {
        Some((words_start, words_end))
            if segment.start > words_start || segment.end < words_end =>
        {
            Err(TimingError::BoundsViolation {
                segment_start: segment.start,
                segment_end: segment.end,
                words_start,
                words_end,
            })
        }
        None if segment.start > segment.end => Err(TimingError::BoundsViolation {
            segment_start: segment.start,
            segment_end: segment.end,
            words_start: segment.start,
            words_end: segment.end,
        }),
        _ => Ok(()),
    }
}
