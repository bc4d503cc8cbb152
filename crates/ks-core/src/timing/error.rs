use thiserror::Error;

/// Reasons a segment (or a proposed correction) violates the timing invariants.
#[derive(Debug, Clone, PartialEq, Error, serde::Serialize, serde::Deserialize)]
pub enum TimingError {
    #[error("word {word_index} has empty text")]
    EmptyText { word_index: usize },

    #[error("word {word_index} has a non-finite boundary")]
    NotFinite { word_index: usize },

    #[error("word {word_index} starts before zero ({start})")]
    NegativeStart { word_index: usize, start: f64 },

    #[error("word {word_index} has start {start} not before end {end}")]
    InvertedRange {
        word_index: usize,
        start: f64,
        end: f64,
    },

    #[error("word {word_index} starts before the word preceding it")]
    OutOfOrder { word_index: usize },

    #[error("word {word_index} ends at {end} after next word starts at {next_start}")]
    Overlap {
        word_index: usize,
        end: f64,
        next_start: f64,
    },

    #[error(
        "segment bounds [{segment_start}, {segment_end}] do not cover words [{words_start}, {words_end}]"
    )]
    BoundsViolation {
        segment_start: f64,
        segment_end: f64,
        words_start: f64,
        words_end: f64,
    },

    #[error("word index {word_index} out of range (segment has {len} words)")]
    WordOutOfRange { word_index: usize, len: usize },
}
