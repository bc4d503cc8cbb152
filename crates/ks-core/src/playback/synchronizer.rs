use serde::{Deserialize, Serialize};

use super::lookup::TimelineIndex;
use crate::timing::{Segment, WordPosition};

/// What the view should highlight at one playback position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Highlight {
    pub segment: Option<usize>,
    pub word: Option<WordPosition>,
}

impl Highlight {
    pub fn at(segments: &[Segment], t: f64) -> Self {
        Self::lookup(&TimelineIndex::new(segments), t)
    }

    pub fn lookup(index: &TimelineIndex, t: f64) -> Self {
        Self {
            segment: index.active_segment(t),
            word: index.active_word(t),
        }
    }

    pub fn is_none(&self) -> bool {
        self.segment.is_none() && self.word.is_none()
    }
}

/// Recomputes the highlight on clock events and reports only real changes.
///
/// Keeps a [`TimelineIndex`] of the segments it was built from; call
/// [`reindex`](Self::reindex) after the segments change.
#[derive(Debug, Clone)]
pub struct PlaybackSynchronizer {
    index: TimelineIndex,
    current: Highlight,
}

impl PlaybackSynchronizer {
    pub fn new(segments: &[Segment]) -> Self {
        Self {
            index: TimelineIndex::new(segments),
            current: Highlight::default(),
        }
    }

    pub fn reindex(&mut self, segments: &[Segment]) {
        self.index = TimelineIndex::new(segments);
    }

    pub fn current(&self) -> Highlight {
        self.current
    }

    /// Returns `Some(highlight)` when it differs from the previous call.
    pub fn update(&mut self, t: f64) -> Option<Highlight> {
        let next = Highlight::lookup(&self.index, t);
        if next == self.current {
            return None;
        }
        self.current = next;
        Some(next)
    }

    pub fn reset(&mut self) {
        self.current = Highlight::default();
    }
}
