use crate::timing::{Segment, WordPosition};

/// Intervals sorted by start, with a running maximum of their ends.
///
/// Segment bounds may be wider than their words and corrections only ever
/// widen them, so intervals can overlap or enclose later ones. The running
/// maximum (`reach`) bounds the backward walk: it stops once nothing earlier
/// can still end at or after `t`.
#[derive(Debug, Clone, Default)]
struct IntervalIndex {
    /// Original indices, ordered by `(start, index)`.
    order: Vec<usize>,
    starts: Vec<f64>,
    ends: Vec<f64>,
    reach: Vec<f64>,
}

impl IntervalIndex {
    fn build(spans: impl IntoIterator<Item = (f64, f64)>) -> Self {
        let spans: Vec<(f64, f64)> = spans.into_iter().collect();
        let mut order: Vec<usize> = (0..spans.len()).collect();
        order.sort_by(|&a, &b| spans[a].0.total_cmp(&spans[b].0).then(a.cmp(&b)));

        let starts = order.iter().map(|&i| spans[i].0).collect();
        let ends: Vec<f64> = order.iter().map(|&i| spans[i].1).collect();
        let mut max = f64::NEG_INFINITY;
        let reach = ends
            .iter()
            .map(|&end| {
                max = max.max(end);
                max
            })
            .collect();

        Self {
            order,
            starts,
            ends,
            reach,
        }
    }

    /// Original indices of every interval containing `t`, ascending.
    fn containing(&self, t: f64) -> Vec<usize> {
        let upper = self.starts.partition_point(|&start| start <= t);
        let mut hits = Vec::new();
        let mut k = upper;
        while k > 0 && self.reach[k - 1] >= t {
            k -= 1;
            if self.ends[k] >= t {
                hits.push(self.order[k]);
            }
        }
        hits.sort_unstable();
        hits
    }
}

/// Lookup structure over one snapshot of a project's segments.
///
/// Building is O(n log n); a query is a binary search plus a walk over the
/// intervals that can still reach `t`, which is O(log n) when segments do not
/// overlap. Rebuild it whenever the segments change.
#[derive(Debug, Clone, Default)]
pub struct TimelineIndex {
    segments: IntervalIndex,
    words: Vec<IntervalIndex>,
}

impl TimelineIndex {
    pub fn new(segments: &[Segment]) -> Self {
        Self {
            segments: IntervalIndex::build(segments.iter().map(|s| (s.start, s.end))),
            words: segments
                .iter()
                .map(|s| IntervalIndex::build(s.words.iter().map(|w| (w.start, w.end))))
                .collect(),
        }
    }

    /// Index of the segment containing `t`; the earliest one wins on ties.
    pub fn active_segment(&self, t: f64) -> Option<usize> {
        self.segments.containing(t).first().copied()
    }

    /// Position of the word containing `t`, or `None` in a gap between words.
    ///
    /// When two words contain `t` (shared boundary, or an overlap left by an
    /// edit in flight) the earlier-indexed word wins.
    pub fn active_word(&self, t: f64) -> Option<WordPosition> {
        self.segments
            .containing(t)
            .into_iter()
            .find_map(|segment_index| {
                let words = self.words.get(segment_index)?;
                let word_index = words.containing(t).first().copied()?;
                Some(WordPosition::new(segment_index, word_index))
            })
    }
}

/// One-off form of [`TimelineIndex::active_segment`]; builds the index first.
pub fn active_segment(segments: &[Segment], t: f64) -> Option<usize> {
    TimelineIndex::new(segments).active_segment(t)
}

/// One-off form of [`TimelineIndex::active_word`]; builds the index first.
pub fn active_word(segments: &[Segment], t: f64) -> Option<WordPosition> {
    TimelineIndex::new(segments).active_word(t)
}
