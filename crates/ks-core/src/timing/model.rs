use serde::{Deserialize, Serialize};

/// Smallest timed unit of a lyric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub text: String,
    /// Seconds from the start of the media.
    pub start: f64,
    /// Seconds from the start of the media.
    pub end: f64,
    /// Aligner confidence, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl Word {
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            text: text.into(),
            start,
            end,
            confidence: None,
        }
    }

    /// Inclusive on both ends: a word is active at its own boundaries.
    pub fn contains(&self, t: f64) -> bool {
        self.start <= t && t <= self.end
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// A lyric phrase: an ordered run of words with its own bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
    #[serde(default)]
    pub text: String,
    pub words: Vec<Word>,
}

impl Segment {
    /// Builds a segment whose bounds are derived from its words.
    ///
    /// The text is the words joined with single spaces. An empty word list
    /// yields a zero-length segment at `0.0`.
    pub fn from_words(words: Vec<Word>) -> Self {
        let (start, end) = derived_bounds(&words).unwrap_or((0.0, 0.0));
        let text = words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            start,
            end,
            text,
            words,
        }
    }

    pub fn word(&self, index: usize) -> Option<&Word> {
        self.words.get(index)
    }

    pub fn contains(&self, t: f64) -> bool {
        self.start <= t && t <= self.end
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// `(min start, max end)` over `words`, or `None` when there are no words.
pub fn derived_bounds(words: &[Word]) -> Option<(f64, f64)> {
    let first = words.first()?;
    Some(words.iter().skip(1).fold((first.start, first.end), |(s, e), w| {
        (s.min(w.start), e.max(w.end))
    }))
}

/// Positional identity of a word inside a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WordPosition {
    pub segment_index: usize,
    pub word_index: usize,
}

impl WordPosition {
    pub fn new(segment_index: usize, word_index: usize) -> Self {
        Self {
            segment_index,
            word_index,
        }
    }
}

impl std::fmt::Display for WordPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.segment_index, self.word_index)
    }
}
