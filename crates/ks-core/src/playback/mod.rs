//! Playback synchronizer.
//!
//! Maps the media clock onto the lyric timeline. A [`TimelineIndex`] is built
//! from one snapshot of the segments and answers lookups for any `t`;
//! [`PlaybackSynchronizer`] keeps one and remembers the last result so callers
//! can tell when the highlight actually moved.

mod clock;
mod lookup;
mod synchronizer;

pub use clock::PlaybackClock;
pub use lookup::{active_segment, active_word, TimelineIndex};
pub use synchronizer::{Highlight, PlaybackSynchronizer};
