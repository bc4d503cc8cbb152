/// Playback position of the open project view.
///
/// The media element owns real time; this only mirrors what it reports
/// (`tick`) and what the operator requests (`seek`). Positions are clamped to
/// `[0, duration]` rather than rejected.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlaybackClock {
    position: f64,
    playing: bool,
    duration: Option<f64>,
}

impl PlaybackClock {
    pub fn new(duration: Option<f64>) -> Self {
        Self {
            position: 0.0,
            playing: false,
            duration: duration.filter(|d| d.is_finite() && *d >= 0.0),
        }
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    pub fn set_duration(&mut self, duration: Option<f64>) {
        self.duration = duration.filter(|d| d.is_finite() && *d >= 0.0);
        self.position = self.clamp(self.position);
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Records a time update from the media element. Returns the stored position.
    pub fn tick(&mut self, t: f64) -> f64 {
        self.position = self.clamp(t);
        self.position
    }

    /// Jumps to `t` without touching the playing/paused state.
    pub fn seek(&mut self, t: f64) -> f64 {
        self.position = self.clamp(t);
        self.position
    }

    fn clamp(&self, t: f64) -> f64 {
        if t.is_nan() {
            return 0.0;
        }
        let t = t.max(0.0);
        let t = match self.duration {
            Some(duration) => t.min(duration),
            None => t,
        };
        if t.is_finite() {
            t
        } else {
            0.0
        }
    }
}
