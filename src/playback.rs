use std::time::Duration;

/// Transient per-lesson player state. A fresh value is created every time a
/// lesson gains focus; nothing here outlives the focus.
#[derive(Debug, Clone, PartialEq)]
pub struct Playback {
    pub playing: bool,
    pub liked: bool,
    pub muted: bool,
    position: Duration,
    duration: Duration,
    ended: bool,
}

impl Playback {
    /// State for a lesson that just became active: playing, not liked, not muted
    pub fn focused(duration_secs: u32) -> Self {
        Self {
            playing: true,
            liked: false,
            muted: false,
            position: Duration::ZERO,
            duration: Duration::from_secs(u64::from(duration_secs)),
            ended: false,
        }
    }

    /// Nothing is focused (empty or exhausted feed)
    pub fn idle() -> Self {
        Self {
            playing: false,
            ..Self::focused(0)
        }
    }

    pub fn toggle_play(&mut self) {
        if !self.ended {
            self.playing = !self.playing;
        }
    }

    pub fn toggle_like(&mut self) {
        self.liked = !self.liked;
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    /// Move the play head. Returns true exactly once, on the step that
    /// reaches the end of the lesson.
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        if !self.playing || self.ended || self.duration.is_zero() {
            return false;
        }

        self.position = (self.position + elapsed).min(self.duration);
        if self.position >= self.duration {
            self.ended = true;
            self.playing = false;
            return true;
        }
        false
    }

    pub fn position(&self) -> Duration {
        self.position
    }

    pub fn has_ended(&self) -> bool {
        self.ended
    }

    /// 0.0..=1.0
    pub fn fraction(&self) -> f64 {
        if self.duration.is_zero() {
            0.0
        } else {
            self.position.as_secs_f64() / self.duration.as_secs_f64()
        }
    }
}
