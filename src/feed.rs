use std::time::{Duration, Instant};

use crate::catalog::Lesson;
use crate::playback::Playback;
use crate::progress::Progress;
use crate::scheduler::Deferred;

/// Vertical drag displacement (in units) a swipe has to exceed
pub const DRAG_THRESHOLD: i32 = 50;

pub const DEFAULT_AUTO_ADVANCE: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedState {
    Browsing(usize),
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDirection {
    Up,
    Down,
}

/// Every input the feed reacts to, already decoded from the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedInput {
    /// Pointer pressed at `start` and released at `end`, vertical units.
    /// Moving up the screen (start > end) goes to the next lesson.
    Drag { start: i32, end: i32 },
    Key(KeyDirection),
    /// Positive delta scrolls forward
    Wheel(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusChange {
    pub from: FeedState,
    pub to: FeedState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEvent {
    Focus(FocusChange),
    Completed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AutoAdvance;

#[derive(Debug, Clone, PartialEq, Eq)]
struct FeedItem {
    id: String,
    duration_secs: u32,
}

/// Cursor over the ordered lesson sequence
#[derive(Debug)]
pub struct FeedNavigator {
    items: Vec<FeedItem>,
    state: FeedState,
    playback: Playback,
    auto_advance: Deferred<AutoAdvance>,
    auto_advance_delay: Duration,
}

impl FeedNavigator {
    pub fn new(lessons: &[Lesson]) -> Self {
        Self::with_delay(lessons, DEFAULT_AUTO_ADVANCE)
    }

    pub fn with_delay(lessons: &[Lesson], auto_advance_delay: Duration) -> Self {
        let items: Vec<FeedItem> = lessons
            .iter()
            .map(|l| FeedItem {
                id: l.id.clone(),
                duration_secs: l.duration_secs,
            })
            .collect();

        let (state, playback) = match items.first() {
            Some(first) => (FeedState::Browsing(0), Playback::focused(first.duration_secs)),
            None => (FeedState::Exhausted, Playback::idle()),
        };

        Self {
            items,
            state,
            playback,
            auto_advance: Deferred::new(),
            auto_advance_delay,
        }
    }

    pub fn state(&self) -> FeedState {
        self.state
    }

    pub fn cursor(&self) -> Option<usize> {
        match self.state {
            FeedState::Browsing(i) => Some(i),
            FeedState::Exhausted => None,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_exhausted(&self) -> bool {
        self.state == FeedState::Exhausted
    }

    pub fn is_last(&self) -> bool {
        matches!(self.state, FeedState::Browsing(i) if i + 1 == self.items.len())
    }

    pub fn current_lesson_id(&self) -> Option<&str> {
        self.cursor().map(|i| self.items[i].id.as_str())
    }

    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    pub fn playback_mut(&mut self) -> &mut Playback {
        &mut self.playback
    }

    pub fn auto_advance_pending(&self) -> bool {
        self.auto_advance.is_pending()
    }

    /// Step forward. Past the last lesson the feed is exhausted for good.
    pub fn advance(&mut self) -> Option<FocusChange> {
        let next = match self.state {
            FeedState::Browsing(i) if i + 1 < self.items.len() => FeedState::Browsing(i + 1),
            FeedState::Browsing(_) => FeedState::Exhausted,
            FeedState::Exhausted => return None,
        };
        Some(self.move_to(next))
    }

    /// Step back; no-op on the first lesson and once exhausted
    pub fn retreat(&mut self) -> Option<FocusChange> {
        match self.state {
            FeedState::Browsing(i) if i > 0 => Some(self.move_to(FeedState::Browsing(i - 1))),
            _ => None,
        }
    }

    /// Single entry point for drag, key and wheel input
    pub fn handle(&mut self, input: FeedInput) -> Option<FocusChange> {
        match input {
            FeedInput::Drag { start, end } => {
                let distance = start - end;
                if distance > DRAG_THRESHOLD {
                    self.advance()
                } else if distance < -DRAG_THRESHOLD {
                    self.retreat()
                } else {
                    None
                }
            }
            FeedInput::Key(KeyDirection::Down) => self.advance(),
            FeedInput::Key(KeyDirection::Up) => self.retreat(),
            FeedInput::Wheel(delta) if delta > 0 => self.advance(),
            FeedInput::Wheel(delta) if delta < 0 => self.retreat(),
            FeedInput::Wheel(_) => None,
        }
    }

    /// Record the focused lesson as completed and, unless it is the last one,
    /// queue the move to the next lesson after the acknowledgement delay.
    pub fn complete_current(&mut self, progress: &mut Progress, now: Instant) -> Option<String> {
        let id = self.current_lesson_id()?.to_string();
        progress.record_completion(&id);

        if !self.is_last() {
            self.auto_advance
                .schedule(now, self.auto_advance_delay, AutoAdvance);
        }
        Some(id)
    }

    /// Drive time-based behaviour: the play head and the deferred advance
    pub fn tick(&mut self, progress: &mut Progress, now: Instant, elapsed: Duration) -> Vec<FeedEvent> {
        let mut events = Vec::new();

        if self.playback.advance(elapsed) {
            if let Some(id) = self.complete_current(progress, now) {
                events.push(FeedEvent::Completed(id));
            }
        }

        if self.auto_advance.poll(now).is_some() {
            tracing::debug!("auto-advancing after completion");
            if let Some(change) = self.advance() {
                events.push(FeedEvent::Focus(change));
            }
        }

        events
    }

    /// The owning view is going away: nothing queued may fire afterwards
    pub fn teardown(&mut self) {
        if self.auto_advance.cancel() {
            tracing::debug!("cancelled pending auto-advance");
        }
    }

    fn move_to(&mut self, next: FeedState) -> FocusChange {
        let change = FocusChange {
            from: self.state,
            to: next,
        };
        self.state = next;
        self.on_focus_changed();
        tracing::debug!(from = ?change.from, to = ?change.to, "feed focus changed");
        change
    }

    fn on_focus_changed(&mut self) {
        // a queued advance belongs to the lesson that just lost focus
        self.auto_advance.cancel();
        self.playback = match self.state {
            FeedState::Browsing(i) => Playback::focused(self.items[i].duration_secs),
            FeedState::Exhausted => Playback::idle(),
        };
    }
}

impl Drop for FeedNavigator {
    fn drop(&mut self) {
        self.teardown();
    }
}
