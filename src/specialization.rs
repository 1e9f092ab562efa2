use crate::catalog::Specialization;
use crate::progress::Progress;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum StatusLabel {
    #[strum(serialize = "not started")]
    NotStarted,
    #[strum(serialize = "in progress")]
    InProgress,
    #[strum(serialize = "advanced")]
    Advanced,
    #[strum(serialize = "completed")]
    Completed,
}

impl StatusLabel {
    /// 0 → not started, (0, 50) → in progress, [50, 100) → advanced, else completed
    pub fn from_percent(percent: f64) -> Self {
        if percent <= 0.0 {
            StatusLabel::NotStarted
        } else if percent < 50.0 {
            StatusLabel::InProgress
        } else if percent < 100.0 {
            StatusLabel::Advanced
        } else {
            StatusLabel::Completed
        }
    }
}

/// Completion in percent from the specialization's own counters.
/// A zero total is 0%.
pub fn completion_percent(track: &Specialization) -> f64 {
    if track.total_lessons == 0 {
        0.0
    } else {
        f64::from(track.completed_lessons) / f64::from(track.total_lessons) * 100.0
    }
}

pub fn status(track: &Specialization) -> StatusLabel {
    StatusLabel::from_percent(completion_percent(track))
}

/// Overlay listing every specialization. Selecting writes through to the
/// progress tracker and asks the host to dismiss the overlay.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SpecializationSelector {
    open: bool,
    highlighted: usize,
}

impl SpecializationSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens with the active specialization highlighted, if it is listed
    pub fn open(&mut self, specs: &[Specialization], progress: &Progress) {
        self.open = true;
        self.highlighted = specs
            .iter()
            .position(|s| s.id == progress.current_specialization())
            .unwrap_or(0);
    }

    pub fn dismiss(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    pub fn highlight_next(&mut self, specs: &[Specialization]) {
        if self.highlighted + 1 < specs.len() {
            self.highlighted += 1;
        }
    }

    pub fn highlight_previous(&mut self) {
        self.highlighted = self.highlighted.saturating_sub(1);
    }

    pub fn select(&mut self, specialization_id: &str, progress: &mut Progress) {
        progress.select_specialization(specialization_id);
        self.dismiss();
    }

    /// Select whatever is highlighted; returns the chosen id
    pub fn select_highlighted(
        &mut self,
        specs: &[Specialization],
        progress: &mut Progress,
    ) -> Option<String> {
        let id = specs.get(self.highlighted)?.id.clone();
        self.select(&id, progress);
        Some(id)
    }
}

/// The active specialization as shown, or `None` when the selected id is not
/// in the catalog.
pub fn active<'a>(specs: &'a [Specialization], progress: &Progress) -> Option<&'a Specialization> {
    specs
        .iter()
        .find(|s| s.id == progress.current_specialization())
}
