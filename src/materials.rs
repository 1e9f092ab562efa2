use crate::catalog::Material;

pub const EMPTY_MATERIALS_MESSAGE: &str = "There are no additional materials for this lesson.";

/// Why the panel was closed. Both reasons lead to the same state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dismiss {
    CloseAction,
    Backdrop,
}

/// Sum of the estimated minutes; `None` for an empty set so nothing is shown
pub fn total_minutes(materials: &[Material]) -> Option<u32> {
    if materials.is_empty() {
        None
    } else {
        Some(materials.iter().map(|m| m.estimated_minutes).sum())
    }
}

/// What the panel body shows for a given material list
#[derive(Debug, PartialEq)]
pub enum MaterialsView<'a> {
    Empty(&'static str),
    Items {
        materials: &'a [Material],
        total_minutes: u32,
    },
}

impl<'a> MaterialsView<'a> {
    pub fn of(materials: &'a [Material]) -> Self {
        match total_minutes(materials) {
            None => MaterialsView::Empty(EMPTY_MATERIALS_MESSAGE),
            Some(total_minutes) => MaterialsView::Items {
                materials,
                total_minutes,
            },
        }
    }
}

/// Side panel with the supplementary materials of the focused lesson.
///
/// It remembers no lesson; the caller passes the focused lesson's list
/// whenever it renders or acts on it, so a focus change shows up at once.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MaterialsPanel {
    open: bool,
    highlighted: usize,
}

impl MaterialsPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self) {
        self.open = true;
        self.highlighted = 0;
    }

    pub fn close(&mut self) {
        self.dismiss(Dismiss::CloseAction);
    }

    pub fn dismiss(&mut self, reason: Dismiss) {
        if self.open {
            self.open = false;
            tracing::debug!(?reason, "materials panel closed");
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// The focused lesson changed underneath the panel
    pub fn focus_changed(&mut self) {
        self.highlighted = 0;
    }

    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    pub fn highlight_next(&mut self, materials: &[Material]) {
        if self.highlighted + 1 < materials.len() {
            self.highlighted += 1;
        }
    }

    pub fn highlight_previous(&mut self) {
        self.highlighted = self.highlighted.saturating_sub(1);
    }

    pub fn highlighted_material<'a>(&self, materials: &'a [Material]) -> Option<&'a Material> {
        materials.get(self.highlighted)
    }
}
