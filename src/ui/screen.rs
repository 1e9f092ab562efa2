use ratatui::{layout::Rect, Frame};

use crate::app::{App, View};
use crate::ui::{feed, library, profile};

/// A UI Screen boundary: renders one view into the body area.
/// Key handling stays in the app so overlays can take precedence.
pub trait Screen {
    fn render(&self, app: &App, f: &mut Frame, area: Rect);
}

pub struct FeedScreen;

impl Screen for FeedScreen {
    fn render(&self, app: &App, f: &mut Frame, area: Rect) {
        feed::render(app, f, area);
    }
}

pub struct SearchScreen;

impl Screen for SearchScreen {
    fn render(&self, _app: &App, f: &mut Frame, area: Rect) {
        library::render_search(f, area);
    }
}

pub struct LibraryScreen;

impl Screen for LibraryScreen {
    fn render(&self, app: &App, f: &mut Frame, area: Rect) {
        library::render(app, f, area);
    }
}

pub struct ProfileScreen;

impl Screen for ProfileScreen {
    fn render(&self, app: &App, f: &mut Frame, area: Rect) {
        profile::render(app, f, area);
    }
}

/// Helper to construct the appropriate screen for the current view
pub fn current_screen(view: View) -> Box<dyn Screen> {
    match view {
        View::Feed => Box::new(FeedScreen),
        View::Search => Box::new(SearchScreen),
        View::Library => Box::new(LibraryScreen),
        View::Profile => Box::new(ProfileScreen),
    }
}
