use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};
use std::io;
use std::time::{Duration, Instant};
use webbrowser::Browser;

use crate::auth::gateway::AuthGateway;
use crate::catalog::{Catalog, Lesson, Material};
use crate::config::{Config, DEFAULT_DRAG_UNITS_PER_ROW};
use crate::feed::{
    FeedEvent, FeedInput, FeedNavigator, FeedState, FocusChange, KeyDirection,
    DEFAULT_AUTO_ADVANCE,
};
use crate::materials::{Dismiss, MaterialsPanel};
use crate::progress::Progress;
use crate::runtime::AppEvent;
use crate::specialization::SpecializationSelector;
use crate::ui;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum View {
    Feed,
    Search,
    Library,
    Profile,
}

impl View {
    pub const ALL: [View; 4] = [View::Feed, View::Search, View::Library, View::Profile];

    fn index(self) -> usize {
        Self::ALL.iter().position(|v| *v == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// `1`..`4` on the navigation bar
    pub fn from_digit(c: char) -> Option<Self> {
        let n = c.to_digit(10)? as usize;
        n.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub auto_advance: Duration,
    pub drag_units_per_row: i32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_advance: DEFAULT_AUTO_ADVANCE,
            drag_units_per_row: DEFAULT_DRAG_UNITS_PER_ROW,
        }
    }
}

impl From<&Config> for Settings {
    fn from(cfg: &Config) -> Self {
        Self {
            auto_advance: cfg.auto_advance(),
            drag_units_per_row: cfg.drag_units_per_row,
        }
    }
}

pub type LinkOpener = fn(&str) -> io::Result<()>;

fn open_in_browser(url: &str) -> io::Result<()> {
    if !Browser::is_available() {
        return Err(io::Error::new(io::ErrorKind::NotFound, "no browser available"));
    }
    webbrowser::open(url)
}

/// Whole-application state. Owns the progress tracker and lends it to the
/// feed and the selector; everything else reads it.
pub struct App {
    catalog: Catalog,
    progress: Progress,
    view: View,
    feed: FeedNavigator,
    materials: MaterialsPanel,
    selector: SpecializationSelector,
    auth: AuthGateway,
    settings: Settings,
    viewport: Rect,
    drag_origin: Option<u16>,
    status: Option<String>,
    last_tick: Option<Instant>,
    link_opener: LinkOpener,
}

impl App {
    /// Mounts the auth gateway; it stays mounted for the life of the app
    pub fn new(catalog: Catalog, mut auth: AuthGateway, settings: Settings) -> Self {
        let progress = catalog.seed_progress();
        let feed = FeedNavigator::with_delay(catalog.lessons(), settings.auto_advance);
        auth.mount();

        tracing::info!(
            lessons = catalog.lessons().len(),
            specializations = catalog.specializations().len(),
            "app started"
        );

        Self {
            catalog,
            progress,
            view: View::Feed,
            feed,
            materials: MaterialsPanel::new(),
            selector: SpecializationSelector::new(),
            auth,
            settings,
            viewport: Rect::new(0, 0, 80, 24),
            drag_origin: None,
            status: None,
            last_tick: None,
            link_opener: open_in_browser,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn feed(&self) -> &FeedNavigator {
        &self.feed
    }

    pub fn materials(&self) -> &MaterialsPanel {
        &self.materials
    }

    pub fn selector(&self) -> &SpecializationSelector {
        &self.selector
    }

    pub fn auth(&self) -> &AuthGateway {
        &self.auth
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    pub fn set_viewport(&mut self, area: Rect) {
        self.viewport = area;
    }

    pub fn set_link_opener(&mut self, opener: LinkOpener) {
        self.link_opener = opener;
    }

    pub fn current_lesson(&self) -> Option<&Lesson> {
        self.feed
            .current_lesson_id()
            .and_then(|id| self.catalog.lesson(id))
    }

    /// Materials of the focused lesson while the panel is open
    pub fn open_materials(&self) -> Option<&[Material]> {
        if !self.materials.is_open() {
            return None;
        }
        self.current_lesson().map(|l| l.materials.as_slice())
    }

    pub fn has_overlay(&self) -> bool {
        self.materials.is_open() || self.selector.is_open()
    }

    pub fn handle_event(&mut self, event: AppEvent, now: Instant) -> Control {
        match event {
            AppEvent::Tick => {
                self.tick(now);
                Control::Continue
            }
            AppEvent::Resize => Control::Continue,
            AppEvent::Key(key) => self.handle_key(key, now),
            AppEvent::Mouse(mouse) => {
                self.handle_mouse(mouse);
                Control::Continue
            }
        }
    }

    pub fn tick(&mut self, now: Instant) {
        let elapsed = self
            .last_tick
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or_default();
        self.last_tick = Some(now);

        if self.view == View::Feed {
            for event in self.feed.tick(&mut self.progress, now, elapsed) {
                match event {
                    FeedEvent::Completed(id) => {
                        tracing::info!(lesson = %id, "lesson completed");
                        self.status = Some("Lesson completed".to_string());
                    }
                    FeedEvent::Focus(change) => self.focus_changed(change),
                }
            }
        }

        self.auth.poll();
        self.auth.tick(chrono::Utc::now());
    }

    pub fn switch_view(&mut self, view: View) {
        if view == self.view {
            return;
        }
        if self.view == View::Feed {
            self.feed.teardown();
            self.drag_origin = None;
        }
        tracing::debug!(from = %self.view, to = %view, "switching view");
        self.view = view;
    }

    pub fn open_selector(&mut self) {
        self.selector
            .open(self.catalog.specializations(), &self.progress);
    }

    fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Control {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Control::Quit;
        }
        self.status = None;

        if key.code == KeyCode::Esc {
            if self.selector.is_open() {
                self.selector.dismiss();
            } else if self.materials.is_open() {
                self.materials.dismiss(Dismiss::CloseAction);
            } else {
                return Control::Quit;
            }
            return Control::Continue;
        }

        if self.selector.is_open() {
            self.selector_key(key);
            return Control::Continue;
        }
        if self.materials.is_open() {
            self.materials_key(key);
            return Control::Continue;
        }
        if self.view == View::Profile && self.profile_key(key) {
            return Control::Continue;
        }
        if self.view == View::Feed && self.feed_key(key, now) {
            return Control::Continue;
        }

        match key.code {
            KeyCode::Char('q') => return Control::Quit,
            KeyCode::Char('s') => self.open_selector(),
            KeyCode::Tab => self.switch_view(self.view.next()),
            KeyCode::BackTab => self.switch_view(self.view.previous()),
            KeyCode::Char(c) => {
                if let Some(view) = View::from_digit(c) {
                    self.switch_view(view);
                }
            }
            _ => {}
        }
        Control::Continue
    }

    fn selector_key(&mut self, key: KeyEvent) {
        let specs = self.catalog.specializations();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.selector.highlight_previous(),
            KeyCode::Down | KeyCode::Char('j') => self.selector.highlight_next(specs),
            KeyCode::Enter => {
                if let Some(id) = self.selector.select_highlighted(specs, &mut self.progress) {
                    tracing::info!(specialization = %id, "specialization selected");
                }
            }
            KeyCode::Char('s') => self.selector.dismiss(),
            _ => {}
        }
    }

    fn materials_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.materials.highlight_previous(),
            KeyCode::Down | KeyCode::Char('j') => {
                let materials = self
                    .feed
                    .current_lesson_id()
                    .and_then(|id| self.catalog.lesson(id))
                    .map(|l| l.materials.as_slice())
                    .unwrap_or_default();
                self.materials.highlight_next(materials);
            }
            KeyCode::Enter => self.open_highlighted_link(),
            KeyCode::Char('x') | KeyCode::Char('q') => self.materials.dismiss(Dismiss::CloseAction),
            _ => {}
        }
    }

    fn open_highlighted_link(&mut self) {
        let url = self
            .open_materials()
            .and_then(|m| self.materials.highlighted_material(m))
            .and_then(|m| m.url.clone());

        let Some(url) = url else {
            return;
        };
        match (self.link_opener)(&url) {
            Ok(()) => tracing::info!(%url, "opened material link"),
            Err(err) => {
                tracing::warn!(%url, %err, "could not open material link");
                self.status = Some(format!("Could not open {url}: {err}"));
            }
        }
    }

    /// Keys the auth form or account screen consumes
    fn profile_key(&mut self, key: KeyEvent) -> bool {
        if self.auth.is_signed_in() {
            if key.code == KeyCode::Char('o') {
                self.auth.sign_out();
                return true;
            }
            return false;
        }

        match key.code {
            KeyCode::Tab => self.auth.focus_next(),
            KeyCode::BackTab => self.auth.focus_previous(),
            KeyCode::Enter => {
                if let Err(err) = self.auth.submit() {
                    tracing::debug!(%err, "auth form rejected");
                }
            }
            KeyCode::Backspace if self.auth.focus().is_text() => self.auth.backspace(),
            KeyCode::Char(c) if self.auth.focus().is_text() => self.auth.input_char(c),
            _ => return false,
        }
        true
    }

    /// Route navigation input to the feed and follow the resulting focus
    fn navigate(&mut self, input: FeedInput) {
        if let Some(change) = self.feed.handle(input) {
            self.focus_changed(change);
        }
    }

    fn focus_changed(&mut self, change: FocusChange) {
        match change.to {
            FeedState::Browsing(_) => self.materials.focus_changed(),
            FeedState::Exhausted => self.materials.close(),
        }
    }

    fn feed_key(&mut self, key: KeyEvent, now: Instant) -> bool {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                self.navigate(FeedInput::Key(KeyDirection::Down));
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.navigate(FeedInput::Key(KeyDirection::Up));
            }
            KeyCode::Char(' ') => self.feed.playback_mut().toggle_play(),
            KeyCode::Char('l') => self.feed.playback_mut().toggle_like(),
            KeyCode::Char('m') => self.feed.playback_mut().toggle_mute(),
            KeyCode::Char('c') => {
                if let Some(id) = self.feed.complete_current(&mut self.progress, now) {
                    tracing::info!(lesson = %id, "lesson marked complete");
                    self.status = Some("Lesson completed".to_string());
                }
            }
            KeyCode::Enter => {
                if self.feed.current_lesson_id().is_some() {
                    self.materials.open();
                }
            }
            _ => return false,
        }
        true
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let at = Position::new(mouse.column, mouse.row);

        if self.materials.is_open() {
            if matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left))
                && !ui::materials::panel_area(self.viewport).contains(at)
            {
                self.materials.dismiss(Dismiss::Backdrop);
            }
            return;
        }
        if self.selector.is_open() {
            if matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left))
                && !ui::selector::overlay_area(self.viewport).contains(at)
            {
                self.selector.dismiss();
            }
            return;
        }
        if self.view != View::Feed {
            return;
        }

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.drag_origin = Some(mouse.row),
            MouseEventKind::Up(MouseButton::Left) => {
                if let Some(origin) = self.drag_origin.take() {
                    let units = self.settings.drag_units_per_row;
                    self.navigate(FeedInput::Drag {
                        start: i32::from(origin) * units,
                        end: i32::from(mouse.row) * units,
                    });
                }
            }
            MouseEventKind::ScrollDown => self.navigate(FeedInput::Wheel(1)),
            MouseEventKind::ScrollUp => self.navigate(FeedInput::Wheel(-1)),
            _ => {}
        }
    }
}
