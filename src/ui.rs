pub mod feed;
pub mod library;
pub mod materials;
pub mod nav;
pub mod profile;
pub mod screen;
pub mod selector;

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Clear, Paragraph},
    Frame,
};

use crate::app::{App, View};

const NAV_HEIGHT: u16 = 3;

/// Draw the whole frame: navigation bar, active view, status line, overlays
pub fn draw(app: &App, f: &mut Frame) {
    let area = f.area();
    let [nav_area, body, status_area] = Layout::vertical([
        Constraint::Length(NAV_HEIGHT),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    nav::render(app, f, nav_area);
    screen::current_screen(app.view()).render(app, f, body);
    render_status(app, f, status_area);

    if app.materials().is_open() {
        materials::render(app, f, area);
    }
    if app.selector().is_open() {
        selector::render(app, f, area);
    }
}

fn render_status(app: &App, f: &mut Frame, area: Rect) {
    let line = match app.status() {
        Some(status) => Span::styled(status.to_string(), Style::default().fg(Color::Yellow)),
        None => Span::styled(hints(app), dim_style().add_modifier(Modifier::ITALIC)),
    };
    f.render_widget(Paragraph::new(line), area);
}

fn hints(app: &App) -> &'static str {
    if app.selector().is_open() {
        return "↑↓ choose / (enter) select / (esc) close";
    }
    if app.materials().is_open() {
        return "↑↓ move / (enter) open link / (x) close";
    }
    match app.view() {
        View::Feed => {
            "↑↓ / drag / wheel navigate · (space) pause · (l)ike · (m)ute · (c)omplete · (enter) materials · (s)pecializations · (q)uit"
        }
        View::Profile if !app.auth().is_signed_in() => {
            "(tab) next field · (enter) submit · (esc) quit"
        }
        View::Profile => "(o) sign out · 1-4 views · (q)uit",
        View::Search | View::Library => "1-4 / (tab) views · (s)pecializations · (q)uit",
    }
}

pub(crate) fn dim_style() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

pub(crate) fn bold_style() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

/// `#RRGGBB` to a terminal color; anything else renders with the default color
pub fn hex_color(hex: &str) -> Color {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 {
        return Color::Reset;
    }
    let channel = |range: std::ops::Range<usize>| {
        digits
            .get(range)
            .and_then(|s| u8::from_str_radix(s, 16).ok())
    };
    match (channel(0..2), channel(2..4), channel(4..6)) {
        (Some(r), Some(g), Some(b)) => Color::Rgb(r, g, b),
        _ => Color::Reset,
    }
}

/// Rectangle of `percent_x` by `percent_y` centered in `area`
pub fn centered(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let [_, middle, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(area);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(middle);
    center
}

/// Blank the area an overlay is about to cover
pub(crate) fn clear(f: &mut Frame, area: Rect) {
    f.render_widget(Clear, area);
}

#[cfg(test)]
pub(crate) mod test_support {
    use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};
    use std::sync::Arc;

    use crate::app::{App, Settings};
    use crate::auth::gateway::{AuthGateway, InlineSpawner};
    use crate::auth::{AuthService, DisabledAuth};
    use crate::catalog::Catalog;

    pub fn app() -> App {
        let service: Arc<dyn AuthService> = Arc::new(DisabledAuth::new());
        let gateway = AuthGateway::with_spawner(service, Box::new(InlineSpawner));
        App::new(Catalog::demo().unwrap(), gateway, Settings::default())
    }

    pub fn render(app: &mut App, width: u16, height: u16) -> String {
        app.set_viewport(ratatui::layout::Rect::new(0, 0, width, height));
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| super::draw(app, f)).unwrap();
        buffer_text(terminal.backend().buffer())
    }

    pub fn buffer_text(buffer: &Buffer) -> String {
        let area = buffer.area;
        let mut out = String::new();
        for y in 0..area.height {
            for x in 0..area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }
}
