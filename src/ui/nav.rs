use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{bold_style, dim_style, hex_color};
use crate::app::{App, View};
use crate::specialization;

pub const APP_TITLE: &str = "Sabio";

pub fn label(view: View) -> &'static str {
    match view {
        View::Feed => "Home",
        View::Search => "Search",
        View::Library => "Library",
        View::Profile => "Profile",
    }
}

pub fn render(app: &App, f: &mut Frame, area: Rect) {
    let block = Block::default().borders(Borders::BOTTOM);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut spans = vec![
        Span::styled(APP_TITLE, bold_style().fg(Color::Cyan)),
        Span::raw("  "),
    ];
    for (i, view) in View::ALL.iter().enumerate() {
        let text = format!(" {} {} ", i + 1, label(*view));
        let style = if *view == app.view() {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            dim_style()
        };
        spans.push(Span::styled(text, style));
        spans.push(Span::raw(" "));
    }

    let active = specialization::active(app.catalog().specializations(), app.progress());
    let chip = match active {
        Some(item) => Line::from(vec![
            Span::styled(
                format!("{} {}", item.icon, item.title),
                Style::default().fg(hex_color(&item.color)),
            ),
            Span::styled("  (s)", dim_style()),
        ]),
        None => Line::from(Span::styled("No specialization selected  (s)", dim_style())),
    };

    let [left, right] =
        Layout::horizontal([Constraint::Min(0), Constraint::Length(chip.width() as u16)])
            .areas(inner);
    f.render_widget(Paragraph::new(Line::from(spans)), left);
    f.render_widget(Paragraph::new(chip), right);
}

#[cfg(test)]
mod tests {
    use crate::ui::test_support::{app, render};

    #[test]
    fn test_nav_shows_views_and_active_specialization() {
        let mut app = app();
        let text = render(&mut app, 120, 20);

        for label in ["1 Home", "2 Search", "3 Library", "4 Profile"] {
            assert!(text.contains(label), "missing {label}");
        }
        assert!(text.contains("Ancient Philosophy"));
    }
}
