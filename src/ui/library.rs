use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::{bold_style, dim_style, hex_color};
use crate::app::App;

pub const SEARCH_PLACEHOLDER: &str = "Search is coming soon";

const CARD_HEIGHT: u16 = 5;
const CARDS_PER_ROW: usize = 2;

/// Read-only cards, one per specialization
pub fn render(app: &App, f: &mut Frame, area: Rect) {
    let block = Block::default().title(Span::styled(" My library ", bold_style()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let specs = app.catalog().specializations();
    let rows = specs.chunks(CARDS_PER_ROW);
    let row_areas = Layout::vertical(
        std::iter::repeat(Constraint::Length(CARD_HEIGHT)).take(rows.len()),
    )
    .split(inner);

    for (row, row_area) in rows.zip(row_areas.iter()) {
        let cells = Layout::horizontal(
            [Constraint::Ratio(1, CARDS_PER_ROW as u32); CARDS_PER_ROW],
        )
        .split(*row_area);

        for (item, cell) in row.iter().zip(cells.iter()) {
            let color = hex_color(&item.color);
            let card = Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(Line::from(vec![
                    Span::styled(format!(" {} ", item.icon), Style::default().fg(color)),
                    Span::styled(format!("{} ", item.title), bold_style()),
                ]));
            let body = vec![
                Line::from(Span::styled(item.description.clone(), dim_style())),
                Line::from(vec![
                    Span::styled("Progress: ", dim_style()),
                    Span::raw(format!(
                        "{}/{} lessons",
                        item.completed_lessons, item.total_lessons
                    )),
                ]),
            ];
            f.render_widget(
                Paragraph::new(body).block(card).wrap(Wrap { trim: true }),
                *cell,
            );
        }
    }
}

pub fn render_search(f: &mut Frame, area: Rect) {
    let block = Block::default().title(Span::styled(" Search ", bold_style()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [_, middle] =
        Layout::vertical([Constraint::Length(inner.height / 2), Constraint::Min(0)]).areas(inner);
    f.render_widget(
        Paragraph::new(Span::styled(SEARCH_PLACEHOLDER, dim_style())).centered(),
        middle,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::View;
    use crate::ui::test_support::{app, render};

    #[test]
    fn test_library_cards_show_static_counters() {
        let mut app = app();
        app.switch_view(View::Library);

        let text = render(&mut app, 160, 30);
        assert!(text.contains("My library"));
        assert!(text.contains("Art History"));
        assert!(text.contains("8/32 lessons"));
        assert!(text.contains("0/28 lessons"));
    }

    #[test]
    fn test_search_is_a_placeholder() {
        let mut app = app();
        app.switch_view(View::Search);

        let text = render(&mut app, 80, 20);
        assert!(text.contains(SEARCH_PLACEHOLDER));
    }
}
