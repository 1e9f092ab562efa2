use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use super::{bold_style, centered, clear, dim_style, hex_color};
use crate::app::App;
use crate::specialization::{completion_percent, status, StatusLabel};
use crate::util::percent_label;

pub fn overlay_area(viewport: Rect) -> Rect {
    centered(viewport, 70, 80)
}

fn status_color(label: StatusLabel) -> Color {
    match label {
        StatusLabel::NotStarted => Color::DarkGray,
        StatusLabel::InProgress => Color::Yellow,
        StatusLabel::Advanced => Color::Cyan,
        StatusLabel::Completed => Color::Green,
    }
}

pub fn render(app: &App, f: &mut Frame, viewport: Rect) {
    let area = overlay_area(viewport);
    clear(f, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(" Specializations ", bold_style()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [list_area, summary_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(4)]).areas(inner);

    let active_id = app.progress().current_specialization();
    let items: Vec<ListItem> = app
        .catalog()
        .specializations()
        .iter()
        .map(|item| {
            let percent = completion_percent(item);
            let label = status(item);
            let color = hex_color(&item.color);
            let mut title = vec![
                Span::styled(format!("{} ", item.icon), Style::default().fg(color)),
                Span::styled(item.title.clone(), bold_style()),
            ];
            if item.id == active_id {
                title.push(Span::styled("  ● active", Style::default().fg(color)));
            }
            ListItem::new(vec![
                Line::from(title),
                Line::from(Span::styled(format!("   {}", item.description), dim_style())),
                Line::from(vec![
                    Span::raw(format!(
                        "   {}/{} lessons  {}  ",
                        item.completed_lessons,
                        item.total_lessons,
                        percent_label(percent)
                    )),
                    Span::styled(label.to_string(), Style::default().fg(status_color(label))),
                ]),
            ])
        })
        .collect();

    let mut state = ListState::default().with_selected(Some(app.selector().highlighted()));
    f.render_stateful_widget(
        List::new(items)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("› "),
        list_area,
        &mut state,
    );

    render_summary(app, f, summary_area);
}

/// Sum of the catalog's own counters next to the tracker's figures
pub fn total_completed(app: &App) -> u32 {
    app.catalog()
        .specializations()
        .iter()
        .map(|s| s.completed_lessons)
        .sum()
}

fn render_summary(app: &App, f: &mut Frame, area: Rect) {
    let progress = app.progress();
    let block = Block::default()
        .borders(Borders::TOP)
        .title(" Your overall progress ");
    let lines = vec![Line::from(vec![
        Span::styled(total_completed(app).to_string(), bold_style().fg(Color::Cyan)),
        Span::raw(" lessons   "),
        Span::styled(progress.streak_days().to_string(), bold_style().fg(Color::Green)),
        Span::raw(" day streak   "),
        Span::styled(progress.total_minutes().to_string(), bold_style().fg(Color::Yellow)),
        Span::raw(" minutes learned"),
    ])];
    f.render_widget(Paragraph::new(lines).block(block), area);
}
