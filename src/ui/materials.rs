use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use super::{bold_style, clear, dim_style};
use crate::app::App;
use crate::materials::MaterialsView;
use crate::util::truncate;

const MIN_PANEL_WIDTH: u16 = 32;

/// The drawer hugs the right edge; everything left of it is backdrop
pub fn panel_area(viewport: Rect) -> Rect {
    let width = ((u32::from(viewport.width) * 45 / 100) as u16)
        .max(MIN_PANEL_WIDTH)
        .min(viewport.width);
    Rect::new(
        viewport.x + viewport.width - width,
        viewport.y,
        width,
        viewport.height,
    )
}

pub fn render(app: &App, f: &mut Frame, viewport: Rect) {
    let area = panel_area(viewport);
    clear(f, area);

    let title = app
        .current_lesson()
        .map(|l| l.title.as_str())
        .unwrap_or_default();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(" Supplementary materials ", bold_style()))
        .title_bottom(Line::from(" (x) close ").right_aligned());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [heading, body, footer] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(inner);

    f.render_widget(
        Paragraph::new(Span::styled(
            truncate(title, heading.width as usize),
            dim_style(),
        )),
        heading,
    );

    match MaterialsView::of(app.open_materials().unwrap_or_default()) {
        MaterialsView::Empty(message) => {
            f.render_widget(
                Paragraph::new(Span::styled(message, dim_style().add_modifier(Modifier::ITALIC)))
                    .wrap(Wrap { trim: true }),
                body,
            );
        }
        MaterialsView::Items {
            materials,
            total_minutes,
        } => {
            let content_width = body.width.saturating_sub(4) as usize;
            let items: Vec<ListItem> = materials
                .iter()
                .map(|m| {
                    let mut header = vec![
                        Span::styled(
                            format!("[{}] ", m.kind),
                            Style::default().fg(Color::Magenta),
                        ),
                        Span::styled(m.title.clone(), bold_style()),
                        Span::styled(format!("  {} min", m.estimated_minutes), dim_style()),
                    ];
                    if m.url.is_some() {
                        header.push(Span::styled("  ↗ link", Style::default().fg(Color::Blue)));
                    }
                    ListItem::new(vec![
                        Line::from(header),
                        Line::from(Span::styled(
                            format!("  {}", truncate(&m.content, content_width)),
                            dim_style(),
                        )),
                    ])
                })
                .collect();

            let mut state = ListState::default().with_selected(Some(app.materials().highlighted()));
            f.render_stateful_widget(
                List::new(items)
                    .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
                    .highlight_symbol("› "),
                body,
                &mut state,
            );
            f.render_widget(
                Paragraph::new(format!("Total estimated time: {total_minutes} min")),
                footer,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{App, Settings};
    use crate::auth::gateway::{AuthGateway, InlineSpawner};
    use crate::auth::{AuthService, DisabledAuth};
    use crate::catalog::Catalog;
    use crate::materials::EMPTY_MATERIALS_MESSAGE;
    use crate::runtime::AppEvent;
    use crate::ui::test_support::{app, render};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    fn key(code: KeyCode) -> AppEvent {
        AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn enter() -> AppEvent {
        key(KeyCode::Enter)
    }

    #[test]
    fn test_panel_area_hugs_right_edge() {
        let viewport = Rect::new(0, 0, 100, 40);
        let panel = panel_area(viewport);

        assert_eq!(panel.right(), 100);
        assert_eq!(panel.width, 45);
        assert_eq!(panel_area(Rect::new(0, 0, 20, 5)).width, 20);
    }

    #[test]
    fn test_lists_materials_with_total() {
        let mut app = app();
        app.handle_event(enter(), Instant::now());

        let text = render(&mut app, 120, 30);
        assert!(text.contains("[Reading]"));
        assert!(text.contains("[Exercise]"));
        assert!(text.contains("Total estimated time: 25 min"));
    }

    #[test]
    fn test_panel_shows_materials_of_lesson_focused_later() {
        let service: Arc<dyn AuthService> = Arc::new(DisabledAuth::new());
        let gateway = AuthGateway::with_spawner(service, Box::new(InlineSpawner));
        let settings = Settings {
            auto_advance: Duration::from_millis(10),
            ..Settings::default()
        };
        let mut app = App::new(Catalog::demo().unwrap(), gateway, settings);
        let now = Instant::now();

        app.handle_event(key(KeyCode::Char('c')), now);
        app.handle_event(enter(), now);
        app.handle_event(AppEvent::Tick, now + Duration::from_millis(20));

        let text = render(&mut app, 160, 30);
        assert!(text.contains("linear perspective"));
        assert!(!text.contains("Republic, Book VII"));
        assert!(text.contains("Total estimated time: 12 min"));
    }

    #[test]
    fn test_empty_materials_show_message_and_no_total() {
        let catalog = Catalog::from_slice(
            br#"{
                "lessons": [{
                    "id": "l1", "title": "Bare", "description": "", "video_url": "",
                    "thumbnail_url": "", "duration_secs": 30, "module_id": "module-1",
                    "order": 1
                }],
                "specializations": []
            }"#,
        )
        .unwrap();
        let service: Arc<dyn AuthService> = Arc::new(DisabledAuth::new());
        let gateway = AuthGateway::with_spawner(service, Box::new(InlineSpawner));
        let mut app = App::new(catalog, gateway, Settings::default());
        app.handle_event(enter(), Instant::now());

        let text = render(&mut app, 200, 30);
        assert!(text.contains(EMPTY_MATERIALS_MESSAGE));
        assert!(!text.contains("Total estimated time"));
    }
}
