use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, LineGauge, Paragraph, Wrap},
    Frame,
};

use super::{bold_style, dim_style};
use crate::app::App;
use crate::catalog::Lesson;
use crate::feed::FeedState;
use crate::playback::Playback;
use crate::util::{format_clock, format_position, truncate};

pub const COMPLETION_TITLE: &str = "Congratulations!";
pub const COMPLETION_MESSAGE: &str = "You have completed all available lessons.";

const SEGMENT: &str = "━";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Past,
    Current,
    Upcoming,
}

/// One segment per lesson relative to the cursor; an exhausted feed is all past
pub fn segments(state: FeedState, len: usize) -> Vec<Segment> {
    (0..len)
        .map(|i| match state {
            FeedState::Browsing(c) if i < c => Segment::Past,
            FeedState::Browsing(c) if i == c => Segment::Current,
            FeedState::Browsing(_) => Segment::Upcoming,
            FeedState::Exhausted => Segment::Past,
        })
        .collect()
}

pub fn counter(state: FeedState, len: usize) -> Option<String> {
    match state {
        FeedState::Browsing(i) => Some(format!("{} / {}", i + 1, len)),
        FeedState::Exhausted => None,
    }
}

pub fn render(app: &App, f: &mut Frame, area: Rect) {
    let feed = app.feed();

    match (feed.state(), app.current_lesson()) {
        (FeedState::Browsing(_), Some(lesson)) => {
            let [bar, card] =
                Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);
            render_progress_bar(app, f, bar);
            render_lesson(app, lesson, feed.playback(), f, card);
        }
        _ => render_completion(f, area),
    }
}

fn render_progress_bar(app: &App, f: &mut Frame, area: Rect) {
    let feed = app.feed();
    let counter = counter(feed.state(), feed.len()).unwrap_or_default();
    let [segments_area, counter_area] = Layout::horizontal([
        Constraint::Min(0),
        Constraint::Length(counter.len() as u16 + 2),
    ])
    .areas(area);

    let parts = segments(feed.state(), feed.len());
    let width = (segments_area.width as usize / parts.len().max(1)).max(1);
    let spans: Vec<Span> = parts
        .iter()
        .map(|segment| {
            let style = match segment {
                Segment::Past => Style::default().fg(Color::Gray),
                Segment::Current => bold_style().fg(Color::White),
                Segment::Upcoming => Style::default().fg(Color::DarkGray),
            };
            let mut text = SEGMENT.repeat(width.saturating_sub(1).max(1));
            if width > 1 {
                text.push(' ');
            }
            Span::styled(text, style)
        })
        .collect();

    f.render_widget(Paragraph::new(Line::from(spans)), segments_area);
    f.render_widget(
        Paragraph::new(counter).alignment(Alignment::Right),
        counter_area,
    );
}

fn render_lesson(app: &App, lesson: &Lesson, playback: &Playback, f: &mut Frame, area: Rect) {
    let completed = app.progress().is_completed(&lesson.id);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Module {} ", lesson.module_number()))
        .title_bottom(Line::from(format!(" {} ", format_clock(u64::from(lesson.duration_secs)))).right_aligned());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [text_area, gauge_area, actions_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(inner);

    let mut title = vec![Span::styled(lesson.title.clone(), bold_style())];
    if completed {
        title.push(Span::styled("  ✓ completed", Style::default().fg(Color::Green)));
    }

    let media_width = text_area.width.saturating_sub(4) as usize;
    let lines = vec![
        Line::from(title),
        Line::default(),
        Line::from(lesson.description.clone()),
        Line::default(),
        Line::from(Span::styled(
            format!("▶ {}", truncate(&lesson.video_url, media_width)),
            dim_style(),
        )),
    ];
    f.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: true }),
        text_area,
    );

    let state_label = if playback.has_ended() {
        "■ Ended"
    } else if playback.playing {
        "▶ Playing"
    } else {
        "⏸ Paused"
    };
    f.render_widget(
        LineGauge::default()
            .filled_style(Style::default().fg(Color::Cyan))
            .unfilled_style(Style::default().fg(Color::DarkGray))
            .label(format!(
                "{state_label}  {}",
                format_position(playback.position(), lesson.duration_secs)
            ))
            .ratio(playback.fraction().clamp(0.0, 1.0)),
        gauge_area,
    );

    let like = if playback.liked {
        Span::styled("♥ Liked", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
    } else {
        Span::styled("♡ Like", dim_style())
    };
    let mute = if playback.muted {
        Span::styled("🔇 Muted", Style::default().fg(Color::Yellow))
    } else {
        Span::styled("🔊 Sound", dim_style())
    };
    let materials = Span::styled(
        format!("📚 Materials ({})", lesson.materials.len()),
        dim_style(),
    );
    f.render_widget(
        Paragraph::new(Line::from(vec![like, Span::raw("   "), mute, Span::raw("   "), materials])),
        actions_area,
    );
}

fn render_completion(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(COMPLETION_TITLE, bold_style().fg(Color::Green))),
        Line::default(),
        Line::from(COMPLETION_MESSAGE),
    ];
    let top = area.height.saturating_sub(lines.len() as u16) / 2;
    let [_, middle] =
        Layout::vertical([Constraint::Length(top), Constraint::Min(0)]).areas(area);
    f.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        middle,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::AppEvent;
    use crate::ui::test_support::{app, render};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::time::Instant;

    #[test]
    fn test_segments_follow_cursor() {
        assert_eq!(
            segments(FeedState::Browsing(1), 3),
            vec![Segment::Past, Segment::Current, Segment::Upcoming]
        );
        assert_eq!(segments(FeedState::Exhausted, 2), vec![Segment::Past; 2]);
        assert!(segments(FeedState::Exhausted, 0).is_empty());
    }

    #[test]
    fn test_counter() {
        assert_eq!(counter(FeedState::Browsing(0), 3).as_deref(), Some("1 / 3"));
        assert_eq!(counter(FeedState::Exhausted, 3), None);
    }

    #[test]
    fn test_renders_focused_lesson() {
        let mut app = app();
        let text = render(&mut app, 100, 30);

        assert!(text.contains("The Allegory of the Cave"));
        assert!(text.contains("Module 1"));
        assert!(text.contains("1 / 3"));
        assert!(text.contains("0:55"));
        assert!(text.contains("Playing"));
    }

    #[test]
    fn test_renders_completion_message_when_exhausted() {
        let mut app = app();
        let now = Instant::now();
        for _ in 0..3 {
            app.handle_event(
                AppEvent::Key(KeyEvent::new(KeyCode::Down, KeyModifiers::NONE)),
                now,
            );
        }

        let text = render(&mut app, 100, 30);
        assert!(text.contains(COMPLETION_TITLE));
        assert!(text.contains(COMPLETION_MESSAGE));
    }
}
