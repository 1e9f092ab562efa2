use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::{bold_style, dim_style};
use crate::app::App;
use crate::auth::gateway::{AuthGateway, FormField, Notice, Operation};
use crate::auth::Session;

const UPDATE_FIELDS: [&str; 4] = ["Name", "New email", "New phone", "New password"];

pub fn render(app: &App, f: &mut Frame, area: Rect) {
    let block = Block::default().title(Span::styled(" My profile ", bold_style()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    match app.auth().session() {
        None => render_auth_form(app.auth(), f, inner),
        Some(session) => render_account(app, session, f, inner),
    }
}

fn field_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

fn text_field<'a>(label: &'a str, value: String, focused: bool) -> Paragraph<'a> {
    let cursor = if focused { "▏" } else { "" };
    Paragraph::new(format!("{value}{cursor}")).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(field_style(focused))
            .title(format!(" {label} ")),
    )
}

fn button(label: &str, focused: bool, disabled: bool) -> Span<'static> {
    let style = if disabled {
        dim_style()
    } else if focused {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        bold_style()
    };
    Span::styled(format!("[ {label} ]"), style)
}

fn render_auth_form(auth: &AuthGateway, f: &mut Frame, area: Rect) {
    let [email_area, password_area, buttons_area, notice_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(2),
        Constraint::Min(0),
    ])
    .areas(area);

    let focus = auth.focus();
    f.render_widget(
        text_field("Email", auth.email().to_string(), focus == FormField::Email),
        email_area,
    );
    f.render_widget(
        text_field(
            "Password",
            "•".repeat(auth.password().chars().count()),
            focus == FormField::Password,
        ),
        password_area,
    );

    let busy = auth.pending().is_some();
    let mut buttons = vec![
        button("Sign in", focus == FormField::SignInButton, busy),
        Span::raw("  "),
        button("Sign up", focus == FormField::SignUpButton, busy),
    ];
    if let Some(op) = auth.pending() {
        let doing = match op {
            Operation::SignIn => "Signing in…",
            Operation::SignUp => "Creating account…",
        };
        buttons.push(Span::styled(format!("   {doing}"), dim_style()));
    }
    f.render_widget(Paragraph::new(Line::from(buttons)), buttons_area);

    if let Some(notice) = auth.notice() {
        f.render_widget(
            Paragraph::new(notice_line(notice)).wrap(Wrap { trim: true }),
            notice_area,
        );
    }
}

fn notice_line(notice: &Notice) -> Line<'_> {
    let style = match notice {
        Notice::Error(_) => Style::default().fg(Color::Red),
        Notice::Info(_) => Style::default().fg(Color::Green),
    };
    Line::from(Span::styled(notice.text(), style))
}

fn render_account(app: &App, session: &Session, f: &mut Frame, area: Rect) {
    let [welcome_area, update_area, stats_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(UPDATE_FIELDS.len() as u16 + 3),
        Constraint::Min(0),
    ])
    .areas(area);

    f.render_widget(
        Paragraph::new(vec![
            Line::from(Span::styled(
                format!("Welcome, {}", session.email()),
                bold_style(),
            )),
            Line::from(button("o  Sign out", false, false).style(Style::default().fg(Color::Red))),
        ]),
        welcome_area,
    );

    // shown for completeness; there is nothing behind it yet
    let mut update_lines: Vec<Line> = UPDATE_FIELDS
        .iter()
        .map(|label| Line::from(Span::styled(format!("  {label}: ________"), dim_style())))
        .collect();
    update_lines.push(Line::from(button("Update details", false, true)));
    f.render_widget(
        Paragraph::new(update_lines).block(
            Block::default()
                .borders(Borders::TOP)
                .title(" Update information "),
        ),
        update_area,
    );

    render_statistics(app, f, stats_area);
}

/// The four learning figures: completed lessons, streak, minutes, specializations
pub fn statistics(app: &App) -> [(String, &'static str); 4] {
    let progress = app.progress();
    [
        (progress.completed_count().to_string(), "Lessons completed"),
        (progress.streak_days().to_string(), "Day streak"),
        (progress.total_minutes().to_string(), "Minutes learned"),
        (
            app.catalog().specializations().len().to_string(),
            "Specializations",
        ),
    ]
}

fn render_statistics(app: &App, f: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::TOP)
        .title(" Learning statistics ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let colors = [Color::Cyan, Color::Green, Color::Yellow, Color::Magenta];
    let cells = Layout::horizontal([Constraint::Ratio(1, 4); 4]).split(inner);
    for (((value, label), color), cell) in statistics(app).into_iter().zip(colors).zip(cells.iter()) {
        f.render_widget(
            Paragraph::new(vec![
                Line::from(Span::styled(value, bold_style().fg(color))),
                Line::from(Span::styled(label, dim_style())),
            ])
            .centered(),
            *cell,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{App, Settings, View};
    use crate::auth::gateway::InlineSpawner;
    use crate::auth::{AuthService, SessionChange, SessionHub, User};
    use crate::auth::client::SupabaseAuth;
    use crate::backend::Backend;
    use crate::catalog::Catalog;
    use crate::ui::test_support::{app, render};
    use std::sync::Arc;

    #[test]
    fn test_signed_out_shows_form_with_masked_password() {
        let mut app = app();
        app.switch_view(View::Profile);

        let text = render(&mut app, 100, 30);
        assert!(text.contains("Email"));
        assert!(text.contains("[ Sign in ]"));
        assert!(text.contains("[ Sign up ]"));
        assert!(!text.contains("Welcome"));
    }

    #[test]
    fn test_signed_in_shows_welcome_and_statistics() {
        let auth = SupabaseAuth::new(Backend::new("https://demo.supabase.co", "anon").unwrap());
        let hub: SessionHub = auth.hub().clone();
        hub.publish(SessionChange::SignedIn(Session {
            access_token: "a".into(),
            refresh_token: "r".into(),
            expires_at: None,
            user: User {
                id: "u".into(),
                email: Some("ana@example.com".into()),
            },
        }));
        let service: Arc<dyn AuthService> = Arc::new(auth);
        let gateway = AuthGateway::with_spawner(service, Box::new(InlineSpawner));
        let mut app = App::new(Catalog::demo().unwrap(), gateway, Settings::default());
        app.switch_view(View::Profile);

        let text = render(&mut app, 120, 40);
        assert!(text.contains("Welcome, ana@example.com"));
        assert!(text.contains("Update information"));
        assert!(text.contains("Learning statistics"));
        assert!(text.contains("342"));
        assert_eq!(statistics(&app)[0].0, "3");
        assert_eq!(statistics(&app)[3].0, "4");
    }
}
