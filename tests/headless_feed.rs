use std::sync::{mpsc, Arc};
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use sabio::app::{App, Control, Settings};
use sabio::auth::gateway::{AuthGateway, InlineSpawner};
use sabio::auth::{AuthService, DisabledAuth};
use sabio::catalog::Catalog;
use sabio::feed::FeedState;
use sabio::runtime::{AppEvent, FixedTicker, Runner, TestEventSource};

fn demo_app(auto_advance: Duration) -> App {
    let service: Arc<dyn AuthService> = Arc::new(DisabledAuth::new());
    let gateway = AuthGateway::with_spawner(service, Box::new(InlineSpawner));
    App::new(
        Catalog::demo().unwrap(),
        gateway,
        Settings {
            auto_advance,
            ..Settings::default()
        },
    )
}

fn key(code: KeyCode) -> AppEvent {
    AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn left(kind: fn(MouseButton) -> MouseEventKind, row: u16) -> AppEvent {
    AppEvent::Mouse(MouseEvent {
        kind: kind(MouseButton::Left),
        column: 5,
        row,
        modifiers: KeyModifiers::NONE,
    })
}

// Drives the app through the same runner the binary uses, until the
// predicate holds or the step budget runs out.
fn drive<F>(app: &mut App, runner: &Runner<TestEventSource, FixedTicker>, steps: u32, done: F)
where
    F: Fn(&App) -> bool,
{
    for _ in 0..steps {
        let event = runner.step();
        assert_eq!(app.handle_event(event, Instant::now()), Control::Continue);
        if done(app) {
            return;
        }
    }
}

#[test]
fn headless_three_lessons_to_exhaustion() {
    let mut app = demo_app(Duration::from_secs(1));
    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    );

    // key, wheel and drag each move one lesson forward
    tx.send(key(KeyCode::Down)).unwrap();
    tx.send(AppEvent::Mouse(MouseEvent {
        kind: MouseEventKind::ScrollDown,
        column: 0,
        row: 0,
        modifiers: KeyModifiers::NONE,
    }))
    .unwrap();
    tx.send(left(MouseEventKind::Down, 20)).unwrap();
    tx.send(left(MouseEventKind::Up, 10)).unwrap();

    drive(&mut app, &runner, 50, |app| app.feed().is_exhausted());

    assert_eq!(app.feed().state(), FeedState::Exhausted);

    // nothing leaves the exhausted state
    tx.send(key(KeyCode::Up)).unwrap();
    tx.send(key(KeyCode::Down)).unwrap();
    drive(&mut app, &runner, 4, |_| false);
    assert_eq!(app.feed().state(), FeedState::Exhausted);
}

#[test]
fn headless_completion_auto_advances_once() {
    let mut app = demo_app(Duration::from_millis(30));
    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    );
    let minutes_before = app.progress().total_minutes();

    tx.send(key(KeyCode::Char('c'))).unwrap();
    drive(&mut app, &runner, 200, |app| {
        app.feed().state() == FeedState::Browsing(1)
    });

    assert_eq!(app.feed().state(), FeedState::Browsing(1));
    assert!(app.progress().is_completed("lesson-1"));
    assert_eq!(app.progress().total_minutes(), minutes_before + 1);
    assert!(!app.feed().auto_advance_pending());

    // completing the same lesson again does not duplicate it
    let completed = app.progress().completed_count();
    tx.send(key(KeyCode::Up)).unwrap();
    tx.send(key(KeyCode::Char('c'))).unwrap();
    tx.send(key(KeyCode::Up)).unwrap();
    drive(&mut app, &runner, 3, |_| false);
    assert_eq!(app.progress().completed_count(), completed);
    assert_eq!(app.progress().total_minutes(), minutes_before + 2);
}

#[test]
fn headless_last_lesson_completion_stays_put() {
    let mut app = demo_app(Duration::from_millis(10));
    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    );

    tx.send(key(KeyCode::Down)).unwrap();
    tx.send(key(KeyCode::Down)).unwrap();
    tx.send(key(KeyCode::Char('c'))).unwrap();
    drive(&mut app, &runner, 20, |_| false);

    assert_eq!(app.feed().state(), FeedState::Browsing(2));
    assert!(app.progress().is_completed("lesson-3"));
    assert!(!app.feed().auto_advance_pending());
}

#[test]
fn headless_manual_move_cancels_pending_advance() {
    let mut app = demo_app(Duration::from_millis(40));
    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    );

    tx.send(key(KeyCode::Down)).unwrap();
    tx.send(key(KeyCode::Char('c'))).unwrap();
    tx.send(key(KeyCode::Up)).unwrap();
    drive(&mut app, &runner, 30, |_| false);

    // the queued advance belonged to lesson 2 and was dropped on the move
    assert_eq!(app.feed().state(), FeedState::Browsing(0));
    assert!(app.progress().is_completed("lesson-2"));
}

#[test]
fn headless_empty_catalog_is_exhausted_from_the_start() {
    let service: Arc<dyn AuthService> = Arc::new(DisabledAuth::new());
    let gateway = AuthGateway::with_spawner(service, Box::new(InlineSpawner));
    let catalog = Catalog::from_slice(br#"{"lessons": [], "specializations": []}"#).unwrap();
    let mut app = App::new(catalog, gateway, Settings::default());

    assert!(app.feed().is_exhausted());
    app.handle_event(key(KeyCode::Down), Instant::now());
    app.handle_event(key(KeyCode::Enter), Instant::now());
    assert!(app.feed().is_exhausted());
    assert!(!app.materials().is_open());
}
