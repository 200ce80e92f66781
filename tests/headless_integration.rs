use std::sync::mpsc;
use std::time::Duration;

use cadence::app::{App, Control};
use cadence::clock::ManualClock;
use cadence::config::Config;
use cadence::page::Page;
use cadence::runtime::{ChannelEventSource, FixedTicker, HostEvent, Runner};
use cadence::session::Phase;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

fn key(code: KeyCode) -> HostEvent {
    HostEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

// Headless run of the terminal host: keystrokes go through the runner into
// the page model and the speed test without a TTY.
#[test]
fn headless_typing_flow_completes() {
    let clock = ManualClock::new();
    let mut app = App::new("hi", &Config::default(), clock.clone()).unwrap();

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        ChannelEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    );

    tx.send(key(KeyCode::Char('h'))).unwrap();
    tx.send(key(KeyCode::Char('i'))).unwrap();

    for _ in 0..100u32 {
        clock.advance(Duration::from_millis(250));
        app.handle(runner.step(), runner.tick_interval());
        if app.test.phase() == Phase::Completed {
            break;
        }
    }

    assert_eq!(app.test.phase(), Phase::Completed);
    let completion = app.finish().expect("completion recorded");
    assert!(completion.wpm >= 0.0);
    assert_eq!(completion.keystrokes, 2);
    assert_eq!(completion.errors, 0);
}

#[test]
fn headless_typo_then_fix() {
    let mut app = App::new("ab", &Config::default(), ManualClock::new()).unwrap();
    let tick = Duration::from_millis(5);

    app.handle(key(KeyCode::Char('x')), tick);
    assert!(app.has_error());
    app.handle(key(KeyCode::Backspace), tick);
    app.handle(key(KeyCode::Char('a')), tick);
    app.handle(key(KeyCode::Char('b')), tick);

    assert_eq!(app.test.phase(), Phase::Completed);
    let state = app.test.state();
    assert_eq!(state.key_count, 4);
    // the typo and the backspace both failed to grow the correct prefix
    assert_eq!(state.error_count, 2);
}

#[test]
fn headless_quit_detaches_listeners() {
    let mut app = App::new("abc", &Config::default(), ManualClock::new()).unwrap();
    let tick = Duration::from_millis(5);

    assert_eq!(app.handle(key(KeyCode::Esc), tick), Control::Quit);
    assert!(app.finish().is_none());
}

#[test]
fn headless_timer_keeps_ticking_until_completion() {
    let clock = ManualClock::new();
    let mut app = App::new("hello", &Config::default(), clock.clone()).unwrap();
    let tick = Duration::from_millis(100);

    app.handle(key(KeyCode::Char('h')), tick);
    clock.advance(Duration::from_secs(60));
    for _ in 0..10 {
        app.handle(HostEvent::Tick, tick);
    }
    assert_eq!(app.page.text(app.layout.stats), "0.2");
}
