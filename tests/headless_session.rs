use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use croquis::api::SessionSettings;
use croquis::runtime::{AppEvent, EventSource, TestEventSource};
use croquis::session::{
    Phase, Session, SessionClock, SessionPlan, PREPARATION_SECS, TICKS_PER_SECOND,
};
use croquis::setup::{SetupForm, DURATION_ERROR};

// Headless integration using the internal runtime + session machine without
// a TTY. Scripted heartbeats and key events stand in for the real producer
// threads.

fn plan(images: &[&str], duration: u32) -> SessionPlan {
    SessionPlan {
        images: images.iter().map(|s| s.to_string()).collect(),
        duration,
    }
}

fn advance_seconds(clock: &mut SessionClock, seconds: u32) {
    for _ in 0..seconds * TICKS_PER_SECOND {
        clock.on_heartbeat();
    }
}

#[test]
fn headless_walkthrough_reaches_the_finish_latch() {
    // three images at five seconds each, driven purely by heartbeats
    let session = Session::new(plan(&["a", "b", "c"], 5)).unwrap();
    let mut clock = SessionClock::new(session);

    let (tx, events) = TestEventSource::pair();
    for _ in 0..3 * (PREPARATION_SECS + 5) * TICKS_PER_SECOND {
        tx.send(AppEvent::Tick).unwrap();
    }
    drop(tx);

    while let Ok(event) = events.next() {
        if let AppEvent::Tick = event {
            clock.on_heartbeat();
        }
    }

    assert!(clock.session().is_finished());
}

#[test]
fn walkthrough_checkpoints_across_three_images() {
    let session = Session::new(plan(&["a", "b", "c"], 5)).unwrap();
    let mut clock = SessionClock::new(session);

    assert_eq!(clock.session().current_index(), 0);
    assert_eq!(clock.session().phase(), Phase::Preparation);
    assert_eq!(clock.session().time_left(), PREPARATION_SECS);

    advance_seconds(&mut clock, PREPARATION_SECS);
    assert_eq!(clock.session().current_index(), 0);
    assert_eq!(clock.session().phase(), Phase::Drawing);
    assert_eq!(clock.session().time_left(), 5);

    advance_seconds(&mut clock, 5);
    assert_eq!(clock.session().current_index(), 1);
    assert_eq!(clock.session().phase(), Phase::Preparation);
    assert_eq!(clock.session().time_left(), PREPARATION_SECS);

    advance_seconds(&mut clock, PREPARATION_SECS + 5);
    assert_eq!(clock.session().current_index(), 2);
    assert_eq!(clock.session().phase(), Phase::Preparation);

    advance_seconds(&mut clock, PREPARATION_SECS + 5);
    assert!(clock.session().is_finished());
}

#[test]
fn scripted_pause_and_skip_flow() {
    let session = Session::new(plan(&["a", "b"], 30)).unwrap();
    let mut clock = SessionClock::new(session);

    let (tx, events) = TestEventSource::pair();
    let space = KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE);
    let right = KeyEvent::new(KeyCode::Right, KeyModifiers::NONE);

    tx.send(AppEvent::Key(space)).unwrap();
    // a paused flood of heartbeats must not consume preparation time
    for _ in 0..5 * TICKS_PER_SECOND {
        tx.send(AppEvent::Tick).unwrap();
    }
    tx.send(AppEvent::Key(space)).unwrap();
    tx.send(AppEvent::Key(right)).unwrap();
    drop(tx);

    while let Ok(event) = events.next() {
        match event {
            AppEvent::Tick => {
                clock.on_heartbeat();
            }
            AppEvent::Key(key) => match key.code {
                KeyCode::Char(' ') => clock.toggle_pause(),
                KeyCode::Right => clock.skip(),
                _ => {}
            },
            AppEvent::Resize => {}
        }
    }

    assert_eq!(clock.session().phase(), Phase::Drawing);
    assert_eq!(clock.session().time_left(), 30);
    assert!(!clock.session().is_paused());
}

#[test]
fn skip_while_paused_changes_phase_but_not_the_clock() {
    let session = Session::new(plan(&["a"], 30)).unwrap();
    let mut clock = SessionClock::new(session);

    clock.toggle_pause();
    clock.skip();

    assert_eq!(clock.session().phase(), Phase::Drawing);
    assert!(clock.session().is_paused());

    advance_seconds(&mut clock, 10);
    assert_eq!(clock.session().time_left(), 30);
}

#[test]
fn single_image_plan_finishes_from_its_only_drawing_expiry() {
    let session = Session::new(plan(&["only"], 2)).unwrap();
    let mut clock = SessionClock::new(session);

    advance_seconds(&mut clock, PREPARATION_SECS + 2);

    assert!(clock.session().is_finished());
    assert_eq!(clock.session().current_index(), 0);
}

#[test]
fn empty_plan_never_builds_a_session() {
    assert!(Session::new(plan(&[], 30)).is_none());
}

#[test]
fn setup_form_flow_produces_the_typed_settings() {
    let mut form = SetupForm::with_categories(
        vec!["animals".to_string(), "hands".to_string()],
        60,
        10,
    );

    // move focus to the count field and retype it
    form.focus_next();
    form.focus_next();
    form.backspace();
    form.backspace();
    form.push_char('7');

    let settings = form.begin_submit().expect("valid form should arm submission");
    assert_eq!(
        settings,
        SessionSettings {
            category: "animals".to_string(),
            count: 7,
            duration: 60,
        }
    );
    assert!(form.submitting);
}

#[test]
fn zeroed_duration_blocks_submission_before_any_network_use() {
    let mut form = SetupForm::with_categories(vec!["animals".to_string()], 60, 10);

    form.focus_next();
    form.backspace();
    form.backspace();
    form.push_char('0');

    assert!(form.begin_submit().is_none());
    assert_eq!(form.error.as_deref(), Some(DURATION_ERROR));
    assert!(!form.submitting);
    assert_eq!(form.duration_input, "0");
}
