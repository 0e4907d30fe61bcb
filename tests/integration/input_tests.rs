//! Buttons → input dispatcher → control task.

use passbox::app::events::Topic;
use passbox::app::input::InputDispatcher;
use passbox::app::ports::ButtonLine;
use passbox::channels::RequestChannel;
use passbox::fsm::Step;

use super::mock_hw::{rig, MockButtons};

const DEBOUNCE_MS: u32 = 400;

/// Poll once and queue whatever the dispatcher produced.
fn poll(input: &mut InputDispatcher, buttons: &mut MockButtons, channel: &RequestChannel, now: u64) -> usize {
    let reqs = input.poll(buttons, now);
    let n = reqs.len();
    for r in reqs {
        assert!(channel.try_send(r).is_ok());
    }
    n
}

#[test]
fn cycle_button_toggles_start_and_stop() {
    let channel = RequestChannel::new();
    let mut task = rig(&channel);
    let mut input = InputDispatcher::new(DEBOUNCE_MS);
    let mut buttons = MockButtons::new();

    buttons.press(ButtonLine::CycleToggle);
    poll(&mut input, &mut buttons, &channel, 0);
    task.tick(0);
    assert!(task.state().cycle_running);
    assert_eq!(task.state().current_step, Step::ExtractAir);
    assert_eq!(task.sink().display.frames[0], ("Cycle DEMARRE".into(), "BTN_DEPART".into()));

    buttons.release(ButtonLine::CycleToggle);
    poll(&mut input, &mut buttons, &channel, 500);
    buttons.press(ButtonLine::CycleToggle);
    poll(&mut input, &mut buttons, &channel, 600);
    task.tick(600);
    assert!(!task.state().cycle_running);
    assert_eq!(task.sink().status.last(Topic::CycleStep), Some("Arrete"));
}

#[test]
fn bounce_within_hold_yields_one_command() {
    let channel = RequestChannel::new();
    let mut task = rig(&channel);
    let mut input = InputDispatcher::new(DEBOUNCE_MS);
    let mut buttons = MockButtons::new();

    let mut produced = 0;
    for (now, pressed) in [(0, true), (100, false), (200, true), (300, false)] {
        if pressed {
            buttons.press(ButtonLine::Emergency);
        } else {
            buttons.release(ButtonLine::Emergency);
        }
        produced += poll(&mut input, &mut buttons, &channel, now);
    }
    task.tick(300);

    assert_eq!(produced, 1);
    assert!(task.state().emergency_active, "a second toggle would have cleared it");
}

#[test]
fn emergency_wins_over_simultaneous_start() {
    let channel = RequestChannel::new();
    let mut task = rig(&channel);
    let mut input = InputDispatcher::new(DEBOUNCE_MS);
    let mut buttons = MockButtons::new();

    buttons.press(ButtonLine::CycleToggle);
    buttons.press(ButtonLine::Emergency);
    assert_eq!(poll(&mut input, &mut buttons, &channel, 0), 2);
    task.tick(0);

    let s = task.state();
    assert!(s.emergency_active);
    assert!(!s.cycle_running);
    assert_eq!(task.sink().display.last(), Some(("Refus: urgence", "BTN_DEPART")));
}

#[test]
fn door_buttons_map_one_to_one() {
    let channel = RequestChannel::new();
    let mut task = rig(&channel);
    let mut input = InputDispatcher::new(DEBOUNCE_MS);
    let mut buttons = MockButtons::new();

    buttons.press(ButtonLine::ContaminatedOpen);
    poll(&mut input, &mut buttons, &channel, 0);
    task.tick(0);
    assert!(task.state().contaminated_door_open);

    buttons.press(ButtonLine::ContaminatedClose);
    poll(&mut input, &mut buttons, &channel, 100);
    task.tick(100);
    assert!(!task.state().contaminated_door_open);
    assert_eq!(
        task.sink().status.on(Topic::ContaminatedDoor),
        vec!["true", "false"]
    );
}
