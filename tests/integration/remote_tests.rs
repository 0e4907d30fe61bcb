//! Remote commands: MQTT payloads → command router → control task.

use passbox::adapters::mqtt;
use passbox::app::commands::Request;
use passbox::app::events::Topic;
use passbox::app::input::InputDispatcher;
use passbox::app::ports::ButtonLine;
use passbox::app::router::{CommandRouter, TOPIC_CYCLE, TOPIC_EMERGENCY};
use passbox::channels::{self, RequestChannel};

use super::mock_hw::{rig, MockButtons};

fn route_into(channel: &RequestChannel, topic: &str, payload: &[u8]) {
    if let Some(cmd) = CommandRouter::route(topic, payload) {
        assert!(channel.try_send(cmd.into()).is_ok());
    }
}

#[test]
fn remote_emergency_matches_the_physical_button() {
    // Remote path, mid-cycle.
    let remote_channel = RequestChannel::new();
    let mut remote = rig(&remote_channel);
    route_into(&remote_channel, TOPIC_CYCLE, b"ON");
    remote.tick(0);
    remote.tick(3_000);
    route_into(&remote_channel, TOPIC_EMERGENCY, b"1");
    remote.tick(3_100);

    // Button path, same timeline.
    let button_channel = RequestChannel::new();
    let mut local = rig(&button_channel);
    let mut input = InputDispatcher::new(400);
    let mut buttons = MockButtons::new();
    route_into(&button_channel, TOPIC_CYCLE, b"ON");
    local.tick(0);
    local.tick(3_000);
    buttons.press(ButtonLine::Emergency);
    for r in input.poll(&mut buttons, 3_100) {
        assert!(button_channel.try_send(r).is_ok());
    }
    local.tick(3_100);

    let (a, b) = (remote.state(), local.state());
    assert_eq!(a, b);
    assert!(a.emergency_active);
    assert_eq!(
        remote.sink().status.published,
        local.sink().status.published
    );
    // Only the reported source differs.
    assert_eq!(remote.sink().display.last(), Some(("ARRET URGENCE", "MQTT")));
    assert_eq!(local.sink().display.last(), Some(("ARRET URGENCE", "BTN_ARRET")));
}

#[test]
fn garbage_payloads_change_nothing() {
    let channel = RequestChannel::new();
    let mut task = rig(&channel);
    for (topic, payload) in [
        (TOPIC_CYCLE, &b"on"[..]),
        (TOPIC_CYCLE, b"start"),
        (TOPIC_EMERGENCY, b"TRUE"),
        ("cmd/porte/sterile", b"1"),
    ] {
        route_into(&channel, topic, payload);
    }
    assert_eq!(task.tick(0), 0);
    assert!(task.sink().status.published.is_empty());
}

/// The only test that touches the global request channel.
#[test]
fn mqtt_callbacks_feed_the_global_channel() {
    let mut task = rig(&channels::REQUESTS);
    while channels::REQUESTS.try_receive().is_ok() {}

    mqtt::on_connected();
    mqtt::on_message(TOPIC_CYCLE, b"true");
    mqtt::on_message(TOPIC_CYCLE, b"maybe");
    assert_eq!(channels::REQUESTS.try_receive(), Ok(Request::Announce));

    task.tick(0);
    assert!(task.state().cycle_running);
    assert_eq!(task.sink().status.last(Topic::CycleRunning), Some("true"));
}
