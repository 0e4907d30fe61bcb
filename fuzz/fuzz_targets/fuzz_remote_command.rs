//! Fuzz target: `CommandRouter::route`
//!
//! Splits the input at the first NUL into a topic and a payload and checks
//! that decoding never panics and only ever answers on the two command
//! topics with one of the six accepted payload spellings.
//!
//! cargo fuzz run fuzz_remote_command

#![no_main]

use libfuzzer_sys::fuzz_target;
use passbox::app::router::{CommandRouter, TOPIC_CYCLE, TOPIC_EMERGENCY};

const ACCEPTED: [&[u8]; 6] = [b"ON", b"true", b"1", b"OFF", b"false", b"0"];

fuzz_target!(|data: &[u8]| {
    let split = data.iter().position(|&b| b == 0).unwrap_or(data.len());
    let (topic, rest) = data.split_at(split);
    let payload = rest.get(1..).unwrap_or(&[]);

    let Ok(topic) = core::str::from_utf8(topic) else {
        return;
    };
    if CommandRouter::route(topic, payload).is_some() {
        assert!(topic == TOPIC_CYCLE || topic == TOPIC_EMERGENCY);
        assert!(ACCEPTED.contains(&payload));
    }
});
