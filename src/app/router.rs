//! Remote command decoding.
//!
//! Maps an inbound `(topic, payload)` message onto the command vocabulary.
//! Unknown topics and unrecognised payloads decode to `None`; the remote
//! channel is lossy and the sender is expected to retry.

use super::commands::{Command, CommandKind, Source};

/// Start / stop the decontamination cycle.
pub const TOPIC_CYCLE: &str = "cmd/cycle/depart";
/// Raise / clear the emergency stop.
pub const TOPIC_EMERGENCY: &str = "cmd/urgence";

/// Topics the messaging adapter subscribes to.
pub const SUBSCRIPTIONS: [&str; 2] = [TOPIC_CYCLE, TOPIC_EMERGENCY];

pub struct CommandRouter;

impl CommandRouter {
    pub fn route(topic: &str, payload: &[u8]) -> Option<Command> {
        let on = match payload {
            b"ON" | b"true" | b"1" => true,
            b"OFF" | b"false" | b"0" => false,
            _ => return None,
        };
        let kind = match (topic, on) {
            (TOPIC_CYCLE, true) => CommandKind::StartCycle,
            (TOPIC_CYCLE, false) => CommandKind::StopCycle,
            (TOPIC_EMERGENCY, true) => CommandKind::ActivateEmergency,
            (TOPIC_EMERGENCY, false) => CommandKind::DeactivateEmergency,
            _ => return None,
        };
        Some(Command::new(kind, Source::Remote))
    }
}
