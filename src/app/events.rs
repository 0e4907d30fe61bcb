//! Outbound notifications.
//!
//! The [`Controller`](super::service::Controller) returns these from every
//! `apply` call; the control task forwards them through the
//! [`NotificationSink`](super::ports::NotificationSink) port once the state
//! change is committed.  Adapters on the other side decide what to do with
//! them: publish over MQTT, draw on the LCD, log to serial.

use core::fmt;

/// Longest status payload (`"7: Autorisation porte sterile"` fits).
pub const PAYLOAD_CAP: usize = 32;

/// Longest display line kept (16x2 LCD, with slack for long labels).
pub const LINE_CAP: usize = 20;

pub type Payload = heapless::String<PAYLOAD_CAP>;
pub type Line = heapless::String<LINE_CAP>;

/// Outbound status channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    CycleRunning,
    CycleStep,
    Emergency,
    SterileDoor,
    ContaminatedDoor,
}

impl Topic {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CycleRunning => "cycle/depart",
            Self::CycleStep => "cycle/etape",
            Self::Emergency => "urgence",
            Self::SterileDoor => "porte/sterile",
            Self::ContaminatedDoor => "porte/contaminee",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One thing observers should see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// A `(topic, payload)` pair for the status channel.
    Status { topic: Topic, payload: Payload },
    /// Two display lines, fully replacing what was shown.
    Display { line1: Line, line2: Line },
}

impl Notification {
    pub fn status(topic: Topic, payload: &str) -> Self {
        Self::Status {
            topic,
            payload: bounded(payload),
        }
    }

    pub fn flag(topic: Topic, value: bool) -> Self {
        Self::status(topic, if value { "true" } else { "false" })
    }

    pub fn display(line1: &str, line2: &str) -> Self {
        Self::Display {
            line1: bounded(line1),
            line2: bounded(line2),
        }
    }
}

/// Copy `s` into a fixed-capacity string, dropping whatever does not fit.
pub fn bounded<const N: usize>(s: &str) -> heapless::String<N> {
    let mut out = heapless::String::new();
    for c in s.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}
