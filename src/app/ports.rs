//! Port traits: the hexagonal boundary between the controller and the
//! outside world.
//!
//! ```text
//!   ButtonPort ──▶ InputDispatcher ──▶ ┌────────────┐ ──▶ NotificationSink
//!                                      │ Controller │       ├─ StatusPort
//!   MQTT rx ────▶ CommandRouter ─────▶ └────────────┘       └─ DisplayPort
//! ```
//!
//! Adapters (GPIO buttons, MQTT client, LCD) implement these traits.  The
//! core consumes them via generics and never touches hardware directly.

use super::events::{Notification, Topic};

// ───────────────────────────────────────────────────────────────
// Button port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// The six physical input lines on the pass-box panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ButtonLine {
    /// Cycle start / stop (toggle).
    CycleToggle = 0,
    /// Emergency stop on / off (toggle).
    Emergency = 1,
    SterileOpen = 2,
    SterileClose = 3,
    ContaminatedOpen = 4,
    ContaminatedClose = 5,
}

impl ButtonLine {
    pub const COUNT: usize = 6;

    /// Poll order.  Emergency first so it wins when pressed together with
    /// anything else.
    pub const ALL: [ButtonLine; Self::COUNT] = [
        ButtonLine::Emergency,
        ButtonLine::CycleToggle,
        ButtonLine::SterileOpen,
        ButtonLine::SterileClose,
        ButtonLine::ContaminatedOpen,
        ButtonLine::ContaminatedClose,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::CycleToggle => "BTN_DEPART",
            Self::Emergency => "BTN_ARRET",
            Self::SterileOpen => "BTN_STERILE_OUVERT",
            Self::SterileClose => "BTN_STERILE_FERME",
            Self::ContaminatedOpen => "BTN_CONTAMINEE_OUVERT",
            Self::ContaminatedClose => "BTN_CONTAMINEE_FERME",
        }
    }
}

/// Read-side port: the input dispatcher polls it every base interval.
pub trait ButtonPort {
    /// Whether `line` is currently asserted (pressed).
    fn is_asserted(&mut self, line: ButtonLine) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Notification ports (driven adapters: domain → messaging / display)
// ───────────────────────────────────────────────────────────────

/// Status channel publisher (MQTT in production).
pub trait StatusPort {
    fn publish(&mut self, topic: Topic, payload: &str);
}

/// Two-line character display.  Each call fully replaces prior content;
/// the core never waits for an acknowledgement.
pub trait DisplayPort {
    fn show(&mut self, line1: &str, line2: &str);
}

/// Receives every notification produced by the controller.
pub trait NotificationSink {
    fn emit(&mut self, notification: &Notification);
}

/// Routes notifications to a status publisher and a display.
pub struct Notifier<S, D> {
    pub status: S,
    pub display: D,
}

impl<S: StatusPort, D: DisplayPort> Notifier<S, D> {
    pub fn new(status: S, display: D) -> Self {
        Self { status, display }
    }
}

impl<S: StatusPort, D: DisplayPort> NotificationSink for Notifier<S, D> {
    fn emit(&mut self, notification: &Notification) {
        match notification {
            Notification::Status { topic, payload } => self.status.publish(*topic, payload),
            Notification::Display { line1, line2 } => self.display.show(line1, line2),
        }
    }
}
