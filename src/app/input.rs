//! Input dispatcher: turns polled button levels into requests.
//!
//! Polled at the base interval from the input thread.  Each line is
//! edge-triggered: a press produces one request on the released → pressed
//! transition, then the line is held off for `debounce_hold_ms`.  Keeping a
//! button down does not repeat.
//!
//! Toggle lines are forwarded as [`Request::Toggle`]; the controller picks
//! start/stop or on/off from the state it owns.  Door lines map one-to-one
//! onto their command.

use log::info;

use super::commands::{Command, CommandKind, Request, Source, Toggle};
use super::ports::{ButtonLine, ButtonPort};

pub type InputRequests = heapless::Vec<Request, { ButtonLine::COUNT }>;

#[derive(Debug, Clone, Copy, Default)]
struct LineState {
    asserted: bool,
    hold_until_ms: u64,
}

pub struct InputDispatcher {
    debounce_hold_ms: u64,
    lines: [LineState; ButtonLine::COUNT],
}

impl InputDispatcher {
    pub fn new(debounce_hold_ms: u32) -> Self {
        Self {
            debounce_hold_ms: u64::from(debounce_hold_ms),
            lines: [LineState::default(); ButtonLine::COUNT],
        }
    }

    /// Read every line once and return the requests for new presses, in
    /// poll order (emergency first).
    pub fn poll(&mut self, buttons: &mut impl ButtonPort, now_ms: u64) -> InputRequests {
        let mut out = InputRequests::new();
        for line in ButtonLine::ALL {
            let asserted = buttons.is_asserted(line);
            let slot = &mut self.lines[line as usize];
            let rising = asserted && !slot.asserted;
            slot.asserted = asserted;

            if !rising || now_ms < slot.hold_until_ms {
                continue;
            }
            slot.hold_until_ms = now_ms + self.debounce_hold_ms;
            info!("Button {} pressed", line.label());
            // One entry per line, never exceeds capacity.
            let _ = out.push(request_for(line));
        }
        out
    }
}

fn request_for(line: ButtonLine) -> Request {
    let source = Source::Button(line);
    let kind = match line {
        ButtonLine::CycleToggle => {
            return Request::Toggle {
                toggle: Toggle::Cycle,
                source,
            };
        }
        ButtonLine::Emergency => {
            return Request::Toggle {
                toggle: Toggle::Emergency,
                source,
            };
        }
        ButtonLine::SterileOpen => CommandKind::OpenSterileDoor,
        ButtonLine::SterileClose => CommandKind::CloseSterileDoor,
        ButtonLine::ContaminatedOpen => CommandKind::OpenContaminatedDoor,
        ButtonLine::ContaminatedClose => CommandKind::CloseContaminatedDoor,
    };
    Request::Command(Command::new(kind, source))
}
