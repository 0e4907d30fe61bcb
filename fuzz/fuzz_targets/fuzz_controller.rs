//! Fuzz target: `ControlTask` driven by arbitrary request bytes.
//!
//! Each input byte selects either a request (low nibble) or a clock
//! advance (high bit set, 100 ms per unit of the low seven bits).  After
//! every step the state must satisfy all structural invariants.
//!
//! cargo fuzz run fuzz_controller

#![no_main]

use libfuzzer_sys::fuzz_target;
use passbox::app::commands::{Command, CommandKind, Request, Source, Toggle};
use passbox::app::events::Notification;
use passbox::app::ports::{ButtonLine, NotificationSink};
use passbox::app::runtime::ControlTask;
use passbox::channels::RequestChannel;

struct Discard;

impl NotificationSink for Discard {
    fn emit(&mut self, _: &Notification) {}
}

fn request(byte: u8) -> Request {
    let kind = match byte & 0x0F {
        0 => CommandKind::StartCycle,
        1 => CommandKind::StopCycle,
        2 => CommandKind::ActivateEmergency,
        3 => CommandKind::DeactivateEmergency,
        4 => CommandKind::OpenSterileDoor,
        5 => CommandKind::CloseSterileDoor,
        6 => CommandKind::OpenContaminatedDoor,
        7 => CommandKind::CloseContaminatedDoor,
        8 => {
            return Request::Toggle {
                toggle: Toggle::Cycle,
                source: Source::Button(ButtonLine::CycleToggle),
            }
        }
        9 => {
            return Request::Toggle {
                toggle: Toggle::Emergency,
                source: Source::Button(ButtonLine::Emergency),
            }
        }
        _ => return Request::Announce,
    };
    Request::Command(Command::new(kind, Source::Remote))
}

fuzz_target!(|data: &[u8]| {
    let channel = RequestChannel::new();
    let mut task = ControlTask::new(&channel, Discard);
    let mut now = 0u64;

    for &byte in data {
        if byte & 0x80 != 0 {
            now += u64::from(byte & 0x7F) * 100;
        } else {
            let _ = channel.try_send(request(byte));
        }
        task.tick(now);
        if let Err(broken) = task.state().check_invariants() {
            panic!("{}: {:?}", broken, task.state());
        }
    }
});
