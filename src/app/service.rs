//! Controller: the single owner of [`SystemState`].
//!
//! Every request from the buttons, the remote channel and the cycle
//! sequencer goes through [`Controller::apply`], which decides (via the
//! [`interlock`](crate::interlock) policy) and mutates in one call.  The
//! controller lives on exactly one task, so requests are applied strictly
//! one after another and no two of them ever see the same snapshot.
//!
//! ```text
//!  Request ──▶ ┌──────────────────────────────┐ ──▶ Outcome
//!              │ Controller                   │      ├─ status
//!              │  interlock · SystemState     │      └─ notifications
//!              └──────────────────────────────┘
//! ```
//!
//! Notifications are returned, not emitted: the caller forwards them once
//! `apply` has committed the new state.

use log::{info, warn};

use crate::fsm::context::SystemState;
use crate::fsm::{STEP_TABLE, Step};
use crate::interlock::{self, Decision, DenyReason};

use super::commands::{
    Command, CommandKind, Request, SequencerAction, SequencerRequest, Source, Toggle,
};
use super::events::{Notification, Topic};

/// Upper bound on notifications produced by a single request
/// (`Announce` shows the link frame and publishes every topic).
pub const MAX_NOTIFICATIONS: usize = 8;

pub type Notifications = heapless::Vec<Notification, MAX_NOTIFICATIONS>;

/// What happened to the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyStatus {
    /// State changed (or an announcement was made).
    Applied,
    /// Nothing to do: idempotent repeat, stale sequencer request, etc.
    Unchanged,
    /// Refused by the interlock policy; state untouched.
    Denied(DenyReason),
}

/// Result of one [`Controller::apply`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub status: ApplyStatus,
    pub notifications: Notifications,
}

impl Outcome {
    fn new(status: ApplyStatus) -> Self {
        Self {
            status,
            notifications: Notifications::new(),
        }
    }

    fn unchanged() -> Self {
        Self::new(ApplyStatus::Unchanged)
    }

    fn push(&mut self, n: Notification) {
        if self.notifications.push(n).is_err() {
            warn!("Controller: notification dropped (outcome full)");
        }
    }

    fn display(&mut self, line1: &str, line2: &str) {
        self.push(Notification::display(line1, line2));
    }

    fn status(&mut self, topic: Topic, payload: &str) {
        self.push(Notification::status(topic, payload));
    }

    fn flag(&mut self, topic: Topic, value: bool) {
        self.push(Notification::flag(topic, value));
    }
}

// ───────────────────────────────────────────────────────────────
// Controller
// ───────────────────────────────────────────────────────────────

/// Owns the pass-box state and serialises every change to it.
pub struct Controller {
    state: SystemState,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller {
    /// Boot state: idle, doors assumed closed, no emergency.
    pub fn new() -> Self {
        Self {
            state: SystemState::default(),
        }
    }

    /// Copy of the current state.
    pub fn state(&self) -> SystemState {
        self.state
    }

    /// Apply one request to completion.
    pub fn apply(&mut self, request: Request) -> Outcome {
        let outcome = match request {
            Request::Command(cmd) => self.apply_command(cmd),
            Request::Toggle { toggle, source } => {
                let kind = self.resolve_toggle(toggle);
                self.apply_command(Command::new(kind, source))
            }
            Request::Sequencer(req) => self.apply_sequencer(req),
            Request::Announce => self.announce(),
        };

        debug_assert!(
            self.state.check_invariants().is_ok(),
            "invariant broken after {:?}: {:?}",
            request,
            self.state
        );
        outcome
    }

    // ── Commands ──────────────────────────────────────────────

    /// Pick the side of a toggle from the owned state, inside the same
    /// `apply` that executes it.
    fn resolve_toggle(&self, toggle: Toggle) -> CommandKind {
        match toggle {
            Toggle::Cycle if self.state.cycle_running => CommandKind::StopCycle,
            Toggle::Cycle => CommandKind::StartCycle,
            Toggle::Emergency if self.state.emergency_active => CommandKind::DeactivateEmergency,
            Toggle::Emergency => CommandKind::ActivateEmergency,
        }
    }

    fn apply_command(&mut self, cmd: Command) -> Outcome {
        match cmd.kind {
            CommandKind::StartCycle => self.start_cycle(cmd.source),
            CommandKind::StopCycle => self.stop_cycle(cmd.source),
            CommandKind::ActivateEmergency => self.activate_emergency(cmd.source),
            CommandKind::DeactivateEmergency => self.deactivate_emergency(),
            CommandKind::OpenSterileDoor => self.open_sterile_door(),
            CommandKind::CloseSterileDoor => self.close_sterile_door(),
            CommandKind::OpenContaminatedDoor => self.open_contaminated_door(),
            CommandKind::CloseContaminatedDoor => self.close_contaminated_door(),
        }
    }

    fn start_cycle(&mut self, source: Source) -> Outcome {
        match interlock::can_start_cycle(&self.state) {
            Decision::Allow => {}
            Decision::Deny(DenyReason::AlreadyRunning) => {
                warn!("Cycle already running (request from {})", source.label());
                return Outcome::unchanged();
            }
            Decision::Deny(reason) => {
                warn!("Cycle start refused ({}) from {}", reason, source.label());
                let mut out = Outcome::new(ApplyStatus::Denied(reason));
                match reason {
                    DenyReason::EmergencyActive => out.display("Refus: urgence", source.label()),
                    _ => {
                        out.display("ERREUR PORTES", reason.display_label());
                        out.status(Topic::CycleStep, reason.status_label());
                    }
                }
                return out;
            }
        }

        self.state.cycle_running = true;
        self.state.current_step = Step::ExtractAir;
        self.state.sterile_access_authorized = false;
        self.state.cycle_generation = self.state.cycle_generation.wrapping_add(1);
        info!(
            "=== CYCLE STARTED from {} (run #{}) ===",
            source.label(),
            self.state.cycle_generation
        );

        let mut out = Outcome::new(ApplyStatus::Applied);
        out.display("Cycle DEMARRE", source.label());
        out.flag(Topic::CycleRunning, true);
        out.status(Topic::CycleStep, "0: Demarrage");
        out
    }

    fn stop_cycle(&mut self, source: Source) -> Outcome {
        if !self.state.cycle_running {
            return Outcome::unchanged();
        }
        self.state.cycle_running = false;
        self.state.current_step = Step::Idle;
        self.state.sterile_access_authorized = false;
        warn!("Cycle stopped from {}", source.label());

        let mut out = Outcome::new(ApplyStatus::Applied);
        out.display("Cycle STOP", source.label());
        out.flag(Topic::CycleRunning, false);
        out.status(Topic::CycleStep, "Arrete");
        out
    }

    fn activate_emergency(&mut self, source: Source) -> Outcome {
        if self.state.emergency_active {
            return Outcome::unchanged();
        }
        self.state.emergency_active = true;
        self.state.cycle_running = false;
        self.state.current_step = Step::Idle;
        self.state.sterile_access_authorized = false;
        warn!("EMERGENCY activated from {}", source.label());

        let mut out = Outcome::new(ApplyStatus::Applied);
        out.display("ARRET URGENCE", source.label());
        out.flag(Topic::Emergency, true);
        out.flag(Topic::CycleRunning, false);
        out.status(Topic::CycleStep, "URGENCE");
        out
    }

    fn deactivate_emergency(&mut self) -> Outcome {
        if !self.state.emergency_active {
            return Outcome::unchanged();
        }
        self.state.emergency_active = false;
        info!("Emergency cleared");

        let mut out = Outcome::new(ApplyStatus::Applied);
        out.display("Urgence OFF", "Etat normal");
        out.flag(Topic::Emergency, false);
        out
    }

    fn open_sterile_door(&mut self) -> Outcome {
        if let Decision::Deny(reason) = interlock::can_open_sterile_door(&self.state) {
            return Self::door_denied("REFUS STERILE", reason);
        }
        self.state.sterile_door_open = true;
        // Authorisation is single-use.
        self.state.sterile_access_authorized = false;
        info!("Sterile door opened");
        Self::door_moved(Topic::SterileDoor, "Porte sterile", true)
    }

    fn close_sterile_door(&mut self) -> Outcome {
        self.state.sterile_door_open = false;
        info!("Sterile door closed");
        Self::door_moved(Topic::SterileDoor, "Porte sterile", false)
    }

    fn open_contaminated_door(&mut self) -> Outcome {
        if let Decision::Deny(reason) = interlock::can_open_contaminated_door(&self.state) {
            return Self::door_denied("REFUS CONTAM.", reason);
        }
        self.state.contaminated_door_open = true;
        info!("Contaminated door opened");
        Self::door_moved(Topic::ContaminatedDoor, "Porte contam.", true)
    }

    fn close_contaminated_door(&mut self) -> Outcome {
        self.state.contaminated_door_open = false;
        info!("Contaminated door closed");
        Self::door_moved(Topic::ContaminatedDoor, "Porte contam.", false)
    }

    fn door_denied(title: &str, reason: DenyReason) -> Outcome {
        warn!("INTERLOCK: {} ({})", title, reason);
        let mut out = Outcome::new(ApplyStatus::Denied(reason));
        out.display(title, reason.display_label());
        out.status(Topic::CycleStep, reason.status_label());
        out
    }

    fn door_moved(topic: Topic, title: &str, open: bool) -> Outcome {
        let mut out = Outcome::new(ApplyStatus::Applied);
        out.flag(topic, open);
        out.display(title, if open { "OUVERTE" } else { "FERMEE" });
        out
    }

    // ── Sequencer requests ────────────────────────────────────

    fn apply_sequencer(&mut self, req: SequencerRequest) -> Outcome {
        // The ready message belongs to a finished cycle: it only needs the
        // box to still be idle.
        if req.action == SequencerAction::ShowReady {
            if self.state.cycle_running
                || self.state.emergency_active
                || req.generation != self.state.cycle_generation
            {
                return Outcome::unchanged();
            }
            let mut out = Outcome::new(ApplyStatus::Applied);
            out.display("Pret", "Attente...");
            return out;
        }

        if !self.state.cycle_active()
            || req.generation != self.state.cycle_generation
            || req.step != self.state.current_step
        {
            info!("Sequencer: stale {:?} ignored", req.action);
            return Outcome::unchanged();
        }

        let descriptor = req.step.descriptor();
        match req.action {
            SequencerAction::StepStarted => {
                info!("--- Step {}: {} ---", req.step as u8, descriptor.display);
                let mut out = Outcome::new(ApplyStatus::Applied);
                out.display(&step_title(req.step), descriptor.display);
                out.status(Topic::CycleStep, descriptor.status);
                out
            }
            SequencerAction::Progress { remaining_secs } => {
                let mut line2: heapless::String<16> = heapless::String::new();
                let _ = core::fmt::write(&mut line2, format_args!("Steril: {}s", remaining_secs));
                let mut out = Outcome::new(ApplyStatus::Applied);
                out.display(&step_title(req.step), &line2);
                out
            }
            SequencerAction::AdvanceStep => {
                self.state.current_step = req.step.next();
                Outcome::new(ApplyStatus::Applied)
            }
            SequencerAction::GrantSterileAccess => {
                if req.step != Step::AuthorizeSterile || self.state.sterile_access_authorized {
                    return Outcome::unchanged();
                }
                self.state.sterile_access_authorized = true;
                info!("Sterile access authorized");
                Outcome::new(ApplyStatus::Applied)
            }
            SequencerAction::CompleteCycle => {
                if req.step != Step::Done {
                    return Outcome::unchanged();
                }
                self.state.cycle_running = false;
                self.state.current_step = Step::Idle;
                info!("=== CYCLE COMPLETE ===");

                let mut out = Outcome::new(ApplyStatus::Applied);
                out.display("CYCLE TERMINE", descriptor.display);
                out.status(Topic::CycleStep, descriptor.status);
                out.flag(Topic::CycleRunning, false);
                out
            }
            SequencerAction::ShowReady => Outcome::unchanged(),
        }
    }

    // ── Announce ──────────────────────────────────────────────

    /// Broker (re)connected: show the link frame and publish every status
    /// topic from the owned state.  The step topic reads "Systeme pret"
    /// whenever the box is idle.
    fn announce(&self) -> Outcome {
        let s = &self.state;
        let mut out = Outcome::new(ApplyStatus::Applied);
        out.display("MQTT OK", "Subscribe...");
        out.flag(Topic::SterileDoor, s.sterile_door_open);
        out.flag(Topic::ContaminatedDoor, s.contaminated_door_open);
        out.flag(Topic::Emergency, s.emergency_active);
        out.flag(Topic::CycleRunning, s.cycle_running);
        let step_label = if s.emergency_active {
            "URGENCE"
        } else {
            STEP_TABLE[s.current_step as usize].status
        };
        out.status(Topic::CycleStep, step_label);
        out
    }
}

/// "Etape i/7" header for the numbered steps.
fn step_title(step: Step) -> heapless::String<16> {
    let mut title = heapless::String::new();
    let _ = core::fmt::write(
        &mut title,
        format_args!("Etape {}/{}", step as u8, Step::TIMED_STEPS),
    );
    title
}
