//! Inbound requests to the controller.
//!
//! The input dispatcher (physical buttons), the command router (remote
//! messages) and the cycle sequencer all speak this vocabulary.  Each
//! value is consumed exactly once by
//! [`Controller::apply`](super::service::Controller::apply).

use crate::fsm::Step;

use super::ports::ButtonLine;

/// Operator-level actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    StartCycle,
    StopCycle,
    ActivateEmergency,
    DeactivateEmergency,
    OpenSterileDoor,
    CloseSterileDoor,
    OpenContaminatedDoor,
    CloseContaminatedDoor,
}

/// Where a command came from, for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Button(ButtonLine),
    Remote,
}

impl Source {
    pub fn label(self) -> &'static str {
        match self {
            Self::Button(line) => line.label(),
            Self::Remote => "MQTT",
        }
    }
}

/// A command together with its origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    pub kind: CommandKind,
    pub source: Source,
}

impl Command {
    pub fn new(kind: CommandKind, source: Source) -> Self {
        Self { kind, source }
    }
}

/// Paired actions sharing one physical button.  The controller picks the
/// side from the state it owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    /// StartCycle when idle, StopCycle when running.
    Cycle,
    /// ActivateEmergency when clear, DeactivateEmergency when active.
    Emergency,
}

/// What the sequencer asks the controller to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerAction {
    /// Announce the step on the display and status channel.
    StepStarted,
    /// Sterilisation countdown update.
    Progress { remaining_secs: u8 },
    /// The step's time is up; move to the next one.
    AdvanceStep,
    /// Step 7 reached: sterile-side access may be granted.
    GrantSterileAccess,
    /// `Done` reached: report completion and return to `Idle`.
    CompleteCycle,
    /// Completion hold elapsed: show the ready message.
    ShowReady,
}

/// A sequencer request, stamped with the cycle generation and step it was
/// computed for.  The controller ignores it if either no longer matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequencerRequest {
    pub generation: u32,
    pub step: Step,
    pub action: SequencerAction,
}

/// Everything the controller accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    Command(Command),
    Toggle { toggle: Toggle, source: Source },
    Sequencer(SequencerRequest),
    /// Publish the complete current status (e.g. after a broker reconnect).
    Announce,
}

impl From<Command> for Request {
    fn from(cmd: Command) -> Self {
        Self::Command(cmd)
    }
}

impl From<SequencerRequest> for Request {
    fn from(req: SequencerRequest) -> Self {
        Self::Sequencer(req)
    }
}
