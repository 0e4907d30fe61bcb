//! The pass-box system state.
//!
//! `SystemState` is the single record of doors, cycle progress, emergency
//! flag and sterile-side authorization.  Exactly one instance exists and it
//! is owned by the [`Controller`](crate::app::service::Controller); every
//! other component sees it only as a copy (`SystemState` is `Copy`) or
//! through a request submitted to the controller.

use super::Step;

/// Snapshot of the whole pass-box.  Doors are assumed closed at boot; the
/// hardware is not re-sensed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SystemState {
    pub sterile_door_open: bool,
    pub contaminated_door_open: bool,
    pub cycle_running: bool,
    pub emergency_active: bool,
    pub sterile_access_authorized: bool,
    pub current_step: Step,
    /// Incremented on every accepted cycle start.  Sequencer requests carry
    /// the generation they were computed for so stale ones can be dropped.
    pub cycle_generation: u32,
}

impl SystemState {
    pub fn doors_closed(&self) -> bool {
        !self.sterile_door_open && !self.contaminated_door_open
    }

    /// True while the sequencer is allowed to make progress.
    pub fn cycle_active(&self) -> bool {
        self.cycle_running && !self.emergency_active
    }

    /// Check every structural invariant; returns the first one broken.
    pub fn check_invariants(&self) -> Result<(), &'static str> {
        if self.sterile_door_open && self.contaminated_door_open {
            return Err("both doors open");
        }
        if self.cycle_running && self.emergency_active {
            return Err("cycle running during emergency");
        }
        if self.emergency_active
            && (self.current_step != Step::Idle || self.sterile_access_authorized)
        {
            return Err("emergency without full reset");
        }
        if self.current_step != Step::Idle && !self.cycle_running {
            return Err("step set while cycle stopped");
        }
        if self.sterile_access_authorized
            && self.cycle_running
            && !matches!(self.current_step, Step::AuthorizeSterile | Step::Done)
        {
            return Err("authorization granted before step 7");
        }
        Ok(())
    }
}
