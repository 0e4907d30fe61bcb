//! Interlock policy.
//!
//! Pure decision functions evaluated by the controller **before** any door
//! or cycle mutation.  They never touch state; the controller applies the
//! decision in the same call, so the check and the mutation are never
//! observed separately.
//!
//! ```text
//!                      emergency  other door  cycle
//!  open sterile          DENY       DENY      DENY unless authorised
//!  open contaminated     DENY       DENY      DENY
//!  start cycle           DENY       DENY      no-op (already running)
//!  close any door        always allowed
//! ```
//!
//! Contaminated-side access is fully blocked for the whole cycle; sterile
//! access opens once step 7 has granted authorisation.

use core::fmt;

use crate::fsm::context::SystemState;

/// Result of an interlock evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

/// Why a request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    EmergencyActive,
    ContaminatedDoorOpen,
    SterileDoorOpen,
    CycleNotAuthorized,
    CycleRunning,
    AlreadyRunning,
    DoorsNotClosed,
}

impl DenyReason {
    /// Text published on `cycle/etape` for this denial.
    pub fn status_label(self) -> &'static str {
        match self {
            Self::EmergencyActive => "Erreur: urgence active",
            Self::ContaminatedDoorOpen | Self::SterileDoorOpen => "Erreur: inter-verrouillage",
            Self::CycleNotAuthorized => "Erreur: cycle non termine",
            Self::CycleRunning => "Erreur: cycle en cours",
            Self::AlreadyRunning => "Erreur: cycle deja en cours",
            Self::DoorsNotClosed => "Erreur: portes ouvertes",
        }
    }

    /// Second display line explaining the denial.
    pub fn display_label(self) -> &'static str {
        match self {
            Self::EmergencyActive => "Urgence active",
            Self::ContaminatedDoorOpen => "Porte contam. ON",
            Self::SterileDoorOpen => "Porte sterile ON",
            Self::CycleNotAuthorized | Self::CycleRunning | Self::AlreadyRunning => {
                "Cycle en cours"
            }
            Self::DoorsNotClosed => "Fermer les 2",
        }
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmergencyActive => write!(f, "emergency active"),
            Self::ContaminatedDoorOpen => write!(f, "contaminated door open"),
            Self::SterileDoorOpen => write!(f, "sterile door open"),
            Self::CycleNotAuthorized => write!(f, "cycle not yet authorized"),
            Self::CycleRunning => write!(f, "cycle running"),
            Self::AlreadyRunning => write!(f, "cycle already running"),
            Self::DoorsNotClosed => write!(f, "doors not closed"),
        }
    }
}

/// May the sterile-side door open?
pub fn can_open_sterile_door(state: &SystemState) -> Decision {
    if state.emergency_active {
        return Decision::Deny(DenyReason::EmergencyActive);
    }
    if state.contaminated_door_open {
        return Decision::Deny(DenyReason::ContaminatedDoorOpen);
    }
    if state.cycle_running && !state.sterile_access_authorized {
        return Decision::Deny(DenyReason::CycleNotAuthorized);
    }
    Decision::Allow
}

/// May the contaminated-side door open?
pub fn can_open_contaminated_door(state: &SystemState) -> Decision {
    if state.emergency_active {
        return Decision::Deny(DenyReason::EmergencyActive);
    }
    if state.sterile_door_open {
        return Decision::Deny(DenyReason::SterileDoorOpen);
    }
    if state.cycle_running {
        return Decision::Deny(DenyReason::CycleRunning);
    }
    Decision::Allow
}

/// May a decontamination cycle start?
pub fn can_start_cycle(state: &SystemState) -> Decision {
    if state.emergency_active {
        return Decision::Deny(DenyReason::EmergencyActive);
    }
    if state.cycle_running {
        return Decision::Deny(DenyReason::AlreadyRunning);
    }
    if !state.doors_closed() {
        return Decision::Deny(DenyReason::DoorsNotClosed);
    }
    Decision::Allow
}
