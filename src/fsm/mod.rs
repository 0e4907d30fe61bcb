//! Decontamination cycle: step identities and the fixed step table.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  STEP_TABLE                                                      │
//! │  ┌────────────────────┬───┬──────────────────┬──────────┐        │
//! │  │ Step               │ # │ display label    │ duration │        │
//! │  ├────────────────────┼───┼──────────────────┼──────────┤        │
//! │  │ ExtractAir         │ 1 │ Extraction air   │    3 s   │        │
//! │  │ StopAir            │ 2 │ Arret air        │    2 s   │        │
//! │  │ InjectProduct      │ 3 │ Injection produit│    2 s   │        │
//! │  │ SterilizationPause │ 4 │ Sterilisation    │   20 s   │        │
//! │  │ ExtractProduct     │ 5 │ Extract. produit │    3 s   │        │
//! │  │ RenewAir           │ 6 │ Renouvel. air    │    3 s   │        │
//! │  │ AuthorizeSterile   │ 7 │ Autorisation OK  │    2 s   │        │
//! │  └────────────────────┴───┴──────────────────┴──────────┘        │
//! │  Done: completion message held 2 s, then back to Idle            │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The schedule is fixed firmware behaviour, not configuration.  The
//! [`sequencer`] walks it; the [`context::SystemState`] records where the
//! cycle currently is.

pub mod context;
pub mod sequencer;

// ---------------------------------------------------------------------------
// Step identity
// ---------------------------------------------------------------------------

/// Every position the decontamination cycle can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Step {
    #[default]
    Idle = 0,
    ExtractAir = 1,
    StopAir = 2,
    InjectProduct = 3,
    SterilizationPause = 4,
    ExtractProduct = 5,
    RenewAir = 6,
    AuthorizeSterile = 7,
    Done = 8,
}

impl Step {
    /// Total number of steps, including `Idle` and `Done`.
    pub const COUNT: usize = 9;

    /// Number of timed steps shown to the operator as "Etape i/7".
    pub const TIMED_STEPS: u8 = 7;

    /// Convert an index back to `Step`.  Out-of-range falls back to `Idle`.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Idle,
            1 => Self::ExtractAir,
            2 => Self::StopAir,
            3 => Self::InjectProduct,
            4 => Self::SterilizationPause,
            5 => Self::ExtractProduct,
            6 => Self::RenewAir,
            7 => Self::AuthorizeSterile,
            8 => Self::Done,
            _ => {
                debug_assert!(false, "invalid step index: {idx}");
                Self::Idle
            }
        }
    }

    /// The step that follows this one in the cycle.  `Done` and `Idle`
    /// both lead back to `Idle`.
    pub fn next(self) -> Self {
        match self {
            Self::Done | Self::Idle => Self::Idle,
            other => Self::from_index(other as usize + 1),
        }
    }

    /// True for the seven numbered, timed steps.
    pub fn is_timed(self) -> bool {
        !matches!(self, Self::Idle | Self::Done)
    }

    /// Table row for this step.
    pub fn descriptor(self) -> &'static StepDescriptor {
        &STEP_TABLE[self as usize]
    }
}

// ---------------------------------------------------------------------------
// Step descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single cycle step.
#[derive(Debug)]
pub struct StepDescriptor {
    pub id: Step,
    /// Short label for the second display line.
    pub display: &'static str,
    /// Label published on `cycle/etape`.
    pub status: &'static str,
    /// Time spent in the step before advancing.
    pub duration_secs: u32,
}

impl StepDescriptor {
    pub fn duration_ms(&self) -> u64 {
        u64::from(self.duration_secs) * 1000
    }
}

/// How long the completion message stays up before "Pret" is shown.
pub const DONE_HOLD_SECS: u32 = 2;

/// Fixed decontamination schedule, indexed by `Step as usize`.
pub static STEP_TABLE: [StepDescriptor; Step::COUNT] = [
    StepDescriptor {
        id: Step::Idle,
        display: "Attente...",
        status: "Systeme pret",
        duration_secs: 0,
    },
    StepDescriptor {
        id: Step::ExtractAir,
        display: "Extraction air",
        status: "1: Extraction air",
        duration_secs: 3,
    },
    StepDescriptor {
        id: Step::StopAir,
        display: "Arret air",
        status: "2: Arret air",
        duration_secs: 2,
    },
    StepDescriptor {
        id: Step::InjectProduct,
        display: "Injection produit",
        status: "3: Injection produit",
        duration_secs: 2,
    },
    StepDescriptor {
        id: Step::SterilizationPause,
        display: "Sterilisation",
        status: "4: Pause sterilisation 20s",
        duration_secs: 20,
    },
    StepDescriptor {
        id: Step::ExtractProduct,
        display: "Extract. produit",
        status: "5: Extraction produit",
        duration_secs: 3,
    },
    StepDescriptor {
        id: Step::RenewAir,
        display: "Renouvel. air",
        status: "6: Renouvellement air",
        duration_secs: 3,
    },
    StepDescriptor {
        id: Step::AuthorizeSterile,
        display: "Autorisation OK",
        status: "7: Autorisation porte sterile",
        duration_secs: 2,
    },
    StepDescriptor {
        id: Step::Done,
        display: "Ouvrir sterile",
        status: "8: Termine",
        duration_secs: DONE_HOLD_SECS,
    },
];
