//! Cycle sequencer: walks the step table without ever blocking.
//!
//! The sequencer is re-evaluated on every control tick with a copy of the
//! controller's state and the current monotonic time.  It never mutates
//! state itself: it returns [`SequencerRequest`]s, each stamped with the
//! `(generation, step)` it was computed for, and the controller applies
//! them (or drops them as stale).
//!
//! ```text
//!   tick(state, now)
//!     │
//!     ├─ !running || emergency ──▶ forget active step   (parked)
//!     ├─ new (generation, step) ─▶ StepStarted [+ Grant | + Progress 20]
//!     ├─ Sterilisation, 1 s up ──▶ Progress n
//!     ├─ now >= deadline ────────▶ AdvanceStep
//!     └─ Done ───────────────────▶ CompleteCycle, arm 2 s hold ──▶ ShowReady
//! ```
//!
//! A stop or emergency therefore interrupts within one tick, and a partial
//! wait is never resumed: the next run starts a fresh generation.

use log::info;

use super::context::SystemState;
use super::{DONE_HOLD_SECS, Step};
use crate::app::commands::{SequencerAction, SequencerRequest};

/// Most requests one tick can produce (step start + grant/progress).
pub const MAX_REQUESTS_PER_TICK: usize = 4;

pub type SequencerRequests = heapless::Vec<SequencerRequest, MAX_REQUESTS_PER_TICK>;

const PROGRESS_PERIOD_MS: u64 = 1000;

/// The step currently being timed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ActiveStep {
    generation: u32,
    step: Step,
    deadline_ms: u64,
    /// Next time a sterilisation countdown update is due.
    next_progress_ms: u64,
    advance_requested: bool,
}

/// Completion hold before the ready message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ReadyHold {
    generation: u32,
    due_ms: u64,
}

/// Non-blocking timer state for the decontamination cycle.
#[derive(Debug, Default)]
pub struct CycleSequencer {
    active: Option<ActiveStep>,
    ready_hold: Option<ReadyHold>,
}

impl CycleSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a step is being timed.
    pub fn is_timing(&self) -> bool {
        self.active.is_some()
    }

    /// Deadline of the step being timed, if any.
    pub fn deadline_ms(&self) -> Option<u64> {
        self.active.map(|a| a.deadline_ms)
    }

    /// Evaluate the cycle against `state` at time `now_ms`.
    pub fn tick(&mut self, state: &SystemState, now_ms: u64) -> SequencerRequests {
        let mut out = SequencerRequests::new();

        if state.emergency_active || state.cycle_running {
            self.ready_hold = None;
        }

        if !state.cycle_active() {
            if let Some(active) = self.active.take() {
                if active.step != Step::Done {
                    info!("Sequencer: step {:?} abandoned", active.step);
                }
            }
            self.poll_ready_hold(now_ms, &mut out);
            return out;
        }

        let key = (state.cycle_generation, state.current_step);
        match self.active {
            Some(active) if (active.generation, active.step) == key => {
                self.continue_step(now_ms, &mut out);
            }
            _ => self.enter_step(state, now_ms, &mut out),
        }
        out
    }

    fn enter_step(&mut self, state: &SystemState, now_ms: u64, out: &mut SequencerRequests) {
        let step = state.current_step;
        let generation = state.cycle_generation;
        let request = |action| SequencerRequest {
            generation,
            step,
            action,
        };

        if step == Step::Done {
            push(out, request(SequencerAction::CompleteCycle));
            self.ready_hold = Some(ReadyHold {
                generation,
                due_ms: now_ms + u64::from(DONE_HOLD_SECS) * 1000,
            });
            self.active = Some(ActiveStep {
                generation,
                step,
                deadline_ms: now_ms,
                next_progress_ms: u64::MAX,
                advance_requested: true,
            });
            return;
        }

        if !step.is_timed() {
            // Running with no step is not reachable through the controller.
            self.active = None;
            return;
        }

        let deadline_ms = now_ms + step.descriptor().duration_ms();
        push(out, request(SequencerAction::StepStarted));

        let mut next_progress_ms = u64::MAX;
        match step {
            Step::AuthorizeSterile => push(out, request(SequencerAction::GrantSterileAccess)),
            Step::SterilizationPause => {
                push(
                    out,
                    request(SequencerAction::Progress {
                        remaining_secs: remaining_secs(deadline_ms, now_ms),
                    }),
                );
                next_progress_ms = now_ms + PROGRESS_PERIOD_MS;
            }
            _ => {}
        }

        self.active = Some(ActiveStep {
            generation,
            step,
            deadline_ms,
            next_progress_ms,
            advance_requested: false,
        });
    }

    fn continue_step(&mut self, now_ms: u64, out: &mut SequencerRequests) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        let (generation, step) = (active.generation, active.step);
        let request = |action| SequencerRequest {
            generation,
            step,
            action,
        };

        if now_ms >= active.deadline_ms {
            if !active.advance_requested {
                active.advance_requested = true;
                push(out, request(SequencerAction::AdvanceStep));
            }
            return;
        }

        if now_ms >= active.next_progress_ms {
            let remaining = remaining_secs(active.deadline_ms, now_ms);
            // Align the next update on the following whole second before the deadline.
            active.next_progress_ms =
                active.deadline_ms - (u64::from(remaining) - 1) * PROGRESS_PERIOD_MS;
            push(
                out,
                request(SequencerAction::Progress {
                    remaining_secs: remaining,
                }),
            );
        }
    }

    fn poll_ready_hold(&mut self, now_ms: u64, out: &mut SequencerRequests) {
        if let Some(hold) = self.ready_hold {
            if now_ms >= hold.due_ms {
                self.ready_hold = None;
                push(
                    out,
                    SequencerRequest {
                        generation: hold.generation,
                        step: Step::Idle,
                        action: SequencerAction::ShowReady,
                    },
                );
            }
        }
    }
}

/// Whole seconds left before `deadline_ms`, rounded up.  At least 1 while
/// the deadline is in the future.
fn remaining_secs(deadline_ms: u64, now_ms: u64) -> u8 {
    let left = deadline_ms.saturating_sub(now_ms);
    u8::try_from(left.div_ceil(PROGRESS_PERIOD_MS)).unwrap_or(u8::MAX)
}

fn push(out: &mut SequencerRequests, req: SequencerRequest) {
    // Capacity covers the largest single-tick burst.
    let _ = out.push(req);
}
