//! Control task: the single consumer that owns the controller.
//!
//! ```text
//!            REQUESTS ──try_receive──┐
//!                                    ▼
//!  tick(now) ──▶ Controller::apply ◀── CycleSequencer::tick(state, now)
//!                       │
//!                       ▼
//!               NotificationSink::emit
//! ```
//!
//! One `tick` drains everything queued, then lets the sequencer catch up
//! with the resulting state.  Sequencer requests go through the same
//! `apply` as everything else, so no request ever sees a half-applied
//! change.

use crate::channels::RequestChannel;
use crate::fsm::Step;
use crate::fsm::context::SystemState;
use crate::fsm::sequencer::CycleSequencer;

use super::commands::Request;
use super::ports::NotificationSink;
use super::service::{Controller, Outcome};

/// Upper bound on sequencer passes per tick.  A pass that advances a step
/// is followed by one that starts the next, so a full walk needs two per
/// step; anything beyond that is a bug, not progress.
const MAX_SEQUENCER_PASSES: usize = 2 * Step::COUNT;

pub struct ControlTask<'a, N> {
    controller: Controller,
    sequencer: CycleSequencer,
    requests: &'a RequestChannel,
    sink: N,
}

impl<'a, N: NotificationSink> ControlTask<'a, N> {
    pub fn new(requests: &'a RequestChannel, sink: N) -> Self {
        Self {
            controller: Controller::new(),
            sequencer: CycleSequencer::new(),
            requests,
            sink,
        }
    }

    pub fn state(&self) -> SystemState {
        self.controller.state()
    }

    pub fn sink(&self) -> &N {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut N {
        &mut self.sink
    }

    /// Apply one request immediately, bypassing the channel.
    pub fn apply(&mut self, request: Request) -> Outcome {
        let outcome = self.controller.apply(request);
        for n in &outcome.notifications {
            self.sink.emit(n);
        }
        outcome
    }

    /// Run one control cycle at monotonic time `now_ms`.  Returns the
    /// number of requests applied (queued and sequencer).
    pub fn tick(&mut self, now_ms: u64) -> usize {
        let mut applied = 0;

        while let Ok(request) = self.requests.try_receive() {
            self.apply(request);
            applied += 1;
        }

        for _ in 0..MAX_SEQUENCER_PASSES {
            let state = self.controller.state();
            let batch = self.sequencer.tick(&state, now_ms);
            if batch.is_empty() {
                break;
            }
            for req in batch {
                self.apply(Request::Sequencer(req));
                applied += 1;
            }
        }

        applied
    }
}
