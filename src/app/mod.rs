//! Application core: pure domain logic, zero I/O.
//!
//! This module holds the rules of the pass-box: request vocabulary, the
//! controller that owns the state, button and remote decoding, and the
//! control task that serialises everything.  All interaction with hardware
//! and the network happens through **port traits** defined in [`ports`],
//! keeping this layer fully testable without real peripherals.

pub mod commands;
pub mod events;
pub mod input;
pub mod ports;
pub mod router;
pub mod runtime;
pub mod service;
