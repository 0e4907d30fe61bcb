//! PassBox firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod channels;
pub mod config;
pub mod error;
pub mod fsm;
pub mod interlock;
pub mod pins;

// Adapters and drivers compile on the host too; the hardware-facing parts
// are guarded by cfg attributes inside.
pub mod adapters;
pub mod drivers;
