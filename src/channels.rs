//! Request channel into the control task.
//!
//! A bounded `embassy-sync` MPMC channel carries every [`Request`] from the
//! producers to the single consumer that owns the controller.  The channel
//! is static so the MQTT callback and the input thread can reach it without
//! sharing any handle.
//!
//! ```text
//! ┌──────────────┐ submit      ┌──────────────┐
//! │ Input thread │────────────▶│              │
//! └──────────────┘             │   REQUESTS   │───▶ ControlTask
//! ┌──────────────┐ try_submit  │   (depth 16) │
//! │ MQTT handler │────────────▶│              │
//! └──────────────┘             └──────────────┘
//! ```

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use log::warn;

use crate::app::commands::Request;
use crate::error::CommsError;

/// Pending requests the control task can fall behind by.
pub const REQUEST_DEPTH: usize = 16;

pub type RequestChannel = Channel<CriticalSectionRawMutex, Request, REQUEST_DEPTH>;

/// Producers → control task.
pub static REQUESTS: RequestChannel = Channel::new();

/// Queue a request, waiting for room.  Button presses are never dropped.
pub fn submit(request: Request) {
    futures_lite::future::block_on(REQUESTS.send(request));
}

/// Queue a request without waiting.  Used from the messaging callback,
/// which must not block the client task.
pub fn try_submit(request: Request) -> Result<(), CommsError> {
    try_submit_to(&REQUESTS, request)
}

/// [`try_submit`] against an explicit channel.
pub fn try_submit_to(channel: &RequestChannel, request: Request) -> Result<(), CommsError> {
    channel.try_send(request).map_err(|_| {
        warn!("Request queue full, dropped {:?}", request);
        CommsError::QueueFull
    })
}
