//! Unified error types for the PassBox firmware.
//!
//! Interlock denials and malformed remote payloads are *not* errors: they
//! are ordinary outcomes reported by the controller and the command router.
//! This type only covers infrastructure failures in the adapters around the
//! core (peripheral setup, messaging link, boot configuration).  All
//! variants are `Copy` so they can be logged and returned without
//! allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible adapter operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A communication subsystem failed.
    Comms(CommsError),
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Configuration is invalid or could not be parsed.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Comms(e) => write!(f, "comms: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Communications errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommsError {
    WifiConnectFailed,
    MqttInitFailed,
    MqttSubscribeFailed,
    /// The request channel to the controller is full.
    QueueFull,
}

impl fmt::Display for CommsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WifiConnectFailed => write!(f, "WiFi connect failed"),
            Self::MqttInitFailed => write!(f, "MQTT client init failed"),
            Self::MqttSubscribeFailed => write!(f, "MQTT subscribe failed"),
            Self::QueueFull => write!(f, "request queue full"),
        }
    }
}

impl From<CommsError> for Error {
    fn from(e: CommsError) -> Self {
        Self::Comms(e)
    }
}
