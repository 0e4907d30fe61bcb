//! System configuration parameters
//!
//! Loop timings and messaging-link settings for the PassBox controller.
//! The decontamination schedule itself is fixed (see [`crate::fsm`]) and
//! deliberately absent from this struct.

use serde::{Deserialize, Serialize};

use crate::app::events::bounded as truncated;
use crate::error::Error;

/// Default public broker used by the pass-box dashboard.
const DEFAULT_MQTT_URI: &str = "mqtt://broker.hivemq.com:1883";

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Inputs ---
    /// Button poll interval (milliseconds)
    pub input_poll_interval_ms: u32,
    /// Hold time after an accepted press during which the same line is ignored
    pub debounce_hold_ms: u32,

    // --- Control ---
    /// Control task tick: request drain + sequencer evaluation (milliseconds)
    pub control_tick_ms: u32,

    // --- Messaging ---
    pub mqtt_uri: heapless::String<96>,
    pub mqtt_client_id: heapless::String<32>,
    pub mqtt_keepalive_secs: u16,
    pub mqtt_reconnect_timeout_ms: u32,
    pub mqtt_network_timeout_ms: u32,

    // --- Network join ---
    pub wifi_ssid: heapless::String<32>,
    pub wifi_password: heapless::String<64>,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Inputs
            input_poll_interval_ms: 100,
            debounce_hold_ms: 400,

            // Control
            control_tick_ms: 100,

            // Messaging
            mqtt_uri: truncated(DEFAULT_MQTT_URI),
            mqtt_client_id: truncated("passbox"),
            mqtt_keepalive_secs: 120,
            mqtt_reconnect_timeout_ms: 10_000,
            mqtt_network_timeout_ms: 30_000,

            // Network join (baked in at build time, never logged)
            wifi_ssid: truncated(option_env!("PASSBOX_WIFI_SSID").unwrap_or("")),
            wifi_password: truncated(option_env!("PASSBOX_WIFI_PASS").unwrap_or("")),
        }
    }
}

impl SystemConfig {
    /// Parse a JSON document; missing fields keep their defaults.
    pub fn from_json(bytes: &[u8]) -> Result<Self, Error> {
        let config: Self =
            serde_json::from_slice(bytes).map_err(|_| Error::Config("malformed JSON"))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject timings the control loop cannot honour.
    pub fn validate(&self) -> Result<(), Error> {
        if self.input_poll_interval_ms == 0 {
            return Err(Error::Config("input_poll_interval_ms must be > 0"));
        }
        if self.control_tick_ms == 0 {
            return Err(Error::Config("control_tick_ms must be > 0"));
        }
        // Sterilisation progress is reported once per second.
        if self.control_tick_ms > 1000 {
            return Err(Error::Config("control_tick_ms must be <= 1000"));
        }
        if self.debounce_hold_ms < self.input_poll_interval_ms {
            return Err(Error::Config("debounce_hold_ms shorter than poll interval"));
        }
        if self.mqtt_uri.is_empty() {
            return Err(Error::Config("mqtt_uri is empty"));
        }
        Ok(())
    }
}
