//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements              | Connects to              |
//! |------------|-------------------------|--------------------------|
//! | `log_sink` | DisplayPort             | Serial log output        |
//! | `mqtt`     | StatusPort              | MQTT broker (esp-idf-svc)|
//! |            | (inbound → REQUESTS)    |                          |
//! | `time`     | monotonic ms clock      | ESP32 system timer       |
//! | `wifi`     | station join            | ESP-IDF WiFi STA         |

pub mod log_sink;
pub mod mqtt;
pub mod time;
pub mod wifi;
