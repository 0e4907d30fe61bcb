//! MQTT link: status publisher and remote command intake.
//!
//! ```text
//!  broker ──Received──▶ callback ──CommandRouter──▶ try_submit ──▶ REQUESTS
//!         ──Connected─▶ callback ──Announce──────▶ try_submit      (+ resubscribe flag)
//!
//!  ControlTask ──StatusPort::publish──▶ MqttStatus ──▶ broker
//! ```
//!
//! The client callback runs on the ESP-IDF MQTT task.  It never touches the
//! controller: it decodes, queues, and returns.  Subscriptions cannot be
//! made from inside the callback, so a connect sets a flag that the control
//! loop services with [`MqttStatus::service_subscriptions`].
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: `esp_idf_svc::mqtt::client::EspMqttClient`.
//! - **all other targets**: a recording stub; inbound messages are fed
//!   through [`on_message`] directly.

use core::sync::atomic::{AtomicBool, Ordering};

use log::{info, warn};

use crate::app::commands::Request;
use crate::app::router::CommandRouter;
use crate::channels;

/// Set on every (re)connection, cleared once subscriptions are made.
static NEED_SUBSCRIBE: AtomicBool = AtomicBool::new(false);

/// Broker connected: resubscribe and republish the full status.
pub fn on_connected() {
    info!("MQTT: connected");
    NEED_SUBSCRIBE.store(true, Ordering::Release);
    let _ = channels::try_submit(Request::Announce);
}

/// Inbound message: decode and queue.  Anything unrecognised is dropped.
pub fn on_message(topic: &str, payload: &[u8]) {
    match CommandRouter::route(topic, payload) {
        Some(cmd) => {
            info!("MQTT: {} -> {:?}", topic, cmd.kind);
            let _ = channels::try_submit(cmd.into());
        }
        None => warn!("MQTT: ignored message on '{}' ({} bytes)", topic, payload.len()),
    }
}

fn take_subscribe_request() -> bool {
    NEED_SUBSCRIBE.swap(false, Ordering::AcqRel)
}

#[cfg(target_os = "espidf")]
pub use esp_impl::MqttStatus;

#[cfg(target_os = "espidf")]
mod esp_impl {
    use core::time::Duration;

    use esp_idf_svc::mqtt::client::{
        EspMqttClient, EventPayload, MqttClientConfiguration, QoS,
    };
    use log::{error, info, warn};

    use super::{on_connected, on_message, take_subscribe_request, NEED_SUBSCRIBE};
    use crate::app::events::Topic;
    use crate::app::ports::StatusPort;
    use crate::app::router::SUBSCRIPTIONS;
    use crate::config::SystemConfig;
    use crate::error::{CommsError, Error};

    pub struct MqttStatus {
        client: EspMqttClient<'static>,
    }

    impl MqttStatus {
        pub fn connect(config: &SystemConfig) -> Result<Self, Error> {
            let conf = MqttClientConfiguration {
                client_id: Some(config.mqtt_client_id.as_str()),
                keep_alive_interval: Some(Duration::from_secs(u64::from(
                    config.mqtt_keepalive_secs,
                ))),
                reconnect_timeout: Some(Duration::from_millis(u64::from(
                    config.mqtt_reconnect_timeout_ms,
                ))),
                network_timeout: Duration::from_millis(u64::from(config.mqtt_network_timeout_ms)),
                ..Default::default()
            };

            let client = EspMqttClient::new_cb(config.mqtt_uri.as_str(), &conf, |event| {
                match event.payload() {
                    EventPayload::Connected(_) => on_connected(),
                    EventPayload::Disconnected => warn!("MQTT: disconnected"),
                    EventPayload::Received {
                        topic: Some(topic),
                        data,
                        ..
                    } => on_message(topic, data),
                    EventPayload::Error(e) => error!("MQTT: {:?}", e),
                    _ => {}
                }
            })
            .map_err(|e| {
                error!("MQTT: client init failed: {}", e);
                Error::Comms(CommsError::MqttInitFailed)
            })?;

            info!("MQTT: client started for {}", config.mqtt_uri);
            Ok(Self { client })
        }

        /// Subscribe to the command topics if a (re)connection asked for it.
        pub fn service_subscriptions(&mut self) -> Result<(), Error> {
            if !take_subscribe_request() {
                return Ok(());
            }
            for topic in SUBSCRIPTIONS {
                if let Err(e) = self.client.subscribe(topic, QoS::AtMostOnce) {
                    error!("MQTT: subscribe '{}' failed: {}", topic, e);
                    NEED_SUBSCRIBE.store(true, core::sync::atomic::Ordering::Release);
                    return Err(Error::Comms(CommsError::MqttSubscribeFailed));
                }
                info!("MQTT: subscribed to '{}'", topic);
            }
            Ok(())
        }
    }

    impl StatusPort for MqttStatus {
        fn publish(&mut self, topic: Topic, payload: &str) {
            if let Err(e) =
                self.client
                    .publish(topic.as_str(), QoS::AtLeastOnce, false, payload.as_bytes())
            {
                warn!("MQTT: publish {} failed: {}", topic, e);
            } else {
                info!("MQTT: {} = {}", topic, payload);
            }
        }
    }
}

#[cfg(not(target_os = "espidf"))]
pub use sim::MqttStatus;

#[cfg(not(target_os = "espidf"))]
mod sim {
    use log::info;

    use super::take_subscribe_request;
    use crate::app::events::{Payload, Topic};
    use crate::app::ports::StatusPort;
    use crate::app::router::SUBSCRIPTIONS;
    use crate::config::SystemConfig;
    use crate::error::Error;

    /// Records publications and subscriptions instead of talking to a broker.
    #[derive(Debug, Default)]
    pub struct MqttStatus {
        pub published: Vec<(Topic, Payload)>,
        pub subscriptions: Vec<&'static str>,
    }

    impl MqttStatus {
        pub fn connect(config: &SystemConfig) -> Result<Self, Error> {
            info!("MQTT (sim): client for {}", config.mqtt_uri);
            Ok(Self::default())
        }

        pub fn service_subscriptions(&mut self) -> Result<(), Error> {
            if take_subscribe_request() {
                self.subscriptions.extend(SUBSCRIPTIONS);
            }
            Ok(())
        }
    }

    impl StatusPort for MqttStatus {
        fn publish(&mut self, topic: Topic, payload: &str) {
            self.published
                .push((topic, crate::app::events::bounded(payload)));
        }
    }
}
