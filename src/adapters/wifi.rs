//! WiFi station join.
//!
//! The pass-box only needs the network for the MQTT link, so this adapter
//! does one thing: validate the baked-in credentials and bring the station
//! interface up before the broker client starts.  Reconnection after a
//! link loss is handled by the ESP-IDF driver and the MQTT client's own
//! reconnect timer.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF WiFi driver via `esp_idf_svc::wifi`.
//! - **all other targets**: validation only, for host-side tests.

#[cfg(not(target_os = "espidf"))]
use log::info;

#[cfg(not(target_os = "espidf"))]
use crate::error::CommsError;
use crate::error::Error;

// ───────────────────────────────────────────────────────────────
// Validation
// ───────────────────────────────────────────────────────────────

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

/// SSID must be 1-32 printable ASCII bytes.
pub fn validate_ssid(ssid: &str) -> Result<(), Error> {
    if ssid.is_empty() || ssid.len() > 32 || !is_printable_ascii(ssid) {
        return Err(Error::Config("WiFi SSID invalid"));
    }
    Ok(())
}

/// Password is empty (open network) or 8-64 bytes (WPA2).
pub fn validate_password(password: &str) -> Result<(), Error> {
    if password.is_empty() {
        return Ok(());
    }
    if password.len() < 8 || password.len() > 64 {
        return Err(Error::Config("WiFi password invalid"));
    }
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// Station join
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub use esp_impl::join;

#[cfg(target_os = "espidf")]
mod esp_impl {
    use esp_idf_svc::eventloop::EspSystemEventLoop;
    use esp_idf_svc::hal::modem::Modem;
    use esp_idf_svc::nvs::EspDefaultNvsPartition;
    use esp_idf_svc::wifi::{AuthMethod, BlockingWifi, ClientConfiguration, Configuration, EspWifi};
    use log::{error, info};

    use super::{validate_password, validate_ssid};
    use crate::error::{CommsError, Error};

    /// Bring the station up and block until it has an IP address.  The
    /// returned driver must be kept alive for the link to stay up.
    pub fn join(
        modem: Modem,
        sysloop: EspSystemEventLoop,
        nvs: EspDefaultNvsPartition,
        ssid: &str,
        password: &str,
    ) -> Result<BlockingWifi<EspWifi<'static>>, Error> {
        validate_ssid(ssid)?;
        validate_password(password)?;

        let driver = EspWifi::new(modem, sysloop.clone(), Some(nvs))
            .map_err(|_| Error::Init("WiFi driver"))?;
        let mut wifi =
            BlockingWifi::wrap(driver, sysloop).map_err(|_| Error::Init("WiFi event loop"))?;

        let auth_method = if password.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };
        let config = Configuration::Client(ClientConfiguration {
            ssid: ssid.try_into().map_err(|_| Error::Config("WiFi SSID invalid"))?,
            password: password
                .try_into()
                .map_err(|_| Error::Config("WiFi password invalid"))?,
            auth_method,
            ..Default::default()
        });
        wifi.set_configuration(&config)
            .map_err(|_| Error::Init("WiFi configuration"))?;

        wifi.start().map_err(|_| Error::Init("WiFi start"))?;
        info!("WiFi: connecting to '{}'", ssid);
        wifi.connect().map_err(|e| {
            error!("WiFi: connect failed: {}", e);
            Error::Comms(CommsError::WifiConnectFailed)
        })?;
        wifi.wait_netif_up()
            .map_err(|_| Error::Comms(CommsError::WifiConnectFailed))?;
        info!("WiFi: connected");
        Ok(wifi)
    }
}

/// Simulation: validates the credentials and pretends the link came up.
#[cfg(not(target_os = "espidf"))]
pub fn join(ssid: &str, password: &str) -> Result<(), Error> {
    validate_ssid(ssid)?;
    validate_password(password)?;
    if ssid.starts_with("FAIL") {
        return Err(Error::Comms(CommsError::WifiConnectFailed));
    }
    info!("WiFi (sim): connected to '{}'", ssid);
    Ok(())
}
