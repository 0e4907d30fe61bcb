//! PassBox Firmware: Main Entry Point
//!
//! Hexagonal architecture with a single control task owning the state.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  ButtonPanel (GPIO)   MqttStatus (broker)   LogDisplay (LCD)   │
//! │        │                    │                     ▲            │
//! │  input thread         MQTT callback               │            │
//! │        │ submit             │ try_submit          │            │
//! │        ▼                    ▼                     │            │
//! │  ──────────────────── REQUESTS channel ─────────────────────   │
//! │                             │                     │            │
//! │  ┌──────────────────────────▼─────────────────────┴───────┐    │
//! │  │   ControlTask: Controller · Interlock · Sequencer      │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::gpio::{PinDriver, Pull};
use esp_idf_svc::hal::prelude::Peripherals;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use log::{info, warn};

use passbox::adapters::log_sink::LogDisplay;
use passbox::adapters::mqtt::MqttStatus;
use passbox::adapters::time::MonotonicClock;
use passbox::adapters::wifi;
use passbox::app::input::InputDispatcher;
use passbox::app::ports::{ButtonLine, DisplayPort, Notifier};
use passbox::app::runtime::ControlTask;
use passbox::channels;
use passbox::config::SystemConfig;
use passbox::drivers::button::ButtonPanel;
use passbox::pins;

/// Stack for the input-poll thread.
const INPUT_STACK_BYTES: usize = 4096;

fn load_config() -> Result<SystemConfig> {
    match option_env!("PASSBOX_CONFIG_JSON") {
        Some(json) => {
            let config = SystemConfig::from_json(json.as_bytes())?;
            info!("Config loaded from PASSBOX_CONFIG_JSON");
            Ok(config)
        }
        None => {
            let config = SystemConfig::default();
            config.validate()?;
            Ok(config)
        }
    }
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  PassBox v{}                         ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = load_config()?;

    // ── 3. Peripherals ────────────────────────────────────────
    let peripherals = Peripherals::take().context("peripherals already taken")?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    let mut buttons = Vec::with_capacity(ButtonLine::COUNT);
    for pin in pins::button_pins(peripherals.pins) {
        let mut driver = PinDriver::input(pin)?;
        driver.set_pull(Pull::Up)?;
        buttons.push(driver);
    }
    let buttons: [_; ButtonLine::COUNT] = buttons
        .try_into()
        .map_err(|_| anyhow::anyhow!("button pin count mismatch"))?;
    for line in ButtonLine::ALL {
        info!("Button {} on GPIO {}", line.label(), pins::gpio_for(line));
    }

    // ── 4. Network + broker ───────────────────────────────────
    // Refuse to run the control loop without the remote link.
    let _wifi = wifi::join(
        peripherals.modem,
        sysloop,
        nvs,
        &config.wifi_ssid,
        &config.wifi_password,
    )?;
    let mqtt = MqttStatus::connect(&config)?;

    // ── 5. Input thread ───────────────────────────────────────
    let poll_interval = Duration::from_millis(u64::from(config.input_poll_interval_ms));
    let debounce_hold_ms = config.debounce_hold_ms;
    thread::Builder::new()
        .name("input".into())
        .stack_size(INPUT_STACK_BYTES)
        .spawn(move || {
            let clock = MonotonicClock::new();
            let mut panel = ButtonPanel::new(buttons);
            let mut input = InputDispatcher::new(debounce_hold_ms);
            loop {
                for request in input.poll(&mut panel, clock.now_ms()) {
                    channels::submit(request);
                }
                thread::sleep(poll_interval);
            }
        })?;

    // ── 6. Control loop ───────────────────────────────────────
    let mut display = LogDisplay::new();
    display.show("Pret", "Attente...");
    let mut task = ControlTask::new(&channels::REQUESTS, Notifier::new(mqtt, display));
    let clock = MonotonicClock::new();
    let tick = Duration::from_millis(u64::from(config.control_tick_ms));

    info!("System ready. Entering control loop.");
    loop {
        if let Err(e) = task.sink_mut().status.service_subscriptions() {
            warn!("{}, retrying next tick", e);
        }
        task.tick(clock.now_ms());
        thread::sleep(tick);
    }
}
