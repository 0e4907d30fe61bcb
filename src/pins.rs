//! GPIO assignments for the pass-box panel (ESP32 DevKit).
//!
//! Single source of truth for the six button lines.  All inputs are
//! active-low with the internal pull-up enabled.

use crate::app::ports::ButtonLine;

pub const BTN_DEPART_GPIO: i32 = 27;
pub const BTN_ARRET_GPIO: i32 = 14;
pub const BTN_STERILE_OUVERT_GPIO: i32 = 26;
pub const BTN_STERILE_FERME_GPIO: i32 = 25;
pub const BTN_CONTAMINEE_OUVERT_GPIO: i32 = 13;
pub const BTN_CONTAMINEE_FERME_GPIO: i32 = 12;

/// GPIO number of a button line.
pub fn gpio_for(line: ButtonLine) -> i32 {
    match line {
        ButtonLine::CycleToggle => BTN_DEPART_GPIO,
        ButtonLine::Emergency => BTN_ARRET_GPIO,
        ButtonLine::SterileOpen => BTN_STERILE_OUVERT_GPIO,
        ButtonLine::SterileClose => BTN_STERILE_FERME_GPIO,
        ButtonLine::ContaminatedOpen => BTN_CONTAMINEE_OUVERT_GPIO,
        ButtonLine::ContaminatedClose => BTN_CONTAMINEE_FERME_GPIO,
    }
}

/// Claim the button pins, ordered by `ButtonLine` discriminant.
#[cfg(target_os = "espidf")]
pub fn button_pins(pins: esp_idf_svc::hal::gpio::Pins) -> [esp_idf_svc::hal::gpio::AnyIOPin; ButtonLine::COUNT] {
    use esp_idf_svc::hal::gpio::IOPin;
    [
        pins.gpio27.downgrade(),
        pins.gpio14.downgrade(),
        pins.gpio26.downgrade(),
        pins.gpio25.downgrade(),
        pins.gpio13.downgrade(),
        pins.gpio12.downgrade(),
    ]
}
