//! Six-line button panel.
//!
//! ## Hardware
//!
//! Active-low momentary switches with internal pull-ups: a pressed button
//! reads low.  Debounce and edge detection live in
//! [`InputDispatcher`](crate::app::input::InputDispatcher); this driver only
//! reports levels.
//!
//! | Line               | Label                 |
//! |--------------------|-----------------------|
//! | `CycleToggle`      | BTN_DEPART            |
//! | `Emergency`        | BTN_ARRET             |
//! | `SterileOpen`      | BTN_STERILE_OUVERT    |
//! | `SterileClose`     | BTN_STERILE_FERME     |
//! | `ContaminatedOpen` | BTN_CONTAMINEE_OUVERT |
//! | `ContaminatedClose`| BTN_CONTAMINEE_FERME  |

use embedded_hal::digital::InputPin;

use crate::app::ports::{ButtonLine, ButtonPort};

/// Input pins indexed by [`ButtonLine`].
pub struct ButtonPanel<P> {
    pins: [P; ButtonLine::COUNT],
}

impl<P: InputPin> ButtonPanel<P> {
    /// `pins` must be ordered by `ButtonLine` discriminant.
    pub fn new(pins: [P; ButtonLine::COUNT]) -> Self {
        Self { pins }
    }
}

impl<P: InputPin> ButtonPort for ButtonPanel<P> {
    fn is_asserted(&mut self, line: ButtonLine) -> bool {
        // A read error counts as released.
        self.pins[line as usize].is_low().unwrap_or(false)
    }
}
