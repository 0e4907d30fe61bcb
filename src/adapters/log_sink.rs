//! Log-based display adapter.
//!
//! Implements [`DisplayPort`] by writing to the ESP-IDF logger (UART /
//! USB-CDC in production) in place of the 16x2 LCD.

use log::info;

use crate::app::ports::DisplayPort;

/// Logs every display update, remembering the last frame.
#[derive(Debug, Default)]
pub struct LogDisplay {
    line1: heapless::String<20>,
    line2: heapless::String<20>,
}

impl LogDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// What the display currently shows.
    pub fn lines(&self) -> (&str, &str) {
        (&self.line1, &self.line2)
    }
}

impl DisplayPort for LogDisplay {
    fn show(&mut self, line1: &str, line2: &str) {
        self.line1 = crate::app::events::bounded(line1);
        self.line2 = crate::app::events::bounded(line2);
        info!("LCD    | {:<16} | {:<16}", line1, line2);
    }
}
