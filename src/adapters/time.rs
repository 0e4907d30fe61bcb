//! Monotonic clock adapter.
//!
//! - **`target_os = "espidf"`**: wraps `esp_timer_get_time()` from the
//!   ESP-IDF high-resolution timer (microsecond precision, monotonic).
//! - **`not(target_os = "espidf")`**: uses `std::time::Instant` for
//!   host-side simulation.
//!
//! The control task and the input thread each hold their own instance;
//! on the device they read the same hardware timer.

/// Milliseconds since boot.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }

    #[cfg(target_os = "espidf")]
    pub fn now_ms(&self) -> u64 {
        // SAFETY: plain read of the system timer, callable from any task.
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64 / 1000
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}
