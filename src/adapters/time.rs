//! Time spent awake in the current wake cycle.
//!
//! Deep sleep resets the chip, and the ESP-IDF high-resolution timer
//! restarts from zero with it, so on target "since reset" already means
//! "since this wake".  On the host the clock starts when it is created.

use core::time::Duration;

pub struct WakeClock {
    #[cfg(not(target_os = "espidf"))]
    started: std::time::Instant,
}

impl Default for WakeClock {
    fn default() -> Self {
        Self::start()
    }
}

impl WakeClock {
    pub fn start() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            started: std::time::Instant::now(),
        }
    }

    #[cfg(target_os = "espidf")]
    pub fn awake(&self) -> Duration {
        // SAFETY: read-only query of the high-resolution timer.
        let us = unsafe { esp_idf_svc::sys::esp_timer_get_time() };
        Duration::from_micros(u64::try_from(us).unwrap_or(0))
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn awake(&self) -> Duration {
        self.started.elapsed()
    }

    /// Whole milliseconds awake, as reported in heartbeats.
    pub fn awake_ms(&self) -> u64 {
        self.awake().as_millis() as u64
    }
}
