//! RTC sleep-controller adapter.
//!
//! - **`target_os = "espidf"`**: [`EspSleepDriver`] wraps the
//!   `esp_sleep_*` API.  `enter_deep_sleep` and `reboot` never return.
//! - **everywhere**: [`SimSleepDriver`] records every call so the
//!   controller's branching can be asserted on the host.

use core::time::Duration;

use log::info;

use crate::app::ports::{SleepDriver, SleepError, WakeupCause, WakeupLevel};
use crate::pins::WakeupPin;

// ── ESP-IDF backend ───────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub use esp::EspSleepDriver;

#[cfg(target_os = "espidf")]
mod esp {
    use core::time::Duration;

    use esp_idf_svc::sys::*;
    use log::info;

    use crate::app::ports::{SleepDriver, SleepError, WakeupCause, WakeupLevel};
    use crate::pins::WakeupPin;

    /// Deep-sleep control through the ESP-IDF RTC API.
    #[derive(Default)]
    pub struct EspSleepDriver;

    impl EspSleepDriver {
        pub fn new() -> Self {
            Self
        }
    }

    fn check(ret: esp_err_t) -> Result<(), SleepError> {
        if ret == ESP_OK as esp_err_t {
            Ok(())
        } else {
            Err(SleepError(ret))
        }
    }

    impl SleepDriver for EspSleepDriver {
        #[allow(non_upper_case_globals)]
        fn wakeup_cause(&self) -> WakeupCause {
            // SAFETY: read-only query of the RTC wake-cause register.
            let cause = unsafe { esp_sleep_get_wakeup_cause() };
            match cause {
                esp_sleep_source_t_ESP_SLEEP_WAKEUP_UNDEFINED => WakeupCause::Undefined,
                esp_sleep_source_t_ESP_SLEEP_WAKEUP_EXT0 => WakeupCause::Ext0,
                esp_sleep_source_t_ESP_SLEEP_WAKEUP_EXT1 => WakeupCause::Ext1,
                esp_sleep_source_t_ESP_SLEEP_WAKEUP_TIMER => WakeupCause::Timer,
                esp_sleep_source_t_ESP_SLEEP_WAKEUP_TOUCHPAD => WakeupCause::Touchpad,
                esp_sleep_source_t_ESP_SLEEP_WAKEUP_ULP => WakeupCause::Ulp,
                esp_sleep_source_t_ESP_SLEEP_WAKEUP_GPIO => WakeupCause::Gpio,
                esp_sleep_source_t_ESP_SLEEP_WAKEUP_UART => WakeupCause::Uart,
                other => WakeupCause::Other(other),
            }
        }

        fn enable_timer_wakeup(&mut self, duration: Duration) -> Result<(), SleepError> {
            let us = u64::try_from(duration.as_micros()).unwrap_or(u64::MAX);
            // SAFETY: plain register configuration, single-threaded.
            check(unsafe { esp_sleep_enable_timer_wakeup(us) })
        }

        fn enable_ext1_wakeup(&mut self, pin: WakeupPin, level: WakeupLevel) -> Result<(), SleepError> {
            let mode = match level {
                WakeupLevel::AllLow => esp_sleep_ext1_wakeup_mode_t_ESP_EXT1_WAKEUP_ALL_LOW,
                WakeupLevel::AnyHigh => esp_sleep_ext1_wakeup_mode_t_ESP_EXT1_WAKEUP_ANY_HIGH,
            };
            let gpio = i32::from(pin.gpio());
            // SAFETY: `pin` is an RTC IO by construction; digital pulls are
            // off in deep sleep, so hold the pad low through the RTC mux.
            unsafe {
                if pin.has_internal_pulls() {
                    check(rtc_gpio_pullup_dis(gpio))?;
                    check(rtc_gpio_pulldown_en(gpio))?;
                    check(esp_sleep_pd_config(
                        esp_sleep_pd_domain_t_ESP_PD_DOMAIN_RTC_PERIPH,
                        esp_sleep_pd_option_t_ESP_PD_OPTION_ON,
                    ))?;
                }
                check(esp_sleep_enable_ext1_wakeup(pin.ext1_mask(), mode))
            }
        }

        fn enter_deep_sleep(&mut self) {
            info!("Sleep: entering deep sleep");
            // SAFETY: never returns; the chip resets on wake.
            unsafe { esp_deep_sleep_start() }
        }

        fn reboot(&mut self) {
            info!("Sleep: restarting");
            // SAFETY: never returns.
            unsafe { esp_restart() }
        }
    }
}

// ── Simulation backend ────────────────────────────────────────

/// One recorded [`SimSleepDriver`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepCall {
    TimerWakeup(Duration),
    Ext1Wakeup(WakeupPin, WakeupLevel),
    DeepSleep,
    Reboot,
}

/// Host stand-in for the RTC controller.
#[derive(Debug, Clone)]
pub struct SimSleepDriver {
    cause: WakeupCause,
    calls: Vec<SleepCall>,
}

impl Default for SimSleepDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl SimSleepDriver {
    /// Simulates a cold boot.
    pub fn new() -> Self {
        Self::with_cause(WakeupCause::Undefined)
    }

    pub fn with_cause(cause: WakeupCause) -> Self {
        Self {
            cause,
            calls: Vec::new(),
        }
    }

    pub fn calls(&self) -> &[SleepCall] {
        &self.calls
    }

    pub fn slept(&self) -> bool {
        self.calls.contains(&SleepCall::DeepSleep)
    }
}

impl SleepDriver for SimSleepDriver {
    fn wakeup_cause(&self) -> WakeupCause {
        self.cause
    }

    fn enable_timer_wakeup(&mut self, duration: Duration) -> Result<(), SleepError> {
        self.calls.push(SleepCall::TimerWakeup(duration));
        Ok(())
    }

    fn enable_ext1_wakeup(&mut self, pin: WakeupPin, level: WakeupLevel) -> Result<(), SleepError> {
        self.calls.push(SleepCall::Ext1Wakeup(pin, level));
        Ok(())
    }

    fn enter_deep_sleep(&mut self) {
        info!("Sleep(sim): deep sleep entered");
        self.calls.push(SleepCall::DeepSleep);
    }

    fn reboot(&mut self) {
        info!("Sleep(sim): reboot requested");
        self.calls.push(SleepCall::Reboot);
    }
}
