//! Sleep gate: the single input that can veto deep sleep.
//!
//! Convention: the wake pin is opened with a pull-down, so an undriven pin
//! reads low.  **High = stay awake** (field servicing, OTA); low = sleep.

use embedded_hal::digital::InputPin;
use log::{debug, warn};

/// Decides whether the device may enter deep sleep.
pub struct SleepGate<P> {
    pin: Option<P>,
}

impl<P: InputPin> SleepGate<P> {
    /// A gate with no pin always permits sleep.
    pub const fn disabled() -> Self {
        Self { pin: None }
    }

    pub const fn new(pin: P) -> Self {
        Self { pin: Some(pin) }
    }

    pub fn is_enabled(&self) -> bool {
        self.pin.is_some()
    }

    /// `true` when deep sleep is permitted.
    ///
    /// A failed read permits sleep: a broken override input must not keep
    /// a battery node awake indefinitely.
    pub fn should_sleep(&mut self) -> bool {
        let Some(pin) = self.pin.as_mut() else {
            return true;
        };
        match pin.is_high() {
            Ok(high) => {
                debug!("Gate: wake-disable pin is {}", if high { "HIGH" } else { "LOW" });
                !high
            }
            Err(e) => {
                warn!("Gate: pin read failed ({:?}), permitting sleep", e);
                true
            }
        }
    }

    /// Hand the pin back to the caller.
    pub fn release(self) -> Option<P> {
        self.pin
    }
}
