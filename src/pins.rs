//! RTC wake-capable GPIO table for the ESP32.
//!
//! Only pads routed through the RTC IO mux can wake the chip from deep
//! sleep.  The table below is fixed by silicon, not by configuration, so a
//! pin number outside it is rejected when the controller is built rather
//! than when the device is about to power down.
//!
//! | GPIO | RTC_GPIO | GPIO | RTC_GPIO |
//! |------|----------|------|----------|
//! | 0    | 11       | 27   | 17       |
//! | 2    | 12       | 32   | 9        |
//! | 4    | 10       | 33   | 8        |
//! | 12   | 15       | 34   | 4        |
//! | 13   | 14       | 35   | 5        |
//! | 14   | 16       | 36   | 0        |
//! | 15   | 13       | 37   | 1        |
//! | 25   | 6        | 38   | 2        |
//! | 26   | 7        | 39   | 3        |

use core::fmt;

use crate::error::Error;

/// A GPIO that can act as a deep-sleep wake source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum WakeupPin {
    Gpio0 = 0,
    Gpio2 = 2,
    Gpio4 = 4,
    Gpio12 = 12,
    Gpio13 = 13,
    Gpio14 = 14,
    Gpio15 = 15,
    Gpio25 = 25,
    Gpio26 = 26,
    Gpio27 = 27,
    Gpio32 = 32,
    Gpio33 = 33,
    Gpio34 = 34,
    Gpio35 = 35,
    Gpio36 = 36,
    Gpio37 = 37,
    Gpio38 = 38,
    Gpio39 = 39,
}

impl WakeupPin {
    /// Every wake-capable pin, in ascending GPIO order.
    pub const ALL: [WakeupPin; 18] = [
        Self::Gpio0,
        Self::Gpio2,
        Self::Gpio4,
        Self::Gpio12,
        Self::Gpio13,
        Self::Gpio14,
        Self::Gpio15,
        Self::Gpio25,
        Self::Gpio26,
        Self::Gpio27,
        Self::Gpio32,
        Self::Gpio33,
        Self::Gpio34,
        Self::Gpio35,
        Self::Gpio36,
        Self::Gpio37,
        Self::Gpio38,
        Self::Gpio39,
    ];

    /// Map a raw pin number to its wake source.
    pub fn from_gpio(pin: i16) -> Result<Self, Error> {
        Ok(match pin {
            0 => Self::Gpio0,
            2 => Self::Gpio2,
            4 => Self::Gpio4,
            12 => Self::Gpio12,
            13 => Self::Gpio13,
            14 => Self::Gpio14,
            15 => Self::Gpio15,
            25 => Self::Gpio25,
            26 => Self::Gpio26,
            27 => Self::Gpio27,
            32 => Self::Gpio32,
            33 => Self::Gpio33,
            34 => Self::Gpio34,
            35 => Self::Gpio35,
            36 => Self::Gpio36,
            37 => Self::Gpio37,
            38 => Self::Gpio38,
            39 => Self::Gpio39,
            other => return Err(Error::UnsupportedPin(other)),
        })
    }

    /// The GPIO number this wake source is bound to.
    pub const fn gpio(self) -> u8 {
        self as u8
    }

    /// Bitmask for `esp_sleep_enable_ext1_wakeup`.
    pub const fn ext1_mask(self) -> u64 {
        1u64 << self.gpio()
    }

    /// GPIO 34–39 are input-only pads without internal pull resistors;
    /// they need an external pull-down to idle low.
    pub const fn has_internal_pulls(self) -> bool {
        self.gpio() < 34
    }
}

impl TryFrom<i16> for WakeupPin {
    type Error = Error;

    fn try_from(pin: i16) -> Result<Self, Self::Error> {
        Self::from_gpio(pin)
    }
}

impl fmt::Display for WakeupPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GPIO{}", self.gpio())
    }
}
