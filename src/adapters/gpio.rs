//! GPIO input adapter.
//!
//! - **`target_os = "espidf"`**: [`EspGpio`] configures the pad with raw
//!   `gpio_config` and reads it with `gpio_get_level`.
//! - **everywhere**: [`SimGpio`] keeps pin levels in memory so host tests
//!   and simulation runs can drive the wake-disable input.
//!
//! Both hand out `embedded_hal::digital::InputPin` handles and refuse to
//! open the same pin twice.

use core::cell::Cell;
use core::convert::Infallible;
use std::rc::Rc;

use embedded_hal::digital::{ErrorType, InputPin};
use log::info;

use crate::app::ports::{GpioError, GpioPort, Pull};
use crate::pins::WakeupPin;

// ── ESP-IDF backend ───────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub use esp::{EspGpio, EspInputPin};

#[cfg(target_os = "espidf")]
mod esp {
    use core::convert::Infallible;

    use embedded_hal::digital::{ErrorType, InputPin};
    use esp_idf_svc::sys::*;
    use log::info;

    use crate::app::ports::{GpioError, GpioPort, Pull};
    use crate::pins::WakeupPin;

    /// Raw ESP-IDF GPIO controller.
    #[derive(Default)]
    pub struct EspGpio {
        claimed: u64,
    }

    impl EspGpio {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl GpioPort for EspGpio {
        type Input = EspInputPin;

        fn open_input(&mut self, pin: WakeupPin, pull: Pull) -> Result<EspInputPin, GpioError> {
            let mask = pin.ext1_mask();
            if self.claimed & mask != 0 {
                return Err(GpioError::InUse(pin.gpio()));
            }

            let cfg = gpio_config_t {
                pin_bit_mask: mask,
                mode: gpio_mode_t_GPIO_MODE_INPUT,
                pull_up_en: if pull == Pull::Up {
                    gpio_pullup_t_GPIO_PULLUP_ENABLE
                } else {
                    gpio_pullup_t_GPIO_PULLUP_DISABLE
                },
                pull_down_en: if pull == Pull::Down {
                    gpio_pulldown_t_GPIO_PULLDOWN_ENABLE
                } else {
                    gpio_pulldown_t_GPIO_PULLDOWN_DISABLE
                },
                intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
            };
            // SAFETY: single-threaded boot path; the pin is not claimed by
            // anyone else (checked above).
            let ret = unsafe { gpio_config(&cfg) };
            if ret != ESP_OK as i32 {
                return Err(GpioError::ConfigFailed(ret));
            }

            self.claimed |= mask;
            info!("Gpio: {} opened as input ({:?})", pin, pull);
            Ok(EspInputPin {
                gpio: i32::from(pin.gpio()),
            })
        }
    }

    /// A configured input pad.
    pub struct EspInputPin {
        gpio: i32,
    }

    impl ErrorType for EspInputPin {
        type Error = Infallible;
    }

    impl InputPin for EspInputPin {
        fn is_high(&mut self) -> Result<bool, Infallible> {
            // SAFETY: the pad was configured as an input in `open_input`.
            Ok(unsafe { gpio_get_level(self.gpio) } != 0)
        }

        fn is_low(&mut self) -> Result<bool, Infallible> {
            self.is_high().map(|high| !high)
        }
    }
}

// ── Simulation backend ────────────────────────────────────────

/// In-memory GPIO bank.  Pins idle low, matching the pull-down wiring.
#[derive(Default)]
pub struct SimGpio {
    levels: Rc<Cell<u64>>,
    claimed: u64,
}

impl SimGpio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drive a pin's level as seen by every handle opened on it.
    pub fn set_level(&self, pin: WakeupPin, high: bool) {
        let levels = self.levels.get();
        if high {
            self.levels.set(levels | pin.ext1_mask());
        } else {
            self.levels.set(levels & !pin.ext1_mask());
        }
    }
}

impl GpioPort for SimGpio {
    type Input = SimInputPin;

    fn open_input(&mut self, pin: WakeupPin, pull: Pull) -> Result<SimInputPin, GpioError> {
        if self.claimed & pin.ext1_mask() != 0 {
            return Err(GpioError::InUse(pin.gpio()));
        }
        self.claimed |= pin.ext1_mask();
        if pull == Pull::Up {
            self.set_level(pin, true);
        }
        info!("Gpio(sim): {} opened as input ({:?})", pin, pull);
        Ok(SimInputPin {
            mask: pin.ext1_mask(),
            levels: Rc::clone(&self.levels),
        })
    }
}

/// Handle onto one simulated pin.
pub struct SimInputPin {
    mask: u64,
    levels: Rc<Cell<u64>>,
}

impl ErrorType for SimInputPin {
    type Error = Infallible;
}

impl InputPin for SimInputPin {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.levels.get() & self.mask != 0)
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        self.is_high().map(|high| !high)
    }
}
