//! Deep-sleep configuration records.
//!
//! Two independent sections are read once when the controller is built:
//! the sleep duration and the wake-pin number.  Both are immutable for the
//! rest of the wake cycle.  An optional third section holds the WiFi
//! station credentials for the uplink.

use core::time::Duration;

use log::info;
use serde::{Deserialize, Serialize};

use crate::app::ports::{ConfigError, ConfigPort};
use crate::error::Error;
use crate::pins::WakeupPin;

/// Wake-pin value meaning "no pin wake source, sleep gate disabled".
pub const WAKE_PIN_DISABLED: i16 = -1;

/// Default timer wake interval when no section overrides it.
pub const DEFAULT_SLEEP_TIME: Duration = Duration::from_secs(15 * 60);

/// Timer wake source settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SleepConfig {
    /// How long the timer wake source waits, serialised as whole seconds.
    #[serde(rename = "sleep_time_secs", with = "duration_secs")]
    pub sleep_time: Duration,
}

impl SleepConfig {
    pub const SECTION: &'static str = "DeepSleepDataProvider";
}

impl Default for SleepConfig {
    fn default() -> Self {
        Self {
            sleep_time: DEFAULT_SLEEP_TIME,
        }
    }
}

/// Wake-pin / sleep-gate settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WakePinConfig {
    /// RTC GPIO number, or [`WAKE_PIN_DISABLED`].
    #[serde(default = "disabled_pin")]
    pub wake_gpio_pin: i16,
}

impl WakePinConfig {
    pub const SECTION: &'static str = "DeepSleepWakePin";

    pub const fn disabled() -> Self {
        Self {
            wake_gpio_pin: WAKE_PIN_DISABLED,
        }
    }

    /// Resolve the configured number to a wake source.
    ///
    /// Returns `Ok(None)` for the sentinel and [`Error::UnsupportedPin`] for
    /// any number outside the RTC GPIO table, negative values included.
    pub fn wakeup_pin(&self) -> Result<Option<WakeupPin>, Error> {
        if self.wake_gpio_pin == WAKE_PIN_DISABLED {
            return Ok(None);
        }
        WakeupPin::from_gpio(self.wake_gpio_pin).map(Some)
    }
}

impl Default for WakePinConfig {
    fn default() -> Self {
        Self::disabled()
    }
}

fn disabled_pin() -> i16 {
    WAKE_PIN_DISABLED
}

/// WiFi station credentials.  Without this section the node has no uplink
/// and the controller skips its network precheck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub ssid: heapless::String<32>,
    /// Empty for an open network.
    #[serde(default)]
    pub password: heapless::String<64>,
}

impl NetworkConfig {
    pub const SECTION: &'static str = "Network";

    /// Load the optional section.
    pub fn from_port(port: &impl ConfigPort) -> Result<Option<Self>, Error> {
        let Some(network): Option<Self> = port.section(Self::SECTION)? else {
            info!("Config: no network section, uplink disabled");
            return Ok(None);
        };
        network.validate()?;
        info!("Config: uplink ssid='{}'", network.ssid);
        Ok(Some(network))
    }

    /// SSID must be 1-32 printable ASCII bytes; a WPA2 passphrase is 8-64
    /// bytes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let printable = self.ssid.bytes().all(|b| (0x20..=0x7E).contains(&b));
        if self.ssid.is_empty() || !printable {
            return Err(ConfigError::ValidationFailed("ssid must be 1-32 printable ASCII bytes"));
        }
        if !self.password.is_empty() && self.password.len() < 8 {
            return Err(ConfigError::ValidationFailed("password must be empty or at least 8 bytes"));
        }
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.password.is_empty()
    }
}

/// Both sections, as owned by the deep-sleep controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeepSleepConfig {
    pub sleep: SleepConfig,
    pub wake_pin: WakePinConfig,
}

impl DeepSleepConfig {
    pub fn new(sleep_time: Duration, wake_gpio_pin: i16) -> Self {
        Self {
            sleep: SleepConfig { sleep_time },
            wake_pin: WakePinConfig { wake_gpio_pin },
        }
    }

    /// Load both sections from a typed configuration source.
    ///
    /// The sleep section is mandatory; a missing wake-pin section means the
    /// gate is disabled.
    pub fn from_port(port: &impl ConfigPort) -> Result<Self, Error> {
        let sleep: SleepConfig = port
            .section(SleepConfig::SECTION)?
            .ok_or(ConfigError::MissingSection(SleepConfig::SECTION))?;
        let wake_pin: WakePinConfig = port.section(WakePinConfig::SECTION)?.unwrap_or_default();

        let config = Self { sleep, wake_pin };
        config.validate()?;
        info!(
            "Config: sleep_time={}s wake_pin={}",
            config.sleep.sleep_time.as_secs(),
            config.wake_pin.wake_gpio_pin
        );
        Ok(config)
    }

    /// Range checks that do not need hardware.
    pub fn validate(&self) -> Result<(), Error> {
        if self.sleep.sleep_time.is_zero() {
            return Err(ConfigError::ValidationFailed("sleep_time must be non-zero").into());
        }
        self.wake_pin.wakeup_pin()?;
        Ok(())
    }
}

mod duration_secs {
    use core::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_secs)
    }
}
