//! Unified error types for the wake-cycle core.
//!
//! Construction-time faults funnel into [`Error`]; a misconfigured wake pin
//! must abort startup instead of surfacing right before the device powers
//! down for hours.  Provider faults have their own type because they never
//! leave the provider runner.

use core::fmt;

use crate::app::ports::{ConfigError, GpioError};

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible construction step funnels into this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The configured pin is not one of the RTC wake-capable GPIOs.
    UnsupportedPin(i16),
    /// The wake pin could not be opened as an input.
    Gpio(GpioError),
    /// Configuration is missing, malformed, or out of range.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedPin(pin) => {
                write!(f, "pin number {pin} is not supported as a wake source")
            }
            Self::Gpio(e) => write!(f, "gpio: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl core::error::Error for Error {}

impl From<GpioError> for Error {
    fn from(e: GpioError) -> Self {
        Self::Gpio(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Provider errors
// ---------------------------------------------------------------------------

/// A fault raised by a single provider's acquisition call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The underlying sensor could not be read.
    Sensor(&'static str),
    /// The provider gave up waiting for its data source.
    Timeout,
    /// A dependency of the provider (bus link, peripheral) is not ready yet.
    NotReady,
    /// Free-form failure reason, truncated to 64 bytes.
    Failed(heapless::String<64>),
}

impl ProviderError {
    /// Build a [`ProviderError::Failed`] from any message, truncating on a
    /// char boundary if it does not fit.
    pub fn failed(reason: &str) -> Self {
        let mut s = heapless::String::new();
        for c in reason.chars() {
            if s.push(c).is_err() {
                break;
            }
        }
        Self::Failed(s)
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(what) => write!(f, "sensor read failed: {what}"),
            Self::Timeout => write!(f, "timed out"),
            Self::NotReady => write!(f, "not ready"),
            Self::Failed(reason) => write!(f, "{reason}"),
        }
    }
}

impl core::error::Error for ProviderError {}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
