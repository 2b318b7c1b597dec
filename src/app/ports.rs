//! Port traits: the boundary between the wake-cycle core and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ DeepSleepController (domain)
//! ```
//!
//! Providers, the bus, the device runtime, and the sleep/GPIO drivers all
//! implement these traits.  The controller consumes them via generics, so
//! the orchestration logic never touches hardware directly.

use core::fmt;
use core::time::Duration;

use serde::de::DeserializeOwned;

use super::message::Message;
use crate::error::ProviderError;
use crate::pins::WakeupPin;

// ───────────────────────────────────────────────────────────────
// Data providers
// ───────────────────────────────────────────────────────────────

/// A data-acquisition source run once per wake cycle.
pub trait DataProvider {
    /// Stable identifier used in logs.
    fn id(&self) -> &str;

    /// Acquire data, handing each result to `emit` in the order produced.
    ///
    /// `emit` is only valid for the duration of this call.
    fn acquire(&mut self, emit: &mut dyn FnMut(Message)) -> Result<(), ProviderError>;
}

/// The externally owned set of providers, in registration order.
pub trait ProviderRegistry {
    fn providers(&mut self) -> Result<&mut [Box<dyn DataProvider>], RegistryError>;
}

// ───────────────────────────────────────────────────────────────
// Message bus
// ───────────────────────────────────────────────────────────────

/// Outbound message transport.  Fire-and-forget from the core's view:
/// delivery failures are the adapter's concern.
pub trait MessageBus {
    fn publish(&mut self, message: Message);
}

// ───────────────────────────────────────────────────────────────
// Device lifecycle
// ───────────────────────────────────────────────────────────────

/// The running device runtime, quiesced before committing to sleep.
pub trait DeviceLifecycle {
    fn stop(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Sleep driver (RTC controller)
// ───────────────────────────────────────────────────────────────

/// Reason the chip resumed execution, as reported by the RTC controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeupCause {
    /// Cold boot or reset not caused by a sleep wake source.
    Undefined,
    Ext0,
    Ext1,
    Timer,
    Touchpad,
    Ulp,
    Gpio,
    Uart,
    /// Any cause code this firmware does not name.
    Other(u32),
}

impl fmt::Display for WakeupCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => write!(f, "undefined"),
            Self::Ext0 => write!(f, "ext0 pin"),
            Self::Ext1 => write!(f, "ext1 pin"),
            Self::Timer => write!(f, "timer"),
            Self::Touchpad => write!(f, "touchpad"),
            Self::Ulp => write!(f, "ULP"),
            Self::Gpio => write!(f, "gpio"),
            Self::Uart => write!(f, "uart"),
            Self::Other(code) => write!(f, "cause {code}"),
        }
    }
}

/// Pin level that triggers an ext1 wake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeupLevel {
    AllLow,
    AnyHigh,
}

/// Deep-sleep entry and wake-source arming.
pub trait SleepDriver {
    fn wakeup_cause(&self) -> WakeupCause;

    fn enable_timer_wakeup(&mut self, duration: Duration) -> Result<(), SleepError>;

    fn enable_ext1_wakeup(&mut self, pin: WakeupPin, level: WakeupLevel) -> Result<(), SleepError>;

    /// Enter deep sleep.  Does not return on hardware; execution resumes
    /// from reset on the next wake event.
    fn enter_deep_sleep(&mut self);

    /// Restart the chip.  Does not return on hardware.
    fn reboot(&mut self);
}

// ───────────────────────────────────────────────────────────────
// GPIO
// ───────────────────────────────────────────────────────────────

/// Internal resistor applied when a pin is opened as an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pull {
    None,
    Up,
    Down,
}

/// Opens GPIO inputs.  The returned handle is held exclusively by its owner.
pub trait GpioPort {
    type Input: embedded_hal::digital::InputPin;

    fn open_input(&mut self, pin: WakeupPin, pull: Pull) -> Result<Self::Input, GpioError>;
}

// ───────────────────────────────────────────────────────────────
// Network
// ───────────────────────────────────────────────────────────────

/// Link state of the uplink the bus publishes over.
pub trait NetworkPort {
    fn is_connected(&self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Configuration
// ───────────────────────────────────────────────────────────────

/// Typed configuration sections retrieved by name.
pub trait ConfigPort {
    /// Returns `Ok(None)` when the section does not exist.
    fn section<T: DeserializeOwned>(&self, name: &'static str) -> Result<Option<T>, ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations and config validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A mandatory section is absent.
    MissingSection(&'static str),
    /// A section exists but does not deserialise into its record.
    Malformed(&'static str),
    /// The source document itself could not be parsed.
    InvalidDocument,
    /// A field failed range validation.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSection(name) => write!(f, "section '{}' not found", name),
            Self::Malformed(name) => write!(f, "section '{}' is malformed", name),
            Self::InvalidDocument => write!(f, "config document is not valid JSON"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

/// Errors from [`GpioPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpioError {
    /// `gpio_config` rejected the pin (ESP-IDF return code).
    ConfigFailed(i32),
    /// The pin is already held by another owner.
    InUse(u8),
}

impl fmt::Display for GpioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigFailed(rc) => write!(f, "gpio config failed (rc={})", rc),
            Self::InUse(pin) => write!(f, "GPIO{} already in use", pin),
        }
    }
}

/// Errors from [`SleepDriver`] wake-source arming (ESP-IDF return code).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SleepError(pub i32);

impl fmt::Display for SleepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "wake source arming failed (rc={})", self.0)
    }
}

/// Failure to enumerate the provider set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The registry is not ready to hand out providers yet.
    Unavailable,
    /// A provider could not be constructed.
    Construction(&'static str),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "provider registry unavailable"),
            Self::Construction(what) => write!(f, "provider construction failed: {}", what),
        }
    }
}
