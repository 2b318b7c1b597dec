//! Orchestration pass: every provider, in registration order, with
//! whole-pass retry.
//!
//! Provider-local faults are absorbed by the [runner](super::runner).  A
//! fault outside that isolation (the registry failing to hand out its
//! providers, or a panic anywhere else in the attempt) restarts the
//! *entire* pass, up to [`MAX_RETRIES`] times.
//! Providers that already ran will run again; duplicate emissions are the
//! accepted cost of the simple recovery.

use core::fmt;
use std::panic::{self, AssertUnwindSafe};

use log::{info, warn};

use super::ports::{MessageBus, ProviderRegistry, RegistryError};
use super::runner::{panic_reason, run_provider};

/// Retries after the first attempt (4 attempts in total).
pub const MAX_RETRIES: u8 = 3;

/// Summary of the attempt that completed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Zero-based index of the successful attempt.
    pub attempt: u8,
    pub providers_run: usize,
    pub providers_failed: usize,
    pub messages_published: usize,
}

/// Why a single pass attempt was abandoned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassFault {
    /// The registry could not hand out its providers.
    Registry(RegistryError),
    /// The attempt panicked outside provider isolation.
    Panicked(heapless::String<64>),
}

impl PassFault {
    fn panicked(reason: &str) -> Self {
        let mut s = heapless::String::new();
        for c in reason.chars() {
            if s.push(c).is_err() {
                break;
            }
        }
        Self::Panicked(s)
    }
}

impl fmt::Display for PassFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Registry(e) => write!(f, "{}", e),
            Self::Panicked(reason) => write!(f, "panicked: {}", reason),
        }
    }
}

impl From<RegistryError> for PassFault {
    fn from(e: RegistryError) -> Self {
        Self::Registry(e)
    }
}

/// A pass-level fault that survived every retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassError {
    /// Total attempts made, including the first.
    pub attempts: u8,
    /// Fault of the final attempt.
    pub source: PassFault,
}

impl fmt::Display for PassError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pass failed after {} attempts: {}", self.attempts, self.source)
    }
}

impl core::error::Error for PassError {}

/// Bounded whole-pass retry driver.
#[derive(Debug, Clone, Copy)]
pub struct OrchestrationPass {
    max_retries: u8,
}

impl Default for OrchestrationPass {
    fn default() -> Self {
        Self::new()
    }
}

impl OrchestrationPass {
    pub const fn new() -> Self {
        Self {
            max_retries: MAX_RETRIES,
        }
    }

    pub const fn max_retries(&self) -> u8 {
        self.max_retries
    }

    /// Run the pass, retrying on pass-level faults.
    pub fn execute(
        &self,
        registry: &mut impl ProviderRegistry,
        bus: &mut impl MessageBus,
    ) -> Result<PassReport, PassError> {
        let mut attempt = 0u8;
        loop {
            match Self::attempt(registry, bus) {
                Ok(mut report) => {
                    report.attempt = attempt;
                    info!(
                        "Pass: {} providers run ({} failed), {} messages published",
                        report.providers_run, report.providers_failed, report.messages_published
                    );
                    return Ok(report);
                }
                Err(e) if attempt < self.max_retries => {
                    warn!(
                        "Pass: error when processing ({}), executing retry {}/{}",
                        e,
                        attempt + 1,
                        self.max_retries
                    );
                    attempt += 1;
                }
                Err(e) => {
                    return Err(PassError {
                        attempts: attempt + 1,
                        source: e,
                    });
                }
            }
        }
    }

    /// One attempt, with panics turned into a retryable fault.
    fn attempt(
        registry: &mut impl ProviderRegistry,
        bus: &mut impl MessageBus,
    ) -> Result<PassReport, PassFault> {
        match panic::catch_unwind(AssertUnwindSafe(|| Self::run_once(registry, bus))) {
            Ok(result) => result.map_err(PassFault::from),
            Err(payload) => Err(PassFault::panicked(panic_reason(&*payload))),
        }
    }

    fn run_once(
        registry: &mut impl ProviderRegistry,
        bus: &mut impl MessageBus,
    ) -> Result<PassReport, RegistryError> {
        let providers = registry.providers()?;
        let mut report = PassReport::default();

        for provider in providers.iter_mut() {
            let outcome = run_provider(&mut **provider, bus);
            report.providers_run += 1;
            report.messages_published += outcome.published;
            if outcome.failed {
                report.providers_failed += 1;
            }
        }

        Ok(report)
    }
}
