//! Deep-sleep controller: the wake-cycle state machine.
//!
//! ```text
//!  Booting ──▶ Working ──▶ DecidingSleep ──┬──▶ EnteringDeepSleep
//!                 │                        └──▶ StayingAwake
//!                 └──▶ Rebooting (uplink down)
//! ```
//!
//! Data collection may fail; sleeping may not.  Whatever happens in
//! `Working` (pass errors after every retry, even a panic), the controller
//! still reaches the sleep decision so a faulty cycle cannot keep a battery
//! node awake.

use std::panic::{self, AssertUnwindSafe};

use embedded_hal::digital::InputPin;
use log::{debug, error, info, warn};

use super::gate::SleepGate;
use super::pass::{OrchestrationPass, PassError, PassReport};
use super::ports::{
    DeviceLifecycle, GpioPort, MessageBus, NetworkPort, ProviderRegistry, Pull, SleepDriver,
    WakeupCause, WakeupLevel,
};
use crate::config::DeepSleepConfig;
use crate::error::Error;
use crate::pins::WakeupPin;

/// Where the controller is in the current wake cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
    Booting,
    Working,
    DecidingSleep,
    EnteringDeepSleep,
    StayingAwake,
    Rebooting,
}

/// How the `Working` phase ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkResult {
    Completed(PassReport),
    /// The pass failed after exhausting its retries.
    Failed(PassError),
    /// A panic escaped the pass's own isolation.
    Panicked,
    /// The pass never ran (uplink down, device rebooting).
    Skipped,
}

/// Terminal state of a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Wake sources armed and deep sleep entered.  Only observable with a
    /// simulated driver; real hardware never returns from sleep entry.
    DeepSleep,
    /// The sleep gate vetoed deep sleep; the device keeps running.
    StayedAwake,
    /// A restart was requested instead of running the pass.
    Rebooting,
}

/// Everything that happened in one `run`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub wakeup_cause: WakeupCause,
    pub work: WorkResult,
    pub outcome: CycleOutcome,
}

/// Drives one wake cycle: log wake cause, run providers, decide, sleep.
pub struct DeepSleepController<D, P> {
    config: DeepSleepConfig,
    wake_pin: Option<WakeupPin>,
    gate: SleepGate<P>,
    driver: D,
    pass: OrchestrationPass,
    network: Option<Box<dyn NetworkPort>>,
    phase: CyclePhase,
}

impl<D, P> DeepSleepController<D, P>
where
    D: SleepDriver,
    P: InputPin,
{
    /// Validate configuration and open the wake pin.
    ///
    /// An unsupported pin number aborts here with [`Error::UnsupportedPin`].
    pub fn new<G>(config: DeepSleepConfig, gpio: &mut G, driver: D) -> Result<Self, Error>
    where
        G: GpioPort<Input = P>,
    {
        config.validate()?;
        let wake_pin = config.wake_pin.wakeup_pin()?;

        let gate = match wake_pin {
            Some(pin) => {
                let pull = if pin.has_internal_pulls() {
                    Pull::Down
                } else {
                    warn!("Controller: {} has no internal pull-down, relying on external resistor", pin);
                    Pull::None
                };
                SleepGate::new(gpio.open_input(pin, pull)?)
            }
            None => SleepGate::disabled(),
        };

        match wake_pin {
            Some(pin) => info!(
                "Controller: sleep {}s, wake/disable pin {}",
                config.sleep.sleep_time.as_secs(),
                pin
            ),
            None => info!(
                "Controller: sleep {}s, no wake pin",
                config.sleep.sleep_time.as_secs()
            ),
        }

        Ok(Self {
            config,
            wake_pin,
            gate,
            driver,
            pass: OrchestrationPass::new(),
            network: None,
            phase: CyclePhase::Booting,
        })
    }

    /// Restart instead of collecting data when `network` reports no link.
    #[must_use]
    pub fn with_network(mut self, network: impl NetworkPort + 'static) -> Self {
        self.network = Some(Box::new(network));
        self
    }

    pub fn phase(&self) -> CyclePhase {
        self.phase
    }

    pub fn wake_pin(&self) -> Option<WakeupPin> {
        self.wake_pin
    }

    pub fn config(&self) -> &DeepSleepConfig {
        &self.config
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Tear down, returning the driver and the wake pin handle.
    pub fn release(self) -> (D, Option<P>) {
        (self.driver, self.gate.release())
    }

    /// Run one complete wake cycle.
    pub fn run(
        &mut self,
        registry: &mut impl ProviderRegistry,
        bus: &mut impl MessageBus,
        device: &mut impl DeviceLifecycle,
    ) -> CycleReport {
        self.phase = CyclePhase::Booting;
        let wakeup_cause = self.driver.wakeup_cause();
        info!("Controller: wake up cause: {}", wakeup_cause);

        self.transition(CyclePhase::Working);
        if self.network.as_ref().is_some_and(|n| !n.is_connected()) {
            error!("Controller: network is not connected, restarting device");
            self.transition(CyclePhase::Rebooting);
            self.driver.reboot();
            return CycleReport {
                wakeup_cause,
                work: WorkResult::Skipped,
                outcome: CycleOutcome::Rebooting,
            };
        }
        let work = self.work(registry, bus);

        self.transition(CyclePhase::DecidingSleep);
        if !self.gate.should_sleep() {
            info!("Controller: deep sleep is disabled due to pin state");
            self.transition(CyclePhase::StayingAwake);
            return CycleReport {
                wakeup_cause,
                work,
                outcome: CycleOutcome::StayedAwake,
            };
        }

        self.transition(CyclePhase::EnteringDeepSleep);
        debug!("Controller: stopping device");
        device.stop();
        debug!("Controller: device stopped");
        self.arm_and_sleep();

        CycleReport {
            wakeup_cause,
            work,
            outcome: CycleOutcome::DeepSleep,
        }
    }

    // ── Internal ──────────────────────────────────────────────

    fn work(&self, registry: &mut impl ProviderRegistry, bus: &mut impl MessageBus) -> WorkResult {
        let pass = self.pass;
        match panic::catch_unwind(AssertUnwindSafe(|| pass.execute(registry, bus))) {
            Ok(Ok(report)) => WorkResult::Completed(report),
            Ok(Err(e)) => {
                error!("Controller: {}, giving up on data collection this cycle", e);
                WorkResult::Failed(e)
            }
            Err(_) => {
                error!("Controller: pass panicked, giving up on data collection this cycle");
                WorkResult::Panicked
            }
        }
    }

    /// Arm wake sources and enter deep sleep.  Arming failures are logged
    /// only; staying awake on a failed arm would drain the battery.
    fn arm_and_sleep(&mut self) {
        let sleep_time = self.config.sleep.sleep_time;
        info!("Controller: going to sleep for {}s", sleep_time.as_secs());

        if let Err(e) = self.driver.enable_timer_wakeup(sleep_time) {
            error!("Controller: timer wake source: {}", e);
        }
        if let Some(pin) = self.wake_pin {
            if let Err(e) = self.driver.enable_ext1_wakeup(pin, WakeupLevel::AnyHigh) {
                error!("Controller: {} wake source: {}", pin, e);
            }
        }

        self.driver.enter_deep_sleep();
    }

    fn transition(&mut self, next: CyclePhase) {
        debug!("Controller: {:?} -> {:?}", self.phase, next);
        self.phase = next;
    }
}
