//! Wakecycle Firmware: Main Entry Point
//!
//! One boot = one wake cycle.  The controller is registered as a device
//! starting hook; it runs every provider, publishes the results, and
//! either commits the chip to deep sleep (execution resumes from reset on
//! the next timer/pin wake) or returns so the device keeps running.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                   │
//! │  EspSleepDriver  EspGpio  LogMessageBus  ConfigStore       │
//! │  ProviderSet     DeviceRuntime  WifiStation                │
//! │  ──────────────── Port Trait Boundary ───────────────────  │
//! │  ┌──────────────────────────────────────────────────────┐  │
//! │  │  DeepSleepController                                 │  │
//! │  │  OrchestrationPass · ProviderRunner · SleepGate      │  │
//! │  └──────────────────────────────────────────────────────┘  │
//! └────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::{Result, anyhow};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use log::{error, info};

use wakecycle::adapters::config_store::ConfigStore;
use wakecycle::adapters::device::DeviceRuntime;
use wakecycle::adapters::device_id::NodeId;
use wakecycle::adapters::gpio::EspGpio;
use wakecycle::adapters::log_bus::LogMessageBus;
use wakecycle::adapters::registry::ProviderSet;
use wakecycle::adapters::sleep::EspSleepDriver;
use wakecycle::adapters::time::WakeClock;
use wakecycle::adapters::wifi::WifiStation;
use wakecycle::app::controller::{CycleOutcome, DeepSleepController};
use wakecycle::app::ports::SleepDriver;
use wakecycle::config::{DeepSleepConfig, NetworkConfig};
use wakecycle::providers::heartbeat::HeartbeatProvider;

const DEVICE_CONFIG: &str = include_str!("../config/device.json");

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    let clock = WakeClock::start();
    let node = NodeId::this_node();
    info!("Wakecycle v{} on {}", env!("CARGO_PKG_VERSION"), node);

    // ── 2. Configuration (fail fast on a bad wake pin) ────────
    let store = ConfigStore::from_json(DEVICE_CONFIG).map_err(|e| anyhow!("device config: {e}"))?;
    let config = DeepSleepConfig::from_port(&store)?;
    let network = NetworkConfig::from_port(&store)?;

    // ── 3. Controller + hardware ──────────────────────────────
    let driver = EspSleepDriver::new();
    let wake_cause = driver.wakeup_cause();
    let mut gpio = EspGpio::new();
    let mut controller = DeepSleepController::new(config, &mut gpio, driver)?;

    // ── 4. Uplink (optional; a dead link makes the cycle restart) ──
    if let Some(network) = network {
        let peripherals = Peripherals::take()?;
        let sysloop = EspSystemEventLoop::take()?;
        let nvs = EspDefaultNvsPartition::take()?;
        let mut station = WifiStation::start(peripherals.modem, sysloop, Some(nvs), &network)?;
        if let Err(e) = station.connect() {
            error!("WiFi: {}", e);
        }
        controller = controller.with_network(station);
    }

    // ── 5. Providers and bus ──────────────────────────────────
    let mut providers = ProviderSet::new();
    providers.register(HeartbeatProvider::new(node, wake_cause, clock));
    let mut bus = LogMessageBus::new();

    // ── 6. Device start fires the wake cycle ──────────────────
    let mut device = DeviceRuntime::new();
    device.on_starting(move |dev| {
        let report = controller.run(&mut providers, &mut bus, dev);
        if report.outcome == CycleOutcome::StayedAwake {
            info!("Staying awake; {} frames pending on the bus", bus.pending());
        }
    });
    device.start();

    Ok(())
}
