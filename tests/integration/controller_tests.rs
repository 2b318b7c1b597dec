//! Integration tests for the deep-sleep controller: end-to-end wake
//! cycles against mock providers, bus, device, and GPIO.

use core::time::Duration;

use crate::mock_hw::{
    self, Ending, FlakyRegistry, MockDevice, MockGpio, MockLink, RecordingBus, ScriptedProvider,
};

use wakecycle::adapters::sleep::{SimSleepDriver, SleepCall};
use wakecycle::app::controller::{CycleOutcome, CyclePhase, DeepSleepController, WorkResult};
use wakecycle::app::ports::{Pull, WakeupCause, WakeupLevel};
use wakecycle::config::{DeepSleepConfig, WAKE_PIN_DISABLED};
use wakecycle::error::Error;
use wakecycle::pins::WakeupPin;

const SLEEP: Duration = Duration::from_secs(600);

fn controller(
    wake_pin: i16,
    gpio: &mut MockGpio,
    driver: SimSleepDriver,
) -> DeepSleepController<SimSleepDriver, mock_hw::MockPin> {
    DeepSleepController::new(DeepSleepConfig::new(SLEEP, wake_pin), gpio, driver).unwrap()
}

fn two_providers() -> FlakyRegistry {
    let (a, _) = ScriptedProvider::new("first", 1, Ending::Ok);
    let (b, _) = ScriptedProvider::new("second", 1, Ending::Ok);
    FlakyRegistry::new(0).with(a).with(b)
}

// ── Construction ─────────────────────────────────────────────

#[test]
fn unsupported_pin_aborts_startup_before_opening_gpio() {
    let mut gpio = MockGpio::default();
    let result = DeepSleepController::new(
        DeepSleepConfig::new(SLEEP, 21),
        &mut gpio,
        SimSleepDriver::new(),
    );
    assert!(matches!(result, Err(Error::UnsupportedPin(21))));
    assert!(gpio.opened.is_empty());
}

#[test]
fn wake_pin_opened_once_with_pull_down() {
    let mut gpio = MockGpio::default();
    let ctrl = controller(27, &mut gpio, SimSleepDriver::new());
    assert_eq!(gpio.opened, [(WakeupPin::Gpio27, Pull::Down)]);
    assert_eq!(ctrl.wake_pin(), Some(WakeupPin::Gpio27));
}

#[test]
fn input_only_pad_opened_without_internal_pull() {
    let mut gpio = MockGpio::default();
    let _ctrl = controller(36, &mut gpio, SimSleepDriver::new());
    assert_eq!(gpio.opened, [(WakeupPin::Gpio36, Pull::None)]);
}

// ── End-to-end cycles ────────────────────────────────────────

#[test]
fn cold_boot_publishes_in_order_then_sleeps_on_timer() {
    let mut gpio = MockGpio::default();
    let mut ctrl = controller(WAKE_PIN_DISABLED, &mut gpio, SimSleepDriver::new());
    let mut reg = two_providers();
    let mut bus = RecordingBus::new();
    let mut device = MockDevice::new();
    mock_hw::capture_logs();

    let report = ctrl.run(&mut reg, &mut bus, &mut device);

    assert_eq!(report.wakeup_cause, WakeupCause::Undefined);
    assert!(mock_hw::logged(log::Level::Info, "wake up cause: undefined"));
    assert_eq!(report.outcome, CycleOutcome::DeepSleep);
    assert!(matches!(report.work, WorkResult::Completed(r) if r.messages_published == 2));
    assert_eq!(bus.types(), ["first", "second"]);
    assert_eq!(device.stops, 1);
    assert_eq!(
        ctrl.driver().calls(),
        [SleepCall::TimerWakeup(SLEEP), SleepCall::DeepSleep]
    );
    assert_eq!(ctrl.phase(), CyclePhase::EnteringDeepSleep);
    assert!(gpio.opened.is_empty());
}

#[test]
fn high_pin_keeps_device_awake_without_arming() {
    let mut gpio = MockGpio::with_level(true);
    let mut ctrl = controller(27, &mut gpio, SimSleepDriver::with_cause(WakeupCause::Ext1));
    let mut reg = two_providers();
    let mut bus = RecordingBus::new();
    let mut device = MockDevice::new();
    mock_hw::capture_logs();

    let report = ctrl.run(&mut reg, &mut bus, &mut device);

    assert_eq!(report.outcome, CycleOutcome::StayedAwake);
    assert_eq!(bus.messages.len(), 2, "providers still run before the gate");
    assert_eq!(device.stops, 0);
    assert!(ctrl.driver().calls().is_empty());
    assert_eq!(ctrl.phase(), CyclePhase::StayingAwake);
    assert!(mock_hw::logged(log::Level::Info, "deep sleep is disabled"));
    assert!(mock_hw::logged(log::Level::Info, "ext1 pin"));
}

#[test]
fn low_pin_arms_timer_and_pin_wake_sources() {
    let mut gpio = MockGpio::with_level(false);
    let mut ctrl = controller(33, &mut gpio, SimSleepDriver::with_cause(WakeupCause::Timer));
    let mut reg = two_providers();
    let mut bus = RecordingBus::new();
    let mut device = MockDevice::new();

    let report = ctrl.run(&mut reg, &mut bus, &mut device);

    assert_eq!(report.outcome, CycleOutcome::DeepSleep);
    assert_eq!(
        ctrl.driver().calls(),
        [
            SleepCall::TimerWakeup(SLEEP),
            SleepCall::Ext1Wakeup(WakeupPin::Gpio33, WakeupLevel::AnyHigh),
            SleepCall::DeepSleep,
        ]
    );
}

#[test]
fn gate_reads_pin_at_decision_time() {
    let mut gpio = MockGpio::with_level(true);
    let level = std::rc::Rc::clone(&gpio.level);
    let mut ctrl = controller(4, &mut gpio, SimSleepDriver::new());
    level.set(false);

    let report = ctrl.run(&mut two_providers(), &mut RecordingBus::new(), &mut MockDevice::new());
    assert_eq!(report.outcome, CycleOutcome::DeepSleep);
}

#[test]
fn terminal_pass_failure_still_sleeps() {
    let (a, a_calls) = ScriptedProvider::new("a", 1, Ending::Ok);
    let mut reg = FlakyRegistry::new(usize::MAX).with(a);
    let mut gpio = MockGpio::default();
    let mut ctrl = controller(WAKE_PIN_DISABLED, &mut gpio, SimSleepDriver::new());
    let mut bus = RecordingBus::new();
    let mut device = MockDevice::new();
    mock_hw::capture_logs();

    let report = ctrl.run(&mut reg, &mut bus, &mut device);

    assert!(matches!(report.work, WorkResult::Failed(ref e) if e.attempts == 4));
    assert_eq!(report.outcome, CycleOutcome::DeepSleep);
    assert_eq!(a_calls.get(), 0);
    assert_eq!(device.stops, 1);
    assert!(ctrl.driver().slept());
    assert!(mock_hw::logged(log::Level::Error, "pass failed after 4 attempts"));
}

#[test]
fn provider_failures_do_not_change_the_sleep_decision() {
    let (a, _) = ScriptedProvider::new("broken", 0, Ending::Err);
    let (b, _) = ScriptedProvider::new("crashing", 0, Ending::Panic);
    let (c, c_calls) = ScriptedProvider::new("fine", 1, Ending::Ok);
    let mut reg = FlakyRegistry::new(0).with(a).with(b).with(c);
    let mut gpio = MockGpio::default();
    let mut ctrl = controller(WAKE_PIN_DISABLED, &mut gpio, SimSleepDriver::new());
    let mut bus = RecordingBus::new();

    let report = ctrl.run(&mut reg, &mut bus, &mut MockDevice::new());

    assert!(matches!(report.work, WorkResult::Completed(r) if r.providers_failed == 2));
    assert_eq!(c_calls.get(), 1);
    assert_eq!(report.outcome, CycleOutcome::DeepSleep);
}

// ── Uplink precheck ──────────────────────────────────────────

#[test]
fn disconnected_uplink_reboots_without_running_providers() {
    let (a, a_calls) = ScriptedProvider::new("a", 1, Ending::Ok);
    let mut reg = FlakyRegistry::new(0).with(a);
    let mut gpio = MockGpio::default();
    let mut ctrl =
        controller(WAKE_PIN_DISABLED, &mut gpio, SimSleepDriver::new()).with_network(MockLink::new(false));
    let mut bus = RecordingBus::new();
    let mut device = MockDevice::new();

    let report = ctrl.run(&mut reg, &mut bus, &mut device);

    assert_eq!(report.outcome, CycleOutcome::Rebooting);
    assert_eq!(report.work, WorkResult::Skipped);
    assert_eq!(a_calls.get(), 0);
    assert_eq!(reg.enumerations, 0);
    assert_eq!(ctrl.driver().calls(), [SleepCall::Reboot]);
    assert_eq!(ctrl.phase(), CyclePhase::Rebooting);
}

#[test]
fn connected_uplink_runs_normally() {
    let link = MockLink::new(true);
    let mut gpio = MockGpio::default();
    let mut ctrl =
        controller(WAKE_PIN_DISABLED, &mut gpio, SimSleepDriver::new()).with_network(link.clone());

    let report = ctrl.run(&mut two_providers(), &mut RecordingBus::new(), &mut MockDevice::new());
    assert_eq!(report.outcome, CycleOutcome::DeepSleep);

    link.connected.set(false);
    let report = ctrl.run(&mut two_providers(), &mut RecordingBus::new(), &mut MockDevice::new());
    assert_eq!(report.outcome, CycleOutcome::Rebooting, "link is read on every cycle");
}

#[test]
fn panic_during_pass_is_retried_before_sleeping() {
    let (a, a_calls) = ScriptedProvider::new("a", 1, Ending::Ok);
    let mut reg = FlakyRegistry::new(1).panicking().with(a);
    let mut gpio = MockGpio::default();
    let mut ctrl = controller(WAKE_PIN_DISABLED, &mut gpio, SimSleepDriver::new());
    let mut bus = RecordingBus::new();

    let report = ctrl.run(&mut reg, &mut bus, &mut MockDevice::new());

    assert!(matches!(report.work, WorkResult::Completed(r) if r.attempt == 1));
    assert_eq!(reg.enumerations, 2);
    assert_eq!(a_calls.get(), 1);
    assert_eq!(bus.types(), ["a"]);
    assert_eq!(report.outcome, CycleOutcome::DeepSleep);
}

#[test]
fn release_hands_back_driver_and_pin() {
    let mut gpio = MockGpio::default();
    let ctrl = controller(13, &mut gpio, SimSleepDriver::new());
    let (driver, pin) = ctrl.release();
    assert!(driver.calls().is_empty());
    assert!(pin.is_some());
}
