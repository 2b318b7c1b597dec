//! Integration tests for the orchestration pass: ordering, provider fault
//! isolation, and whole-pass retry.

use crate::mock_hw::{self, Ending, FlakyRegistry, RecordingBus, ScriptedProvider};

use wakecycle::app::pass::{MAX_RETRIES, OrchestrationPass, PassFault};
use wakecycle::app::ports::RegistryError;

#[test]
fn providers_run_in_registration_order() {
    let (a, _) = ScriptedProvider::new("alpha", 2, Ending::Ok);
    let (b, _) = ScriptedProvider::new("bravo", 1, Ending::Ok);
    let (c, _) = ScriptedProvider::new("charlie", 1, Ending::Ok);
    let mut reg = FlakyRegistry::new(0).with(a).with(b).with(c);
    let mut bus = RecordingBus::new();

    let report = OrchestrationPass::new().execute(&mut reg, &mut bus).unwrap();

    assert_eq!(bus.types(), ["alpha", "alpha", "bravo", "charlie"]);
    assert_eq!(report.providers_run, 3);
    assert_eq!(report.messages_published, 4);
}

#[test]
fn failing_provider_does_not_block_or_retry() {
    let (a, a_calls) = ScriptedProvider::new("a", 1, Ending::Ok);
    let (b, b_calls) = ScriptedProvider::new("b", 0, Ending::Err);
    let (c, c_calls) = ScriptedProvider::new("c", 1, Ending::Ok);
    let mut reg = FlakyRegistry::new(0).with(a).with(b).with(c);
    let mut bus = RecordingBus::new();
    mock_hw::capture_logs();

    let report = OrchestrationPass::new().execute(&mut reg, &mut bus).unwrap();

    assert_eq!((a_calls.get(), b_calls.get(), c_calls.get()), (1, 1, 1));
    assert_eq!(report.attempt, 0, "provider faults must not restart the pass");
    assert_eq!(report.providers_failed, 1);
    assert_eq!(reg.enumerations, 1);
    assert_eq!(bus.types(), ["a", "c"]);
    assert!(mock_hw::logged(log::Level::Error, "'b'"));
}

#[test]
fn panicking_provider_is_isolated() {
    let (a, _) = ScriptedProvider::new("a", 0, Ending::Panic);
    let (b, b_calls) = ScriptedProvider::new("b", 1, Ending::Ok);
    let mut reg = FlakyRegistry::new(0).with(a).with(b);
    let mut bus = RecordingBus::new();

    let report = OrchestrationPass::new().execute(&mut reg, &mut bus).unwrap();

    assert_eq!(b_calls.get(), 1);
    assert_eq!(report.providers_failed, 1);
    assert_eq!(bus.types(), ["b"]);
}

#[test]
fn retried_pass_reruns_every_provider() {
    let (a, a_calls) = ScriptedProvider::new("a", 1, Ending::Ok);
    let mut reg = FlakyRegistry::new(2).with(a);
    let mut bus = RecordingBus::new();
    mock_hw::capture_logs();

    let report = OrchestrationPass::new().execute(&mut reg, &mut bus).unwrap();

    assert_eq!(report.attempt, 2);
    assert_eq!(reg.enumerations, 3);
    assert_eq!(a_calls.get(), 1, "enumeration failed before any provider ran");
    assert_eq!(
        mock_hw::logs().iter().filter(|l| l.contains("executing retry")).count(),
        2
    );
}

#[test]
fn faults_on_attempts_one_to_three_recover_on_fourth() {
    let (a, a_calls) = ScriptedProvider::new("a", 1, Ending::Ok);
    let mut reg = FlakyRegistry::new(MAX_RETRIES as usize).with(a);
    let mut bus = RecordingBus::new();

    let report = OrchestrationPass::new().execute(&mut reg, &mut bus).unwrap();

    assert_eq!(report.attempt, MAX_RETRIES);
    assert_eq!(reg.enumerations, 4);
    assert_eq!(a_calls.get(), 1);
    assert_eq!(bus.messages.len(), 1);
}

#[test]
fn fault_on_every_attempt_escalates() {
    let (a, a_calls) = ScriptedProvider::new("a", 1, Ending::Ok);
    let mut reg = FlakyRegistry::new(usize::MAX).with(a);
    let mut bus = RecordingBus::new();

    let err = OrchestrationPass::new().execute(&mut reg, &mut bus).unwrap_err();

    assert_eq!(err.attempts, MAX_RETRIES + 1);
    assert_eq!(err.source, PassFault::Registry(RegistryError::Unavailable));
    assert_eq!(reg.enumerations, 4, "bounded: no fifth attempt");
    assert_eq!(a_calls.get(), 0);
    assert!(bus.messages.is_empty());
}

#[test]
fn panic_outside_providers_is_retried_like_a_fault() {
    let (a, a_calls) = ScriptedProvider::new("a", 1, Ending::Ok);
    let mut reg = FlakyRegistry::new(1).panicking().with(a);
    let mut bus = RecordingBus::new();
    mock_hw::capture_logs();

    let report = OrchestrationPass::new().execute(&mut reg, &mut bus).unwrap();

    assert_eq!(report.attempt, 1);
    assert_eq!(reg.enumerations, 2);
    assert_eq!(a_calls.get(), 1);
    assert_eq!(bus.types(), ["a"]);
    assert!(mock_hw::logged(log::Level::Warn, "panicked: registry panicked on enumeration 1"));
}
