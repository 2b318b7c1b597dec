//! Fuzz target: device configuration loading
//!
//! Feeds arbitrary text through `ConfigStore::from_json` and
//! `DeepSleepConfig::from_port`, checking that:
//! - No panics under any input
//! - An accepted config always has a non-zero sleep time
//! - An accepted wake pin is either disabled or on the RTC whitelist
//!
//! cargo fuzz run fuzz_device_config

#![no_main]

use libfuzzer_sys::fuzz_target;
use wakecycle::adapters::config_store::ConfigStore;
use wakecycle::config::DeepSleepConfig;
use wakecycle::pins::WakeupPin;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };
    let Ok(store) = ConfigStore::from_json(text) else {
        return;
    };
    let Ok(config) = DeepSleepConfig::from_port(&store) else {
        return;
    };

    assert!(!config.sleep.sleep_time.is_zero(), "zero sleep time accepted");
    match config.wake_pin.wakeup_pin() {
        Ok(Some(pin)) => assert!(WakeupPin::ALL.contains(&pin)),
        Ok(None) => {}
        Err(e) => panic!("validated config yields bad pin: {e}"),
    }
});
