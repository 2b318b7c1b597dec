//! Device runtime adapter.
//!
//! Implements [`DeviceLifecycle`] and the boot hook list.  Services
//! register `on_starting` hooks; [`DeviceRuntime::start`] fires each one
//! exactly once with the runtime itself, so a hook can ask the device to
//! stop before committing to deep sleep.

use log::{debug, info};

use crate::app::ports::DeviceLifecycle;

type StartingHook = Box<dyn FnOnce(&mut DeviceRuntime)>;
type StopHook = Box<dyn FnMut()>;

#[derive(Default)]
pub struct DeviceRuntime {
    starting: Vec<StartingHook>,
    stop_hooks: Vec<StopHook>,
    running: bool,
    stops: u32,
}

impl DeviceRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `hook` once when the device starts.
    pub fn on_starting(&mut self, hook: impl FnOnce(&mut DeviceRuntime) + 'static) {
        self.starting.push(Box::new(hook));
    }

    /// Run `hook` every time the device is stopped (flush radios, park
    /// peripherals, ...).
    pub fn on_stop(&mut self, hook: impl FnMut() + 'static) {
        self.stop_hooks.push(Box::new(hook));
    }

    /// Mark the device running and fire the starting hooks in
    /// registration order.  Hooks registered during `start` run on the
    /// next call.
    pub fn start(&mut self) {
        self.running = true;
        let hooks = core::mem::take(&mut self.starting);
        info!("Device: starting ({} hooks)", hooks.len());
        for hook in hooks {
            hook(self);
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// How many times `stop` has run.
    pub fn stop_count(&self) -> u32 {
        self.stops
    }
}

impl DeviceLifecycle for DeviceRuntime {
    fn stop(&mut self) {
        if !self.running {
            debug!("Device: stop requested while not running");
        }
        for hook in &mut self.stop_hooks {
            hook();
        }
        self.running = false;
        self.stops += 1;
        info!("Device: stopped");
    }
}
