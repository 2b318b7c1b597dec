//! Application core: orchestration logic, zero I/O.
//!
//! Provider execution, whole-pass retry, the sleep gate, and the wake-cycle
//! state machine.  All interaction with hardware happens through **port
//! traits** defined in [`ports`], keeping this layer fully testable without
//! real peripherals.

pub mod controller;
pub mod gate;
pub mod message;
pub mod pass;
pub mod ports;
pub mod runner;
