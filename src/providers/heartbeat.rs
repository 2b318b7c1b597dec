//! Heartbeat provider.
//!
//! Emits one `Heartbeat` message per wake carrying the node ID, the wake
//! cause, and how long the node had been awake when the provider ran.  The
//! backend uses it to spot nodes that stopped waking on schedule.

use serde::{Deserialize, Serialize};

use crate::adapters::device_id::NodeId;
use crate::adapters::time::WakeClock;
use crate::app::message::Message;
use crate::app::ports::{DataProvider, WakeupCause};
use crate::error::ProviderError;

pub const MESSAGE_TYPE: &str = "Heartbeat";

/// JSON body of a heartbeat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeartbeatPayload {
    pub node: NodeId,
    pub wake_cause: heapless::String<16>,
    pub awake_ms: u64,
}

pub struct HeartbeatProvider {
    node: NodeId,
    wake_cause: WakeupCause,
    clock: WakeClock,
}

impl HeartbeatProvider {
    pub fn new(node: NodeId, wake_cause: WakeupCause, clock: WakeClock) -> Self {
        Self {
            node,
            wake_cause,
            clock,
        }
    }
}

impl DataProvider for HeartbeatProvider {
    fn id(&self) -> &str {
        "heartbeat"
    }

    fn acquire(&mut self, emit: &mut dyn FnMut(Message)) -> Result<(), ProviderError> {
        use core::fmt::Write;

        let mut wake_cause = heapless::String::new();
        let _ = write!(wake_cause, "{}", self.wake_cause);

        let payload = HeartbeatPayload {
            node: self.node.clone(),
            wake_cause,
            awake_ms: self.clock.awake_ms(),
        };
        let message = Message::json(MESSAGE_TYPE, &payload)
            .map_err(|_| ProviderError::failed("heartbeat encode failed"))?;
        emit(message);
        Ok(())
    }
}
