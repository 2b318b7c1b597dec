//! Log-based message bus adapter.
//!
//! Implements [`MessageBus`] by writing each message to the ESP-IDF logger
//! (UART / USB-CDC in production) and keeping its encoded wire form in a
//! bounded outbox for whichever uplink drains it.  An MQTT adapter would
//! implement the same trait.

use log::{info, warn};

use crate::app::message::Message;
use crate::app::ports::MessageBus;

/// Default outbox depth; older frames are dropped first when full.
pub const OUTBOX_CAPACITY: usize = 16;

/// Adapter that logs every [`Message`] and queues its wire form.
pub struct LogMessageBus {
    outbox: heapless::Deque<Vec<u8>, OUTBOX_CAPACITY>,
    published: u32,
}

impl Default for LogMessageBus {
    fn default() -> Self {
        Self::new()
    }
}

impl LogMessageBus {
    pub fn new() -> Self {
        Self {
            outbox: heapless::Deque::new(),
            published: 0,
        }
    }

    /// Messages published since boot.
    pub fn published(&self) -> u32 {
        self.published
    }

    /// Take the oldest queued frame.
    pub fn pop_frame(&mut self) -> Option<Vec<u8>> {
        self.outbox.pop_front()
    }

    pub fn pending(&self) -> usize {
        self.outbox.len()
    }
}

impl MessageBus for LogMessageBus {
    fn publish(&mut self, message: Message) {
        self.published = self.published.wrapping_add(1);
        info!(
            "BUS | #{} type={} payload={}B",
            self.published,
            message.message_type,
            message.payload.len()
        );

        match message.encode() {
            Ok(frame) => {
                if self.outbox.is_full() {
                    warn!("BUS | outbox full, dropping oldest frame");
                    self.outbox.pop_front();
                }
                // Cannot fail: a slot was freed above if needed.
                let _ = self.outbox.push_back(frame);
            }
            Err(e) => warn!("BUS | encode failed for {}: {}", message.message_type, e),
        }
    }
}
