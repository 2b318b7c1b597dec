//! Messages relayed from providers to the bus.
//!
//! The core only looks at the type discriminator (for logging); the payload
//! is opaque and forwarded unchanged.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Short name identifying what a message carries (e.g. `"Temperature"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageType(heapless::String<32>);

impl MessageType {
    /// Build a type tag, truncating names longer than 32 bytes.
    pub fn new(name: &str) -> Self {
        let mut s = heapless::String::new();
        for c in name.chars() {
            if s.push(c).is_err() {
                break;
            }
        }
        Self(s)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A provider result on its way to the bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message_type: MessageType,
    pub payload: Vec<u8>,
}

impl Message {
    pub fn new(message_type: &str, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            message_type: MessageType::new(message_type),
            payload: payload.into(),
        }
    }

    /// Serialise a value as JSON into the payload.
    pub fn json<T: Serialize>(message_type: &str, value: &T) -> Result<Self, serde_json::Error> {
        Ok(Self::new(message_type, serde_json::to_vec(value)?))
    }

    /// Compact wire form for bus transports.
    pub fn encode(&self) -> Result<Vec<u8>, postcard::Error> {
        postcard::to_allocvec(self)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, postcard::Error> {
        postcard::from_bytes(bytes)
    }
}
