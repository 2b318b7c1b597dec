//! Provider runner: one provider, fully isolated.
//!
//! The publish sink is handed to the provider as an argument and borrowed
//! only for the duration of `acquire`, so a provider cannot keep emitting
//! into a later provider's run.  Both `Err` returns and panics are logged
//! and swallowed here; nothing escapes to the pass.

use std::panic::{self, AssertUnwindSafe};

use log::{debug, error};

use super::message::Message;
use super::ports::{DataProvider, MessageBus};

/// What happened while running one provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderOutcome {
    pub id: String,
    pub published: usize,
    pub failed: bool,
}

/// Run `provider` once, forwarding every emitted message to `bus`.
pub fn run_provider(provider: &mut dyn DataProvider, bus: &mut impl MessageBus) -> ProviderOutcome {
    let id = provider.id().to_owned();
    debug!("Runner: initializing '{}' data provider", id);

    let mut published = 0usize;
    let result = {
        let mut emit = |message: Message| {
            debug!("Runner: message {} received from '{}'", message.message_type, id);
            bus.publish(message);
            published += 1;
        };
        panic::catch_unwind(AssertUnwindSafe(|| provider.acquire(&mut emit)))
    };

    let failed = match result {
        Ok(Ok(())) => false,
        Ok(Err(e)) => {
            error!("Runner: provider '{}' failed: {}", id, e);
            true
        }
        Err(payload) => {
            error!("Runner: provider '{}' panicked: {}", id, panic_reason(&*payload));
            true
        }
    };

    ProviderOutcome {
        id,
        published,
        failed,
    }
}

pub(crate) fn panic_reason(payload: &(dyn core::any::Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic payload"
    }
}
