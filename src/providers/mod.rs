//! Built-in data providers.
//!
//! Application-specific sensors live in their own crates and register
//! alongside these through [`ProviderSet`](crate::adapters::registry::ProviderSet).

pub mod heartbeat;
