//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter        | Implements         | Connects to                 |
//! |----------------|--------------------|-----------------------------|
//! | `config_store` | ConfigPort         | JSON section document       |
//! | `device`       | DeviceLifecycle    | Boot / stop hook lists      |
//! | `device_id`    | -                  | eFuse factory MAC           |
//! | `gpio`         | GpioPort           | ESP32 GPIO (or simulation)  |
//! | `log_bus`      | MessageBus         | Serial log + frame outbox   |
//! | `registry`     | ProviderRegistry   | Boot-time provider list     |
//! | `sleep`        | SleepDriver        | ESP32 RTC sleep controller  |
//! | `time`         | -                  | ESP32 high-resolution timer |
//! | `wifi`         | NetworkPort        | ESP32 WiFi station          |

pub mod config_store;
pub mod device;
pub mod device_id;
pub mod gpio;
pub mod log_bus;
pub mod registry;
pub mod sleep;
pub mod time;
pub mod wifi;
