//! WiFi station uplink.
//!
//! Implements [`NetworkPort`] for the controller's precheck: a node that
//! has credentials but no association restarts instead of collecting data
//! it cannot deliver.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: [`WifiStation`] drives `esp_idf_svc::wifi`
//!   on the radio modem taken from `esp_idf_hal` peripherals.
//! - **all other targets**: only the error type; host tests stand in their
//!   own `NetworkPort`.
//!
//! ## Connect policy
//!
//! Up to [`CONNECT_ATTEMPTS`] tries per wake, waiting 2 s then 4 s between
//! them.  Nothing is retried after that; the controller sees the link down
//! and restarts the device.

use core::fmt;

#[cfg(target_os = "espidf")]
pub use esp::WifiStation;

/// Association attempts per wake before giving up.
pub const CONNECT_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiError {
    /// Credentials do not fit the driver's fixed-size fields.
    InvalidCredentials,
    /// Every association attempt failed.
    ConnectFailed { attempts: u32 },
    /// The ESP-IDF WiFi driver returned an error code.
    Driver(i32),
}

impl fmt::Display for WifiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCredentials => write!(f, "credentials rejected by the WiFi driver"),
            Self::ConnectFailed { attempts } => {
                write!(f, "WiFi association failed after {} attempts", attempts)
            }
            Self::Driver(rc) => write!(f, "WiFi driver error (rc={})", rc),
        }
    }
}

impl core::error::Error for WifiError {}

/// Wait before retry number `attempt` (1-based): 2 s, 4 s, 8 s ...
pub fn backoff_secs(attempt: u32) -> u64 {
    2u64 << attempt.saturating_sub(1).min(5)
}

#[cfg(target_os = "espidf")]
mod esp {
    use core::time::Duration;

    use esp_idf_hal::modem::Modem;
    use esp_idf_svc::eventloop::EspSystemEventLoop;
    use esp_idf_svc::nvs::EspDefaultNvsPartition;
    use esp_idf_svc::sys::EspError;
    use esp_idf_svc::wifi::{AuthMethod, BlockingWifi, ClientConfiguration, Configuration, EspWifi};
    use log::{info, warn};

    use super::{CONNECT_ATTEMPTS, WifiError, backoff_secs};
    use crate::app::ports::NetworkPort;
    use crate::config::NetworkConfig;

    impl From<EspError> for WifiError {
        fn from(e: EspError) -> Self {
            Self::Driver(e.code())
        }
    }

    /// Started WiFi driver in station mode.
    pub struct WifiStation {
        wifi: BlockingWifi<EspWifi<'static>>,
    }

    impl WifiStation {
        /// Configure and start the driver.  Does not associate yet.
        pub fn start(
            modem: Modem,
            sysloop: EspSystemEventLoop,
            nvs: Option<EspDefaultNvsPartition>,
            network: &NetworkConfig,
        ) -> Result<Self, WifiError> {
            let driver = EspWifi::new(modem, sysloop.clone(), nvs)?;
            let mut wifi = BlockingWifi::wrap(driver, sysloop)?;

            let client = ClientConfiguration {
                ssid: network
                    .ssid
                    .as_str()
                    .try_into()
                    .map_err(|_| WifiError::InvalidCredentials)?,
                password: network
                    .password
                    .as_str()
                    .try_into()
                    .map_err(|_| WifiError::InvalidCredentials)?,
                auth_method: if network.is_open() {
                    AuthMethod::None
                } else {
                    AuthMethod::WPA2Personal
                },
                ..Default::default()
            };
            wifi.set_configuration(&Configuration::Client(client))?;
            wifi.start()?;
            info!("WiFi: station started for '{}'", network.ssid);
            Ok(Self { wifi })
        }

        /// Associate and wait for an IP, retrying with backoff.
        pub fn connect(&mut self) -> Result<(), WifiError> {
            for attempt in 1..=CONNECT_ATTEMPTS {
                match self.wifi.connect().and_then(|()| self.wifi.wait_netif_up()) {
                    Ok(()) => {
                        info!("WiFi: connected (attempt {})", attempt);
                        return Ok(());
                    }
                    Err(e) if attempt < CONNECT_ATTEMPTS => {
                        let wait = backoff_secs(attempt);
                        warn!("WiFi: connect failed ({}), retrying in {}s", e, wait);
                        std::thread::sleep(Duration::from_secs(wait));
                    }
                    Err(e) => warn!("WiFi: connect failed ({})", e),
                }
            }
            Err(WifiError::ConnectFailed {
                attempts: CONNECT_ATTEMPTS,
            })
        }
    }

    impl NetworkPort for WifiStation {
        fn is_connected(&self) -> bool {
            self.wifi.is_connected().unwrap_or(false)
        }
    }
}
