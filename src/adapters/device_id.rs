//! Node identity.
//!
//! A node is named after the device-specific half of its factory MAC:
//! `WN-` followed by the last three bytes in uppercase hex.  The name is
//! recomputed on every wake and never stored, so it survives NVS erases.

use core::fmt::{self, Write};

use serde::{Deserialize, Serialize};

/// Short, stable node name such as `WN-EFCAFE`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(heapless::String<9>);

impl NodeId {
    pub fn from_mac(mac: &[u8; 6]) -> Self {
        let mut id = heapless::String::new();
        // 3 + 6 hex digits always fit.
        let _ = write!(id, "WN-{:02X}{:02X}{:02X}", mac[3], mac[4], mac[5]);
        Self(id)
    }

    /// Identity of the chip this code runs on.
    pub fn this_node() -> Self {
        Self::from_mac(&factory_mac())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(target_os = "espidf")]
fn factory_mac() -> [u8; 6] {
    let mut mac = [0u8; 6];
    // SAFETY: writes exactly 6 bytes into `mac`.
    let ret = unsafe { esp_idf_svc::sys::esp_efuse_mac_get_default(mac.as_mut_ptr()) };
    if ret != esp_idf_svc::sys::ESP_OK as esp_idf_svc::sys::esp_err_t {
        log::warn!("NodeId: eFuse MAC read failed (rc={}), using zeros", ret);
    }
    mac
}

/// Simulation MAC, fixed so host logs are reproducible.
#[cfg(not(target_os = "espidf"))]
fn factory_mac() -> [u8; 6] {
    [0xDE, 0xAD, 0xBE, 0xEF, 0xCA, 0xFE]
}
